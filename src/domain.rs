use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter};

use crate::error::DataValidationError;

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn nil_all() -> Self {
        Self { home: 0, away: 0 }
    }

    pub fn total(&self) -> u16 {
        self.home as u16 + self.away as u16
    }

    pub fn result(&self) -> MatchResult {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => MatchResult::Home,
            std::cmp::Ordering::Equal => MatchResult::Draw,
            std::cmp::Ordering::Less => MatchResult::Away,
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}
impl Side {
    pub fn flip(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// The 1X2 result of a match.
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, EnumCount, EnumIter,
)]
pub enum MatchResult {
    Home,
    Draw,
    Away,
}
impl MatchResult {
    /// The single-letter code used by match data providers.
    pub fn code(&self) -> char {
        match self {
            MatchResult::Home => 'H',
            MatchResult::Draw => 'D',
            MatchResult::Away => 'A',
        }
    }

    /// League points awarded to `side` for this result.
    pub fn points(&self, side: Side) -> u32 {
        match (self, side) {
            (MatchResult::Draw, _) => 1,
            (MatchResult::Home, Side::Home) | (MatchResult::Away, Side::Away) => 3,
            _ => 0,
        }
    }
}

impl Display for MatchResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An upcoming match between two distinct teams.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedFixture")]
pub struct Fixture {
    pub home_team: String,
    pub away_team: String,
}
impl Fixture {
    pub fn new(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
    ) -> Result<Self, DataValidationError> {
        let (home_team, away_team) = (home_team.into(), away_team.into());
        if home_team == away_team {
            return Err(DataValidationError::SelfFixture { team: home_team });
        }
        Ok(Self {
            home_team,
            away_team,
        })
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }
}

#[derive(Deserialize)]
struct UncheckedFixture {
    home_team: String,
    away_team: String,
}

impl TryFrom<UncheckedFixture> for Fixture {
    type Error = DataValidationError;

    fn try_from(unchecked: UncheckedFixture) -> Result<Self, Self::Error> {
        Self::new(unchecked.home_team, unchecked.away_team)
    }
}

impl Display for Fixture {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} vs {}", self.home_team, self.away_team)
    }
}

/// A proposition that can be settled against a final score.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    Win(Side),
    Draw,
    /// Strictly fewer total goals than the given number.
    Under(u8),
    /// Strictly more total goals than the given number.
    Over(u8),
    Score(Score),
    BothScore,
    NotBothScore,
}
