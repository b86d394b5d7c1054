//! Attack and defence strengths of teams, relative to league-average scoring.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::MatchTable;
use crate::domain::Side;
use crate::error::InsufficientDataError;

/// Floor applied to every strength coefficient, so that a team that never scored (or never
/// conceded) still yields a positive scoring rate.
pub const MIN_STRENGTH: f64 = 1e-3;

/// Mean goals scored by home and away sides across the estimation window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeagueAverages {
    pub matches: usize,
    pub avg_goals_home: f64,
    pub avg_goals_away: f64,
}
impl LeagueAverages {
    pub fn compute(table: &MatchTable) -> Result<Self, InsufficientDataError> {
        if table.is_empty() {
            return Err(InsufficientDataError::EmptyTable);
        }
        let (home_goals, away_goals) = table
            .matches()
            .iter()
            .fold((0u64, 0u64), |(home, away), m| {
                (home + m.home_goals as u64, away + m.away_goals as u64)
            });
        let matches = table.len();
        Ok(Self {
            matches,
            avg_goals_home: home_goals as f64 / matches as f64,
            avg_goals_away: away_goals as f64 / matches as f64,
        })
    }

    /// Mean goals scored by sides playing at `venue`.
    pub fn avg_goals(&self, venue: Side) -> f64 {
        match venue {
            Side::Home => self.avg_goals_home,
            Side::Away => self.avg_goals_away,
        }
    }
}

/// Multipliers on league-average scoring. An attack above 1.0 scores more than the average side
/// at that venue; a defence above 1.0 concedes more.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStrength {
    pub attack_home: f64,
    pub defense_home: f64,
    pub attack_away: f64,
    pub defense_away: f64,
}
impl TeamStrength {
    /// A team indistinguishable from the league average.
    pub fn neutral() -> Self {
        Self {
            attack_home: 1.0,
            defense_home: 1.0,
            attack_away: 1.0,
            defense_away: 1.0,
        }
    }

    pub fn attack(&self, venue: Side) -> f64 {
        match venue {
            Side::Home => self.attack_home,
            Side::Away => self.attack_away,
        }
    }

    pub fn defense(&self, venue: Side) -> f64 {
        match venue {
            Side::Home => self.defense_home,
            Side::Away => self.defense_away,
        }
    }
}

/// Goals tallied by one team at one venue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VenueRecord {
    pub matches: u32,
    pub scored: u32,
    pub conceded: u32,
}

#[derive(Debug, Clone, Default)]
struct TeamRecord {
    home: VenueRecord,
    away: VenueRecord,
}
impl TeamRecord {
    fn venue(&self, venue: Side) -> &VenueRecord {
        match venue {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    fn venue_mut(&mut self, venue: Side) -> &mut VenueRecord {
        match venue {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

/// Strengths of every team in one match table snapshot. Bound to that snapshot: a changed table
/// calls for a new estimate.
#[derive(Debug, Clone)]
pub struct StrengthTable {
    averages: LeagueAverages,
    smoothing_k: f64,
    records: FxHashMap<String, TeamRecord>,
}
impl StrengthTable {
    pub fn estimate(table: &MatchTable, smoothing_k: f64) -> Result<Self, InsufficientDataError> {
        debug_assert!(smoothing_k >= 0.0, "negative smoothing {smoothing_k}");
        let averages = LeagueAverages::compute(table)?;
        let mut records = FxHashMap::<String, TeamRecord>::default();
        for m in table.matches() {
            for venue in [Side::Home, Side::Away] {
                let record = records
                    .entry(m.team(venue).to_string())
                    .or_default()
                    .venue_mut(venue);
                record.matches += 1;
                record.scored += m.goals(venue) as u32;
                record.conceded += m.goals(venue.flip()) as u32;
            }
        }
        info!(
            "estimated strengths of {} teams over {} matches; league averages (home={:.3}, away={:.3})",
            records.len(),
            averages.matches,
            averages.avg_goals_home,
            averages.avg_goals_away
        );
        Ok(Self {
            averages,
            smoothing_k,
            records,
        })
    }

    pub fn averages(&self) -> &LeagueAverages {
        &self.averages
    }

    /// Team names in ascending order.
    pub fn teams(&self) -> Vec<&str> {
        let mut teams = self.records.keys().map(String::as_str).collect::<Vec<_>>();
        teams.sort();
        teams
    }

    pub fn record(&self, team: &str, venue: Side) -> Option<&VenueRecord> {
        self.records.get(team).map(|record| record.venue(venue))
    }

    /// The strength of `team`, which must have played at least once at each venue.
    pub fn get(&self, team: &str) -> Result<TeamStrength, InsufficientDataError> {
        let record = self
            .records
            .get(team)
            .ok_or_else(|| InsufficientDataError::UnknownTeam { team: team.into() })?;
        let home = self
            .venue_strength(record, Side::Home)
            .ok_or_else(|| Self::no_history(team, Side::Home))?;
        let away = self
            .venue_strength(record, Side::Away)
            .ok_or_else(|| Self::no_history(team, Side::Away))?;
        Ok(TeamStrength {
            attack_home: home.0,
            defense_home: home.1,
            attack_away: away.0,
            defense_away: away.1,
        })
    }

    /// As [Self::get], but coefficients the team lacks history for take the league average.
    pub fn get_or_neutral(&self, team: &str) -> TeamStrength {
        let neutral = TeamStrength::neutral();
        let Some(record) = self.records.get(team) else {
            debug!("no history for {team}; assuming league-average strength");
            return neutral;
        };
        let (attack_home, defense_home) = self
            .venue_strength(record, Side::Home)
            .unwrap_or((neutral.attack_home, neutral.defense_home));
        let (attack_away, defense_away) = self
            .venue_strength(record, Side::Away)
            .unwrap_or((neutral.attack_away, neutral.defense_away));
        TeamStrength {
            attack_home,
            defense_home,
            attack_away,
            defense_away,
        }
    }

    /// `(attack, defense)` at `venue`. Attack is normalised by the average goals of sides at the
    /// same venue; defence by the average goals of their opponents.
    fn venue_strength(&self, record: &TeamRecord, venue: Side) -> Option<(f64, f64)> {
        let record = record.venue(venue);
        if record.matches == 0 {
            return None;
        }
        let attack = self.ratio(record.scored, record.matches, self.averages.avg_goals(venue));
        let defense = self.ratio(
            record.conceded,
            record.matches,
            self.averages.avg_goals(venue.flip()),
        );
        Some((attack, defense))
    }

    fn ratio(&self, goals: u32, matches: u32, league_avg: f64) -> f64 {
        if league_avg <= 0.0 {
            return 1.0;
        }
        let mean = (goals as f64 + self.smoothing_k * league_avg) / (matches as f64 + self.smoothing_k);
        f64::max(MIN_STRENGTH, mean / league_avg)
    }

    fn no_history(team: &str, venue: Side) -> InsufficientDataError {
        InsufficientDataError::NoVenueHistory {
            team: team.into(),
            venue,
        }
    }
}

/// Estimates the strength of a single `team` over `table`.
pub fn estimate(
    table: &MatchTable,
    team: &str,
    smoothing_k: f64,
) -> Result<TeamStrength, InsufficientDataError> {
    StrengthTable::estimate(table, smoothing_k)?.get(team)
}

#[cfg(test)]
mod tests;
