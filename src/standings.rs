//! League tables, home/away splits and recent form.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::data::{Match, MatchTable};
use crate::domain::{MatchResult, Side};

/// A match result from the perspective of one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    Win,
    Draw,
    Loss,
}
impl Verdict {
    pub fn of(result: MatchResult, side: Side) -> Self {
        match result.points(side) {
            3 => Verdict::Win,
            1 => Verdict::Draw,
            _ => Verdict::Loss,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Verdict::Win => 'W',
            Verdict::Draw => 'D',
            Verdict::Loss => 'L',
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Verdict::Win => 3,
            Verdict::Draw => 1,
            Verdict::Loss => 0,
        }
    }
}

/// Aggregated results of one team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}
impl Standing {
    fn new(team: &str) -> Self {
        Self {
            team: team.into(),
            ..Self::default()
        }
    }

    fn record(&mut self, m: &Match, side: Side) {
        self.played += 1;
        match Verdict::of(m.result(), side) {
            Verdict::Win => self.wins += 1,
            Verdict::Draw => self.draws += 1,
            Verdict::Loss => self.losses += 1,
        }
        self.goals_for += m.goals(side) as u32;
        self.goals_against += m.goals(side.flip()) as u32;
        self.points += m.result().points(side);
    }

    pub fn goal_difference(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }

    pub fn points_per_match(&self) -> f64 {
        Self::per_match(self.points, self.played)
    }

    pub fn avg_goals_for(&self) -> f64 {
        Self::per_match(self.goals_for, self.played)
    }

    pub fn avg_goals_against(&self) -> f64 {
        Self::per_match(self.goals_against, self.played)
    }

    fn per_match(total: u32, played: u32) -> f64 {
        if played == 0 {
            0.0
        } else {
            total as f64 / played as f64
        }
    }

    /// League ordering: points, goal difference and goals scored, all descending, then the team
    /// name.
    fn rank(a: &Standing, b: &Standing) -> Ordering {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
            .then_with(|| b.goals_for.cmp(&a.goals_for))
            .then_with(|| a.team.cmp(&b.team))
    }
}

/// The league table over every match in `table`, leader first. Filter the table to a single
/// season beforehand for a conventional league table.
pub fn standings(table: &MatchTable) -> Vec<Standing> {
    let mut by_team = FxHashMap::<&str, Standing>::default();
    for m in table.matches() {
        for side in [Side::Home, Side::Away] {
            by_team
                .entry(m.team(side))
                .or_insert_with(|| Standing::new(m.team(side)))
                .record(m, side);
        }
    }
    let mut standings = by_team.into_values().collect::<Vec<_>>();
    standings.sort_by(Standing::rank);
    standings
}

/// Results of one team at one venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueStanding {
    pub venue: Side,
    pub standing: Standing,
}

/// Home and away records of every team, ordered by team name and then venue.
pub fn venue_standings(table: &MatchTable) -> Vec<VenueStanding> {
    let mut by_team_venue = FxHashMap::<(&str, Side), Standing>::default();
    for m in table.matches() {
        for side in [Side::Home, Side::Away] {
            by_team_venue
                .entry((m.team(side), side))
                .or_insert_with(|| Standing::new(m.team(side)))
                .record(m, side);
        }
    }
    let mut venue_standings = by_team_venue
        .into_iter()
        .map(|((_, venue), standing)| VenueStanding { venue, standing })
        .collect::<Vec<_>>();
    venue_standings.sort_by(|a, b| {
        a.standing
            .team
            .cmp(&b.standing.team)
            .then_with(|| a.venue.cmp(&b.venue))
    });
    venue_standings
}

/// The most recent results of a team, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    pub team: String,
    pub verdicts: Vec<Verdict>,
}
impl Form {
    pub fn points(&self) -> u32 {
        self.verdicts.iter().map(Verdict::points).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

impl Display for Form {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, verdict) in self.verdicts.iter().enumerate() {
            if index > 0 {
                write!(f, "-")?;
            }
            write!(f, "{}", verdict.code())?;
        }
        Ok(())
    }
}

/// The last `n` results of `team` in `table`.
pub fn recent_form(table: &MatchTable, team: &str, n: usize) -> Form {
    let mut verdicts = table
        .matches()
        .iter()
        .rev()
        .filter_map(|m| m.side_of(team).map(|side| Verdict::of(m.result(), side)))
        .take(n)
        .collect::<Vec<_>>();
    verdicts.reverse();
    Form {
        team: team.into(),
        verdicts,
    }
}

/// One step in a team's accumulation of points over a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointsProgress {
    pub date: NaiveDate,
    pub opponent: String,
    pub venue: Side,
    pub points: u32,
    pub cumulative_points: u32,
}

/// Points earned by `team` after each of its matches, in date order.
pub fn cumulative_points(table: &MatchTable, team: &str) -> Vec<PointsProgress> {
    let mut cumulative_points = 0;
    table
        .matches()
        .iter()
        .filter_map(|m| {
            let venue = m.side_of(team)?;
            let points = m.result().points(venue);
            cumulative_points += points;
            Some(PointsProgress {
                date: m.date,
                opponent: m.team(venue.flip()).into(),
                venue,
                points,
                cumulative_points,
            })
        })
        .collect()
}
