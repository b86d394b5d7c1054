//! Head-to-head history between two teams.

use serde::Serialize;

use crate::data::{Match, MatchTable};
use crate::domain::{MatchResult, Side};

/// Most recent meetings retained in a summary.
pub const H2H_RECENT: usize = 10;

/// Meetings played with one fixed team at home.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HeadToHeadRecord {
    pub matches_played: usize,
    pub home_wins: usize,
    pub draws: usize,
    pub away_wins: usize,
    pub avg_goals_home: f64,
    pub avg_goals_away: f64,
}
impl HeadToHeadRecord {
    fn tally<'a>(meetings: impl Iterator<Item = &'a Match>) -> Self {
        let mut record = Self::default();
        let (mut goals_home, mut goals_away) = (0u64, 0u64);
        for meeting in meetings {
            record.matches_played += 1;
            match meeting.result() {
                MatchResult::Home => record.home_wins += 1,
                MatchResult::Draw => record.draws += 1,
                MatchResult::Away => record.away_wins += 1,
            }
            goals_home += meeting.home_goals as u64;
            goals_away += meeting.away_goals as u64;
        }
        if record.matches_played > 0 {
            record.avg_goals_home = goals_home as f64 / record.matches_played as f64;
            record.avg_goals_away = goals_away as f64 / record.matches_played as f64;
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub team_a: String,
    pub team_b: String,

    /// Meetings hosted by `team_a`.
    pub a_at_home: HeadToHeadRecord,

    /// Meetings hosted by `team_b`.
    pub b_at_home: HeadToHeadRecord,

    /// Up to [H2H_RECENT] meetings in either orientation, newest first.
    pub recent: Vec<Match>,
}
impl HeadToHead {
    pub fn matches_played(&self) -> usize {
        self.a_at_home.matches_played + self.b_at_home.matches_played
    }

    pub fn has_history(&self) -> bool {
        self.matches_played() > 0
    }

    /// Meetings won by `team_a`, at either venue.
    pub fn a_wins(&self) -> usize {
        self.a_at_home.home_wins + self.b_at_home.away_wins
    }

    /// Meetings won by `team_b`, at either venue.
    pub fn b_wins(&self) -> usize {
        self.b_at_home.home_wins + self.a_at_home.away_wins
    }

    pub fn draws(&self) -> usize {
        self.a_at_home.draws + self.b_at_home.draws
    }

    /// The record of meetings where `side` names the venue of `team_a`.
    pub fn record(&self, side: Side) -> &HeadToHeadRecord {
        match side {
            Side::Home => &self.a_at_home,
            Side::Away => &self.b_at_home,
        }
    }
}

/// Summarises every meeting between `team_a` and `team_b` in `table`. A pair that never met
/// yields an empty summary.
pub fn summarise(table: &MatchTable, team_a: &str, team_b: &str) -> HeadToHead {
    let hosted_by_a = |m: &&Match| m.home_team == team_a && m.away_team == team_b;
    let hosted_by_b = |m: &&Match| m.home_team == team_b && m.away_team == team_a;
    let a_at_home = HeadToHeadRecord::tally(table.matches().iter().filter(hosted_by_a));
    let b_at_home = HeadToHeadRecord::tally(table.matches().iter().filter(hosted_by_b));
    let recent = table
        .matches()
        .iter()
        .rev()
        .filter(|m| hosted_by_a(m) || hosted_by_b(m))
        .take(H2H_RECENT)
        .cloned()
        .collect();
    HeadToHead {
        team_a: team_a.into(),
        team_b: team_b.into(),
        a_at_home,
        b_at_home,
        recent,
    }
}
