//! Betting-market probabilities aggregated from a score matrix.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::domain::{MatchResult, Outcome, Score, Side};
use crate::scoregrid::ScoreMatrix;

/// Total-goals lines reported by default, as whole-goal thresholds: `2` stands for the 2.5 line.
pub const DEFAULT_GOAL_LINES: [u8; 3] = [1, 2, 3];

/// Number of most likely scores reported by default.
pub const DEFAULT_TOP_SCORES: usize = 5;

impl Outcome {
    /// Sums the probability of every score that settles this outcome.
    pub fn gather(&self, matrix: &ScoreMatrix) -> f64 {
        match self {
            Outcome::Win(side) => Self::gather_where(matrix, |score| match side {
                Side::Home => score.home > score.away,
                Side::Away => score.home < score.away,
            }),
            Outcome::Draw => Self::gather_where(matrix, |score| score.home == score.away),
            Outcome::Under(goals) => {
                Self::gather_where(matrix, |score| score.total() < *goals as u16)
            }
            Outcome::Over(goals) => {
                Self::gather_where(matrix, |score| score.total() > *goals as u16)
            }
            Outcome::Score(score) => matrix.prob(score),
            Outcome::BothScore => {
                Self::gather_where(matrix, |score| score.home > 0 && score.away > 0)
            }
            Outcome::NotBothScore => {
                Self::gather_where(matrix, |score| score.home == 0 || score.away == 0)
            }
        }
    }

    fn gather_where(matrix: &ScoreMatrix, mut settles: impl FnMut(&Score) -> bool) -> f64 {
        matrix
            .scores()
            .filter(|(score, _)| settles(score))
            .map(|(_, prob)| prob)
            .sum()
    }
}

/// The 1X2 market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketProbabilities {
    pub p_home_win: f64,
    pub p_draw: f64,
    pub p_away_win: f64,
}
impl MarketProbabilities {
    pub fn from_matrix(matrix: &ScoreMatrix) -> Self {
        Self {
            p_home_win: Outcome::Win(Side::Home).gather(matrix),
            p_draw: Outcome::Draw.gather(matrix),
            p_away_win: Outcome::Win(Side::Away).gather(matrix),
        }
    }

    pub fn prob(&self, result: MatchResult) -> f64 {
        match result {
            MatchResult::Home => self.p_home_win,
            MatchResult::Draw => self.p_draw,
            MatchResult::Away => self.p_away_win,
        }
    }

    /// The single most probable result. Ties favour the home side, then the draw.
    pub fn favourite(&self) -> MatchResult {
        if self.p_home_win >= f64::max(self.p_draw, self.p_away_win) {
            MatchResult::Home
        } else if self.p_draw >= self.p_away_win {
            MatchResult::Draw
        } else {
            MatchResult::Away
        }
    }

    pub fn sum(&self) -> f64 {
        self.p_home_win + self.p_draw + self.p_away_win
    }
}

/// Double chance: each result paired with one of the other two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DoubleChance {
    pub home_or_draw: f64,
    pub draw_or_away: f64,
    pub home_or_away: f64,
}
impl From<&MarketProbabilities> for DoubleChance {
    fn from(market: &MarketProbabilities) -> Self {
        Self {
            home_or_draw: market.p_home_win + market.p_draw,
            draw_or_away: market.p_draw + market.p_away_win,
            home_or_away: market.p_home_win + market.p_away_win,
        }
    }
}

/// Total goals either side of a half-goal line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverUnder {
    /// Whole goals below the line; `2` is the 2.5 line.
    pub line: u8,
    pub over: f64,
    pub under: f64,
}
impl OverUnder {
    pub fn from_matrix(matrix: &ScoreMatrix, line: u8) -> Self {
        Self {
            line,
            over: Outcome::Over(line).gather(matrix),
            under: Outcome::Under(line.saturating_add(1)).gather(matrix),
        }
    }
}

impl Display for OverUnder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.5", self.line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BothTeamsToScore {
    pub yes: f64,
    pub no: f64,
}
impl BothTeamsToScore {
    pub fn from_matrix(matrix: &ScoreMatrix) -> Self {
        Self {
            yes: Outcome::BothScore.gather(matrix),
            no: Outcome::NotBothScore.gather(matrix),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbableScore {
    pub score: Score,
    pub probability: f64,
}

/// The `k` most probable scores, most probable first. Equally probable scores are ordered by
/// fewer total goals, then by the home and away goals.
pub fn most_likely_scores(matrix: &ScoreMatrix, k: usize) -> Vec<ProbableScore> {
    let mut scores = matrix
        .scores()
        .map(|(score, probability)| ProbableScore { score, probability })
        .collect::<Vec<_>>();
    scores.sort_by(compare_probable);
    scores.truncate(k);
    scores
}

fn compare_probable(a: &ProbableScore, b: &ProbableScore) -> Ordering {
    b.probability
        .total_cmp(&a.probability)
        .then_with(|| a.score.total().cmp(&b.score.total()))
        .then_with(|| a.score.cmp(&b.score))
}

/// Every market derived from one score matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Markets {
    pub result: MarketProbabilities,
    pub double_chance: DoubleChance,
    pub goal_lines: Vec<OverUnder>,
    pub both_teams_to_score: BothTeamsToScore,
    pub most_likely_scores: Vec<ProbableScore>,
    /// Mean total goals under the truncated, renormalised matrix. Slightly below the Poisson
    /// total [crate::xg::ExpectedGoals::total] when the truncated mass is material.
    pub expected_total_goals: f64,
}
impl Markets {
    pub fn derive(matrix: &ScoreMatrix, goal_lines: &[u8], top_scores: usize) -> Self {
        let result = MarketProbabilities::from_matrix(matrix);
        let (home_expectation, away_expectation) = matrix.expectations();
        Self {
            double_chance: DoubleChance::from(&result),
            result,
            goal_lines: goal_lines
                .iter()
                .map(|&line| OverUnder::from_matrix(matrix, line))
                .collect(),
            both_teams_to_score: BothTeamsToScore::from_matrix(matrix),
            most_likely_scores: most_likely_scores(matrix, top_scores),
            expected_total_goals: home_expectation + away_expectation,
        }
    }
}
