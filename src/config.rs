use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Model parameters, supplied by the caller at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Highest goal count per side represented in the score matrix.
    pub max_goals: u8,

    /// Season tags delimiting the estimation window. Empty means every season in the table.
    pub seasons: Vec<String>,

    /// Number of most recent matches making up a team's form.
    pub form_n: usize,

    /// Pseudo-matches of league-average scoring blended into each team's record. Zero disables
    /// smoothing.
    pub smoothing_k: f64,
}
impl Config {
    pub const MAX_GOALS_RANGE: RangeInclusive<u8> = 3..=20;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Self::MAX_GOALS_RANGE.contains(&self.max_goals) {
            return Err(ConfigError::MaxGoals {
                value: self.max_goals,
                valid: Self::MAX_GOALS_RANGE,
            });
        }
        if self.form_n == 0 {
            return Err(ConfigError::FormWindow);
        }
        if !self.smoothing_k.is_finite() || self.smoothing_k < 0.0 {
            return Err(ConfigError::Smoothing(self.smoothing_k));
        }
        Ok(())
    }

    pub fn with_seasons<S: ToString>(mut self, seasons: impl IntoIterator<Item = S>) -> Self {
        self.seasons = seasons.into_iter().map(|season| season.to_string()).collect();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_goals: 7,
            seasons: vec![],
            form_n: 5,
            smoothing_k: 0.0,
        }
    }
}

/// Splits a comma-separated list of season tags, ignoring blanks.
pub fn parse_seasons(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|season| !season.is_empty())
        .map(ToString::to_string)
        .collect()
}
