//! Expected goals of a fixture.

use serde::{Deserialize, Serialize};

use crate::domain::Side;
use crate::error::ModelDegenerateError;
use crate::strength::{LeagueAverages, TeamStrength};

/// Poisson scoring rates of the home and away sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedGoals {
    pub lambda_home: f64,
    pub lambda_away: f64,
}
impl ExpectedGoals {
    pub fn new(lambda_home: f64, lambda_away: f64) -> Result<Self, ModelDegenerateError> {
        let valid = |lambda: f64| lambda.is_finite() && lambda > 0.0;
        if valid(lambda_home) && valid(lambda_away) {
            Ok(Self {
                lambda_home,
                lambda_away,
            })
        } else {
            Err(ModelDegenerateError {
                lambda_home,
                lambda_away,
            })
        }
    }

    /// Combines the home side's home strength with the away side's away strength:
    /// `λ_home = avg_home × home.attack_home × away.defense_away` and
    /// `λ_away = avg_away × away.attack_away × home.defense_home`.
    pub fn for_fixture(
        home: &TeamStrength,
        away: &TeamStrength,
        averages: &LeagueAverages,
    ) -> Result<Self, ModelDegenerateError> {
        Self::new(
            averages.avg_goals_home * home.attack_home * away.defense_away,
            averages.avg_goals_away * away.attack_away * home.defense_home,
        )
    }

    pub fn lambda(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.lambda_home,
            Side::Away => self.lambda_away,
        }
    }

    pub fn total(&self) -> f64 {
        self.lambda_home + self.lambda_away
    }
}
