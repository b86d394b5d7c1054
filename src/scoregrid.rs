//! The joint distribution of final scores.
//!
//! Home and away goal counts are taken as independent Poisson variables. Poisson support is
//! unbounded, so the grid is truncated at `max_goals` per side: mass beyond the boundary is
//! dropped and the retained cells are renormalised to sum to 1. The dropped mass is kept on the
//! matrix for diagnostics.

use serde::Serialize;

use crate::domain::Score;
use crate::linear::Matrix;
use crate::poisson;
use crate::probs::SliceExt;
use crate::xg::ExpectedGoals;

/// Writes the Poisson PMF of `rate` over `0..probs.len()`, rescaled to sum to 1, into `probs`.
/// Returns the mass of the unscaled PMF over that range.
///
/// Works in log space relative to the modal term, so the rescaled PMF stays well-formed even
/// when every unscaled term underflows.
fn truncated_pmf(rate: f64, probs: &mut [f64]) -> f64 {
    poisson::log_pmf_into(rate, probs);
    let max_log_prob = probs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    for prob in probs.iter_mut() {
        *prob = f64::exp(*prob - max_log_prob);
    }
    let relative_mass = probs.normalise(1.0);
    f64::exp(max_log_prob + relative_mass.ln())
}

fn outer_product(home_probs: &[f64], away_probs: &[f64], scoregrid: &mut Matrix<f64>) {
    for (home_goals, &home_prob) in home_probs.iter().enumerate() {
        let row = scoregrid.row_slice_mut(home_goals);
        for (cell, &away_prob) in row.iter_mut().zip(away_probs.iter()) {
            *cell = home_prob * away_prob;
        }
    }
}

/// Mean home and away goals under the distribution in `scoregrid`.
pub fn home_away_expectations(scoregrid: &Matrix<f64>) -> (f64, f64) {
    let (mut home_expectation, mut away_expectation) = (0.0, 0.0);
    for ((home_goals, away_goals), &prob) in scoregrid.cells() {
        home_expectation += home_goals as f64 * prob;
        away_expectation += away_goals as f64 * prob;
    }
    (home_expectation, away_expectation)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMatrix {
    grid: Matrix<f64>,
    truncated_mass: f64,
}
impl ScoreMatrix {
    /// Builds the truncated, renormalised grid over `0..=max_goals` goals per side.
    pub fn from_expected_goals(expected: &ExpectedGoals, max_goals: u8) -> Self {
        let size = max_goals as usize + 1;
        let mut home_probs = vec![0.0; size];
        let mut away_probs = vec![0.0; size];
        let retained = truncated_pmf(expected.lambda_home, &mut home_probs)
            * truncated_pmf(expected.lambda_away, &mut away_probs);
        let mut grid = Matrix::square(size);
        outer_product(&home_probs, &away_probs, &mut grid);
        Self {
            grid,
            truncated_mass: f64::max(0.0, 1.0 - retained),
        }
    }

    /// Rescales an arbitrary non-negative square grid so that its cells sum to 1.
    ///
    /// # Panics
    /// If the grid is not a non-empty square holding a finite positive mass.
    pub fn normalised(mut grid: Matrix<f64>) -> Self {
        assert!(grid.is_square(), "a {}x{} score grid is not square", grid.rows(), grid.cols());
        assert!(grid.rows() > 0, "a score grid must have at least one cell");
        let retained = grid.flatten_mut().normalise(1.0);
        assert!(
            retained > 0.0 && retained.is_finite(),
            "cannot normalise a score grid of mass {retained}"
        );
        Self {
            grid,
            truncated_mass: f64::max(0.0, 1.0 - retained),
        }
    }

    pub fn max_goals(&self) -> u8 {
        (self.grid.rows() - 1) as u8
    }

    pub fn grid(&self) -> &Matrix<f64> {
        &self.grid
    }

    /// Probability mass beyond `max_goals` that was dropped before renormalisation.
    pub fn truncated_mass(&self) -> f64 {
        self.truncated_mass
    }

    /// Probability of `score`, zero if it lies beyond the grid.
    pub fn prob(&self, score: &Score) -> f64 {
        let (home, away) = (score.home as usize, score.away as usize);
        if home < self.grid.rows() && away < self.grid.cols() {
            self.grid[(home, away)]
        } else {
            0.0
        }
    }

    /// Iterates over every score in the grid, in row-major order.
    pub fn scores(&self) -> impl Iterator<Item = (Score, f64)> + '_ {
        self.grid
            .cells()
            .map(|((home, away), &prob)| (Score::new(home as u8, away as u8), prob))
    }

    pub fn expectations(&self) -> (f64, f64) {
        home_away_expectations(&self.grid)
    }
}

#[cfg(test)]
mod tests;
