//! The error taxonomy of the model.

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::domain::Side;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{0}")]
    DataValidation(#[from] DataValidationError),

    #[error("{0}")]
    InsufficientData(#[from] InsufficientDataError),

    #[error("{0}")]
    ModelDegenerate(#[from] ModelDegenerateError),

    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// A malformed input row or request. Rejected at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataValidationError {
    #[error("missing required column {column} (accepted headers: {aliases})")]
    MissingColumn {
        column: &'static str,
        aliases: String,
    },

    #[error("row {row}: missing value for {column}")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: invalid goal count '{value}' for {column}")]
    InvalidGoals {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: unparseable date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: empty team name")]
    EmptyTeamName { row: usize },

    #[error("row {row}: {team} cannot play itself")]
    SameTeam { row: usize, team: String },

    #[error("fixture pits {team} against itself")]
    SelfFixture { team: String },
}

/// A team (or the whole table) lacks the history needed for estimation. The caller decides the
/// fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsufficientDataError {
    #[error("no matches in the estimation window")]
    EmptyTable,

    #[error("no recorded matches for {team}")]
    UnknownTeam { team: String },

    #[error("no recorded {venue:?} matches for {team}")]
    NoVenueHistory { team: String, venue: Side },

    #[error("the {split} split is empty")]
    EmptySplit { split: &'static str },
}

/// Expected goals that cannot parametrise a Poisson distribution. Fatal to the request only.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("expected goals (λ_home={lambda_home}, λ_away={lambda_away}) must be positive and finite")]
pub struct ModelDegenerateError {
    pub lambda_home: f64,
    pub lambda_away: f64,
}

/// Invalid configuration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max goals ({value}) outside of allowable range {valid:?}")]
    MaxGoals {
        value: u8,
        valid: RangeInclusive<u8>,
    },

    #[error("form window must span at least one match")]
    FormWindow,

    #[error("smoothing constant ({0}) must be finite and non-negative")]
    Smoothing(f64),
}
