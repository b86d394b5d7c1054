//! Out-of-sample evaluation of the predictor on historical matches.

use std::fmt::{Display, Formatter};
use std::io;
use std::io::Write;

use serde::Serialize;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter};
use tracing::{info, warn};

use crate::config::Config;
use crate::csv::{CsvWriter, Record};
use crate::data::{Match, MatchTable};
use crate::domain::{Fixture, MatchResult};
use crate::error::{InsufficientDataError, ModelError};
use crate::market::MarketProbabilities;
use crate::model::{Calibrator, UnknownTeamPolicy};
use crate::probs::log_loss;

/// Share of matches, oldest first, used for training under [Split::Temporal].
pub const TRAIN_FRACTION: f64 = 0.8;

/// How matches divide into training and test sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Split {
    /// Train on the oldest [TRAIN_FRACTION] of matches, test on the rest.
    Temporal,

    /// Test on one season, train on every other.
    HoldOutSeason(String),
}
impl Split {
    fn apply(&self, table: &MatchTable) -> (MatchTable, MatchTable) {
        match self {
            Split::Temporal => {
                let at = (TRAIN_FRACTION * table.len() as f64) as usize;
                table.split_at(at)
            }
            Split::HoldOutSeason(season) => (
                table.filter(|m| &m.season != season),
                table.filter(|m| &m.season == season),
            ),
        }
    }
}

impl Display for Split {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Split::Temporal => write!(f, "temporal_80_20"),
            Split::HoldOutSeason(season) => write!(f, "test_season={season}"),
        }
    }
}

/// The model's view of one test match, next to what happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub played: Match,
    pub probabilities: MarketProbabilities,
    pub predicted: MatchResult,
    pub actual: MatchResult,
    pub log_loss: f64,
}
impl Forecast {
    pub fn is_correct(&self) -> bool {
        self.predicted == self.actual
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::with_capacity(ForecastColumn::COUNT);
        record.set(ForecastColumn::Date, self.played.date.format("%Y-%m-%d"));
        record.set(ForecastColumn::Season, &self.played.season);
        record.set(ForecastColumn::HomeTeam, &self.played.home_team);
        record.set(ForecastColumn::AwayTeam, &self.played.away_team);
        record.set(ForecastColumn::HomeGoals, self.played.home_goals);
        record.set(ForecastColumn::AwayGoals, self.played.away_goals);
        record.set(ForecastColumn::PHomeWin, self.probabilities.p_home_win);
        record.set(ForecastColumn::PDraw, self.probabilities.p_draw);
        record.set(ForecastColumn::PAwayWin, self.probabilities.p_away_win);
        record.set(ForecastColumn::Predicted, self.predicted);
        record.set(ForecastColumn::Actual, self.actual);
        record.set(ForecastColumn::LogLoss, self.log_loss);
        record
    }
}

/// Columns of the per-match forecast CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumCount, EnumIter, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ForecastColumn {
    Date,
    Season,
    HomeTeam,
    AwayTeam,
    HomeGoals,
    AwayGoals,
    PHomeWin,
    PDraw,
    PAwayWin,
    Predicted,
    Actual,
    LogLoss,
}

impl From<ForecastColumn> for usize {
    fn from(column: ForecastColumn) -> Self {
        column as usize
    }
}

/// Writes a header followed by one row per forecast.
pub fn write_forecasts<W: Write>(
    csv: &mut CsvWriter<W>,
    forecasts: &[Forecast],
) -> Result<(), io::Error> {
    csv.append(Record::with_values(ForecastColumn::iter()))?;
    for forecast in forecasts {
        csv.append(forecast.to_record())?;
    }
    csv.flush()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub split: Split,
    pub n_train: usize,
    pub n_test: usize,
    /// Test matches without a forecast because their expected goals were degenerate.
    pub n_skipped: usize,
    pub accuracy: f64,
    pub log_loss: f64,
    pub forecasts: Vec<Forecast>,
}

/// Trains on one part of `table` and scores 1X2 forecasts on the other. The season selection in
/// `config` is ignored; the split decides which matches train the model.
///
/// A test match with degenerate expected goals is skipped and counted. The evaluation fails only
/// if no test match could be forecast.
pub fn evaluate(config: &Config, table: &MatchTable, split: Split) -> Result<Evaluation, ModelError> {
    let (train, test) = split.apply(table);
    if train.is_empty() {
        return Err(InsufficientDataError::EmptySplit { split: "training" }.into());
    }
    if test.is_empty() {
        return Err(InsufficientDataError::EmptySplit { split: "test" }.into());
    }

    let config = Config {
        seasons: vec![],
        ..config.clone()
    };
    let predictor = Calibrator::try_from(config)?
        .with_policy(UnknownTeamPolicy::LeagueAverage)
        .calibrate(&train)?;

    let mut forecasts = Vec::with_capacity(test.len());
    let mut degenerate = None;
    for m in test.matches() {
        let fixture = Fixture::new(m.home_team.as_str(), m.away_team.as_str())?;
        let matrix = match predictor.score_matrix(&fixture) {
            Ok(matrix) => matrix,
            Err(ModelError::ModelDegenerate(err)) => {
                warn!("skipping {fixture} on {}: {err}", m.date);
                degenerate = Some(err);
                continue;
            }
            Err(err) => return Err(err),
        };
        let probabilities = MarketProbabilities::from_matrix(&matrix);
        let actual = m.result();
        forecasts.push(Forecast {
            played: m.clone(),
            predicted: probabilities.favourite(),
            actual,
            log_loss: log_loss(probabilities.prob(actual)),
            probabilities,
        });
    }

    let n_skipped = test.len() - forecasts.len();
    if forecasts.is_empty() {
        if let Some(err) = degenerate {
            return Err(err.into());
        }
    }
    let n_test = forecasts.len();
    let correct = forecasts.iter().filter(|forecast| forecast.is_correct()).count();
    let accuracy = correct as f64 / n_test as f64;
    let log_loss = forecasts.iter().map(|forecast| forecast.log_loss).sum::<f64>() / n_test as f64;
    info!(
        "{split}: trained on {} matches, tested on {n_test} ({n_skipped} skipped); accuracy {accuracy:.4}, log-loss {log_loss:.4}",
        train.len()
    );
    Ok(Evaluation {
        split,
        n_train: train.len(),
        n_test,
        n_skipped,
        accuracy,
        log_loss,
        forecasts,
    })
}
