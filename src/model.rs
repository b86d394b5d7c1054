//! The prediction facade: a calibrated, immutable model answering fixture queries.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::data::MatchTable;
use crate::domain::{Fixture, Side};
use crate::error::{ConfigError, InsufficientDataError, ModelError};
use crate::h2h::{self, HeadToHead};
use crate::market::{Markets, DEFAULT_GOAL_LINES, DEFAULT_TOP_SCORES};
use crate::scoregrid::ScoreMatrix;
use crate::standings::{self, Form};
use crate::strength::{StrengthTable, TeamStrength};
use crate::xg::ExpectedGoals;

/// What to do when a team lacks the history to estimate its strength.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownTeamPolicy {
    /// Fail the request with [InsufficientDataError].
    #[default]
    Fail,

    /// Substitute league-average coefficients for whatever is missing.
    LeagueAverage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calibrator {
    config: Config,
    policy: UnknownTeamPolicy,
}
impl Calibrator {
    pub fn with_policy(mut self, policy: UnknownTeamPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Estimates team strengths over the configured seasons of `table`.
    pub fn calibrate(&self, table: &MatchTable) -> Result<Predictor, InsufficientDataError> {
        let window = table.filter_seasons(&self.config.seasons);
        debug!(
            "estimation window holds {} of {} matches (seasons: {:?})",
            window.len(),
            table.len(),
            window.seasons()
        );
        let strengths = StrengthTable::estimate(&window, self.config.smoothing_k)?;
        Ok(Predictor {
            config: self.config.clone(),
            policy: self.policy,
            goal_lines: DEFAULT_GOAL_LINES.to_vec(),
            top_scores: DEFAULT_TOP_SCORES,
            window,
            strengths,
        })
    }
}

impl TryFrom<Config> for Calibrator {
    type Error = ConfigError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self {
            config,
            policy: UnknownTeamPolicy::default(),
        })
    }
}

/// Everything the model says about one fixture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub fixture: Fixture,
    pub home_strength: TeamStrength,
    pub away_strength: TeamStrength,
    pub expected_goals: ExpectedGoals,
    pub score_matrix: ScoreMatrix,
    pub markets: Markets,
}

/// Answers fixture queries against one estimation window. Immutable once calibrated, so a single
/// instance may serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Predictor {
    config: Config,
    policy: UnknownTeamPolicy,
    goal_lines: Vec<u8>,
    top_scores: usize,
    window: MatchTable,
    strengths: StrengthTable,
}
impl Predictor {
    pub fn new(config: Config, table: &MatchTable) -> Result<Self, ModelError> {
        Ok(Calibrator::try_from(config)?.calibrate(table)?)
    }

    /// Total-goals lines and the number of most likely scores reported with each prediction.
    pub fn with_markets(mut self, goal_lines: Vec<u8>, top_scores: usize) -> Self {
        self.goal_lines = goal_lines;
        self.top_scores = top_scores;
        self
    }

    pub fn with_policy(mut self, policy: UnknownTeamPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn policy(&self) -> UnknownTeamPolicy {
        self.policy
    }

    /// The season-filtered matches the strengths were estimated over.
    pub fn window(&self) -> &MatchTable {
        &self.window
    }

    pub fn strengths(&self) -> &StrengthTable {
        &self.strengths
    }

    pub fn strength(&self, team: &str) -> Result<TeamStrength, InsufficientDataError> {
        match (self.strengths.get(team), self.policy) {
            (Ok(strength), _) => Ok(strength),
            (Err(err), UnknownTeamPolicy::Fail) => Err(err),
            (Err(err), UnknownTeamPolicy::LeagueAverage) => {
                warn!("{err}; falling back to league-average strength");
                Ok(self.strengths.get_or_neutral(team))
            }
        }
    }

    pub fn expected_goals(&self, fixture: &Fixture) -> Result<ExpectedGoals, ModelError> {
        let home = self.strength(fixture.team(Side::Home))?;
        let away = self.strength(fixture.team(Side::Away))?;
        Ok(ExpectedGoals::for_fixture(
            &home,
            &away,
            self.strengths.averages(),
        )?)
    }

    pub fn score_matrix(&self, fixture: &Fixture) -> Result<ScoreMatrix, ModelError> {
        let expected_goals = self.expected_goals(fixture)?;
        Ok(ScoreMatrix::from_expected_goals(
            &expected_goals,
            self.config.max_goals,
        ))
    }

    pub fn predict(&self, fixture: &Fixture) -> Result<Prediction, ModelError> {
        let home_strength = self.strength(fixture.team(Side::Home))?;
        let away_strength = self.strength(fixture.team(Side::Away))?;
        let expected_goals =
            ExpectedGoals::for_fixture(&home_strength, &away_strength, self.strengths.averages())?;
        let score_matrix = ScoreMatrix::from_expected_goals(&expected_goals, self.config.max_goals);
        let markets = Markets::derive(&score_matrix, &self.goal_lines, self.top_scores);
        debug!(
            "{fixture}: λ=({:.3}, {:.3}), 1X2=({:.3}, {:.3}, {:.3}), truncated mass {:.2e}",
            expected_goals.lambda_home,
            expected_goals.lambda_away,
            markets.result.p_home_win,
            markets.result.p_draw,
            markets.result.p_away_win,
            score_matrix.truncated_mass()
        );
        debug!("score matrix:\n{}", score_matrix.grid().verbose());
        Ok(Prediction {
            fixture: fixture.clone(),
            home_strength,
            away_strength,
            expected_goals,
            score_matrix,
            markets,
        })
    }

    /// Meetings between the two sides of `fixture` within the estimation window, from the home
    /// side's perspective.
    pub fn head_to_head(&self, fixture: &Fixture) -> HeadToHead {
        h2h::summarise(&self.window, &fixture.home_team, &fixture.away_team)
    }

    /// The last `form_n` results of `team` within the estimation window.
    pub fn form(&self, team: &str) -> Form {
        standings::recent_form(&self.window, team, self.config.form_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MatchResult;
    use crate::testing::{round_robin_table, seasonal_match};
    use assert_float_eq::*;
    use std::thread;

    fn predictor() -> Predictor {
        Predictor::new(Config::default(), &round_robin_table()).unwrap()
    }

    #[test]
    fn predict() {
        let fixture = Fixture::new("Lille", "Lyon").unwrap();
        let prediction = predictor().predict(&fixture).unwrap();
        assert_float_absolute_eq!(1.0, prediction.expected_goals.lambda_home);
        assert_float_absolute_eq!(1.5, prediction.expected_goals.lambda_away);
        assert_eq!(7, prediction.score_matrix.max_goals());
        assert_float_absolute_eq!(1.0, prediction.markets.result.sum(), 1e-9);
        assert!(prediction.markets.result.p_away_win > prediction.markets.result.p_home_win);
        assert_eq!(MatchResult::Away, prediction.markets.result.favourite());
        assert_eq!(DEFAULT_TOP_SCORES, prediction.markets.most_likely_scores.len());
        assert_eq!(DEFAULT_GOAL_LINES.len(), prediction.markets.goal_lines.len());
        assert_eq!(fixture, prediction.fixture);
    }

    #[test]
    fn custom_markets() {
        let fixture = Fixture::new("Lyon", "Nantes").unwrap();
        let prediction = predictor()
            .with_markets(vec![0, 4], 2)
            .predict(&fixture)
            .unwrap();
        assert_eq!(
            vec![0, 4],
            prediction.markets.goal_lines.iter().map(|line| line.line).collect::<Vec<_>>()
        );
        assert_eq!(2, prediction.markets.most_likely_scores.len());
    }

    #[test]
    fn parts_agree_with_prediction() {
        let predictor = predictor();
        let fixture = Fixture::new("Nantes", "Lille").unwrap();
        let prediction = predictor.predict(&fixture).unwrap();
        assert_eq!(prediction.expected_goals, predictor.expected_goals(&fixture).unwrap());
        assert_eq!(prediction.score_matrix, predictor.score_matrix(&fixture).unwrap());
    }

    #[test]
    fn invalid_config() {
        let config = Config {
            max_goals: 30,
            ..Config::default()
        };
        assert!(matches!(
            Predictor::new(config, &round_robin_table()),
            Err(ModelError::Config(ConfigError::MaxGoals { value: 30, .. }))
        ));
    }

    #[test]
    fn unknown_team_policies() {
        let fixture = Fixture::new("Lyon", "Monaco").unwrap();
        let strict = predictor();
        assert!(matches!(
            strict.predict(&fixture),
            Err(ModelError::InsufficientData(InsufficientDataError::UnknownTeam { .. }))
        ));

        let lenient = strict.with_policy(UnknownTeamPolicy::LeagueAverage);
        let prediction = lenient.predict(&fixture).unwrap();
        assert_eq!(TeamStrength::neutral(), prediction.away_strength);
        // 2.0 × 1.75 × 1.0
        assert_float_absolute_eq!(3.5, prediction.expected_goals.lambda_home);
    }

    #[test]
    fn season_window() {
        let table = MatchTable::try_from(vec![
            seasonal_match("2324", 0, "Lens", "Lille", 5, 0),
            seasonal_match("2324", 1, "Lille", "Lens", 0, 5),
            seasonal_match("2425", 0, "Lens", "Lille", 1, 1),
            seasonal_match("2425", 1, "Lille", "Lens", 1, 1),
        ])
        .unwrap();
        let config = Config::default().with_seasons(["2425"]);
        let predictor = Predictor::new(config, &table).unwrap();
        assert_eq!(2, predictor.window().len());
        let fixture = Fixture::new("Lens", "Lille").unwrap();
        let prediction = predictor.predict(&fixture).unwrap();
        assert_float_absolute_eq!(1.0, prediction.expected_goals.lambda_home);
        assert_float_absolute_eq!(1.0, prediction.expected_goals.lambda_away);
        assert_eq!(2, predictor.head_to_head(&fixture).matches_played());
        assert_eq!("D-D", predictor.form("Lens").to_string());

        let config = Config::default().with_seasons(["1920"]);
        assert!(matches!(
            Predictor::new(config, &table),
            Err(ModelError::InsufficientData(InsufficientDataError::EmptyTable))
        ));
    }

    #[test]
    fn form_window() {
        let config = Config {
            form_n: 2,
            ..Config::default()
        };
        let predictor = Predictor::new(config, &round_robin_table()).unwrap();
        assert_eq!("W-W", predictor.form("Lyon").to_string());
    }

    #[test]
    fn concurrent_predictions() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Predictor>();

        let predictor = predictor();
        let fixtures = [("Lyon", "Lille"), ("Lille", "Nantes"), ("Nantes", "Lyon")]
            .map(|(home, away)| Fixture::new(home, away).unwrap());
        let sequential = fixtures
            .iter()
            .map(|fixture| predictor.predict(fixture).unwrap())
            .collect::<Vec<_>>();
        let predictor = &predictor;
        let concurrent = thread::scope(|scope| {
            let handles = fixtures
                .iter()
                .map(|fixture| scope.spawn(move || predictor.predict(fixture).unwrap()))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect::<Vec<_>>()
        });
        assert_eq!(sequential, concurrent);
    }
}
