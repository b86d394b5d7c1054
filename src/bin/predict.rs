use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use scoreline::config::{parse_seasons, Config};
use scoreline::data;
use scoreline::domain::Fixture;
use scoreline::market::DEFAULT_GOAL_LINES;
use scoreline::model::{Calibrator, UnknownTeamPolicy};
use scoreline::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV files of historical results
    files: Vec<PathBuf>,

    /// home team
    #[clap(long)]
    home: Option<String>,

    /// away team
    #[clap(long)]
    away: Option<String>,

    /// highest goal count per side in the score matrix
    #[clap(long, default_value_t = 7)]
    max_goals: u8,

    /// comma-separated season tags to estimate over (all seasons if omitted)
    #[clap(short = 's', long)]
    seasons: Option<String>,

    /// pseudo-matches of league-average scoring blended into each team's record
    #[clap(long, default_value_t = 0.0)]
    smoothing: f64,

    /// number of recent matches making up a team's form
    #[clap(long, default_value_t = 5)]
    form: usize,

    /// number of most likely scores to report
    #[clap(long, default_value_t = 5)]
    top: usize,

    /// assume league-average strength for teams lacking history
    #[clap(long)]
    lenient: bool,

    /// print the strengths of every team
    #[clap(long)]
    strengths: bool,

    /// emit the prediction as JSON rather than tables
    #[clap(long)]
    json: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.files.is_empty() {
            bail!("at least one data file must be specified");
        }
        if self.home.is_none() || self.away.is_none() {
            bail!("both --home and --away teams must be specified");
        }
        Ok(())
    }

    fn config(&self) -> Config {
        Config {
            max_goals: self.max_goals,
            seasons: self.seasons.as_deref().map(parse_seasons).unwrap_or_default(),
            form_n: self.form,
            smoothing_k: self.smoothing,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let table = data::read_from_files(&args.files)?;
    let policy = if args.lenient {
        UnknownTeamPolicy::LeagueAverage
    } else {
        UnknownTeamPolicy::Fail
    };
    let predictor = Calibrator::try_from(args.config())?
        .with_policy(policy)
        .calibrate(&table)?
        .with_markets(DEFAULT_GOAL_LINES.to_vec(), args.top);

    let fixture = Fixture::new(
        args.home.unwrap_or_default(),
        args.away.unwrap_or_default(),
    )?;
    let prediction = predictor.predict(&fixture)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    if args.strengths {
        let strengths_table = print::tabulate_strengths(predictor.strengths());
        info!(
            "strengths:\n{}",
            Console::default().render(&strengths_table)
        );
    }

    let averages = predictor.strengths().averages();
    info!(
        "{fixture}: league averages over {} matches (home={:.3}, away={:.3})",
        averages.matches, averages.avg_goals_home, averages.avg_goals_away
    );
    info!(
        "expected goals: {} {:.3}, {} {:.3}; total {:.3} ({:.3} within the matrix)",
        fixture.home_team,
        prediction.expected_goals.lambda_home,
        fixture.away_team,
        prediction.expected_goals.lambda_away,
        prediction.expected_goals.total(),
        prediction.markets.expected_total_goals
    );

    let markets_table =
        print::tabulate_markets(&prediction.markets, &fixture.home_team, &fixture.away_team);
    info!("markets:\n{}", Console::default().render(&markets_table));

    let scores_table = print::tabulate_probable_scores(&prediction.markets.most_likely_scores);
    info!(
        "most likely scores:\n{}",
        Console::default().render(&scores_table)
    );

    let scoregrid_table = print::tabulate_scoregrid(&prediction.score_matrix);
    info!(
        "score matrix (truncated mass {:.2e}):\n{}",
        prediction.score_matrix.truncated_mass(),
        Console::default().render(&scoregrid_table)
    );

    for team in [&fixture.home_team, &fixture.away_team] {
        let form = predictor.form(team);
        info!("{team} form: {form} ({} points)", form.points());
    }

    let h2h = predictor.head_to_head(&fixture);
    if h2h.has_history() {
        info!(
            "head-to-head: {} wins {}, draws {}, {} wins {}",
            h2h.team_a,
            h2h.a_wins(),
            h2h.draws(),
            h2h.team_b,
            h2h.b_wins()
        );
        let h2h_table = print::tabulate_head_to_head(&h2h);
        info!("recent meetings:\n{}", Console::default().render(&h2h_table));
    } else {
        info!("no previous meetings between {} and {}", h2h.team_a, h2h.team_b);
    }

    Ok(())
}
