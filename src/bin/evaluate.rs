use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use scoreline::config::Config;
use scoreline::csv::CsvWriter;
use scoreline::data;
use scoreline::evaluate::{self, Split};
use scoreline::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV files of historical results
    files: Vec<PathBuf>,

    /// season to hold out for testing; the newest 20% of matches are held out if omitted
    #[clap(short = 't', long)]
    test_season: Option<String>,

    /// highest goal count per side in the score matrix
    #[clap(long, default_value_t = 7)]
    max_goals: u8,

    /// pseudo-matches of league-average scoring blended into each team's record
    #[clap(long, default_value_t = 0.0)]
    smoothing: f64,

    /// where to write per-match forecasts as CSV
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.files.is_empty() {
            bail!("at least one data file must be specified");
        }
        Ok(())
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

    let start_time = Instant::now();
    let table = data::read_from_files(&args.files)?;
    let config = Config {
        max_goals: args.max_goals,
        smoothing_k: args.smoothing,
        ..Config::default()
    };
    let split = match args.test_season {
        Some(season) => Split::HoldOutSeason(season),
        None => Split::Temporal,
    };
    let evaluation = evaluate::evaluate(&config, &table, split)?;
    let elapsed = start_time.elapsed();
    info!(
        "evaluated {} forecasts in {}s",
        evaluation.n_test,
        elapsed.as_millis() as f64 / 1_000.
    );

    let summary_table = print::tabulate_evaluation(&evaluation);
    info!("summary:\n{}", Console::default().render(&summary_table));

    if let Some(out) = args.out {
        let mut csv = CsvWriter::create(&out)?;
        evaluate::write_forecasts(&mut csv, &evaluation.forecasts)?;
        info!("wrote {} forecasts to {}", evaluation.forecasts.len(), out.display());
    }

    Ok(())
}
