use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use scoreline::data;
use scoreline::print;
use scoreline::standings;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV files of historical results
    files: Vec<PathBuf>,

    /// season to tabulate; the latest season in the data if omitted
    #[clap(short = 's', long)]
    season: Option<String>,

    /// number of recent matches making up a team's form
    #[clap(long, default_value_t = 5)]
    form: usize,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.files.is_empty() {
            bail!("at least one data file must be specified");
        }
        if self.form == 0 {
            bail!("form must span at least one match");
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

    let table = data::read_from_files(&args.files)?;
    let season = match args.season {
        Some(season) => season,
        None => table
            .seasons()
            .last()
            .map(ToString::to_string)
            .ok_or(anyhow!("no matches loaded"))?,
    };
    let season_table = table.filter_seasons(&[&season]);
    if season_table.is_empty() {
        return Err(anyhow!("no matches for season {season}").into());
    }

    let forms = season_table
        .teams()
        .into_iter()
        .map(|team| standings::recent_form(&season_table, team, args.form))
        .collect::<Vec<_>>();
    let standings_table = print::tabulate_standings(&standings::standings(&season_table), &forms);
    info!(
        "season {season} ({} matches):\n{}",
        season_table.len(),
        Console::default().render(&standings_table)
    );

    Ok(())
}
