//! Command-line driver over [`wfc_core::solve`]: loads a YAML tile set,
//! drives the event stream with a progress bar, and prints the decoded
//! grid or the compile/no-solution outcome.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use wfc_core::{solve, Constraint, Outcome, Progress, SolveEvent};

/// Tile-synthesis configuration.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Config {
    /// Path to a YAML file holding a list of tile constraints.
    #[arg(short, long)]
    tileset: PathBuf,

    #[arg(short = 'W', long)]
    width: usize,

    #[arg(short = 'H', long)]
    height: usize,

    #[arg(short, long, default_value_t = 0)]
    seed: u32,

    #[arg(short, long)]
    verbose: bool,
}

fn load_constraints(path: &PathBuf) -> Result<Vec<Constraint>> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("reading tileset file {}", path.display()))?;
    serde_yaml::from_str(&yaml).with_context(|| format!("parsing tileset file {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let config = Config::parse();

    let constraints = load_constraints(&config.tileset)?;
    if config.verbose {
        println!("Tiles             : {}", constraints.len());
        println!("Grid              : {}x{}", config.width, config.height);
        println!("Seed              : {}", config.seed);
    }

    let bar = ProgressBar::new((config.width * config.height) as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} decisions")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut result = None;
    for event in solve(constraints, config.width, config.height, config.seed) {
        match event {
            SolveEvent::Error(err) => {
                anyhow::bail!("invalid tileset: {err}");
            }
            SolveEvent::Progress(Progress::Decision { tile: Some(_), .. }) => {
                bar.inc(1);
            }
            SolveEvent::Progress(Progress::Decision { tile: None, .. }) => {
                bar.set_position(bar.position().saturating_sub(1));
            }
            SolveEvent::Progress(Progress::Snapshot(_)) => {}
            SolveEvent::Done(outcome) => {
                result = Some(outcome);
            }
        }
    }
    bar.finish_and_clear();

    match result.expect("solve always ends with a Done event") {
        Outcome::Solved(tiles) => {
            for row in tiles.chunks(config.width.max(1)) {
                println!("{}", row.join(" "));
            }
        }
        Outcome::NoSolution => {
            println!("no solution");
        }
    }

    Ok(())
}
