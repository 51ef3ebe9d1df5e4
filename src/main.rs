//! # Butterfly-path CLI
//!
//! Command-line interface for inspecting files of binary step records.

use anyhow::{Context, Result};
use butterfly_path::{Config, GreatCircle, PathElement, RecordReader, Track};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

mod cli;

/// Command-line interface for butterfly-path
#[derive(Parser)]
#[command(name = "butterfly-path")]
#[command(about = "Inspect route step records")]
#[command(long_about = "Reads files of back-to-back 14-byte step records:
  butterfly-path dump route.bin            # One line per step
  butterfly-path dump route.bin --json     # JSON array of steps
  butterfly-path summary route.bin         # Distance, cost and ascend as JSON")]
#[command(version = env!("BUTTERFLY_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print every record in a file
    Dump {
        /// File of step records
        file: PathBuf,

        /// Print a JSON array instead of text lines
        #[arg(long)]
        json: bool,
    },
    /// Link the records into one route and print its totals as JSON
    Summary {
        /// File of step records, start of route first
        file: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let mut logger = env_logger::Builder::from_default_env();
    logger.target(env_logger::Target::Stderr);
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Command::Dump { file, json } => dump(&file, json, &config),
        Command::Summary { file } => summary(&file, &config),
    }
}

fn read_records(path: &Path) -> Result<Vec<PathElement>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let elements = RecordReader::new(BufReader::new(file))
        .collect::<butterfly_path::Result<Vec<_>>>()
        .with_context(|| format!("reading records from {}", path.display()))?;
    info!("Read {} records from {}", elements.len(), path.display());
    Ok(elements)
}

fn dump(path: &Path, json: bool, config: &Config) -> Result<()> {
    let elements = read_records(path)?;
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if json {
        let views: Vec<cli::ElementView> = elements
            .iter()
            .map(|e| cli::ElementView::new(e, &config.coordinates))
            .collect();
        serde_json::to_writer_pretty(&mut out, &views)?;
        writeln!(out)?;
    } else {
        for (index, element) in elements.iter().enumerate() {
            writeln!(out, "{}", cli::format_element(index, element, &config.coordinates))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn summary(path: &Path, config: &Config) -> Result<()> {
    let track = Track::rethread(read_records(path)?)?;
    let summary = track.summary(&GreatCircle::new(config.coordinates));
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
