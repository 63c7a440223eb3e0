use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nosecam_core::{Path as OutlinePath, Point};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

mod config;
mod replay;

use config::Config;

#[derive(Parser)]
#[command(name = "nosecam", about = "Nose-outline centroids and capture trigger replay")]
struct Cli {
    /// TOML configuration file (defaults to $NOSECAM_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the centroid of a JSON path
    Centroid {
        /// Path file (stdin when omitted or "-")
        file: Option<PathBuf>,
    },
    /// Replay JSON-lines detector frames through the capture trigger
    Replay {
        /// Frames file (stdin when omitted or "-")
        file: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Centroid { file } => {
            let center = centroid_cmd(open_input(file.as_deref())?)?;
            println!("{}", serde_json::to_string(&center)?);
        }
        Commands::Replay { file } => {
            let input = open_input(file.as_deref())?;
            let summary = replay::replay(input, io::stdout().lock(), config.trigger)?;
            tracing::info!(
                frames = summary.frames,
                captures = summary.captures,
                "replay finished"
            );
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// Parse a JSON path from `input` and return its centroid.
fn centroid_cmd<R: Read>(mut input: R) -> Result<Point> {
    let mut text = String::new();
    input.read_to_string(&mut text).context("reading path")?;
    let path: OutlinePath = serde_json::from_str(&text).context("parsing path")?;
    Ok(path.centroid()?)
}

/// File to read, or `None` for stdin (no argument or `-`).
fn input_file(file: Option<&Path>) -> Option<&Path> {
    file.filter(|path| *path != Path::new("-"))
}

fn open_input(file: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match input_file(file) {
        Some(path) => {
            let f = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            Ok(Box::new(BufReader::new(f)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}
