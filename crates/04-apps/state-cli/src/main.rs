//! Command-line utility for replaying action logs through the root store.

mod replay;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use root_state::RootState;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use store::StoreConfig;

/// Replay NDJSON action logs through the application's root reducer.
#[derive(Parser, Debug)]
#[command(author, version, about = "Replay actions through the root store", long_about = None)]
struct Cli {
    /// Store configuration as a JSON file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dispatch every action in FILE (or `-` for stdin) and print the final state.
    Replay {
        /// NDJSON file with one `{"type": ..., "payload": ...}` object per line.
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// JSON file with a preloaded root state.
        #[arg(short, long, value_name = "FILE")]
        state: Option<PathBuf>,
        /// Print the state after every action as NDJSON.
        #[arg(long)]
        trace: bool,
    },
    /// Print the slice keys of the root state.
    Shape,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => StoreConfig::named("cli"),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Replay {
            input,
            state,
            trace,
        } => {
            let preloaded = state.as_deref().map(load_state).transpose()?;
            let reader = open_input(&input)?;
            let store = replay::configure_store(config, preloaded)?;
            let summary = replay::replay(&store, reader, |state| {
                if trace {
                    replay::write_state(&mut out, state)?;
                }
                Ok(())
            })?;
            if !trace {
                replay::write_state(&mut out, &store.state())?;
            }
            log::info!(
                "replayed {} action(s), {} left the state unchanged",
                summary.dispatched,
                summary.unchanged
            );
        }
        Command::Shape => {
            for key in RootState::shape().keys() {
                writeln!(out, "{key}")?;
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<StoreConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {path:?}"))?;
    StoreConfig::from_json(&text).with_context(|| format!("failed to parse config {path:?}"))
}

fn load_state(path: &Path) -> Result<RootState> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read state {path:?}"))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse state {path:?}"))
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("failed to open actions {path:?}"))?;
    Ok(Box::new(BufReader::new(file)))
}
