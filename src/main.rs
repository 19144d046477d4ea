mod commands;

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(version, about = "Live district results for an election map")]
struct Opts {
    /// Election config JSON (defaults to the built-in roster)
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dump parties and the district roster.
    Info,
    /// Merge one or more payload files and print the derived results.
    Apply {
        /// Payload files, applied in order
        #[clap(required = true)]
        payloads: Vec<PathBuf>,
        /// Print the derived view as JSON
        #[clap(long)]
        json: bool,
    },
    /// Poll a payload file on an interval.
    Watch {
        /// Payload file to re-read each cycle
        source: PathBuf,
        /// Seconds between polls
        #[clap(long, default_value = "30")]
        interval_secs: u64,
        /// Stop after this many cycles
        #[clap(long)]
        cycles: Option<u64>,
        /// Print each derived view as JSON
        #[clap(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let config = opts.config.as_deref();

    let result = match opts.command {
        Command::Info => commands::info(config),
        Command::Apply { payloads, json } => commands::apply(config, &payloads, json),
        Command::Watch {
            source,
            interval_secs,
            cycles,
            json,
        } => commands::watch(config, &source, interval_secs, cycles, json).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "❌ Failed:".red(), e);
        std::process::exit(1);
    }
}
