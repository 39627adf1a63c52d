//! Interactive shell for the arbor versioned store
//!
//! Run with: cargo run --bin arbor -- [--config arbor.json] [script]

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use arbor::{OutputFormat, Registry, Shell, ShellConfig, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "arbor", about = "In-memory versioned content store shell")]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,

    /// Message attached to each new resource's root version
    #[arg(long)]
    root_message: Option<String>,

    /// Message used by SNAPSHOT when none is given
    #[arg(long)]
    snapshot_message: Option<String>,

    /// Read commands from this file instead of stdin
    script: Option<PathBuf>,
}

fn load_config(args: &Args) -> anyhow::Result<ShellConfig> {
    let mut config = match &args.config {
        Some(path) => ShellConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ShellConfig::default(),
    };

    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if args.json {
        config.output = OutputFormat::Json;
    }
    if let Some(message) = &args.root_message {
        config.root_message = message.clone();
    }
    if let Some(message) = &args.snapshot_message {
        config.snapshot_message = message.clone();
    }
    config.validate().context("invalid command-line overrides")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .try_init();
    log::info!("starting shell with {:?}", config);

    let registry = Registry::with_clock(config.messages(), Arc::new(SystemClock::new()));
    let mut shell = Shell::new(registry, config.output);
    let mut stdout = io::stdout().lock();

    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            shell.run(BufReader::new(file), &mut stdout)?;
        }
        None => shell.run(io::stdin().lock(), &mut stdout)?,
    }
    Ok(())
}
