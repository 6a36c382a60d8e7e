//! Collector - JSON log flattening and label admission from the command line
//!
//! # Usage
//!
//! ```bash
//! # Flatten JSON lines into [name, value] pairs
//! collector flatten --input logs.jsonl --prefix app.
//! cat logs.jsonl | collector flatten --rename msg=_msg
//!
//! # Drop label sets that exceed the configured limits
//! collector labels --input series.jsonl --config configs/config.toml
//! ```

mod cmd;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tell_config::{Config, LogConfig, LogFormat, LogLevel, LogOutput};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Collector - JSON log flattening and label admission
#[derive(Parser, Debug)]
#[command(name = "collector")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level, overrides [log] level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, value_parser = str::parse::<LogLevel>)]
    log_level: Option<LogLevel>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten JSON log lines into name/value fields
    Flatten(cmd::flatten::FlattenArgs),

    /// Check label sets against admission limits
    Labels(cmd::labels::LabelsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.log, cli.log_level)?;

    tell_ingest::init_parser_pool(config.parser.pool_capacity);

    match cli.command {
        Command::Flatten(args) => cmd::flatten::run(args),
        Command::Labels(args) => cmd::labels::run(args, &config),
    }
}

/// Load the config file, or defaults when no path is given
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` wins over both the CLI flag and the config file.
fn init_logging(log: &LogConfig, cli_level: Option<LogLevel>) -> Result<()> {
    let level = log.effective_level(cli_level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.as_str()))
        .context("invalid log filter")?;

    let fmt_layer = match (log.format, log.output) {
        (LogFormat::Console, LogOutput::Stderr) => fmt::layer()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        (LogFormat::Console, LogOutput::Stdout) => fmt::layer()
            .with_target(true)
            .with_writer(io::stdout)
            .boxed(),
        (LogFormat::Json, LogOutput::Stderr) => fmt::layer().json().with_writer(io::stderr).boxed(),
        (LogFormat::Json, LogOutput::Stdout) => fmt::layer().json().with_writer(io::stdout).boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();

    Ok(())
}
