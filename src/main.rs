//! tsrename - organize photos and videos into a date tree
//!
//! Diagnostics go to stderr, destination paths to stdout.

use anyhow::Result;
use clap::Parser;
use std::io::{self, IsTerminal};
use tracing::{Level, debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tsrename::{Cli, Config, Discovery, Processor};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging(&cli)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "tsrename starting");

    let mut config = load_config(&cli)?;
    if let Err(e) = config.prepare() {
        error!("[{}] {e}", e.category());
        return Err(e.into());
    }
    if config.verbose {
        info!(?config, "Configuration loaded");
    }

    let stdin = io::stdin();
    let discovery = match &config.source_root {
        Some(root) => Discovery::walk(root),
        None => {
            if stdin.is_terminal() {
                error!("[path] no <source> given and stdin is a terminal");
                anyhow::bail!("no source specified: pass a directory or pipe paths on stdin");
            }
            Discovery::stream(stdin.lock())
        }
    };

    let mut processor = Processor::new(&config, io::stdout().lock());
    let stats = processor.run(discovery);

    info!("Processing complete. {}", stats.summary());

    Ok(())
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    Ok(config)
}

/// Setup logging: stderr always, plus an optional log file
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    let Some(ref log_path) = cli.log_file else {
        subscriber.init();
        return Ok(None);
    };

    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
    }

    Ok(Some(guard))
}
