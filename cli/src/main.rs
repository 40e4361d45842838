//! Nebula CLI: one dashboard session per invocation.
//!
//! ```text
//! parse args -> load config -> open session (remote | cache | defaults)
//!            -> run one command -> shutdown (flush both tiers) -> exit
//! ```
//!
//! Logs go to `~/.nebula/logs/nebula.log` so stdout stays clean for command
//! output.

mod commands;

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use nebula_config::{NebulaConfig, Settings, nebula_home};
use nebula_engine::Session;

use crate::commands::Cli;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than mixing logs into command output.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!("Failed to create log dir {}: {e}", parent.display()));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!("Failed to open log file {}: {e}", candidate.display()));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = nebula_home() {
        candidates.push(home.join("logs").join("nebula.log"));
    }
    candidates.push(PathBuf::from(".nebula").join("logs").join("nebula.log"));
    candidates
}

fn load_config(cli: &Cli) -> Option<NebulaConfig> {
    let loaded = match cli.config.as_deref() {
        Some(path) => NebulaConfig::load_from(path),
        None => NebulaConfig::load(),
    };
    match loaded {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %err.path().display(), "Ignoring config: {err}");
            eprintln!("warning: {err}");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if let Some(result) = cli.command.run_offline() {
        return result;
    }

    let config = load_config(&cli);
    let settings = Settings::resolve(config.as_ref());
    let Session {
        mut dashboard,
        source,
    } = nebula_engine::open(&settings).await?;
    tracing::debug!(%source, "Session opened");

    let outcome = commands::run(&mut dashboard, cli.command, cli.password.as_deref());

    let (_, report) = dashboard.shutdown().await;
    if let Some(report) = report {
        if let Some(err) = &report.remote_error
            && settings.remote_url.is_some()
        {
            eprintln!("warning: remote sync failed ({err}); changes kept in the local cache");
        }
        if let Some(err) = &report.cache_error {
            eprintln!("warning: local cache write failed ({err})");
        }
    }

    outcome
}
