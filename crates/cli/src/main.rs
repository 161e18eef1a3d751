//! Backoffice CLI - administration client for persons and products

mod commands;
mod config;
mod logging;
mod navigator;
mod output;
mod state_dir;

use anyhow::{Context as _, Result};
use backoffice_http::{ApiClient, ApiError, FileTokenStore, SessionManager};
use clap::{Parser, ValueEnum};
use commands::{Commands, Context};
use navigator::TerminalNavigator;
use state_dir::StateDir;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, debug, error, info, warn};

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(about = "Manage persons and products through the backoffice API")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to backoffice.toml in the config directory)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the stored session, configuration and logs
    #[arg(short = 'd', long, global = true)]
    state_dir: Option<PathBuf>,

    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "60")]
    timeout: u64,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let state_dir = StateDir::resolve(cli.state_dir.clone());
    logging::init_logging(cli.log_level.into(), &state_dir.log_path(), cli.no_file_log)?;
    if state_dir.uses_fallback() {
        warn!(
            "Failed to determine platform-specific directories, using {}",
            state_dir.data_dir().display()
        );
    }

    info!("Starting backoffice CLI");

    let long_running = cli.command.is_long_running();
    let timeout = cli.timeout;
    let run = run(cli, state_dir);

    // Execute command with optional timeout
    let outcome = if timeout == 0 || long_running {
        run.await
    } else {
        match tokio::time::timeout(Duration::from_secs(timeout), run).await {
            Ok(result) => result,
            Err(_) => {
                error!("Command timed out after {} seconds", timeout);
                std::process::exit(1);
            }
        }
    };

    match outcome {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            debug!("Command failed: {e:?}");
            eprintln!("Error: {}", render_error(&e));
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, state_dir: StateDir) -> Result<()> {
    let settings = config::Settings::load(cli.config.as_deref(), &state_dir.config_path())?;
    debug!(?settings, "Loaded settings");

    let store = FileTokenStore::open(state_dir.session_path());
    let session = SessionManager::new(Arc::new(store), Arc::new(TerminalNavigator));

    let mut builder = ApiClient::builder()
        .base_url(settings.api.base_url.clone())
        .locale(settings.api.locale)
        .session(Arc::new(session));
    if let Some(timeout) = settings.api.timeout() {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().context("Failed to create API client")?;

    let ctx = Context {
        client,
        settings,
        state_dir,
        json: cli.json,
    };
    cli.command.execute(ctx).await
}

/// Error chain down to the normalized API message; transport details stay
/// in the log
fn render_error(err: &anyhow::Error) -> String {
    let mut parts = Vec::new();
    for cause in err.chain() {
        parts.push(cause.to_string());
        if cause.is::<ApiError>() {
            break;
        }
    }
    parts.join(": ")
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
