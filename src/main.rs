//! Local harness
//!
//! Stands in for a plugin host: loads one provider + resource declaration,
//! runs a lifecycle operation and persists the resulting state as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use resty::config::{default_state_path, HarnessConfig};
use resty::resource::{ResourceState, RestDataSource, RestResource};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Drive a REST endpoint as a declarative resource
#[derive(Parser, Debug)]
#[command(name = "resty", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Provider and resource declaration (YAML or JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// State file (defaults to the user config directory)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Create or update the resource and store its state
    Apply,
    /// Check that the stored resource still has an id
    Read,
    /// Forget the stored resource id
    Delete,
    /// Report whether the resource exists
    Exists,
    /// Run the request as a data source; nothing is stored
    Data,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("resty started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("resty").join("resty.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".resty").join("resty.log");
    }
    PathBuf::from("resty.log")
}

fn load_state(path: &Path) -> Result<Option<ResourceState>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state {:?}", path))?;
    let state = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse state {:?}", path))?;
    Ok(Some(state))
}

fn save_state(path: &Path, state: &ResourceState) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(state)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write state {:?}", path))?;
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = HarnessConfig::load(&args.config)
        .with_context(|| format!("Failed to load {:?}", args.config))?;
    let state_path = args.state.clone().unwrap_or_else(default_state_path);

    match args.command {
        Command::Apply => {
            let resource = RestResource::new(config.provider);
            let prior = load_state(&state_path)?;
            let state = resource.apply(prior, &config.resource).await?;
            save_state(&state_path, &state)?;
            print_json(&state)?;
        }
        Command::Read => {
            let resource = RestResource::new(config.provider);
            let mut state = load_state(&state_path)?.unwrap_or_default();
            let result = resource.read(&mut state);
            save_state(&state_path, &state)?;
            result?;
            print_json(&state)?;
        }
        Command::Delete => {
            let resource = RestResource::new(config.provider);
            let mut state = load_state(&state_path)?.unwrap_or_default();
            resource.delete(&mut state);
            save_state(&state_path, &state)?;
            print_json(&state)?;
        }
        Command::Exists => {
            let resource = RestResource::new(config.provider);
            let state = load_state(&state_path)?.unwrap_or_default();
            print_json(&json!({ "exists": resource.exists(&state) }))?;
        }
        Command::Data => {
            let data_source = RestDataSource::new(config.provider);
            let fetched = data_source.read(&config.resource).await?;
            print_json(&json!({
                "id": fetched.id,
                "response": fetched.response,
                "response_headers": fetched.response_headers,
            }))?;
        }
    }

    Ok(())
}
