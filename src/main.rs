//! Lizard - hide files and messages in images and WAV audio
//!
//! A CLI for LSB steganography with optional password encryption.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

use commands::{CapacityCommand, CommandExecutor, EmbedCommand, ExtractCommand};
use lizard::LizardConfig;

/// Lizard - hide files and messages in images and WAV audio
///
/// Payloads are written into the least significant bit of each RGB channel
/// value or 16-bit PCM sample. A password seals the payload with
/// scrypt + AES-256-GCM before it is hidden.
#[derive(Parser)]
#[command(name = "lizard")]
#[command(version)]
#[command(about = "LSB steganography for PNG/BMP images and 16-bit WAV audio")]
#[command(long_about = None)]
struct Cli {
    /// Path to a config file (default: ~/.lizard/config.toml)
    #[arg(long, global = true, env = "LIZARD_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LIZARD_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log format (plain, json)
    #[arg(long, global = true, env = "LIZARD_LOG_FORMAT", default_value = "plain")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message or file in a carrier
    Embed(EmbedCommand),

    /// Recover a hidden message or file from a carrier
    Extract(ExtractCommand),

    /// Show how many bytes a carrier can hold
    Capacity(CapacityCommand),
}

impl Commands {
    fn executor(&self) -> &dyn CommandExecutor {
        match self {
            Commands::Embed(cmd) => cmd,
            Commands::Extract(cmd) => cmd,
            Commands::Capacity(cmd) => cmd,
        }
    }
}

fn setup_logging(log_level: &str, log_format: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr; stdout carries extracted text.
    match log_format.to_lowercase().as_str() {
        "json" => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set subscriber")?;
        }
        _ => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set subscriber")?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<LizardConfig> {
    let config = match path {
        Some(path) => LizardConfig::load_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => LizardConfig::load().context("Failed to load config")?,
    };
    debug!(
        log_n = config.kdf.log_n,
        r = config.kdf.r,
        p = config.kdf.p,
        "configuration loaded"
    );
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level, &cli.log_format)?;

    let config = load_config(cli.config.as_ref())?;
    cli.command.executor().execute(&config)
}
