//! Extract command - recover hidden text or a file from a carrier.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use lizard::{Lizard, LizardConfig, StegoError};

use super::{load_carrier, CommandExecutor};

/// Fallback name when the stored filename is unusable.
const FALLBACK_FILENAME: &str = "extracted.bin";

/// Recover a hidden payload from a carrier.
///
/// Text payloads (`text/*`, `.txt`) are printed to stdout unless --output is
/// given. Anything else is written to --output, or to the stored filename in
/// the current directory.
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Path to the stego file (.png, .bmp or .wav)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Password, required if the payload was encrypted
    #[arg(short, long, env = "LIZARD_PASSWORD")]
    pub password: Option<String>,

    /// Write the payload to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

/// Keeps only the final path component of a stored filename.
fn safe_filename(stored: &str) -> PathBuf {
    Path::new(stored)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_FILENAME))
}

impl CommandExecutor for ExtractCommand {
    fn execute(&self, config: &LizardConfig) -> Result<()> {
        let carrier = load_carrier(&self.carrier, config)?;
        let lizard = Lizard::new(config.clone())?;

        let password = self.password.as_deref().filter(|p| !p.is_empty());
        let revealed = match lizard.reveal(&carrier, password) {
            Ok(revealed) => revealed,
            Err(StegoError::PasswordRequired) => {
                bail!("This payload is encrypted. Provide --password.")
            }
            Err(StegoError::Authentication) => {
                bail!("Decryption failed. Wrong password or corrupted data.")
            }
            Err(e) => return Err(e).context("No hidden payload could be recovered"),
        };

        if self.output.is_none() {
            if let Some(text) = revealed.as_text() {
                println!("{text}");
                return Ok(());
            }
        }

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| safe_filename(&revealed.filename));
        if output.exists() && !self.force {
            bail!(
                "{} already exists; use --force to overwrite",
                output.display()
            );
        }

        fs::write(&output, &revealed.data)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        eprintln!(
            "Recovered {} ({}, {} bytes) -> {}",
            revealed.filename,
            revealed.content_type,
            revealed.data.len(),
            output.display()
        );
        Ok(())
    }
}
