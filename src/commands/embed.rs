//! Embed command - hide text or a file inside an image or WAV carrier.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::warn;

use lizard::{CarrierKind, Lizard, LizardConfig, Payload, StegoCarrier};

use super::{load_carrier, CommandExecutor};

/// Hide a message or file in a carrier (PNG, BMP or 16-bit WAV).
///
/// Images are always written back as PNG; WAV carriers keep their format.
#[derive(Args, Debug)]
pub struct EmbedCommand {
    /// Path to the carrier file (.png, .bmp or .wav)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Text message to hide (mutually exclusive with --file)
    #[arg(short, long, conflicts_with = "file")]
    pub message: Option<String>,

    /// File to hide (mutually exclusive with --message)
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Content type recorded for --file (default from config)
    #[arg(long, requires = "file")]
    pub content_type: Option<String>,

    /// Encrypt the payload with this password before hiding it
    #[arg(short, long, env = "LIZARD_PASSWORD")]
    pub password: Option<String>,

    /// Output path; the extension is forced to .png or .wav (default: lizard_stego.png / lizard_stego.wav)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for EmbedCommand {
    fn execute(&self, config: &LizardConfig) -> Result<()> {
        let carrier = load_carrier(&self.carrier, config)?;

        let payload = if let Some(path) = &self.file {
            Payload::from_file(path, self.content_type.as_deref(), config)
                .with_context(|| format!("Failed to read payload file: {}", path.display()))?
        } else if let Some(message) = &self.message {
            if message.trim().is_empty() {
                bail!("Message is empty");
            }
            Payload::text(message, config)
        } else {
            bail!("Provide a payload with --message or --file");
        };

        let password = self.password.as_deref().filter(|p| !p.is_empty());
        let payload_len = payload.data.len();

        let lizard = Lizard::new(config.clone())?;
        let stego = lizard
            .hide(&carrier, payload, password)
            .context("Failed to hide payload")?;

        let kind = carrier.kind();
        let requested = self.output.clone().unwrap_or_else(|| {
            PathBuf::from(match kind {
                CarrierKind::Image => &config.output.image_name,
                CarrierKind::Audio => &config.output.audio_name,
            })
        });
        let output = kind.output_path(&requested);
        if output != requested {
            warn!(
                requested = %requested.display(),
                output = %output.display(),
                "output renamed to match its encoding"
            );
        }
        stego
            .save(&output)
            .with_context(|| format!("Failed to write output: {}", output.display()))?;

        eprintln!(
            "Hidden {} bytes{} in {} (capacity {} bytes)",
            payload_len,
            if password.is_some() { " (encrypted)" } else { "" },
            output.display(),
            carrier.capacity()
        );
        Ok(())
    }
}
