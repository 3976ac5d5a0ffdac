//! Capacity command - report how much a carrier can hold.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use lizard::{Carrier, Lizard, LizardConfig, StegoCarrier};

use super::{load_carrier, CommandExecutor};

/// Show the payload capacity of a carrier.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Path to the carrier file (.png, .bmp or .wav)
    #[arg(short, long)]
    pub carrier: PathBuf,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, config: &LizardConfig) -> Result<()> {
        let carrier = load_carrier(&self.carrier, config)?;
        let lizard = Lizard::new(config.clone())?;
        let capacity = carrier.capacity();

        match &carrier {
            Carrier::Image(image) => {
                let (width, height) = image.dimensions();
                println!("Image: {width}x{height} pixels");
            }
            Carrier::Audio(audio) => {
                println!(
                    "Audio: {} channel(s), {} Hz, {} frames ({:.2}s){}",
                    audio.channels(),
                    audio.sample_rate(),
                    audio.frame_count(),
                    audio.duration_secs(),
                    if audio.is_supported() {
                        ""
                    } else {
                        " - unsupported sample format"
                    }
                );
            }
        }

        let text_name = &config.envelope.text_filename;
        let text_type = &config.envelope.text_content_type;
        println!("Capacity: {capacity} bytes");
        println!(
            "Max text message: {} bytes ({} bytes with a password)",
            lizard.max_payload_len(capacity, text_name, text_type, false),
            lizard.max_payload_len(capacity, text_name, text_type, true)
        );
        Ok(())
    }
}
