//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod capacity;
mod embed;
mod extract;

pub use capacity::CapacityCommand;
pub use embed::EmbedCommand;
pub use extract::ExtractCommand;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use lizard::{Carrier, LizardConfig};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, config: &LizardConfig) -> Result<()>;
}

/// Loads a carrier file after checking it against the configured size limit.
fn load_carrier(path: &Path, config: &LizardConfig) -> Result<Carrier> {
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to read carrier: {}", path.display()))?
        .len();
    if size > config.limits.max_carrier_bytes {
        bail!(
            "Carrier is {} bytes; the limit is {} bytes",
            size,
            config.limits.max_carrier_bytes
        );
    }

    Carrier::from_file(path).with_context(|| format!("Failed to load carrier: {}", path.display()))
}
