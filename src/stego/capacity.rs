//! Capacity gate.
//!
//! Callers must check an envelope against the carrier before embedding.
//! The check runs on byte counts and never touches the carrier.

use tracing::warn;

use super::StegoCarrier;
use crate::error::StegoError;

/// Rejects `required` bytes if they exceed `available`.
pub fn check_capacity(required: usize, available: usize) -> Result<(), StegoError> {
    if required > available {
        warn!(required, available, "payload exceeds carrier capacity");
        return Err(StegoError::Capacity {
            required,
            available,
        });
    }
    Ok(())
}

/// Rejects an envelope of `envelope_len` bytes that does not fit `carrier`.
pub fn ensure_fits<C: StegoCarrier>(carrier: &C, envelope_len: usize) -> Result<(), StegoError> {
    check_capacity(envelope_len, carrier.capacity())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fit_passes() {
        assert!(check_capacity(24, 24).is_ok());
        assert!(check_capacity(0, 0).is_ok());
    }

    #[test]
    fn test_ensure_fits_uses_carrier_capacity() {
        let carrier = crate::stego::ImageCarrier::from_rgb(image::RgbImage::new(8, 8));
        assert!(ensure_fits(&carrier, 24).is_ok());
        assert!(matches!(
            ensure_fits(&carrier, 25),
            Err(StegoError::Capacity {
                required: 25,
                available: 24
            })
        ));
    }

    #[test]
    fn test_one_over_fails_with_counts() {
        match check_capacity(25, 24) {
            Err(StegoError::Capacity {
                required,
                available,
            }) => {
                assert_eq!(required, 25);
                assert_eq!(available, 24);
            }
            other => panic!("expected capacity error, got {other:?}"),
        }
    }
}
