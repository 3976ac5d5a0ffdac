//! LSB (Least Significant Bit) steganography for images.
//!
//! Hides data in the least significant bits of pixel color values.
//! Supports PNG and BMP images (lossless formats only).
//!
//! Slots are visited row by row, left to right, and within each pixel in
//! R, G, B order: 3 bits per pixel, alpha never used.

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use tracing::{debug, info};

use super::capacity::ensure_fits;
use super::lsb::{self, LsbSlots};
use super::StegoCarrier;
use crate::envelope::Envelope;
use crate::error::StegoError;

/// Color channels carrying payload bits.
const CHANNELS_PER_PIXEL: usize = 3;

/// The packed RGB buffer is already in traversal order: slot `i` is byte `i`.
impl LsbSlots for RgbImage {
    fn slot_count(&self) -> usize {
        let (width, height) = self.dimensions();
        (width as usize) * (height as usize) * CHANNELS_PER_PIXEL
    }

    fn read_lsb(&self, slot: usize) -> u8 {
        self.as_raw()[slot] & 1
    }

    fn write_lsb(&mut self, slot: usize, bit: u8) {
        let raw: &mut [u8] = &mut **self;
        raw[slot] = (raw[slot] & 0xFE) | (bit & 1);
    }
}

/// Image carrier.
#[derive(Debug, Clone)]
pub struct ImageCarrier {
    image: RgbImage,
}

impl ImageCarrier {
    /// Creates a new ImageCarrier from encoded bytes (PNG, BMP).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| StegoError::CarrierDecode(e.to_string()))?;
        Ok(Self::from_image(image))
    }

    /// Creates a new ImageCarrier from a decoded image, dropping any alpha.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }

    /// Wraps an RGB buffer as-is.
    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Returns the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| StegoError::CarrierEncode(e.to_string()))?;
        Ok(bytes)
    }

    /// Returns a reference to the underlying image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

impl StegoCarrier for ImageCarrier {
    /// `floor(width * height * 3 / 8)` bytes.
    fn capacity(&self) -> usize {
        lsb::capacity_bytes(&self.image)
    }

    fn embed(&self, envelope: &[u8]) -> Result<Self, StegoError> {
        ensure_fits(self, envelope.len())?;

        let mut output = self.image.clone();
        lsb::embed_bits(&mut output, envelope)?;

        let (width, height) = self.image.dimensions();
        info!(width, height, bytes = envelope.len(), "embedded envelope in image");
        Ok(Self { image: output })
    }

    fn extract(&self) -> Result<Envelope, StegoError> {
        let (width, height) = self.image.dimensions();
        debug!(width, height, "extracting envelope from image");
        lsb::extract_envelope(&self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::build;
    use crate::error::ErrorKind;
    use image::Rgb;

    fn create_test_image(width: u32, height: u32) -> ImageCarrier {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 17) % 256) as u8,
                ((y * 23) % 256) as u8,
                (((x + y) * 31) % 256) as u8,
            ])
        });
        ImageCarrier::from_rgb(img)
    }

    #[test]
    fn test_capacity() {
        // 100x100 = 10000 pixels, 3 channels, 1 bit each = 30000 bits = 3750 bytes
        assert_eq!(create_test_image(100, 100).capacity(), 3750);
        // floor(3 * 3 * 3 / 8)
        assert_eq!(create_test_image(3, 3).capacity(), 3);
        assert_eq!(create_test_image(0, 0).capacity(), 0);
    }

    #[test]
    fn test_capacity_is_stable() {
        let carrier = create_test_image(17, 9);
        let first = carrier.capacity();
        let _ = carrier.extract();
        assert_eq!(carrier.capacity(), first);
    }

    #[test]
    fn test_hide_and_extract_small() {
        let carrier = create_test_image(100, 100);
        let blob = build("note.txt", "text/plain", b"Hello, steganography!").unwrap();

        let hidden = carrier.embed(&blob).unwrap();
        let envelope = hidden.extract().unwrap();

        assert_eq!(envelope.body(), b"Hello, steganography!");
        assert_eq!(envelope.filename(), "note.txt");
        assert_eq!(hidden.extract_bytes().unwrap(), blob);
    }

    #[test]
    fn test_hide_and_extract_larger() {
        let carrier = create_test_image(200, 200);
        let data: Vec<u8> = (0..1000).map(|i| (i % 256) as u8).collect();
        let blob = build("data.bin", "application/octet-stream", &data).unwrap();

        let hidden = carrier.embed(&blob).unwrap();
        assert_eq!(hidden.extract().unwrap().body(), data.as_slice());
    }

    #[test]
    fn test_traversal_order_is_row_major_rgb() {
        let carrier = ImageCarrier::from_rgb(RgbImage::new(4, 1));
        // 0b1110_0000: first pixel R,G,B set, second pixel untouched
        let hidden = carrier.embed(&[0b1110_0000]).unwrap();
        let img = hidden.image();

        assert_eq!(img.get_pixel(0, 0).0, [1, 1, 1]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(2, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_traversal_continues_on_next_row() {
        let carrier = ImageCarrier::from_rgb(RgbImage::new(2, 3));
        // Slots 6..9 are the first pixel of row 1
        let hidden = carrier.embed(&[0b0000_0011, 0b1000_0000]).unwrap();
        let img = hidden.image();

        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(0, 1).0, [1, 1, 1]);
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(0, 2).0, [0, 0, 0]);
    }

    #[test]
    fn test_only_lsbs_change() {
        let carrier = create_test_image(20, 20);
        let blob = build("a", "b", &[0xA5; 40]).unwrap();
        let hidden = carrier.embed(&blob).unwrap();

        for (before, after) in carrier.image().as_raw().iter().zip(hidden.image().as_raw()) {
            assert_eq!(before & 0xFE, after & 0xFE);
        }
    }

    #[test]
    fn test_original_untouched() {
        let carrier = create_test_image(20, 20);
        let snapshot = carrier.image().clone();
        let blob = build("a", "b", &[0xFF; 40]).unwrap();

        let _hidden = carrier.embed(&blob).unwrap();
        assert_eq!(carrier.image(), &snapshot);
    }

    #[test]
    fn test_eight_by_eight_boundary() {
        let carrier = create_test_image(8, 8);
        assert_eq!(carrier.capacity(), 24);

        let exact = vec![0x3C; 24];
        assert!(carrier.embed(&exact).is_ok());

        let too_big = vec![0x3C; 25];
        match carrier.embed(&too_big) {
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

    #[test]
    fn test_image_too_small() {
        let carrier = create_test_image(10, 10);
        let result = carrier.embed(&vec![0u8; 1000]);
        assert!(matches!(result, Err(StegoError::Capacity { .. })));
    }

    #[test]
    fn test_tiny_image_has_no_data() {
        // 3x3 = 27 slots, fewer than the 32-bit prefix
        let err = create_test_image(3, 3).extract().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_clean_image_is_not_stego() {
        // All-zero LSBs decode to a zero-length header, which is not valid JSON.
        let carrier = ImageCarrier::from_rgb(RgbImage::new(50, 50));
        assert_eq!(carrier.extract().unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_png_roundtrip() {
        let carrier = create_test_image(100, 100);
        let blob = build("x.txt", "text/plain", b"Test PNG roundtrip").unwrap();

        let hidden = carrier.embed(&blob).unwrap();
        let png_bytes = hidden.to_png_bytes().unwrap();
        let reloaded = ImageCarrier::from_bytes(&png_bytes).unwrap();

        assert_eq!(reloaded.extract().unwrap().body(), b"Test PNG roundtrip");
    }

    #[test]
    fn test_alpha_is_dropped_on_load() {
        let rgba = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 40]));
        let carrier = ImageCarrier::from_image(DynamicImage::ImageRgba8(rgba));
        assert_eq!(carrier.image().get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(carrier.capacity(), 6);
    }
}
