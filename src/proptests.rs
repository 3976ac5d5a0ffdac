//! Property-based tests for the codec layers.
//!
//! - Bit conversion and envelope framing are lossless
//! - LSB embedding round-trips through both carrier types
//! - Embedding never changes more than the LSB of any slot

use image::RgbImage;
use proptest::prelude::*;

use crate::bits::{bits_to_bytes, bytes_to_bits};
use crate::envelope::{build, parse};
use crate::stego::{AudioCarrier, ImageCarrier, StegoCarrier};

proptest! {
    #[test]
    fn bits_roundtrip(data: Vec<u8>) {
        let bits = bytes_to_bits(&data);
        prop_assert_eq!(bits.len(), data.len() * 8);
        prop_assert_eq!(bits_to_bytes(bits), data);
    }

    #[test]
    fn envelope_parse_inverts_build(
        filename in "[ -~é\u{1F98E}]{0,40}",
        content_type in "[a-z]{1,10}/[a-z+.-]{1,20}",
        body in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let blob = build(&filename, &content_type, &body).unwrap();
        let envelope = parse(&blob).unwrap();
        prop_assert_eq!(envelope.filename(), filename.as_str());
        prop_assert_eq!(envelope.content_type(), content_type.as_str());
        prop_assert_eq!(envelope.body(), body.as_slice());
        prop_assert_eq!(envelope.to_bytes(), blob);
    }

    #[test]
    fn parse_never_panics(blob in prop::collection::vec(any::<u8>(), 0..128)) {
        let _ = parse(&blob);
    }

    #[test]
    fn image_roundtrip(
        seed in any::<u8>(),
        body in prop::collection::vec(any::<u8>(), 0..200),
    ) {
        let img = RgbImage::from_fn(40, 30, |x, y| {
            image::Rgb([seed ^ x as u8, seed.wrapping_add(y as u8), (x * y) as u8])
        });
        let carrier = ImageCarrier::from_rgb(img);
        let blob = build("f", "application/octet-stream", &body).unwrap();

        let hidden = carrier.embed(&blob).unwrap();
        prop_assert_eq!(hidden.extract_bytes().unwrap(), blob);

        for (a, b) in carrier.image().as_raw().iter().zip(hidden.image().as_raw()) {
            prop_assert_eq!(a & 0xFE, b & 0xFE);
        }
    }

    #[test]
    fn audio_roundtrip(
        samples in prop::collection::vec(any::<i16>(), 4000..4100),
        body in prop::collection::vec(any::<u8>(), 0..300),
    ) {
        let carrier = AudioCarrier::from_pcm16(2, 22050, samples);
        let blob = build("f", "application/octet-stream", &body).unwrap();

        let hidden = carrier.embed(&blob).unwrap();
        let envelope = hidden.extract().unwrap();
        prop_assert_eq!(envelope.body(), body.as_slice());

        for (a, b) in carrier.samples().iter().zip(hidden.samples()) {
            prop_assert_eq!(a & !1, b & !1);
        }
    }
}
