//! Image intake and preprocessing
//!
//! Turns uploaded bytes into the fixed-shape frame the emotion classifier
//! expects: decode, stretch-resize to 500x500, collapse to 3 channels,
//! reorder RGB to BGR.

use image::imageops::FilterType;
use thiserror::Error;

/// Target frame width in pixels.
pub const TARGET_WIDTH: u32 = 500;
/// Target frame height in pixels.
pub const TARGET_HEIGHT: u32 = 500;

/// Preprocessing errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Upload bytes could not be decoded as an image
    #[error("Failed to decode image: {0}")]
    Decode(String),
}

/// A preprocessed image frame ready for classification.
///
/// Invariant: `bgr` holds exactly `width * height * 3` bytes in
/// blue-green-red interleaved order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedFrame {
    /// Frame width (always [`TARGET_WIDTH`])
    pub width: u32,
    /// Frame height (always [`TARGET_HEIGHT`])
    pub height: u32,
    /// Interleaved 8-bit BGR pixel data
    pub bgr: Vec<u8>,
}

/// Decode and normalize uploaded image bytes.
///
/// The resize is a direct stretch to 500x500 with a bilinear (triangle)
/// filter: no letterboxing, no cropping, deterministic for identical input.
/// Grayscale and alpha sources are normalized to exactly 3 channels before
/// the RGB->BGR swap.
pub fn prepare(raw: &[u8]) -> Result<PreparedFrame, PipelineError> {
    let decoded =
        image::load_from_memory(raw).map_err(|e| PipelineError::Decode(e.to_string()))?;

    let resized = decoded.resize_exact(TARGET_WIDTH, TARGET_HEIGHT, FilterType::Triangle);

    // to_rgb8 collapses grayscale and strips alpha, always yielding 3xu8
    let rgb = resized.to_rgb8();
    let mut bgr = rgb.into_raw();
    for pixel in bgr.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }

    Ok(PreparedFrame {
        width: TARGET_WIDTH,
        height: TARGET_HEIGHT,
        bgr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
    use std::io::Cursor;

    fn encode_png(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn solid_rgb_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(rgb));
        encode_png(DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn output_shape_is_fixed() {
        let png = solid_rgb_png(100, 100, [128, 128, 128]);
        let frame = prepare(&png).unwrap();

        assert_eq!(frame.width, 500);
        assert_eq!(frame.height, 500);
        assert_eq!(frame.bgr.len(), 500 * 500 * 3);
    }

    #[test]
    fn non_square_input_is_stretched() {
        // 40x10 input must still come out 500x500 (direct stretch, no crop)
        let png = solid_rgb_png(40, 10, [10, 20, 30]);
        let frame = prepare(&png).unwrap();

        assert_eq!(frame.bgr.len(), 500 * 500 * 3);
    }

    #[test]
    fn channels_are_reordered_to_bgr() {
        // Pure red in: every pixel must read [0, 0, 255] in BGR order
        let png = solid_rgb_png(10, 10, [255, 0, 0]);
        let frame = prepare(&png).unwrap();

        for pixel in frame.bgr.chunks_exact(3) {
            assert_eq!(pixel, [0, 0, 255]);
        }
    }

    #[test]
    fn grayscale_input_expands_to_three_channels() {
        let gray = image::GrayImage::from_pixel(20, 20, image::Luma([200]));
        let png = encode_png(DynamicImage::ImageLuma8(gray));
        let frame = prepare(&png).unwrap();

        assert_eq!(frame.bgr.len(), 500 * 500 * 3);
        for pixel in frame.bgr.chunks_exact(3) {
            assert_eq!(pixel, [200, 200, 200]);
        }
    }

    #[test]
    fn alpha_channel_is_stripped() {
        let rgba = RgbaImage::from_pixel(20, 20, image::Rgba([50, 100, 150, 255]));
        let png = encode_png(DynamicImage::ImageRgba8(rgba));
        let frame = prepare(&png).unwrap();

        assert_eq!(frame.bgr.len(), 500 * 500 * 3);
        // BGR order of [50, 100, 150]
        assert_eq!(&frame.bgr[..3], [150, 100, 50]);
    }

    #[test]
    fn preprocessing_is_deterministic() {
        let png = solid_rgb_png(123, 77, [17, 99, 201]);

        let first = prepare(&png).unwrap();
        let second = prepare(&png).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = prepare(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[test]
    fn empty_input_fails_to_decode() {
        let err = prepare(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }
}
