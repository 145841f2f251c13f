//! Image preprocessing for CLIP inference.
//!
//! CLIP ViT-B/32 expects:
//! - Input size: 224×224 pixels
//! - Normalization: per-channel (pixel/255 - mean) / std with the OpenAI
//!   CLIP constants
//! - Channel order: RGB
//! - Tensor layout: NCHW [batch, channels, height, width]
//!
//! The resize is a direct `resize_exact` with no letterboxing; aspect ratio
//! distortion is accepted behavior, matching how the classifier was trained
//! to be used here.

use image::DynamicImage;
use ndarray::Array4;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// CLIP normalization mean (per-channel, RGB).
const NORM_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];

/// CLIP normalization std (per-channel, RGB).
const NORM_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Preprocess an image for CLIP inference.
///
/// Resizes to `image_size × image_size`, converts to RGB, normalizes each
/// channel, and returns an NCHW tensor suitable for ONNX Runtime.
pub fn preprocess(image: &DynamicImage, image_size: u32) -> Array4<f32> {
    let resized = image.resize_exact(
        image_size,
        image_size,
        image::imageops::FilterType::Lanczos3,
    );
    let rgb = resized.to_rgb8();

    let size = image_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, CHANNELS, size, size));

    // Access raw RGB bytes and the tensor slice directly to avoid per-pixel
    // bounds-checking overhead from get_pixel() and 4D ndarray indexing.
    let raw = rgb.as_raw();
    let tensor_data = tensor.as_slice_mut().unwrap();
    for (i, pixel) in raw.chunks_exact(3).enumerate() {
        let y = i / size;
        let x = i % size;
        for (c, &val) in pixel.iter().enumerate() {
            // NCHW layout: offset = c * size * size + y * size + x
            let idx = c * size * size + y * size + x;
            tensor_data[idx] = (val as f32 / 255.0 - NORM_MEAN[c]) / NORM_STD[c];
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn test_preprocess_shape() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let tensor = preprocess(&img, 224);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_preprocess_resizes_any_aspect_ratio() {
        // A very wide image is squashed to square, not letterboxed.
        let img = DynamicImage::ImageRgb8(RgbImage::new(1000, 50));
        let tensor = preprocess(&img, 224);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_preprocess_normalization_per_channel() {
        // White image (255, 255, 255) -> (1.0 - mean[c]) / std[c] per channel
        let img =
            DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, image::Rgb([255, 255, 255])));
        let tensor = preprocess(&img, 224);
        for c in 0..3 {
            let expected = (1.0 - NORM_MEAN[c]) / NORM_STD[c];
            let got = tensor[[0, c, 0, 0]];
            assert!(
                (got - expected).abs() < 0.01,
                "channel {c}: got {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_preprocess_black_image() {
        // Black image (0, 0, 0) -> (0.0 - mean[c]) / std[c] per channel
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, image::Rgb([0, 0, 0])));
        let tensor = preprocess(&img, 224);
        for c in 0..3 {
            let expected = (0.0 - NORM_MEAN[c]) / NORM_STD[c];
            let got = tensor[[0, c, 0, 0]];
            assert!((got - expected).abs() < 0.01);
        }
    }
}
