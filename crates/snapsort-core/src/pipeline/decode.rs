//! Image decoding with format detection.

use image::DynamicImage;
use std::path::Path;

use crate::error::ItemError;

/// Decode an image file, detecting the format from content.
///
/// Runs synchronously inside the worker; decode is one of the pipeline's
/// deliberate blocking points.
pub fn decode(path: &Path) -> Result<DynamicImage, ItemError> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| ItemError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot open image: {e}"),
        })?
        .with_guessed_format()
        .map_err(|e| ItemError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {e}"),
        })?;

    reader.decode().map_err(|e| ItemError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, RgbImage};

    #[test]
    fn test_decode_valid_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        RgbImage::new(4, 4).save(&path).unwrap();

        let img = decode(&path).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 4);
    }

    #[test]
    fn test_decode_detects_format_by_content() {
        // A PNG saved under a .jpg name still decodes.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("misnamed.jpg");
        RgbImage::new(4, 4)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        assert!(decode(&path).is_ok());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"this is not an image").unwrap();

        let result = decode(&path);
        assert!(matches!(result, Err(ItemError::Decode { .. })));
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(ItemError::Decode { .. })));
    }
}
