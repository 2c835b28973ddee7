//! Filesystem-backed image codec.
//!
//! Decodes a stored upload into an in-memory raster and encodes filter
//! output back to disk as JPEG. Encoding overwrites any existing file at the
//! target path, which keeps re-delivered jobs idempotent.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};

/// Decode the image file at `path` into an RGB raster.
pub fn decode(path: &Path) -> Result<RgbImage, CodecError> {
    let bytes = std::fs::read(path).map_err(|source| CodecError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|source| CodecError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    Ok(decoded.to_rgb8())
}

/// Encode `output` as JPEG at `path`, overwriting an existing file.
pub fn encode(output: &DynamicImage, path: &Path) -> Result<(), CodecError> {
    if output.width() == 0 || output.height() == 0 {
        return Err(CodecError::EmptyRaster);
    }

    output
        .save_with_format(path, ImageFormat::Jpeg)
        .map_err(|source| CodecError::Encode {
            path: path.display().to_string(),
            source,
        })
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: String,
        source: image::ImageError,
    },

    #[error("refusing to encode an empty raster")]
    EmptyRaster,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn decode_missing_file_is_read_error() {
        let err = decode(Path::new("/nonexistent/dir/cat.png")).unwrap_err();
        assert!(matches!(err, CodecError::Read { .. }));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"definitely not pixels").unwrap();

        let err = decode(&path).unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }

    #[test]
    fn decode_zero_byte_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();

        let err = decode(&path).unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }

    #[test]
    fn encode_decode_round_trip_preserves_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let raster = RgbImage::from_pixel(100, 100, Rgb([10, 200, 30]));

        encode(&DynamicImage::ImageRgb8(raster), &path).unwrap();
        let back = decode(&path).unwrap();
        assert_eq!(back.dimensions(), (100, 100));
    }

    #[test]
    fn encode_is_byte_stable_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let raster = DynamicImage::ImageRgb8(RgbImage::from_fn(32, 32, |x, y| {
            Rgb([x as u8 * 8, y as u8 * 8, 128])
        }));

        encode(&raster, &path).unwrap();
        let first = std::fs::read(&path).unwrap();

        encode(&raster, &path).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn encode_empty_raster_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty-out.jpg");
        let raster = DynamicImage::ImageRgb8(RgbImage::new(0, 0));

        let err = encode(&raster, &path).unwrap_err();
        assert!(matches!(err, CodecError::EmptyRaster));
        assert!(!path.exists());
    }
}
