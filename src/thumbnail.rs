//! Embed a local image file as a `data:` URI for custom meals.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use thiserror::Error;

/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Failed to read image '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image '{}' is {} bytes, max is {} bytes", .path.display(), .size, MAX_IMAGE_BYTES)]
    TooLarge { path: PathBuf, size: u64 },

    #[error("Image '{path}' is not a supported format (jpeg, png, webp)")]
    UnsupportedFormat { path: PathBuf },
}

fn is_accepted(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP
    )
}

/// Encode raw image bytes as a data URI.
///
/// The format is detected from the content, not from a file extension.
/// Returns `None` for anything other than JPEG, PNG or WebP.
pub fn encode_data_uri(bytes: &[u8]) -> Option<String> {
    let format = image::guess_format(bytes).ok()?;
    if !is_accepted(format) {
        return None;
    }
    Some(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

/// Read, check and encode an image file.
pub fn load_image(path: &Path) -> Result<String, ThumbnailError> {
    let read_error = |source| ThumbnailError::ReadError {
        path: path.to_path_buf(),
        source,
    };

    let size = fs::metadata(path).map_err(read_error)?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(ThumbnailError::TooLarge {
            path: path.to_path_buf(),
            size,
        });
    }

    let bytes = fs::read(path).map_err(read_error)?;
    let uri = encode_data_uri(&bytes).ok_or_else(|| ThumbnailError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    tracing::debug!(path = %path.display(), bytes = size, "Embedded thumbnail");
    Ok(uri)
}
