//! Image decoding utilities.

use std::path::Path;

use image::RgbImage;

use crate::error::{Error, Result};

/// Decode an image from raw file bytes, as handed over by a file selector.
///
/// The container format is sniffed from the bytes. The decoded image is
/// converted to RGB; alpha channels are dropped.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a decodable image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(bytes).map_err(|source| Error::Decode { source })?;
    Ok(img.to_rgb8())
}

/// Load an image from disk and convert it to RGB.
///
/// # Errors
///
/// Returns [`Error::ImageRead`] if the file cannot be read or decoded.
pub fn open_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(img.to_rgb8())
}
