//! Image saving utilities.

use std::path::Path;

use crate::error::{Error, Result};

use super::render::RenderTarget;

/// Save a rendered surface as an image file.
///
/// The format is inferred from the path extension. JPEG output honors
/// `quality` (1-100); other formats ignore it.
///
/// # Errors
///
/// Returns an error if the surface is empty or the image cannot be written.
pub fn save_surface<P: AsRef<Path>>(target: &RenderTarget, path: P, quality: u8) -> Result<()> {
    let path = path.as_ref();

    let (width, height) = target.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::Render { width, height });
    }

    // Determine format and save
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => {
            let mut output = std::fs::File::create(path)?;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
            target
                .surface()
                .write_with_encoder(encoder)
                .map_err(|source| Error::ImageSave {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        _ => {
            target.surface().save(path).map_err(|source| Error::ImageSave {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
