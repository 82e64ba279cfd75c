//! Rendering model output into a pixel surface.

use image::{imageops, imageops::FilterType, Rgb, RgbImage};

use crate::error::{Error, Result};

use super::Tensor3;

/// Pixel surface the cartoonized result is drawn into.
///
/// The surface plays the role of an on-screen canvas: rendering replaces its
/// contents and resizes it to the requested display size. An optional display
/// size override lets a UI ask for its own on-screen dimensions; without one,
/// rendering falls back to the dimensions of the selected image.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    surface: RgbImage,
    display_size: Option<(u32, u32)>,
}

impl RenderTarget {
    /// Create an empty target with no display size override.
    #[must_use]
    pub fn new() -> Self {
        Self {
            surface: RgbImage::new(0, 0),
            display_size: None,
        }
    }

    /// Request a display size for subsequent renders.
    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display_size = Some((width, height));
    }

    /// The requested display size, if one was set.
    #[must_use]
    pub fn display_size(&self) -> Option<(u32, u32)> {
        self.display_size
    }

    /// The rendered pixels.
    #[must_use]
    pub fn surface(&self) -> &RgbImage {
        &self.surface
    }

    /// Current surface dimensions.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    /// Consume the target, returning the rendered pixels.
    #[must_use]
    pub fn into_surface(self) -> RgbImage {
        self.surface
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a display-ready HWC tensor into `target`, stretched to the
/// requested display size.
///
/// The render happens in two phases, like a canvas redraw:
/// 1. The tensor is drawn at its native post-crop resolution
/// 2. The surface is snapshotted, resized to `display_width` x
///    `display_height`, and redrawn stretched with bilinear filtering
///
/// # Errors
///
/// Returns [`Error::Render`] if the tensor or the requested display size is
/// zero-sized.
pub fn render_and_scale(
    cropped: &Tensor3,
    target: &mut RenderTarget,
    display_width: u32,
    display_height: u32,
) -> Result<()> {
    if display_width == 0 || display_height == 0 {
        return Err(Error::Render {
            width: display_width,
            height: display_height,
        });
    }

    let (rows, cols) = (cropped.shape()[0], cropped.shape()[1]);
    if rows == 0 || cols == 0 {
        return Err(Error::Render {
            width: u32::try_from(cols).unwrap_or(0),
            height: u32::try_from(rows).unwrap_or(0),
        });
    }

    // Phase 1: draw at native post-crop resolution.
    target.surface = tensor_to_surface(cropped);

    // Phase 2: snapshot and redraw stretched to the display size.
    let snapshot = std::mem::replace(&mut target.surface, RgbImage::new(0, 0));
    target.surface = imageops::resize(
        &snapshot,
        display_width,
        display_height,
        FilterType::Triangle,
    );

    Ok(())
}

/// Convert a [0, 1] HWC tensor to an RGB image.
#[allow(clippy::cast_possible_truncation)]
fn tensor_to_surface(tensor: &Tensor3) -> RgbImage {
    let (rows, cols) = (tensor.shape()[0], tensor.shape()[1]);

    // Safe: post-crop tensors never exceed the model size
    let mut img = RgbImage::new(cols as u32, rows as u32);

    for y in 0..rows {
        for x in 0..cols {
            let r = to_sample(tensor[[y, x, 0]]);
            let g = to_sample(tensor[[y, x, 1]]);
            let b = to_sample(tensor[[y, x, 2]]);

            img.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
        }
    }

    img
}

/// Scale a value from [0, 1] to [0, 255] with rounding and clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_sample(value: f32) -> u8 {
    // Safe: clamped to [0, 255] range before casting
    let scaled = (value * 255.0).round();
    scaled.clamp(0.0, 255.0) as u8
}
