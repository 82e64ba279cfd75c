//! Square-padding and crop-back arithmetic.
//!
//! The generator only accepts square inputs, so non-square photographs are
//! zero-padded on one axis before resizing, and the rows or columns that
//! correspond to that padding are sliced off the square output afterwards.
//! Everything here is integer arithmetic on widths and heights; no pixels
//! are touched.

/// Image axis a padding or cropping amount applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

/// How much one axis must grow for an image to become square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingSpec {
    pub axis: Axis,
    pub amount: u32,
}

/// How many rows or columns of the square model output correspond to padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSpec {
    pub axis: Axis,
    pub amount: u32,
}

/// Compute the padding needed to square a `width` x `height` image.
///
/// Wider-than-tall images pad the height axis, taller-than-wide images pad
/// the width axis. A square image needs no padding and reports an amount of
/// zero. Padding is always placed on the leading side of the padded axis
/// (top for height, left for width).
#[must_use]
pub fn compute_padding(width: u32, height: u32) -> PaddingSpec {
    if width > height {
        PaddingSpec {
            axis: Axis::Height,
            amount: width - height,
        }
    } else {
        PaddingSpec {
            axis: Axis::Width,
            amount: height - width,
        }
    }
}

/// Compute how many leading rows or columns of the `model_size`-sided square
/// output correspond to the padding added by [`compute_padding`].
///
/// The amount is `round(|width - height| / max(width, height) * model_size)`
/// with ties rounding away from zero. The integer rounding means the cropped
/// output approximates the original aspect ratio rather than matching it
/// exactly.
///
/// Callers guarantee `width > 0` and `height > 0`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_crop_back(width: u32, height: u32, model_size: u32) -> CropSpec {
    let longer = width.max(height);
    let ratio = f64::from(width.abs_diff(height)) / f64::from(longer);
    // Safe: ratio is in [0, 1], so the product never exceeds model_size
    let amount = (ratio * f64::from(model_size)).round() as u32;
    let axis = if width > height {
        Axis::Height
    } else {
        Axis::Width
    };
    CropSpec { axis, amount }
}
