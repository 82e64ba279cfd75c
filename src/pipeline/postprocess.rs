//! Model output postprocessing.

use ndarray::s;

use crate::error::{Error, Result};
use crate::geometry::{compute_crop_back, Axis};
use crate::image::{Tensor3, Tensor4, RGB_CHANNELS};

/// Turn a raw generator output back into a display-ready HWC tensor.
///
/// The output is:
/// 1. Validated against the expected (1, `model_size`, `model_size`, 3) shape
///    and squeezed to drop the batch dimension
/// 2. Denormalized from [-1, 1] to [0, 1], clipping out-of-range values
/// 3. Cropped back: the leading rows or columns that correspond to the
///    padding added during preprocessing are sliced off
///
/// `original` is the (width, height) of the image the run started from.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the output shape is not the expected
/// square NHWC shape.
pub fn postprocess(raw: Tensor4, original: (u32, u32), model_size: u32) -> Result<Tensor3> {
    let size = model_size as usize;
    let expected = [1, size, size, RGB_CHANNELS];
    if raw.shape() != &expected {
        return Err(Error::ShapeMismatch {
            expected: format!("{expected:?}"),
            actual: format!("{:?}", raw.shape()),
        });
    }

    let squeezed = raw.index_axis_move(ndarray::Axis(0), 0);
    // Denormalize from [-1, 1] to [0, 1] and clip stray values
    let denormalized = squeezed.mapv_into(|value| ((value + 1.0) / 2.0).clamp(0.0, 1.0));

    let (width, height) = original;
    let crop = compute_crop_back(width, height, model_size);
    let amount = crop.amount as usize;
    let cropped = match crop.axis {
        Axis::Height => denormalized.slice_move(s![amount.., .., ..]),
        Axis::Width => denormalized.slice_move(s![.., amount.., ..]),
    };

    Ok(cropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::preprocess::preprocess;
    use image::{Rgb, RgbImage};
    use ndarray::Array4;

    #[test]
    fn test_denormalize_bounds() {
        let raw = Array4::from_elem((1, 4, 4, 3), -1.0);
        let out = postprocess(raw, (4, 4), 4).unwrap();
        assert!((out[[0, 0, 0]] - 0.0).abs() < 1e-6);

        let raw = Array4::from_elem((1, 4, 4, 3), 1.0);
        let out = postprocess(raw, (4, 4), 4).unwrap();
        assert!((out[[0, 0, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_values_are_clipped() {
        let raw = Array4::from_elem((1, 4, 4, 3), 3.5);
        let out = postprocess(raw, (4, 4), 4).unwrap();
        assert!((out[[0, 0, 0]] - 1.0).abs() < 1e-6);

        let raw = Array4::from_elem((1, 4, 4, 3), -7.0);
        let out = postprocess(raw, (4, 4), 4).unwrap();
        assert!((out[[0, 0, 0]] - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_crop_back_shape_landscape() {
        // 400x300 at model size 256 crops 64 leading rows off.
        let raw = Array4::<f32>::zeros((1, 256, 256, 3));
        let out = postprocess(raw, (400, 300), 256).unwrap();
        assert_eq!(out.shape(), &[192, 256, 3]);
    }

    #[test]
    fn test_crop_back_shape_portrait() {
        let raw = Array4::<f32>::zeros((1, 256, 256, 3));
        let out = postprocess(raw, (300, 400), 256).unwrap();
        assert_eq!(out.shape(), &[256, 192, 3]);
    }

    #[test]
    fn test_crop_back_removes_leading_rows() {
        // Mark each row with a distinct value so the surviving rows are
        // identifiable after denormalization.
        let mut raw = Array4::<f32>::zeros((1, 8, 8, 3));
        for row in 0..8 {
            for col in 0..8 {
                for ch in 0..3 {
                    raw[[0, row, col, ch]] = row as f32 / 10.0;
                }
            }
        }
        // 8x6 pads 2 rows; crop amount is round(2 / 8 * 8) = 2.
        let out = postprocess(raw, (8, 6), 8).unwrap();
        assert_eq!(out.shape(), &[6, 8, 3]);
        // Row 0 of the output was row 2 of the raw tensor: (0.2 + 1) / 2.
        assert!((out[[0, 0, 0]] - 0.6).abs() < 1e-6);
        // Last row was row 7: (0.7 + 1) / 2.
        assert!((out[[5, 7, 2]] - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let raw = Array4::<f32>::zeros((1, 4, 4, 3));
        let result = postprocess(raw, (8, 8), 8);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_round_trip_inverts_padding() {
        // A white landscape image comes back all white: the padded black rows
        // are exactly the ones cropped off.
        let image = RgbImage::from_pixel(4, 2, Rgb([255, 255, 255]));
        let tensor = preprocess(&image, 4);
        let out = postprocess(tensor, (4, 2), 4).unwrap();

        assert_eq!(out.shape(), &[2, 4, 3]);
        let min = out.iter().copied().fold(f32::INFINITY, f32::min);
        assert!(min > 0.98);
    }
}
