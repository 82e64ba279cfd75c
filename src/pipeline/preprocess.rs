//! Image preprocessing ahead of inference.

use image::{imageops, imageops::FilterType, RgbImage};
use ndarray::Array4;

use crate::geometry::{compute_padding, Axis};
use crate::image::{Tensor4, RGB_CHANNELS};

/// Convert a decoded image into the normalized NHWC tensor the generator
/// accepts.
///
/// The image is:
/// 1. Zero-padded on the shorter axis to a square (padding on the leading
///    side: top for height, left for width)
/// 2. Resized to `model_size` x `model_size` with bilinear filtering
/// 3. Normalized from [0, 255] to [-1, 1]
/// 4. Returned as an NHWC tensor (1, `model_size`, `model_size`, 3)
///
/// Callers guarantee a non-empty image.
pub fn preprocess(image: &RgbImage, model_size: u32) -> Tensor4 {
    let (width, height) = image.dimensions();
    let side = width.max(height);
    let pad = compute_padding(width, height);

    // Crop-back later removes the same leading rows or columns.
    let (x0, y0) = match pad.axis {
        Axis::Width => (pad.amount, 0),
        Axis::Height => (0, pad.amount),
    };
    let mut square = RgbImage::new(side, side);
    imageops::replace(&mut square, image, i64::from(x0), i64::from(y0));

    let resized = imageops::resize(&square, model_size, model_size, FilterType::Triangle);

    let size = model_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, size, size, RGB_CHANNELS));

    for (x, y, pixel) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        // Normalize from [0, 255] to [-1, 1]
        tensor[[0, y, x, 0]] = (f32::from(pixel[0]) - 127.5) / 127.5;
        tensor[[0, y, x, 1]] = (f32::from(pixel[1]) - 127.5) / 127.5;
        tensor[[0, y, x, 2]] = (f32::from(pixel[2]) - 127.5) / 127.5;
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid_image(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    #[test]
    fn test_tensor_shape() {
        let tensor = preprocess(&solid_image(400, 300, 0), 256);
        assert_eq!(tensor.shape(), &[1, 256, 256, 3]);
    }

    #[test]
    fn test_normalization_range() {
        let tensor = preprocess(&solid_image(100, 100, 0), 64);

        let min = tensor.iter().copied().fold(f32::INFINITY, f32::min);
        let max = tensor.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        // Black image should be all -1.0
        assert!((min - (-1.0)).abs() < 0.01);
        assert!((max - (-1.0)).abs() < 0.01);
    }

    #[test]
    fn test_white_maps_to_one() {
        let tensor = preprocess(&solid_image(32, 32, 255), 32);
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_landscape_padding_fills_top() {
        // 4x2 white image squares to 4x4 with two black rows on top.
        let tensor = preprocess(&solid_image(4, 2, 255), 4);

        assert!(tensor[[0, 0, 0, 0]] < -0.9);
        assert!(tensor[[0, 1, 3, 0]] < -0.9);
        assert!(tensor[[0, 2, 0, 0]] > 0.9);
        assert!(tensor[[0, 3, 3, 0]] > 0.9);
    }

    #[test]
    fn test_portrait_padding_fills_left() {
        // 2x4 white image squares to 4x4 with two black columns on the left.
        let tensor = preprocess(&solid_image(2, 4, 255), 4);

        assert!(tensor[[0, 0, 0, 0]] < -0.9);
        assert!(tensor[[0, 3, 1, 0]] < -0.9);
        assert!(tensor[[0, 0, 2, 0]] > 0.9);
        assert!(tensor[[0, 3, 3, 0]] > 0.9);
    }

    #[test]
    fn test_square_image_is_not_padded() {
        let tensor = preprocess(&solid_image(50, 50, 255), 50);

        let min = tensor.iter().copied().fold(f32::INFINITY, f32::min);
        assert!(min > 0.9);
    }
}
