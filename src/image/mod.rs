//! Image loading, rendering, and saving utilities.

mod load;
mod render;
mod save;

pub use load::{decode_image, open_image};
pub use render::{render_and_scale, RenderTarget};
pub use save::save_surface;

use ndarray::{Array3, Array4};

/// Model-facing image tensor in NHWC format (batch, height, width, channels).
/// Values are normalized to the [-1, 1] range the generator was trained on.
pub type Tensor4 = Array4<f32>;

/// Display-facing image tensor in HWC format (height, width, channels).
/// Values are in the [0, 1] range.
pub type Tensor3 = Array3<f32>;

/// Square input side length of the deployed CartoonGAN export.
pub const MODEL_SIZE: u32 = 300;

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;
