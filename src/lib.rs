//! # Cartoonizer
//!
//! A library for stylizing photographs with a pretrained `CartoonGAN`
//! generator served through ONNX Runtime.
//!
//! The pipeline squares the photograph with leading-edge zero padding,
//! resizes it to the generator's fixed input size, normalizes it to [-1, 1],
//! runs one forward pass, then denormalizes, crops the padding back off, and
//! stretches the result to the display size. A small state machine drives the
//! whole run so a UI can observe progress and failures without callbacks.
//!
//! ## Example
//!
//! ```no_run
//! use cartoonizer::{save_surface, Cartoonizer, Config, RenderTarget, MODEL_SIZE};
//!
//! # #[cfg(feature = "onnx")]
//! # fn main() -> cartoonizer::Result<()> {
//! let model = cartoonizer::model::load_model("models/cartoongan.onnx", MODEL_SIZE)?;
//! let mut cartoonizer = Cartoonizer::with_model(Config::default(), model)?;
//!
//! cartoonizer.select_file(&std::fs::read("photo.jpg")?);
//!
//! let mut target = RenderTarget::new();
//! cartoonizer.cartoonize(&mut target);
//! save_surface(&target, "cartoon.jpg", 95)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "onnx"))]
//! # fn main() {}
//! ```

pub mod error;
pub mod geometry;
pub mod image;
pub mod model;
pub mod pipeline;

pub use error::{Error, Result};
pub use geometry::{compute_crop_back, compute_padding, Axis, CropSpec, PaddingSpec};
pub use image::{
    decode_image, open_image, render_and_scale, save_surface, RenderTarget, Tensor3, Tensor4,
    MODEL_SIZE, RGB_CHANNELS,
};
pub use model::CartoonModel;
pub use pipeline::{postprocess, preprocess, Cartoonizer, Config, State};
