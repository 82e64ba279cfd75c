//! CartoonGAN image-to-image pipeline.

mod cartoonize;
mod postprocess;
mod preprocess;

pub use cartoonize::{Cartoonizer, Config, State};
pub use postprocess::postprocess;
pub use preprocess::preprocess;
