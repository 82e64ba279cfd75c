//! Model loading and inference.

#[cfg(feature = "onnx")]
mod loader;
#[cfg(feature = "onnx")]
mod onnx;

#[cfg(feature = "onnx")]
pub use loader::{ModelCache, MODEL_FILENAME};
#[cfg(feature = "onnx")]
pub use onnx::{load_model, ModelHandle, OnnxModel, INPUT_KEY};

use crate::error::Result;
use crate::image::Tensor4;

/// A cartoonization generator: one forward pass over a square NHWC tensor.
///
/// Implementations own whatever runtime state the backend needs. The input
/// and output tensors share the same (1, S, S, 3) shape, where S is
/// [`input_size`](CartoonModel::input_size); one deployment uses exactly one
/// S for every image.
pub trait CartoonModel {
    /// Square side length S the generator accepts.
    fn input_size(&self) -> u32;

    /// Run one forward pass, consuming the input tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is not ready, the input shape is
    /// wrong, or inference itself fails.
    fn run(&mut self, input: Tensor4) -> Result<Tensor4>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::CartoonModel;
    use crate::error::{Error, Result};
    use crate::image::Tensor4;

    /// Backend double that returns its input unchanged and counts calls.
    pub(crate) struct IdentityModel {
        size: u32,
        pub(crate) calls: usize,
    }

    impl IdentityModel {
        pub(crate) fn new(size: u32) -> Self {
            Self { size, calls: 0 }
        }
    }

    impl CartoonModel for IdentityModel {
        fn input_size(&self) -> u32 {
            self.size
        }

        fn run(&mut self, input: Tensor4) -> Result<Tensor4> {
            self.calls += 1;
            Ok(input)
        }
    }

    /// Backend double that always fails.
    pub(crate) struct FailingModel {
        size: u32,
    }

    impl FailingModel {
        pub(crate) fn new(size: u32) -> Self {
            Self { size }
        }
    }

    impl CartoonModel for FailingModel {
        fn input_size(&self) -> u32 {
            self.size
        }

        fn run(&mut self, _input: Tensor4) -> Result<Tensor4> {
            Err(Error::ShapeMismatch {
                expected: "a working backend".to_string(),
                actual: "simulated failure".to_string(),
            })
        }
    }
}
