//! ONNX Runtime backend for the CartoonGAN generator.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use ndarray::Array4;
use once_cell::sync::OnceCell;
use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};
use crate::image::{Tensor4, RGB_CHANNELS};

use super::CartoonModel;

/// Graph input name fixed by the CartoonGAN export.
pub const INPUT_KEY: &str = "input_photo:0";

static LOADED: OnceCell<ModelHandle> = OnceCell::new();

/// ONNX session wrapper around the generator network.
///
/// A freshly loaded session refuses inference until [`warm_up`] has run;
/// the first forward pass pays one-time graph initialization costs that
/// should not land on a user image.
///
/// [`warm_up`]: OnnxModel::warm_up
pub struct OnnxModel {
    session: Session,
    input_size: u32,
    warmed_up: bool,
}

impl OnnxModel {
    /// Load the serialized graph at `path` without warming it up.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created from the file.
    pub fn load<P: AsRef<Path>>(path: P, input_size: u32) -> Result<Self> {
        let path = path.as_ref();

        let session = Session::builder()
            .map_err(|source| Error::ModelLoad {
                path: path.to_path_buf(),
                source,
            })?
            .commit_from_file(path)
            .map_err(|source| Error::ModelLoad {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!("Loaded model from {}", path.display());

        Ok(Self {
            session,
            input_size,
            warmed_up: false,
        })
    }

    /// Run one throwaway forward pass over an all-zeros tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if the warm-up pass fails, which usually means the
    /// configured input size does not match the exported graph.
    pub fn warm_up(&mut self) -> Result<()> {
        let size = self.input_size as usize;
        let zeros = Array4::<f32>::zeros((1, size, size, RGB_CHANNELS));

        let start = Instant::now();
        self.forward(zeros)?;
        self.warmed_up = true;
        tracing::debug!("Warm-up pass took {:.1}s", start.elapsed().as_secs_f32());

        Ok(())
    }

    fn forward(&mut self, input: Tensor4) -> Result<Tensor4> {
        let size = self.input_size as usize;

        let input_value =
            Tensor::from_array(input).map_err(|source| Error::Inference { source })?;

        let outputs = self
            .session
            .run(ort::inputs![INPUT_KEY => input_value])
            .map_err(|source| Error::Inference { source })?;

        // Get first output
        let output = outputs
            .values()
            .next()
            .ok_or_else(|| Error::ShapeMismatch {
                expected: expected_shape(size),
                actual: "no output".to_string(),
            })?;

        extract_output(&output, size)
    }
}

impl CartoonModel for OnnxModel {
    fn input_size(&self) -> u32 {
        self.input_size
    }

    fn run(&mut self, input: Tensor4) -> Result<Tensor4> {
        if !self.warmed_up {
            return Err(Error::ModelNotReady);
        }

        let size = self.input_size as usize;
        let expected = [1, size, size, RGB_CHANNELS];
        if input.shape() != &expected {
            return Err(Error::ShapeMismatch {
                expected: format!("{expected:?}"),
                actual: format!("{:?}", input.shape()),
            });
        }

        self.forward(input)
    }
}

/// Cheaply cloneable handle to the process-wide generator.
#[derive(Clone)]
pub struct ModelHandle {
    inner: Arc<Mutex<OnnxModel>>,
}

impl ModelHandle {
    fn lock(&self) -> MutexGuard<'_, OnnxModel> {
        // A panicked holder leaves no partial state worth rejecting; the
        // session itself stays usable.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl CartoonModel for ModelHandle {
    fn input_size(&self) -> u32 {
        self.lock().input_size()
    }

    fn run(&mut self, input: Tensor4) -> Result<Tensor4> {
        self.lock().run(input)
    }
}

/// Load and warm up the process-wide generator, once.
///
/// The first successful call creates the session, runs the warm-up pass, and
/// caches the handle; later calls return a clone of the same handle and do
/// not touch the file system again. A failed load is not cached, so callers
/// may retry.
///
/// # Errors
///
/// Returns an error if the session cannot be created or the warm-up pass
/// fails.
pub fn load_model<P: AsRef<Path>>(path: P, input_size: u32) -> Result<ModelHandle> {
    LOADED
        .get_or_try_init(|| {
            let mut model = OnnxModel::load(path.as_ref(), input_size)?;
            model.warm_up()?;
            Ok(ModelHandle {
                inner: Arc::new(Mutex::new(model)),
            })
        })
        .cloned()
}

fn expected_shape(size: usize) -> String {
    format!("[1, {size}, {size}, 3] or [{size}, {size}, 3]")
}

/// Extract the generator output from an ONNX value.
///
/// Some exports emit the batched (1, S, S, 3) shape and some emit the
/// squeezed (S, S, 3) shape; both are accepted and returned batched.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn extract_output(value: &ort::value::ValueRef<'_>, size: usize) -> Result<Tensor4> {
    let (shape_info, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|source| Error::Inference { source })?;

    // Safe: tensor dimensions are always non-negative and within bounds
    let dims: Vec<usize> = shape_info.iter().map(|&x| x as usize).collect();

    match dims.as_slice() {
        [1, h, w, c] | [h, w, c] if *h == size && *w == size && *c == RGB_CHANNELS => {}
        _ => {
            return Err(Error::ShapeMismatch {
                expected: expected_shape(size),
                actual: format!("{dims:?}"),
            })
        }
    }

    Array4::from_shape_vec((1, size, size, RGB_CHANNELS), data.to_vec()).map_err(|_| {
        Error::ShapeMismatch {
            expected: expected_shape(size),
            actual: "reshape failed".to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_not_cached() {
        // A failed load must not poison the process-wide cell.
        assert!(load_model("/nonexistent/cartoongan.onnx", 300).is_err());
        assert!(load_model("/nonexistent/cartoongan.onnx", 300).is_err());
    }
}
