//! Cartoonization orchestration and run state.

use std::time::Instant;

use image::RgbImage;

use crate::error::{Error, Result};
use crate::image::{decode_image, render_and_scale, RenderTarget, MODEL_SIZE};
use crate::model::CartoonModel;

use super::postprocess::postprocess;
use super::preprocess::preprocess;

/// Configuration for the cartoonization pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Square side length the generator accepts. One deployment uses exactly
    /// one value; the attached model must agree.
    pub model_size: u32,

    /// Output JPEG quality (1-100), used when exporting the rendered surface.
    pub output_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_size: MODEL_SIZE,
            output_quality: 95,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.model_size == 0 {
            return Err(Error::InvalidParameter {
                name: "model_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if !(1..=100).contains(&self.output_quality) {
            return Err(Error::InvalidParameter {
                name: "output_quality".to_string(),
                reason: "must be between 1 and 100".to_string(),
            });
        }

        Ok(())
    }
}

/// Run state of a [`Cartoonizer`], advanced by [`select_file`] and
/// [`cartoonize`].
///
/// [`select_file`]: Cartoonizer::select_file
/// [`cartoonize`]: Cartoonizer::cartoonize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No run in flight. An image may or may not be selected.
    Idle,
    /// A selected file is being decoded.
    Loading,
    /// The pipeline is preprocessing and running inference.
    Predicting,
    /// The result is being drawn into the caller's target.
    Rendering,
    /// The last run completed; the target holds the result.
    Done,
    /// The last run failed; the reason is retained until the next selection.
    Error,
}

/// Orchestrates cartoonization runs over an attached generator.
///
/// At most one run is in flight at a time. Stage failures do not propagate:
/// they park the machine in [`State::Error`] with the reason retained, and a
/// new file selection restarts at [`State::Idle`].
pub struct Cartoonizer<M> {
    config: Config,
    model: Option<M>,
    image: Option<RgbImage>,
    state: State,
    error: Option<Error>,
}

impl<M: CartoonModel> Cartoonizer<M> {
    /// Create a cartoonizer with no model attached yet.
    ///
    /// Triggering a run before [`attach_model`] parks the machine in
    /// [`State::Error`] with [`Error::ModelNotReady`].
    ///
    /// [`attach_model`]: Cartoonizer::attach_model
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            model: None,
            image: None,
            state: State::Idle,
            error: None,
        })
    }

    /// Create a cartoonizer with a ready model.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_model(config: Config, model: M) -> Result<Self> {
        let mut cartoonizer = Self::new(config)?;
        cartoonizer.model = Some(model);
        Ok(cartoonizer)
    }

    /// Attach the model once its load and warm-up complete.
    pub fn attach_model(&mut self, model: M) {
        self.model = Some(model);
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Why the machine is in [`State::Error`], if it is.
    #[must_use]
    pub fn error_reason(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Whether an image is selected and decoded.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Pipeline configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Select a new photograph from raw file bytes.
    ///
    /// Restarts the machine: the previous image, result state, and retained
    /// error are discarded. On decode success the machine settles back in
    /// [`State::Idle`] with the image held for the next trigger; on failure
    /// it parks in [`State::Error`].
    pub fn select_file(&mut self, bytes: &[u8]) {
        self.image = None;
        self.error = None;
        self.state = State::Loading;

        match decode_image(bytes) {
            Ok(image) => {
                tracing::info!("Decoded image {}x{}", image.width(), image.height());
                self.image = Some(image);
                self.state = State::Idle;
            }
            Err(err) => {
                tracing::error!("Image decode failed: {err}");
                self.error = Some(err);
                self.state = State::Error;
            }
        }
    }

    /// Run the pipeline on the selected image, rendering into `target`.
    ///
    /// The trigger is honored only when no run is in flight and an image is
    /// selected; otherwise it is ignored. On success the machine lands in
    /// [`State::Done`] and `target` holds the cartoonized result stretched
    /// to the display size (the selected image's dimensions unless `target`
    /// requests its own).
    pub fn cartoonize(&mut self, target: &mut RenderTarget) {
        if !matches!(self.state, State::Idle | State::Done | State::Error) {
            tracing::debug!("Cartoonize trigger ignored: run in flight ({:?})", self.state);
            return;
        }

        let Some(image) = self.image.take() else {
            tracing::debug!("Cartoonize trigger ignored: no image selected");
            return;
        };

        self.error = None;
        self.state = State::Predicting;

        let outcome = self.run(&image, target);

        // The image survives the run so a later trigger can reuse it.
        self.image = Some(image);

        match outcome {
            Ok(()) => {
                self.state = State::Done;
                tracing::info!("Cartoonize complete");
            }
            Err(err) => {
                tracing::error!("Cartoonize failed: {err}");
                self.error = Some(err);
                self.state = State::Error;
            }
        }
    }

    fn run(&mut self, image: &RgbImage, target: &mut RenderTarget) -> Result<()> {
        let model = self.model.as_mut().ok_or(Error::ModelNotReady)?;
        let size = model.input_size();

        let input = preprocess(image, size);

        tracing::info!("Running inference...");
        let start = Instant::now();
        let raw = model.run(input)?;
        tracing::debug!("Inference took {:.1}s", start.elapsed().as_secs_f32());

        let cropped = postprocess(raw, image.dimensions(), size)?;

        self.state = State::Rendering;
        let (display_width, display_height) = target
            .display_size()
            .unwrap_or_else(|| image.dimensions());
        render_and_scale(&cropped, target, display_width, display_height)
    }
}
