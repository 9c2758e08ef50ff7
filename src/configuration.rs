//! Sampling configuration.
//!
//! [`SamplingOptions`] is a builder carrying everything a
//! [`FrameSource`](crate::FrameSource) needs besides the input path: the time
//! window, the output format, and the per-frame transforms.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use framesplit::{ImageFormat, SamplingOptions};
//!
//! let options = SamplingOptions::new()
//!     .with_start(Duration::from_secs(5))
//!     .with_end(Duration::from_secs(15))
//!     .with_step(Duration::from_millis(250))
//!     .with_format(ImageFormat::Png)
//!     .with_grayscale(true);
//! assert_eq!(options.step, Duration::from_millis(250));
//! ```

use std::time::Duration;

use crate::grayscale::GrayscaleFormula;
use crate::image_format::ImageFormat;

/// Step used when none is configured: 40 ms, one frame at 25 fps.
pub const DEFAULT_STEP: Duration = Duration::from_millis(40);

/// Settings for one sampling run.
///
/// Defaults: start at zero, no end bound (the stream length applies), a
/// [`DEFAULT_STEP`] step, BMP output, no rotation, no grayscale.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct SamplingOptions {
    /// First sample position.
    pub start: Duration,
    /// Requested end of the window; clamped to the stream length.
    /// [`Duration::MAX`] means "until the end of the stream".
    pub end: Duration,
    /// Distance between consecutive samples. Must be non-zero.
    pub step: Duration,
    /// Output image format.
    pub format: ImageFormat,
    /// Rotate each frame by 180° and mirror it horizontally.
    pub rotate: bool,
    /// Convert each frame to gray.
    pub grayscale: bool,
    /// Weighting used when `grayscale` is set.
    pub grayscale_formula: GrayscaleFormula,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplingOptions {
    pub fn new() -> Self {
        Self {
            start: Duration::ZERO,
            end: Duration::MAX,
            step: DEFAULT_STEP,
            format: ImageFormat::default(),
            rotate: false,
            grayscale: false,
            grayscale_formula: GrayscaleFormula::default(),
        }
    }

    pub fn with_start(mut self, start: Duration) -> Self {
        self.start = start;
        self
    }

    pub fn with_end(mut self, end: Duration) -> Self {
        self.end = end;
        self
    }

    /// Set the sampling step. A zero step is rejected when the source is
    /// opened, not here.
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    /// Choose the gray weighting. Has no effect unless grayscale is enabled.
    pub fn with_grayscale_formula(mut self, formula: GrayscaleFormula) -> Self {
        self.grayscale_formula = formula;
        self
    }
}
