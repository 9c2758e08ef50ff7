//! # framesplit
//!
//! Sample still frames from a video file at a fixed time cadence and emit
//! each one as an encoded image, optionally flipped and converted to gray.
//!
//! Decoding is done by FFmpeg through the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; image
//! encoding by the [`image`] crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use framesplit::{FrameSource, ImageFormat, SamplingOptions};
//!
//! let options = SamplingOptions::new()
//!     .with_start(Duration::from_secs(10))
//!     .with_end(Duration::from_secs(20))
//!     .with_step(Duration::from_millis(500))
//!     .with_format(ImageFormat::Jpg)
//!     .with_grayscale(true);
//!
//! let source = FrameSource::open("input.wmv", options)?;
//! for frame in source.frames() {
//!     let frame = frame?;
//!     std::fs::write(format!("{:06}.jpg", frame.index + 1), &frame.bytes)?;
//! }
//! # Ok::<(), framesplit::FrameSplitError>(())
//! ```
//!
//! ## Pieces
//!
//! - [`SamplingWindow`]: time window + step → frame count and positions
//! - [`FrameDecoder`]: probe / open / sample seam, [`FfmpegDecoder`] backend
//! - [`LookupTable`]: precomputed RGB → gray mapping
//! - [`FrameSource`]: the pull-based state machine tying them together
//! - [`batch`]: recursive grayscale conversion of bitmap directories
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on the system.

pub mod batch;
pub mod configuration;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod ffmpeg;
pub mod grayscale;
pub mod image_format;
pub mod metadata;
pub mod pixel;
pub mod sampling;
pub mod source;
pub mod timecode;
mod utilities;

pub use configuration::{DEFAULT_STEP, SamplingOptions};
pub use decoder::{FfmpegDecoder, FfmpegSession, FrameDecoder, SamplingSession};
pub use error::FrameSplitError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use grayscale::{GrayscaleFormula, LookupTable};
pub use image_format::ImageFormat;
pub use metadata::StreamMetadata;
pub use pixel::PixelBuffer;
pub use sampling::SamplingWindow;
pub use source::{EncodedFrame, FrameSource, FrameSourceState, Frames};
