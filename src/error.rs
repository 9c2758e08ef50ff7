//! Error types for the `framesplit` crate.
//!
//! This module defines [`FrameSplitError`], the unified error type returned by
//! all fallible operations in the crate. Configuration and stream-discovery
//! failures surface when a [`FrameSource`](crate::FrameSource) is opened;
//! decode and encode failures surface per frame.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framesplit` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrameSplitError {
    /// The sampling configuration is unusable (zero step, malformed time
    /// value, unknown image format).
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the decoder.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// None of the file's streams is a video stream.
    #[error("No video stream found in {path}")]
    NoVideoStream {
        /// Path of the probed file.
        path: PathBuf,
    },

    /// Sampling a frame at a computed position failed.
    #[error("Failed to decode video frame: {0}")]
    Decode(String),

    /// A sampled frame could not be encoded to the requested image format.
    #[error("Failed to encode frame: {0}")]
    Encode(String),

    /// A frame was requested from a source that has not been opened.
    #[error("Frame source has not been opened")]
    NotOpened,

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while reading or writing bitmaps.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    /// Directory traversal failed.
    #[error("Directory traversal error: {0}")]
    Walk(String),
}

impl From<FfmpegError> for FrameSplitError {
    fn from(error: FfmpegError) -> Self {
        FrameSplitError::Ffmpeg(error.to_string())
    }
}

impl From<walkdir::Error> for FrameSplitError {
    fn from(error: walkdir::Error) -> Self {
        FrameSplitError::Walk(error.to_string())
    }
}
