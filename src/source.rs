//! Pull-based frame source.
//!
//! A [`FrameSource`] probes a video once, derives its [`SamplingWindow`],
//! and then hands out one encoded image per [`next_frame`](FrameSource::next_frame)
//! call until the window is used up.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use framesplit::{FrameSource, ImageFormat, SamplingOptions};
//!
//! let options = SamplingOptions::new()
//!     .with_step(Duration::from_secs(1))
//!     .with_format(ImageFormat::Png);
//! let source = FrameSource::open("input.avi", options)?;
//!
//! while let Some(frame) = source.next_frame()? {
//!     std::fs::write(format!("{:06}.png", frame.index + 1), &frame.bytes)?;
//! }
//! # Ok::<(), framesplit::FrameSplitError>(())
//! ```
//!
//! # Concurrency
//!
//! All state sits behind one [`Mutex`]; a whole sample → transform → encode
//! cycle runs while holding it. Sharing a source between threads serializes
//! callers, it never decodes two frames at once.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use crate::{
    configuration::SamplingOptions,
    decoder::{FfmpegDecoder, FrameDecoder, SamplingSession},
    encoder,
    error::FrameSplitError,
    metadata::StreamMetadata,
    sampling::SamplingWindow,
};

/// Lifecycle of a [`FrameSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSourceState {
    /// Created but not successfully opened yet.
    Uninitialized,
    /// At least one sample position remains.
    Ready,
    /// Every position was consumed, the window was empty, or a frame failed.
    Exhausted,
}

/// One encoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    /// Zero-based index within the sampling window.
    pub index: u64,
    /// Timestamp that was requested from the decoder.
    pub position: Duration,
    /// Encoded image file contents.
    pub bytes: Vec<u8>,
}

/// Stateful producer of encoded frames sampled from one video file.
///
/// The decoder session is owned by the source and released when the source
/// is dropped.
pub struct FrameSource<D: FrameDecoder = FfmpegDecoder> {
    decoder: D,
    path: PathBuf,
    options: SamplingOptions,
    inner: Mutex<Inner<D::Session>>,
}

struct Inner<S> {
    opened: Option<Opened<S>>,
}

struct Opened<S> {
    metadata: StreamMetadata,
    window: SamplingWindow,
    session: S,
    cursor: u64,
}

impl<S> Opened<S> {
    fn is_exhausted(&self) -> bool {
        self.cursor >= self.window.frame_count()
    }
}

impl<D: FrameDecoder> Debug for FrameSource<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FrameSource")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl FrameSource<FfmpegDecoder> {
    /// Create and open a source backed by FFmpeg.
    ///
    /// # Errors
    ///
    /// See [`FrameSource::open_source`].
    pub fn open<P: AsRef<Path>>(path: P, options: SamplingOptions) -> Result<Self, FrameSplitError> {
        let source = Self::with_decoder(FfmpegDecoder::new(), path, options);
        source.open_source()?;
        Ok(source)
    }
}

impl<D: FrameDecoder> FrameSource<D> {
    /// Create an unopened source using `decoder`.
    pub fn with_decoder<P: AsRef<Path>>(decoder: D, path: P, options: SamplingOptions) -> Self {
        Self {
            decoder,
            path: path.as_ref().to_path_buf(),
            options,
            inner: Mutex::new(Inner { opened: None }),
        }
    }

    /// Probe the file, build the sampling window, and open the decoding
    /// session. The source becomes [`Ready`](FrameSourceState::Ready), or
    /// [`Exhausted`](FrameSourceState::Exhausted) if the window is empty.
    ///
    /// Opening an already opened source does nothing.
    ///
    /// # Errors
    ///
    /// - [`FrameSplitError::NoVideoStream`] if the file has no video stream.
    /// - [`FrameSplitError::Configuration`] if the step is zero.
    /// - [`FrameSplitError::FileOpen`] if the file cannot be read.
    ///
    /// On error the source stays [`Uninitialized`](FrameSourceState::Uninitialized).
    pub fn open_source(&self) -> Result<FrameSourceState, FrameSplitError> {
        let mut inner = self.lock();
        if let Some(opened) = &inner.opened {
            return Ok(state_of(opened));
        }

        log::debug!("Opening frame source: {}", self.path.display());
        let metadata = self.decoder.probe(&self.path)?;
        let window = SamplingWindow::new(
            self.options.start,
            self.options.end,
            self.options.step,
            metadata.stream_length,
        )?;
        let session = self
            .decoder
            .open_for_sampling(&self.path, &metadata)?;

        log::info!(
            "Sampling {} frame(s) from {} (start {:?}, end {:?}, step {:?})",
            window.frame_count(),
            self.path.display(),
            window.start(),
            window.effective_end(),
            window.step()
        );

        let opened = Opened {
            metadata,
            window,
            session,
            cursor: 0,
        };
        let state = state_of(&opened);
        inner.opened = Some(opened);
        Ok(state)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FrameSourceState {
        self.lock()
            .opened
            .as_ref()
            .map_or(FrameSourceState::Uninitialized, state_of)
    }

    /// `true` once every sample position has been consumed.
    ///
    /// An unopened source has no positions and reports `true`.
    pub fn is_exhausted(&self) -> bool {
        self.lock().opened.as_ref().is_none_or(Opened::is_exhausted)
    }

    /// Rewind an exhausted source to its first position.
    ///
    /// Only an exhausted source with a non-empty window is rewound. A source
    /// that still has positions left keeps its cursor where it is. Returns
    /// whether the source is ready afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`FrameSplitError::NotOpened`] before a successful open.
    pub fn reset(&self) -> Result<bool, FrameSplitError> {
        let mut inner = self.lock();
        let opened = inner.opened.as_mut().ok_or(FrameSplitError::NotOpened)?;
        if !opened.is_exhausted() {
            return Ok(true);
        }
        opened.cursor = 0;
        Ok(!opened.is_exhausted())
    }

    /// Sample, transform, and encode the next frame.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// - [`FrameSplitError::NotOpened`] before a successful open.
    /// - [`FrameSplitError::Decode`] / [`FrameSplitError::Encode`] if this
    ///   frame fails. The source is then exhausted; nothing is retried.
    pub fn next_frame(&self) -> Result<Option<EncodedFrame>, FrameSplitError> {
        let mut inner = self.lock();
        let opened = inner.opened.as_mut().ok_or(FrameSplitError::NotOpened)?;
        if opened.is_exhausted() {
            return Ok(None);
        }

        let index = opened.cursor;
        let position = opened.window.position_of(index);
        match self.produce(opened, position) {
            Ok(bytes) => {
                opened.cursor += 1;
                Ok(Some(EncodedFrame {
                    index,
                    position,
                    bytes,
                }))
            }
            Err(error) => {
                log::warn!("Frame {index} at {position:?} failed, stopping: {error}");
                opened.cursor = opened.window.frame_count();
                Err(error)
            }
        }
    }

    /// Iterate over the remaining frames.
    ///
    /// The iterator ends after the last frame or after the first error.
    pub fn frames(&self) -> Frames<'_, D> {
        Frames {
            source: self,
            failed: false,
        }
    }

    /// Metadata of the probed stream, once opened.
    pub fn metadata(&self) -> Option<StreamMetadata> {
        self.lock()
            .opened
            .as_ref()
            .map(|opened| opened.metadata.clone())
    }

    /// The sampling window, once opened.
    pub fn window(&self) -> Option<SamplingWindow> {
        self.lock().opened.as_ref().map(|opened| opened.window)
    }

    /// Number of frames already produced since the last rewind.
    pub fn cursor(&self) -> u64 {
        self.lock().opened.as_ref().map_or(0, |opened| opened.cursor)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &SamplingOptions {
        &self.options
    }

    fn produce(
        &self,
        opened: &mut Opened<D::Session>,
        position: Duration,
    ) -> Result<Vec<u8>, FrameSplitError> {
        let width = opened.metadata.width;
        let height = opened.metadata.height;

        let mut buffer = opened.session.sample_at(position, width, height)?;
        if self.options.rotate {
            buffer.rotate_180_flip_x();
        }
        if self.options.grayscale {
            buffer = self.options.grayscale_formula.table().convert(&buffer)?;
        }
        encoder::encode(&buffer, self.options.format)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<D::Session>> {
        // A panic mid-frame leaves the cursor untouched, so the state is
        // still consistent.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn state_of<S>(opened: &Opened<S>) -> FrameSourceState {
    if opened.is_exhausted() {
        FrameSourceState::Exhausted
    } else {
        FrameSourceState::Ready
    }
}

/// Iterator returned by [`FrameSource::frames`].
pub struct Frames<'a, D: FrameDecoder> {
    source: &'a FrameSource<D>,
    failed: bool,
}

impl<D: FrameDecoder> Iterator for Frames<'_, D> {
    type Item = Result<EncodedFrame, FrameSplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.source.next_frame().transpose();
        self.failed = matches!(result, Some(Err(_)));
        result
    }
}
