//! Sampling window arithmetic.
//!
//! A [`SamplingWindow`] turns a requested time range and step into a fixed
//! number of sample positions, clamped to the length of the probed stream.
//! All arithmetic is done on [`Duration`] values (integer nanoseconds), so
//! consecutive positions differ by exactly one step.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use framesplit::SamplingWindow;
//!
//! let window = SamplingWindow::new(
//!     Duration::ZERO,
//!     Duration::from_secs(10),
//!     Duration::from_millis(500),
//!     Duration::from_secs(20),
//! )?;
//! assert_eq!(window.frame_count(), 20);
//! assert_eq!(window.position_of(3), Duration::from_millis(1500));
//! # Ok::<(), framesplit::FrameSplitError>(())
//! ```

use std::time::Duration;

use crate::error::FrameSplitError;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// The set of timestamps a [`FrameSource`](crate::FrameSource) samples.
///
/// `frame_count` is computed once at construction and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingWindow {
    start: Duration,
    end: Duration,
    step: Duration,
    stream_length: Duration,
    frame_count: u64,
}

impl SamplingWindow {
    /// Build a window over `[start, min(end, stream_length))` with the given
    /// step.
    ///
    /// A start at or past the effective end is not an error; the window is
    /// simply empty.
    ///
    /// # Errors
    ///
    /// Returns [`FrameSplitError::Configuration`] if `step` is zero.
    pub fn new(
        start: Duration,
        end: Duration,
        step: Duration,
        stream_length: Duration,
    ) -> Result<Self, FrameSplitError> {
        if step.is_zero() {
            return Err(FrameSplitError::Configuration(
                "step must be greater than zero".to_string(),
            ));
        }

        let effective_end = end.min(stream_length);
        let frame_count = if start >= effective_end {
            0
        } else {
            let span = (effective_end - start).as_nanos();
            u64::try_from(span / step.as_nanos()).unwrap_or(u64::MAX)
        };

        Ok(Self {
            start,
            end,
            step,
            stream_length,
            frame_count,
        })
    }

    /// Number of positions in the window.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether the window contains no positions at all.
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// The requested end clamped to the stream length.
    pub fn effective_end(&self) -> Duration {
        self.end.min(self.stream_length)
    }

    pub fn start(&self) -> Duration {
        self.start
    }

    pub fn end(&self) -> Duration {
        self.end
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn stream_length(&self) -> Duration {
        self.stream_length
    }

    /// Timestamp of the `index`-th sample: `start + index * step`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= frame_count()`. Callers iterate over
    /// `0..frame_count()`; anything else is a bug at the call site.
    pub fn position_of(&self, index: u64) -> Duration {
        assert!(
            index < self.frame_count,
            "sample index {index} out of range (window has {} positions)",
            self.frame_count
        );
        let nanos = self.start.as_nanos() + self.step.as_nanos() * u128::from(index);
        Duration::new(
            (nanos / NANOS_PER_SECOND) as u64,
            (nanos % NANOS_PER_SECOND) as u32,
        )
    }

    /// Iterate over every position in the window in order.
    pub fn positions(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.frame_count).map(move |index| self.position_of(index))
    }
}
