//! Internal utility functions.
//!
//! Timestamp conversions between [`Duration`] and FFmpeg time bases, and the
//! row copy out of FFmpeg-owned frame memory.

use std::time::Duration;

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

use crate::pixel::{BYTES_PER_PIXEL, PixelBuffer};

/// Convert a [`Duration`] to a seek timestamp in AV_TIME_BASE (microseconds).
///
/// `input_context.seek()` (via `avformat_seek_file` with `stream_index = -1`)
/// expects container-level timestamps.
pub fn duration_to_seek_timestamp(duration: Duration) -> i64 {
    i64::try_from(duration.as_micros()).unwrap_or(i64::MAX)
}

/// Convert a [`Duration`] to a timestamp in the stream's time base,
/// truncating toward zero.
pub fn duration_to_stream_timestamp(duration: Duration, time_base: Rational) -> i64 {
    let numerator = i128::from(time_base.numerator());
    let denominator = i128::from(time_base.denominator());
    if numerator <= 0 || denominator <= 0 {
        return 0;
    }
    let scaled = duration.as_nanos() as i128 * denominator / (numerator * 1_000_000_000);
    i64::try_from(scaled).unwrap_or(i64::MAX)
}

/// Convert a non-negative stream timestamp to a [`Duration`].
///
/// Negative or unrepresentable values map to [`Duration::ZERO`].
pub fn stream_timestamp_to_duration(timestamp: i64, time_base: Rational) -> Duration {
    if timestamp <= 0 || time_base.denominator() == 0 {
        return Duration::ZERO;
    }
    let seconds =
        timestamp as f64 * f64::from(time_base.numerator()) / f64::from(time_base.denominator());
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

/// Copy the visible RGB24 rows of an FFmpeg frame into `buffer`.
///
/// Both sides may carry row padding; only `width * 3` bytes per row are
/// copied.
pub fn copy_rgb_rows(video_frame: &VideoFrame, buffer: &mut PixelBuffer) {
    let source_stride = video_frame.stride(0);
    let data = video_frame.data(0);
    let row_len = buffer.width() as usize * BYTES_PER_PIXEL;

    for y in 0..buffer.height() {
        let row_start = y as usize * source_stride;
        buffer
            .row_mut(y)
            .copy_from_slice(&data[row_start..row_start + row_len]);
    }
}
