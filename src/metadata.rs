//! Probed stream metadata.
//!
//! [`StreamMetadata`] is produced once by
//! [`FrameDecoder::probe`](crate::FrameDecoder::probe) and never changes
//! afterwards. It fixes the output dimensions and the byte size of the pixel
//! buffer allocated for every sample.

use std::time::Duration;

/// Properties of the selected video stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct StreamMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Bytes the decoder needs for one RGB24 frame, row padding included.
    pub buffer_size: usize,
    /// Bytes per row of that buffer.
    pub stride: usize,
    /// Container index of the selected video stream.
    pub stream_index: usize,
    /// Playable length of the stream.
    pub stream_length: Duration,
    /// Codec name (e.g. `"h264"`, `"wmv3"`), `"unknown"` when FFmpeg has none.
    pub codec: String,
}
