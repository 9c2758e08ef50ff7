//! Video decoding behind a small trait seam.
//!
//! [`FrameDecoder`] is everything a [`FrameSource`](crate::FrameSource)
//! needs from a video backend: probe a file for its first video stream, open
//! a sampling session bound to that stream, and pull raw RGB24 pixels at a
//! timestamp. [`FfmpegDecoder`] is the implementation backed by FFmpeg via
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next).

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use ffmpeg_sys_next::{AVPixelFormat, av_image_get_buffer_size};

use crate::{error::FrameSplitError, metadata::StreamMetadata, pixel::PixelBuffer};

/// Row alignment, in bytes, of the RGB24 buffers handed to callers.
const ROW_ALIGNMENT: i32 = 32;

/// A video backend able to probe files and sample frames from them.
pub trait FrameDecoder {
    /// A decoding session bound to one stream of one file.
    type Session: SamplingSession;

    /// Scan the file's streams in ascending index order and describe the
    /// first video stream.
    ///
    /// # Errors
    ///
    /// [`FrameSplitError::NoVideoStream`] if no stream is video, or
    /// [`FrameSplitError::FileOpen`] if the file cannot be read at all.
    fn probe(&self, path: &Path) -> Result<StreamMetadata, FrameSplitError>;

    /// Open a reusable session on the stream described by `metadata`.
    ///
    /// The session sizes its pixel buffers from `metadata.buffer_size` and
    /// `metadata.stride`; the buffer size is not queried again per frame.
    fn open_for_sampling(
        &self,
        path: &Path,
        metadata: &StreamMetadata,
    ) -> Result<Self::Session, FrameSplitError>;
}

/// An open decoding session. Not reentrant: one sample at a time.
pub trait SamplingSession {
    /// Decode the first frame at or after `position`, scaled to
    /// `width × height` RGB24.
    ///
    /// # Errors
    ///
    /// Every failure, including seek, decode and pixel-format conversion
    /// errors, is reported as [`FrameSplitError::Decode`].
    fn sample_at(
        &mut self,
        position: Duration,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, FrameSplitError>;
}

/// FFmpeg-backed [`FrameDecoder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegDecoder;

impl FfmpegDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl FrameDecoder for FfmpegDecoder {
    type Session = FfmpegSession;

    fn probe(&self, path: &Path) -> Result<StreamMetadata, FrameSplitError> {
        log::debug!("Probing media file: {}", path.display());
        let input_context = open_input(path)?;

        let stream = input_context
            .streams()
            .find(|stream| stream.parameters().medium() == Type::Video)
            .ok_or_else(|| FrameSplitError::NoVideoStream {
                path: path.to_path_buf(),
            })?;
        let stream_index = stream.index();

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                FrameSplitError::FileOpen {
                    path: path.to_path_buf(),
                    reason: format!(
                        "Failed to read video codec parameters for stream {stream_index}: {error}"
                    ),
                }
            })?;
        let video_decoder =
            decoder_context
                .decoder()
                .video()
                .map_err(|error| FrameSplitError::FileOpen {
                    path: path.to_path_buf(),
                    reason: format!(
                        "Failed to create video decoder for stream {stream_index}: {error}"
                    ),
                })?;

        let width = video_decoder.width();
        let height = video_decoder.height();
        if width == 0 || height == 0 {
            return Err(FrameSplitError::Decode(format!(
                "video stream {stream_index} reports invalid dimensions {width}x{height}"
            )));
        }

        // Ask FFmpeg for the byte count first, then derive the row stride
        // from it; samples allocate exactly this much.
        let buffer_size = rgb_buffer_size(width, height)?;
        let stride = buffer_size / height as usize;

        let stream_length = if stream.duration() > 0 {
            crate::utilities::stream_timestamp_to_duration(stream.duration(), stream.time_base())
        } else if input_context.duration() > 0 {
            Duration::from_micros(input_context.duration() as u64)
        } else {
            Duration::ZERO
        };

        let codec = video_decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = StreamMetadata {
            width,
            height,
            buffer_size,
            stride,
            stream_index,
            stream_length,
            codec,
        };
        log::info!(
            "Video stream {} in {}: {}x{} [{}], {:?}",
            stream_index,
            path.display(),
            width,
            height,
            metadata.codec,
            stream_length
        );
        Ok(metadata)
    }

    fn open_for_sampling(
        &self,
        path: &Path,
        metadata: &StreamMetadata,
    ) -> Result<FfmpegSession, FrameSplitError> {
        let stream_index = metadata.stream_index;
        let input_context = open_input(path)?;
        let stream = input_context.stream(stream_index).ok_or_else(|| {
            FrameSplitError::NoVideoStream {
                path: path.to_path_buf(),
            }
        })?;
        let time_base = stream.time_base();
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let decoder = decoder_context.decoder().video()?;

        log::debug!(
            "Opened sampling session on stream {} of {}",
            stream_index,
            path.display()
        );

        Ok(FfmpegSession {
            input_context,
            decoder,
            stream_index,
            time_base,
            layout: RgbLayout {
                width: metadata.width,
                height: metadata.height,
                stride: metadata.stride,
            },
            file_path: path.to_path_buf(),
        })
    }
}

/// Output dimensions and row stride of the RGB24 buffers a session fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RgbLayout {
    width: u32,
    height: u32,
    stride: usize,
}

impl RgbLayout {
    fn for_size(width: u32, height: u32) -> Result<Self, FrameSplitError> {
        if width == 0 || height == 0 {
            return Err(FrameSplitError::Decode(format!(
                "invalid output dimensions {width}x{height}"
            )));
        }
        let buffer_size = rgb_buffer_size(width, height)?;
        Ok(Self {
            width,
            height,
            stride: buffer_size / height as usize,
        })
    }
}

/// A demuxer plus decoder bound to one video stream.
///
/// Dropping the session closes the file and frees the codec context.
pub struct FfmpegSession {
    input_context: Input,
    decoder: VideoDecoder,
    stream_index: usize,
    time_base: Rational,
    layout: RgbLayout,
    file_path: PathBuf,
}

impl Debug for FfmpegSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FfmpegSession")
            .field("stream_index", &self.stream_index)
            .field("time_base", &self.time_base)
            .field("layout", &self.layout)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl FfmpegSession {
    /// Feed packets until the decoder yields a frame at or after
    /// `target_pts`. Returns `Ok(false)` when the stream ends first.
    fn decode_until(
        &mut self,
        target_pts: i64,
        decoded_frame: &mut VideoFrame,
    ) -> Result<bool, FrameSplitError> {
        let mut eof_sent = false;
        loop {
            while self.decoder.receive_frame(decoded_frame).is_ok() {
                match decoded_frame.timestamp().or(decoded_frame.pts()) {
                    Some(pts) if pts < target_pts => continue,
                    _ => return Ok(true),
                }
            }

            if eof_sent {
                return Ok(false);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() == self.stream_index {
                        self.decoder
                            .send_packet(&packet)
                            .map_err(|error| decode_failure("sending packet", error))?;
                    }
                }
                Err(error) => {
                    if !matches!(error, FfmpegError::Eof) {
                        log::debug!("Packet read failed, draining decoder: {error}");
                    }
                    self.decoder
                        .send_eof()
                        .map_err(|error| decode_failure("draining decoder", error))?;
                    eof_sent = true;
                }
            }
        }
    }
}

impl SamplingSession for FfmpegSession {
    fn sample_at(
        &mut self,
        position: Duration,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, FrameSplitError> {
        log::debug!("Sampling {} at {:?}", self.file_path.display(), position);

        let seek_timestamp = crate::utilities::duration_to_seek_timestamp(position);
        self.input_context
            .seek(seek_timestamp, ..seek_timestamp)
            .map_err(|error| {
                FrameSplitError::Decode(format!("seek to {position:?} failed: {error}"))
            })?;
        self.decoder.flush();

        let target_pts = crate::utilities::duration_to_stream_timestamp(position, self.time_base);
        let mut decoded_frame = VideoFrame::empty();
        if !self.decode_until(target_pts, &mut decoded_frame)? {
            return Err(FrameSplitError::Decode(format!(
                "no frame at or after {position:?} in {}",
                self.file_path.display()
            )));
        }

        let mut scaler = ScalingContext::get(
            decoded_frame.format(),
            decoded_frame.width(),
            decoded_frame.height(),
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| decode_failure("creating RGB24 scaler", error))?;
        let mut rgb_frame = VideoFrame::empty();
        scaler
            .run(&decoded_frame, &mut rgb_frame)
            .map_err(|error| decode_failure("scaling to RGB24", error))?;

        if (self.layout.width, self.layout.height) != (width, height) {
            self.layout = RgbLayout::for_size(width, height)?;
        }
        let mut buffer = PixelBuffer::zeroed(width, height, self.layout.stride)?;
        crate::utilities::copy_rgb_rows(&rgb_frame, &mut buffer);
        Ok(buffer)
    }
}

fn decode_failure(stage: &str, error: FfmpegError) -> FrameSplitError {
    FrameSplitError::Decode(format!("{stage} failed: {error}"))
}

fn open_input(path: &Path) -> Result<Input, FrameSplitError> {
    ffmpeg_next::init().map_err(|error| FrameSplitError::FileOpen {
        path: path.to_path_buf(),
        reason: format!("FFmpeg initialisation failed: {error}"),
    })?;

    ffmpeg_next::format::input(&path).map_err(|error| FrameSplitError::FileOpen {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })
}

/// Bytes needed for one aligned RGB24 image of the given size.
fn rgb_buffer_size(width: u32, height: u32) -> Result<usize, FrameSplitError> {
    let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
        return Err(FrameSplitError::Decode(format!(
            "frame dimensions {width}x{height} are too large"
        )));
    };
    // SAFETY: pure size computation, no memory is touched.
    let size =
        unsafe { av_image_get_buffer_size(AVPixelFormat::AV_PIX_FMT_RGB24, w, h, ROW_ALIGNMENT) };
    usize::try_from(size).map_err(|_| {
        FrameSplitError::Decode(format!(
            "FFmpeg rejected a {width}x{height} RGB24 buffer (code {size})"
        ))
    })
}
