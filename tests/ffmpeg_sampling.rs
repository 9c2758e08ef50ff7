//! End-to-end sampling through FFmpeg.
//!
//! Tests require fixture files from `tests/fixtures/generate_fixtures.sh`
//! and are skipped when they are missing.

use std::{path::Path, time::Duration};

use framesplit::{
    FfmpegDecoder, FrameDecoder, FrameSource, FrameSourceState, FrameSplitError, ImageFormat,
    SamplingOptions, SamplingSession,
};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.avi"
}

fn sample_audio_only_path() -> &'static str {
    "tests/fixtures/sample_audio_only.wav"
}

// ── probing ────────────────────────────────────────────────────────

#[test]
fn probe_reports_first_video_stream() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let metadata = FfmpegDecoder::new()
        .probe(Path::new(path))
        .expect("Failed to probe fixture");
    assert_eq!((metadata.width, metadata.height), (320, 240));
    assert!(metadata.stride >= 320 * 3);
    assert_eq!(metadata.buffer_size, metadata.stride * 240);
    assert!(metadata.stream_length >= Duration::from_secs(4));
    assert!(metadata.stream_length <= Duration::from_secs(6));
}

#[test]
fn audio_only_file_has_no_video_stream() {
    let path = sample_audio_only_path();
    if !Path::new(path).exists() {
        return;
    }

    let result = FrameSource::open(path, SamplingOptions::new());
    assert!(matches!(result, Err(FrameSplitError::NoVideoStream { .. })));
}

// ── sampling ───────────────────────────────────────────────────────

#[test]
fn one_second_step_over_whole_file() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let options = SamplingOptions::new()
        .with_step(Duration::from_secs(1))
        .with_format(ImageFormat::Png);
    let source = FrameSource::open(path, options).expect("Failed to open fixture");
    let expected = source.window().expect("window").frame_count();
    assert!(expected >= 4);

    let mut produced = 0;
    for frame in source.frames() {
        let frame = frame.expect("Failed to sample frame");
        let image = image::load_from_memory(&frame.bytes).expect("Failed to decode frame");
        assert_eq!((image.width(), image.height()), (320, 240));
        produced += 1;
    }
    assert_eq!(produced, expected);
    assert_eq!(source.state(), FrameSourceState::Exhausted);
}

#[test]
fn window_inside_the_file() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let options = SamplingOptions::new()
        .with_start(Duration::from_secs(1))
        .with_end(Duration::from_secs(2))
        .with_step(Duration::from_millis(250))
        .with_grayscale(true)
        .with_rotate(true);
    let source = FrameSource::open(path, options).expect("Failed to open fixture");
    assert_eq!(source.window().expect("window").frame_count(), 4);

    let frames: Vec<_> = source
        .frames()
        .collect::<Result<_, _>>()
        .expect("Failed to sample frames");
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[3].position, Duration::from_millis(1_750));

    let image = image::load_from_memory(&frames[0].bytes)
        .expect("Failed to decode frame")
        .to_rgb8();
    assert!(
        image
            .pixels()
            .all(|pixel| pixel.0[0] == pixel.0[1] && pixel.0[1] == pixel.0[2]),
        "grayscale frames should have equal channels"
    );
}

#[test]
fn reset_replays_the_same_frames() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let options = SamplingOptions::new()
        .with_end(Duration::from_secs(1))
        .with_step(Duration::from_millis(500))
        .with_format(ImageFormat::Bmp);
    let source = FrameSource::open(path, options).expect("Failed to open fixture");

    let first: Vec<_> = source
        .frames()
        .collect::<Result<_, _>>()
        .expect("Failed to sample frames");
    assert!(source.reset().expect("Failed to reset"));
    let second: Vec<_> = source
        .frames()
        .collect::<Result<_, _>>()
        .expect("Failed to sample frames");
    assert_eq!(first, second);
}

#[test]
fn start_past_the_end_is_empty() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let options = SamplingOptions::new().with_start(Duration::from_secs(3_600));
    let source = FrameSource::open(path, options).expect("Failed to open fixture");
    assert_eq!(source.state(), FrameSourceState::Exhausted);
    assert!(source.next_frame().expect("next_frame").is_none());
}

// ── sessions ───────────────────────────────────────────────────────

#[test]
fn session_buffers_use_the_probed_layout() {
    let path = Path::new(sample_video_path());
    if !path.exists() {
        return;
    }

    let decoder = FfmpegDecoder::new();
    let metadata = decoder.probe(path).expect("Failed to probe fixture");
    let mut session = decoder
        .open_for_sampling(path, &metadata)
        .expect("Failed to open session");

    for position in [Duration::ZERO, Duration::from_secs(2), Duration::from_millis(500)] {
        let buffer = session
            .sample_at(position, metadata.width, metadata.height)
            .expect("Failed to sample frame");
        assert_eq!(buffer.stride(), metadata.stride);
        assert_eq!(buffer.as_bytes().len(), metadata.buffer_size);
    }
}

#[test]
fn scaler_failure_is_a_decode_error() {
    let path = Path::new(sample_video_path());
    if !path.exists() {
        return;
    }

    let decoder = FfmpegDecoder::new();
    let metadata = decoder.probe(path).expect("Failed to probe fixture");
    let mut session = decoder
        .open_for_sampling(path, &metadata)
        .expect("Failed to open session");

    // swscale refuses a 0x0 destination.
    let result = session.sample_at(Duration::ZERO, 0, 0);
    assert!(
        matches!(result, Err(FrameSplitError::Decode(_))),
        "expected Decode, got {result:?}"
    );
}

#[test]
fn sampling_past_the_last_frame_is_a_decode_error() {
    let path = Path::new(sample_video_path());
    if !path.exists() {
        return;
    }

    let decoder = FfmpegDecoder::new();
    let metadata = decoder.probe(path).expect("Failed to probe fixture");
    let mut session = decoder
        .open_for_sampling(path, &metadata)
        .expect("Failed to open session");

    let result = session.sample_at(Duration::from_secs(3_600), metadata.width, metadata.height);
    assert!(
        matches!(result, Err(FrameSplitError::Decode(_))),
        "expected Decode, got {result:?}"
    );
}
