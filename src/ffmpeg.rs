//! FFmpeg console verbosity.
//!
//! FFmpeg writes its own diagnostics straight to stderr, independent of the
//! Rust [`log`](https://crates.io/crates/log) facade used by this crate.
//! Decoding damaged or unusual AVI/WMV files can make it very chatty, so the
//! level is exposed here without requiring callers to import `ffmpeg-next`.
//!
//! ```no_run
//! use framesplit::FfmpegLogLevel;
//!
//! let level: FfmpegLogLevel = "error".parse()?;
//! framesplit::set_ffmpeg_log_level(level);
//! # Ok::<(), framesplit::FrameSplitError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use ffmpeg_next::util::log::Level;

use crate::error::FrameSplitError;

/// FFmpeg log level, from silent to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    Quiet,
    Panic,
    Fatal,
    Error,
    /// FFmpeg's own default.
    Warning,
    Info,
    Verbose,
    Debug,
    Trace,
}

impl FfmpegLogLevel {
    const NAMES: [(FfmpegLogLevel, &'static str); 9] = [
        (FfmpegLogLevel::Quiet, "quiet"),
        (FfmpegLogLevel::Panic, "panic"),
        (FfmpegLogLevel::Fatal, "fatal"),
        (FfmpegLogLevel::Error, "error"),
        (FfmpegLogLevel::Warning, "warning"),
        (FfmpegLogLevel::Info, "info"),
        (FfmpegLogLevel::Verbose, "verbose"),
        (FfmpegLogLevel::Debug, "debug"),
        (FfmpegLogLevel::Trace, "trace"),
    ];

    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(level, _)| *level == self)
            .map_or("warning", |(_, name)| name)
    }

    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }
}

impl Display for FfmpegLogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = FrameSplitError;

    /// Parse a level name, case-insensitively. `warn` is accepted for
    /// `warning`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("warn") {
            return Ok(FfmpegLogLevel::Warning);
        }
        Self::NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(value))
            .map(|(level, _)| *level)
            .ok_or_else(|| {
                FrameSplitError::Configuration(format!("unsupported FFmpeg log level {value:?}"))
            })
    }
}

/// Set FFmpeg's console verbosity. Does not affect Rust-side logging.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}
