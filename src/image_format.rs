//! Output image formats.
//!
//! The set of accepted format keys is fixed. Keys parse case-insensitively
//! (`"PNG"`, `"png"` and `"Png"` are the same format). The enhanced and
//! Windows metafile keys (`emf`, `wmf`) and `exif` have no raster encoder of
//! their own; frames requested in those formats are written as PNG data,
//! while the file extension keeps the requested key.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::FrameSplitError;

/// Image format a sampled frame is encoded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Windows bitmap. This is the default.
    #[default]
    Bmp,
    Emf,
    Exif,
    Gif,
    Ico,
    Jpg,
    Png,
    Tiff,
    Wmf,
}

impl ImageFormat {
    /// Every supported format, in key order.
    pub const ALL: [ImageFormat; 9] = [
        ImageFormat::Bmp,
        ImageFormat::Emf,
        ImageFormat::Exif,
        ImageFormat::Gif,
        ImageFormat::Ico,
        ImageFormat::Jpg,
        ImageFormat::Png,
        ImageFormat::Tiff,
        ImageFormat::Wmf,
    ];

    /// Lower-case key, also used as the output file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Bmp => "bmp",
            ImageFormat::Emf => "emf",
            ImageFormat::Exif => "exif",
            ImageFormat::Gif => "gif",
            ImageFormat::Ico => "ico",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Wmf => "wmf",
        }
    }

    /// Look up a format by key, ignoring case and a leading dot.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(key))
    }

    /// The `image` crate encoder actually used for this format.
    pub(crate) fn encoder_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Ico => image::ImageFormat::Ico,
            ImageFormat::Jpg => image::ImageFormat::Jpeg,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Png | ImageFormat::Emf | ImageFormat::Exif | ImageFormat::Wmf => {
                image::ImageFormat::Png
            }
        }
    }

    /// Comma-separated list of all keys, for help text.
    pub fn supported_keys() -> String {
        Self::ALL
            .iter()
            .map(|format| format.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = FrameSplitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_key(value).ok_or_else(|| {
            FrameSplitError::Configuration(format!(
                "unsupported image format {value:?} (expected one of: {})",
                Self::supported_keys()
            ))
        })
    }
}
