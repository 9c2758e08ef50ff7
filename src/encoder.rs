//! Image encoding of sampled frames.
//!
//! Encoding is delegated to the [`image`] crate. A frame is either encoded
//! completely or not at all; partial output is never returned.

use std::io::Cursor;

use image::DynamicImage;

use crate::error::FrameSplitError;
use crate::image_format::ImageFormat;
use crate::pixel::PixelBuffer;

/// Encode `buffer` into an in-memory file of the given format.
///
/// # Errors
///
/// Returns [`FrameSplitError::Encode`] if the encoder rejects the frame, for
/// example an ICO larger than 256 × 256 pixels.
pub fn encode(buffer: &PixelBuffer, format: ImageFormat) -> Result<Vec<u8>, FrameSplitError> {
    let image = DynamicImage::ImageRgb8(buffer.to_rgb_image()?);
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, format.encoder_format())
        .map_err(|error| {
            FrameSplitError::Encode(format!(
                "{}x{} frame as {format}: {error}",
                buffer.width(),
                buffer.height()
            ))
        })?;
    Ok(bytes.into_inner())
}
