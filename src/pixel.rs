//! Raw 24-bit RGB pixel buffers.
//!
//! A [`PixelBuffer`] is what a [`FrameDecoder`](crate::FrameDecoder) hands
//! back for one sampled timestamp. Rows may carry alignment padding, so every
//! operation walks the buffer by [`stride`](PixelBuffer::stride) rather than
//! by `width * 3`. A buffer lives for exactly one sampling cycle: it is
//! dropped (and its storage released) as soon as it has been encoded, on
//! success and failure paths alike.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use image::RgbImage;

use crate::error::FrameSplitError;

/// Bytes per pixel of the fixed RGB24 layout.
pub const BYTES_PER_PIXEL: usize = 3;

/// An owned RGB24 frame with a possibly padded row stride.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Box<[u8]>,
    width: u32,
    height: u32,
    stride: usize,
}

impl Debug for PixelBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("len", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Allocate a zeroed buffer of `stride * height` bytes holding
    /// `width * height` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`FrameSplitError::Decode`] if the dimensions are zero or the
    /// stride cannot hold one row.
    pub fn zeroed(width: u32, height: u32, stride: usize) -> Result<Self, FrameSplitError> {
        required_len(width, height, stride)?;
        Ok(Self {
            data: vec![0; stride * height as usize].into_boxed_slice(),
            width,
            height,
            stride,
        })
    }

    /// Wrap existing bytes.
    ///
    /// `data` must hold at least `stride * (height - 1) + width * 3` bytes;
    /// trailing bytes beyond that are kept but never read.
    ///
    /// # Errors
    ///
    /// Returns [`FrameSplitError::Decode`] if the layout does not fit `data`.
    pub fn from_raw(
        data: Vec<u8>,
        width: u32,
        height: u32,
        stride: usize,
    ) -> Result<Self, FrameSplitError> {
        let len = required_len(width, height, stride)?;
        if data.len() < len {
            return Err(FrameSplitError::Decode(format!(
                "pixel data holds {} bytes, {width}x{height} at stride {stride} needs {len}",
                data.len()
            )));
        }
        Ok(Self {
            data: data.into_boxed_slice(),
            width,
            height,
            stride,
        })
    }

    /// Build a tightly packed buffer from an RGB image.
    pub fn from_rgb_image(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.as_raw().clone().into_boxed_slice(),
            width,
            height,
            stride: width as usize * BYTES_PER_PIXEL,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, including padding.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The visible pixels of row `y`, without padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.row_len()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let row_len = self.row_len();
        &mut self.data[start..start + row_len]
    }

    /// The `(r, g, b)` triple at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }

    /// Rotate by 180° and then mirror horizontally, in place.
    ///
    /// The two mirrorings along the x axis cancel, so the net effect is a
    /// vertical flip: rows are swapped top to bottom, pixel order within a
    /// row is untouched.
    pub fn rotate_180_flip_x(&mut self) {
        let row_len = self.row_len();
        let height = self.height as usize;
        for top in 0..height / 2 {
            let bottom = height - 1 - top;
            let (head, tail) = self.data.split_at_mut(bottom * self.stride);
            let top_start = top * self.stride;
            head[top_start..top_start + row_len].swap_with_slice(&mut tail[..row_len]);
        }
    }

    /// Copy the visible pixels into a tightly packed [`RgbImage`].
    ///
    /// # Errors
    ///
    /// Returns [`FrameSplitError::Encode`] if the packed rows do not form a
    /// complete image.
    pub fn to_rgb_image(&self) -> Result<RgbImage, FrameSplitError> {
        let row_len = self.row_len();
        let packed = if self.stride == row_len {
            self.data[..row_len * self.height as usize].to_vec()
        } else {
            let mut packed = Vec::with_capacity(row_len * self.height as usize);
            for y in 0..self.height {
                packed.extend_from_slice(self.row(y));
            }
            packed
        };
        RgbImage::from_raw(self.width, self.height, packed).ok_or_else(|| {
            FrameSplitError::Encode(
                "Failed to construct RGB image from sampled frame data".to_string(),
            )
        })
    }

    fn row_len(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }
}

fn required_len(width: u32, height: u32, stride: usize) -> Result<usize, FrameSplitError> {
    if width == 0 || height == 0 {
        return Err(FrameSplitError::Decode(format!(
            "invalid frame dimensions {width}x{height}"
        )));
    }
    let row_len = width as usize * BYTES_PER_PIXEL;
    if stride < row_len {
        return Err(FrameSplitError::Decode(format!(
            "stride {stride} is smaller than a {width}-pixel RGB row ({row_len} bytes)"
        )));
    }
    Ok(stride * (height as usize - 1) + row_len)
}
