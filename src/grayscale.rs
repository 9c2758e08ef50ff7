//! Lookup-table grayscale conversion.
//!
//! Every `(r, g, b)` triple is mapped to a gray level through a
//! 256 × 256 × 256 table built once per process and shared read-only by all
//! conversions. Two formulas are available, see [`GrayscaleFormula`].
//!
//! # Example
//!
//! ```
//! use framesplit::{GrayscaleFormula, PixelBuffer};
//!
//! let mut buffer = PixelBuffer::zeroed(1, 1, 3)?;
//! buffer.as_bytes_mut().copy_from_slice(&[255, 0, 0]);
//!
//! let gray = GrayscaleFormula::AsObserved.table().convert(&buffer)?;
//! assert_eq!(gray.pixel(0, 0), [76, 76, 76]);
//! # Ok::<(), framesplit::FrameSplitError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::LazyLock;

use crate::error::FrameSplitError;
use crate::pixel::{BYTES_PER_PIXEL, PixelBuffer};

const TABLE_LEN: usize = 256 * 256 * 256;

static AS_OBSERVED_TABLE: LazyLock<LookupTable> =
    LazyLock::new(|| LookupTable::build(GrayscaleFormula::AsObserved));

static LUMA_TABLE: LazyLock<LookupTable> =
    LazyLock::new(|| LookupTable::build(GrayscaleFormula::Luma));

/// Weighting used to collapse an RGB triple into one gray level.
///
/// Both formulas are evaluated in integer percent, floored:
/// `(30·R + 59·X + 11·B) / 100`. Gray input therefore maps to itself and
/// converting twice gives the same result as converting once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GrayscaleFormula {
    /// `0.3·R + 0.59·B + 0.11·B`. The green channel is never read; this is
    /// the weighting earlier releases of the tool shipped with, so it stays
    /// the default.
    #[default]
    AsObserved,
    /// Conventional luma weighting `0.3·R + 0.59·G + 0.11·B`.
    Luma,
}

impl GrayscaleFormula {
    /// Gray level for one pixel, computed directly without the table.
    pub fn gray_level(self, red: u8, green: u8, blue: u8) -> u8 {
        let (red, green, blue) = (u32::from(red), u32::from(green), u32::from(blue));
        let weighted = match self {
            GrayscaleFormula::AsObserved => 30 * red + 59 * blue + 11 * blue,
            GrayscaleFormula::Luma => 30 * red + 59 * green + 11 * blue,
        };
        // At most 100 * 255 before the division.
        (weighted / 100) as u8
    }

    /// The process-wide table for this formula, built on first use.
    pub fn table(self) -> &'static LookupTable {
        match self {
            GrayscaleFormula::AsObserved => &AS_OBSERVED_TABLE,
            GrayscaleFormula::Luma => &LUMA_TABLE,
        }
    }
}

/// Precomputed `(r, g, b) -> gray` mapping.
pub struct LookupTable {
    formula: GrayscaleFormula,
    entries: Box<[u8]>,
}

impl Debug for LookupTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LookupTable")
            .field("formula", &self.formula)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl LookupTable {
    /// Compute every entry of the table for `formula`.
    ///
    /// Prefer [`GrayscaleFormula::table`], which builds each table at most
    /// once per process.
    pub fn build(formula: GrayscaleFormula) -> Self {
        log::debug!("Building {formula:?} grayscale lookup table");
        let mut entries = vec![0u8; TABLE_LEN].into_boxed_slice();
        for red in 0..=255u8 {
            for green in 0..=255u8 {
                let base = index(red, green, 0);
                for blue in 0..=255u8 {
                    entries[base + blue as usize] = formula.gray_level(red, green, blue);
                }
            }
        }
        Self { formula, entries }
    }

    pub fn formula(&self) -> GrayscaleFormula {
        self.formula
    }

    pub fn lookup(&self, red: u8, green: u8, blue: u8) -> u8 {
        self.entries[index(red, green, blue)]
    }

    /// Produce a gray copy of `buffer`: every pixel's three channels are set
    /// to the table entry for its `(r, g, b)`.
    ///
    /// The result has the same dimensions and stride as the input; padding
    /// bytes are left zeroed.
    ///
    /// # Errors
    ///
    /// Only fails if `buffer` has an impossible layout, which a buffer
    /// produced by this crate never has.
    pub fn convert(&self, buffer: &PixelBuffer) -> Result<PixelBuffer, FrameSplitError> {
        let mut output = PixelBuffer::zeroed(buffer.width(), buffer.height(), buffer.stride())?;
        for y in 0..buffer.height() {
            let source = buffer.row(y);
            let target = output.row_mut(y);
            for (src, dst) in source
                .chunks_exact(BYTES_PER_PIXEL)
                .zip(target.chunks_exact_mut(BYTES_PER_PIXEL))
            {
                dst.fill(self.lookup(src[0], src[1], src[2]));
            }
        }
        Ok(output)
    }
}

fn index(red: u8, green: u8, blue: u8) -> usize {
    (red as usize) << 16 | (green as usize) << 8 | blue as usize
}
