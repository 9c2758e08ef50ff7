//! Directory-wide grayscale conversion of bitmap files.
//!
//! [`grayscale_directory`] walks an input directory recursively, converts
//! every `.bmp` file it finds with the lookup-table converter, and writes the
//! result under the output directory at the same relative path. With the
//! `rayon` feature enabled, files are converted in parallel.
//!
//! # Example
//!
//! ```no_run
//! use framesplit::{GrayscaleFormula, batch};
//!
//! let converted = batch::grayscale_directory("frames", "frames_gray", GrayscaleFormula::default())?;
//! println!("{converted} files processed.");
//! # Ok::<(), framesplit::FrameSplitError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{error::FrameSplitError, grayscale::GrayscaleFormula, pixel::PixelBuffer};

const BITMAP_EXTENSION: &str = "bmp";

/// Convert every bitmap below `input_dir` into `output_dir`.
///
/// Subdirectories are mirrored in the output and created as needed. Existing
/// output files are replaced. Returns the number of files converted.
///
/// # Errors
///
/// Stops at the first file that cannot be read, converted, or written.
pub fn grayscale_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    formula: GrayscaleFormula,
) -> Result<usize, FrameSplitError> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let jobs = collect_bitmaps(input_dir)?
        .into_iter()
        .map(|source| {
            let relative = source.strip_prefix(input_dir).unwrap_or(&source);
            let target = output_dir.join(relative);
            (source, target)
        })
        .collect::<Vec<_>>();

    log::info!(
        "Converting {} bitmap(s) from {} to {}",
        jobs.len(),
        input_dir.display(),
        output_dir.display()
    );

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        jobs.par_iter()
            .try_for_each(|(source, target)| grayscale_file(source, target, formula))?;
    }
    #[cfg(not(feature = "rayon"))]
    for (source, target) in &jobs {
        grayscale_file(source, target, formula)?;
    }

    Ok(jobs.len())
}

/// Convert a single image file to a gray bitmap at `output`.
///
/// The parent directory of `output` is created if missing.
///
/// # Errors
///
/// Returns [`FrameSplitError::Image`] if the input cannot be decoded or the
/// output cannot be encoded, [`FrameSplitError::Io`] for filesystem errors.
pub fn grayscale_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    formula: GrayscaleFormula,
) -> Result<(), FrameSplitError> {
    let input = input.as_ref();
    let output = output.as_ref();
    log::debug!("Grayscale {} -> {}", input.display(), output.display());

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let original = image::open(input)?.to_rgb8();
    let gray = formula
        .table()
        .convert(&PixelBuffer::from_rgb_image(&original))?;
    gray.to_rgb_image()?
        .save_with_format(output, image::ImageFormat::Bmp)?;
    Ok(())
}

/// All `.bmp` files below `root`, sorted for a stable processing order.
fn collect_bitmaps(root: &Path) -> Result<Vec<PathBuf>, FrameSplitError> {
    let mut bitmaps = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        let is_bitmap = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| extension.eq_ignore_ascii_case(BITMAP_EXTENSION));
        if is_bitmap {
            bitmaps.push(entry.into_path());
        }
    }
    bitmaps.sort();
    Ok(bitmaps)
}
