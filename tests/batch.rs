//! Directory grayscale conversion tests.

use std::{fs, path::Path};

use framesplit::{GrayscaleFormula, batch};
use image::{Rgb, RgbImage};

fn write_bitmap(path: &Path, color: [u8; 3]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    RgbImage::from_pixel(6, 4, Rgb(color))
        .save_with_format(path, image::ImageFormat::Bmp)
        .expect("Failed to write bitmap");
}

fn read_pixel(path: &Path) -> [u8; 3] {
    image::open(path)
        .expect("Failed to open converted bitmap")
        .to_rgb8()
        .get_pixel(0, 0)
        .0
}

#[test]
fn converts_nested_bitmaps_and_mirrors_layout() {
    let input = tempfile::tempdir().expect("Failed to create temp dir");
    let output = tempfile::tempdir().expect("Failed to create temp dir");

    write_bitmap(&input.path().join("000001.bmp"), [255, 0, 0]);
    write_bitmap(&input.path().join("clips/a/000002.BMP"), [0, 0, 255]);
    write_bitmap(&input.path().join("clips/b/000003.bmp"), [10, 20, 30]);

    let converted =
        batch::grayscale_directory(input.path(), output.path(), GrayscaleFormula::AsObserved)
            .expect("Failed to convert directory");
    assert_eq!(converted, 3);

    assert_eq!(read_pixel(&output.path().join("000001.bmp")), [76, 76, 76]);
    assert_eq!(
        read_pixel(&output.path().join("clips/a/000002.BMP")),
        [178, 178, 178]
    );
    // (30 * 10 + 70 * 30) / 100 = 24
    assert_eq!(
        read_pixel(&output.path().join("clips/b/000003.bmp")),
        [24, 24, 24]
    );
}

#[test]
fn other_files_are_ignored() {
    let input = tempfile::tempdir().expect("Failed to create temp dir");
    let output = tempfile::tempdir().expect("Failed to create temp dir");

    write_bitmap(&input.path().join("frame.bmp"), [1, 2, 3]);
    fs::write(input.path().join("notes.txt"), b"not an image").expect("Failed to write");
    RgbImage::from_pixel(2, 2, Rgb([9, 9, 9]))
        .save_with_format(input.path().join("frame.png"), image::ImageFormat::Png)
        .expect("Failed to write png");

    let converted =
        batch::grayscale_directory(input.path(), output.path(), GrayscaleFormula::default())
            .expect("Failed to convert directory");
    assert_eq!(converted, 1);
    assert!(output.path().join("frame.bmp").exists());
    assert!(!output.path().join("frame.png").exists());
    assert!(!output.path().join("notes.txt").exists());
}

#[test]
fn output_directory_is_created() {
    let input = tempfile::tempdir().expect("Failed to create temp dir");
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let output = scratch.path().join("does/not/exist");

    write_bitmap(&input.path().join("a.bmp"), [0, 0, 0]);
    let converted = batch::grayscale_directory(input.path(), &output, GrayscaleFormula::Luma)
        .expect("Failed to convert directory");
    assert_eq!(converted, 1);
    assert!(output.join("a.bmp").is_file());
}

#[test]
fn existing_outputs_are_replaced() {
    let input = tempfile::tempdir().expect("Failed to create temp dir");
    let output = tempfile::tempdir().expect("Failed to create temp dir");

    write_bitmap(&input.path().join("a.bmp"), [255, 0, 0]);
    write_bitmap(&output.path().join("a.bmp"), [1, 1, 1]);

    batch::grayscale_directory(input.path(), output.path(), GrayscaleFormula::AsObserved)
        .expect("Failed to convert directory");
    assert_eq!(read_pixel(&output.path().join("a.bmp")), [76, 76, 76]);
}

#[test]
fn empty_directory_converts_nothing() {
    let input = tempfile::tempdir().expect("Failed to create temp dir");
    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let converted =
        batch::grayscale_directory(input.path(), output.path(), GrayscaleFormula::default())
            .expect("Failed to convert directory");
    assert_eq!(converted, 0);
}

#[test]
fn missing_input_directory_is_an_error() {
    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let result = batch::grayscale_directory(
        "this_directory_does_not_exist",
        output.path(),
        GrayscaleFormula::default(),
    );
    assert!(result.is_err());
}

#[test]
fn corrupt_bitmap_is_an_error() {
    let input = tempfile::tempdir().expect("Failed to create temp dir");
    let output = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(input.path().join("broken.bmp"), b"BM not really").expect("Failed to write");

    let result =
        batch::grayscale_directory(input.path(), output.path(), GrayscaleFormula::default());
    assert!(result.is_err());
}
