//! Grayscale lookup-table tests.

use framesplit::{GrayscaleFormula, LookupTable, PixelBuffer};

fn single_pixel(red: u8, green: u8, blue: u8) -> PixelBuffer {
    PixelBuffer::from_raw(vec![red, green, blue], 1, 1, 3).expect("Failed to build pixel buffer")
}

/// A buffer whose bytes follow a simple deterministic pattern.
fn patterned(width: u32, height: u32, stride: usize) -> PixelBuffer {
    let mut buffer = PixelBuffer::zeroed(width, height, stride).expect("Failed to allocate");
    for (index, byte) in buffer.as_bytes_mut().iter_mut().enumerate() {
        *byte = (index.wrapping_mul(37) ^ (index >> 3)) as u8;
    }
    buffer
}

// ── formulas ───────────────────────────────────────────────────────

#[test]
fn pure_red_maps_to_76() {
    let gray = GrayscaleFormula::AsObserved
        .table()
        .convert(&single_pixel(255, 0, 0))
        .expect("Failed to convert");
    assert_eq!(gray.pixel(0, 0), [76, 76, 76]);
}

#[test]
fn default_formula_ignores_green() {
    let table = GrayscaleFormula::default().table();
    assert_eq!(table.formula(), GrayscaleFormula::AsObserved);
    for green in [0, 1, 128, 255] {
        assert_eq!(table.lookup(10, green, 200), table.lookup(10, 0, 200));
    }
    // 0.3 * 10 + 0.59 * 200 + 0.11 * 200 = 143
    assert_eq!(table.lookup(10, 99, 200), 143);
}

#[test]
fn luma_formula_weights_green() {
    let table = GrayscaleFormula::Luma.table();
    assert_eq!(table.lookup(0, 255, 0), 150);
    assert_eq!(table.lookup(255, 0, 0), 76);
    assert_eq!(table.lookup(0, 0, 255), 28);
}

#[test]
fn table_matches_direct_computation() {
    for formula in [GrayscaleFormula::AsObserved, GrayscaleFormula::Luma] {
        let table = formula.table();
        for red in (0..=255u8).step_by(17) {
            for green in (0..=255u8).step_by(51) {
                for blue in (0..=255u8).step_by(15) {
                    assert_eq!(
                        table.lookup(red, green, blue),
                        formula.gray_level(red, green, blue)
                    );
                }
            }
        }
    }
}

#[test]
fn built_table_equals_shared_table() {
    let built = LookupTable::build(GrayscaleFormula::Luma);
    let shared = GrayscaleFormula::Luma.table();
    assert_eq!(built.lookup(12, 34, 56), shared.lookup(12, 34, 56));
    assert_eq!(built.lookup(255, 255, 255), 255);
}

// ── idempotence ────────────────────────────────────────────────────

#[test]
fn gray_levels_map_to_themselves() {
    for formula in [GrayscaleFormula::AsObserved, GrayscaleFormula::Luma] {
        let table = formula.table();
        for level in 0..=255u8 {
            assert_eq!(table.lookup(level, level, level), level, "{formula:?} {level}");
        }
    }
}

#[test]
fn converting_twice_equals_converting_once() {
    for formula in [GrayscaleFormula::AsObserved, GrayscaleFormula::Luma] {
        let table = formula.table();
        let source = patterned(13, 7, 40);
        let once = table.convert(&source).expect("Failed to convert");
        let twice = table.convert(&once).expect("Failed to convert");
        assert_eq!(once, twice);
    }
}

// ── layout ─────────────────────────────────────────────────────────

#[test]
fn conversion_preserves_dimensions_and_stride() {
    let source = patterned(5, 4, 16);
    let gray = GrayscaleFormula::AsObserved
        .table()
        .convert(&source)
        .expect("Failed to convert");
    assert_eq!(gray.width(), 5);
    assert_eq!(gray.height(), 4);
    assert_eq!(gray.stride(), 16);
}

#[test]
fn conversion_fills_all_three_channels() {
    let source = patterned(9, 3, 32);
    let table = GrayscaleFormula::Luma.table();
    let gray = table.convert(&source).expect("Failed to convert");
    for y in 0..source.height() {
        for x in 0..source.width() {
            let [red, green, blue] = source.pixel(x, y);
            let level = table.lookup(red, green, blue);
            assert_eq!(gray.pixel(x, y), [level, level, level]);
        }
    }
}

#[test]
fn padding_bytes_are_not_treated_as_pixels() {
    // One pixel per row, five bytes of padding filled with white.
    let data = vec![
        255, 0, 0, 255, 255, 255, 255, 255, //
        0, 0, 0, 255, 255, 255, 255, 255,
    ];
    let source = PixelBuffer::from_raw(data, 1, 2, 8).expect("Failed to build pixel buffer");
    let gray = GrayscaleFormula::AsObserved
        .table()
        .convert(&source)
        .expect("Failed to convert");
    assert_eq!(gray.pixel(0, 0), [76, 76, 76]);
    assert_eq!(gray.pixel(0, 1), [0, 0, 0]);
    assert_eq!(&gray.as_bytes()[3..8], &[0, 0, 0, 0, 0]);
}
