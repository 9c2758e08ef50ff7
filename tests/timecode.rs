//! Time value parsing tests.

use std::time::Duration;

use framesplit::{FrameSplitError, timecode::parse_timecode};

fn parsed(value: &str) -> Duration {
    parse_timecode(value).expect("Failed to parse time value")
}

#[test]
fn plain_seconds() {
    assert_eq!(parsed("0"), Duration::ZERO);
    assert_eq!(parsed("12.5"), Duration::from_millis(12_500));
    assert_eq!(parsed(".25"), Duration::from_millis(250));
}

#[test]
fn minutes_and_seconds() {
    assert_eq!(parsed("01:15"), Duration::from_secs(75));
}

#[test]
fn hours_minutes_seconds() {
    assert_eq!(parsed("01:00:01.5"), Duration::from_millis(3_601_500));
}

#[test]
fn days_prefixed_with_dot() {
    assert_eq!(parsed("1.02:00:00"), Duration::from_secs(26 * 3_600));
}

#[test]
fn four_field_form() {
    assert_eq!(parsed("0:00:00:00.0040"), Duration::from_millis(4));
    assert_eq!(parsed("1:00:00:00"), Duration::from_secs(86_400));
}

#[test]
fn fraction_is_exact_to_the_nanosecond() {
    assert_eq!(parsed("0.000000001"), Duration::from_nanos(1));
    assert_eq!(parsed("0.0333333339"), Duration::from_nanos(33_333_333));
}

#[test]
fn surrounding_whitespace_is_ignored() {
    assert_eq!(parsed("  2 "), Duration::from_secs(2));
}

#[test]
fn malformed_values_are_rejected() {
    for value in ["", "   ", "-1", "abc", "1:2:3:4:5", "1:x", "1.2.3", "1e3", "::"] {
        assert!(
            matches!(parse_timecode(value), Err(FrameSplitError::Configuration(_))),
            "{value:?} should be rejected"
        );
    }
}

#[test]
fn out_of_range_values_are_rejected() {
    for value in [
        "300000000000000:00:00:00",
        "0:400000000000000000:00:00",
        "999999999999999999:00",
        "213503982334602.00:00:00",
        "18446744073709551615:00:00:59",
        "18446744073709551616",
    ] {
        assert!(
            matches!(parse_timecode(value), Err(FrameSplitError::Configuration(_))),
            "{value:?} should be rejected"
        );
    }
}

#[test]
fn largest_whole_second_count_is_accepted() {
    assert_eq!(
        parsed("18446744073709551615"),
        Duration::from_secs(u64::MAX)
    );
}
