use chrono::{TimeZone, Utc};
use tiktok_uploader::schedule::{is_valid, round_to_multiple, validate, MINUTE_MULTIPLE};
use tiktok_uploader::Error;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

#[test]
fn round_keeps_aligned_minutes() {
    let t = at(2020, 1, 1, 12, 35);
    assert_eq!(round_to_multiple(t, 5), t);
}

#[test]
fn round_advances_forward_only() {
    assert_eq!(
        round_to_multiple(at(2020, 1, 1, 12, 31), 5),
        at(2020, 1, 1, 12, 35)
    );
    assert_eq!(
        round_to_multiple(at(2020, 1, 1, 12, 34), 5),
        at(2020, 1, 1, 12, 35)
    );
}

#[test]
fn round_carries_the_hour_and_day() {
    assert_eq!(
        round_to_multiple(at(2020, 1, 1, 12, 58), 5),
        at(2020, 1, 1, 13, 0)
    );
    assert_eq!(
        round_to_multiple(at(2020, 1, 31, 23, 59), 5),
        at(2020, 2, 1, 0, 0)
    );
}

#[test]
fn round_is_idempotent() {
    let t = at(2020, 1, 1, 12, 56);
    let once = round_to_multiple(t, MINUTE_MULTIPLE);
    assert_eq!(round_to_multiple(once, MINUTE_MULTIPLE), once);
}

#[test]
fn twenty_minute_floor_is_inclusive() {
    let now = at(2020, 1, 1, 12, 0);
    assert!(is_valid(now, at(2020, 1, 1, 12, 20)));
    // the site's own 15-minute floor passes, the form-fill margin does not
    assert!(!is_valid(now, at(2020, 1, 1, 12, 15)));
}

#[test]
fn ten_day_ceiling_is_inclusive() {
    let now = at(2020, 1, 1, 12, 0);
    assert!(is_valid(now, at(2020, 1, 11, 12, 0)));
    assert!(!is_valid(now, at(2020, 1, 11, 12, 5)));
}

#[test]
fn minute_granularity_is_enforced() {
    let now = at(2020, 1, 1, 12, 0);
    assert!(is_valid(now, at(2020, 1, 2, 12, 0)));
    for minute in 1..5 {
        assert!(!is_valid(now, at(2020, 1, 2, 12, minute)), "minute {minute}");
    }
    assert!(is_valid(now, at(2020, 1, 2, 12, 5)));
}

#[test]
fn validate_coerces_granularity() {
    let now = at(2020, 1, 1, 12, 0);
    let coerced = validate(now, at(2020, 1, 2, 12, 3)).expect("valid after coercion");
    assert_eq!(coerced, at(2020, 1, 2, 12, 5));
}

#[test]
fn validate_rejects_times_outside_the_window() {
    let now = at(2020, 1, 1, 12, 0);
    for bad in [at(2020, 1, 1, 12, 10), at(2020, 1, 12, 12, 0)] {
        let err = validate(now, bad).unwrap_err();
        assert!(matches!(err, Error::InvalidSchedule(_)), "got: {err}");
    }
}

#[test]
fn validate_rejects_when_coercion_crosses_the_ceiling() {
    let now = at(2020, 1, 1, 12, 0);
    // rounds forward to 12:05, one step past the 10-day ceiling
    let err = validate(now, at(2020, 1, 11, 12, 2)).unwrap_err();
    assert!(matches!(err, Error::InvalidSchedule(_)), "got: {err}");
}
