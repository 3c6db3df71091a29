//! Validation of scheduled publish times against TikTok's constraints.
//!
//! All functions are pure; `now` is always passed in so callers (and tests)
//! control the clock.

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::error::{Error, Result};

/// TikTok's scheduler only accepts minutes on this multiple.
pub const MINUTE_MULTIPLE: u32 = 5;

/// Minimum lead time imposed by the site itself.
pub const SITE_MIN_LEAD_MINUTES: i64 = 15;

/// Extra lead reserved for finishing the on-screen form before the
/// scheduled instant arrives.
pub const FORM_FILL_MARGIN_MINUTES: i64 = 5;

/// Maximum lead window accepted by the site.
pub const MAX_LEAD_DAYS: i64 = 10;

/// Round `when` forward to the next minute that is a multiple of `multiple`.
///
/// A time already on the multiple is returned unchanged, so the function is
/// idempotent. Rounding never moves backward; the hour and day carry over.
pub fn round_to_multiple(when: DateTime<Utc>, multiple: u32) -> DateTime<Utc> {
    let remainder = when.minute() % multiple;
    if remainder == 0 {
        when
    } else {
        when + Duration::minutes(i64::from(multiple - remainder))
    }
}

/// Whether `when` is a publish time the site will accept, given `now`.
///
/// Valid iff `now + 20min <= when <= now + 10days` (both bounds inclusive)
/// and the minute is a multiple of [`MINUTE_MULTIPLE`].
pub fn is_valid(now: DateTime<Utc>, when: DateTime<Utc>) -> bool {
    let earliest = now + Duration::minutes(SITE_MIN_LEAD_MINUTES + FORM_FILL_MARGIN_MINUTES);
    let latest = now + Duration::days(MAX_LEAD_DAYS);
    when >= earliest && when <= latest && when.minute() % MINUTE_MULTIPLE == 0
}

/// Coerce `when` onto the accepted minute granularity, then range-check it.
///
/// Only the granularity is coerced; a time outside the lead window is an
/// error, not silently moved.
pub fn validate(now: DateTime<Utc>, when: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let when = round_to_multiple(when, MINUTE_MULTIPLE);
    if is_valid(now, when) {
        Ok(when)
    } else {
        Err(Error::InvalidSchedule(format!(
            "{when} must be at least {} minutes and at most {MAX_LEAD_DAYS} days in the future",
            SITE_MIN_LEAD_MINUTES + FORM_FILL_MARGIN_MINUTES,
        )))
    }
}
