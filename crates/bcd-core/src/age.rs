//! Age derived from date of birth.
//!
//! Age is computed by subtracting calendar years only. Month and day are
//! ignored, so a birthday later in the year still counts. This matches the
//! form the screening staff have always used and is kept as-is.

use std::ops::RangeInclusive;

use jiff::civil::Date;

/// Values the age field accepts. Anything outside saturates to the bounds.
pub const AGE_RANGE: RangeInclusive<u8> = 18..=100;

/// Years between `date_of_birth` and `today` by calendar-year subtraction,
/// saturated into [`AGE_RANGE`].
pub fn age_from_birth_year(date_of_birth: Date, today: Date) -> u8 {
    let years = i32::from(today.year()) - i32::from(date_of_birth.year());
    clamp_age(years)
}

/// Saturate an arbitrary age into [`AGE_RANGE`].
pub fn clamp_age(years: i32) -> u8 {
    let min = i32::from(*AGE_RANGE.start());
    let max = i32::from(*AGE_RANGE.end());
    // Clamped into 18..=100, so the narrowing cast cannot truncate.
    years.clamp(min, max) as u8
}
