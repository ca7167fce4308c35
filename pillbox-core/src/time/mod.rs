//! Wall-clock and monotonic time types
//!
//! Wall-clock values use the 12-hour representation shown to the user;
//! comparisons go through minute-of-day. Monotonic timestamps are `u32`
//! milliseconds that wrap after ~49.7 days, so every timeout is computed
//! with [`elapsed`].

mod date;
mod of_day;

pub use date::{Date, DateTime, MAX_YEAR, MIN_YEAR};
pub use of_day::{TimeOfDay, MINUTES_PER_DAY};

/// Milliseconds elapsed from `since` to `now`, correct across counter wrap
#[inline]
pub fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_simple() {
        assert_eq!(elapsed(1500, 1000), 500);
        assert_eq!(elapsed(1000, 1000), 0);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        let before = u32::MAX - 99;
        let after = 400;
        assert_eq!(elapsed(after, before), 500);
    }
}
