//! 12-hour time of day

use core::cmp::Ordering;
use core::fmt;

/// Minutes in a day
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Time of day at minute granularity, 12-hour form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeOfDay {
    /// Hour (1-12)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Afternoon flag
    pub pm: bool,
}

impl TimeOfDay {
    /// 12:00 AM
    pub const MIDNIGHT: Self = Self::new(12, 0, false);
    /// 12:00 PM
    pub const NOON: Self = Self::new(12, 0, true);

    pub const fn new(hour: u8, minute: u8, pm: bool) -> Self {
        Self { hour, minute, pm }
    }

    /// Build from a 24-hour clock reading
    pub fn from_hour24(hour: u8, minute: u8) -> Self {
        let pm = hour >= 12;
        let hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        Self { hour, minute, pm }
    }

    /// Check that hour is 1-12 and minute is 0-59
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.hour) && self.minute <= 59
    }

    /// Hour on the 24-hour clock (12 AM = 0, 12 PM = 12)
    pub fn hour24(&self) -> u8 {
        let base = self.hour % 12;
        if self.pm {
            base + 12
        } else {
            base
        }
    }

    /// Canonical comparison form, 0-1439
    pub fn minute_of_day(&self) -> u16 {
        self.hour24() as u16 * 60 + self.minute as u16
    }

    /// Inverse of [`minute_of_day`](Self::minute_of_day); wraps past a day
    pub fn from_minute_of_day(minutes: u16) -> Self {
        let minutes = minutes % MINUTES_PER_DAY;
        Self::from_hour24((minutes / 60) as u8, (minutes % 60) as u8)
    }

    /// Shortest distance around the clock face, in minutes (0-720)
    pub fn circular_distance(&self, other: &TimeOfDay) -> u16 {
        let diff = self.minute_of_day().abs_diff(other.minute_of_day());
        if diff > MINUTES_PER_DAY / 2 {
            MINUTES_PER_DAY - diff
        } else {
            diff
        }
    }

    /// Minutes from `self` forward to `target`; zero when equal
    pub fn minutes_until(&self, target: &TimeOfDay) -> u16 {
        let now = self.minute_of_day();
        let then = target.minute_of_day();
        if then >= now {
            then - now
        } else {
            MINUTES_PER_DAY - now + then
        }
    }

    pub fn meridiem(&self) -> &'static str {
        if self.pm {
            "PM"
        } else {
            "AM"
        }
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.minute_of_day().cmp(&other.minute_of_day())
    }
}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimeOfDay {
    /// Renders as ` 8:05 AM`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:2}:{:02} {}", self.hour, self.minute, self.meridiem())
    }
}
