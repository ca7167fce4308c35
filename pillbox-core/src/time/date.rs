//! Calendar date and combined clock reading

use core::fmt;

use super::TimeOfDay;

/// Earliest year the clock accepts
pub const MIN_YEAR: u16 = 2000;
/// Latest year the clock accepts
pub const MAX_YEAR: u16 = 2099;

/// Calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    /// Day of month (1-31)
    pub day: u8,
    /// Month (1-12)
    pub month: u8,
    /// Four-digit year
    pub year: u16,
}

impl Date {
    /// Date the clock falls back to after losing power
    pub const FALLBACK: Self = Self::new(1, 1, 2024);

    pub const fn new(day: u8, month: u8, year: u16) -> Self {
        Self { day, month, year }
    }

    /// Range check only; day 31 is accepted for every month
    pub fn is_valid(&self) -> bool {
        (1..=31).contains(&self.day)
            && (1..=12).contains(&self.month)
            && (MIN_YEAR..=MAX_YEAR).contains(&self.year)
    }

    /// Days since 1970-01-01 (proleptic Gregorian)
    pub fn days_since_epoch(&self) -> i32 {
        let (y, m) = if self.month <= 2 {
            (self.year as i32 - 1, self.month as i32 + 9)
        } else {
            (self.year as i32, self.month as i32 - 3)
        };
        let era = y.div_euclid(400);
        let yoe = y - era * 400;
        let doy = (153 * m + 2) / 5 + self.day as i32 - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for Date {
    /// Renders as `DD/MM/YYYY`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

/// A full reading from the time source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    pub date: Date,
    pub time: TimeOfDay,
    /// Seconds (0-59)
    pub second: u8,
}

impl DateTime {
    /// Reading used when the clock is unavailable: 12:00 PM, 1 Jan 2024
    pub const FALLBACK: Self = Self {
        date: Date::FALLBACK,
        time: TimeOfDay::NOON,
        second: 0,
    };

    pub const fn new(date: Date, time: TimeOfDay, second: u8) -> Self {
        Self { date, time, second }
    }

    /// Seconds since the Unix epoch, treating the clock as UTC
    pub fn unix_timestamp(&self) -> u32 {
        let days = self.date.days_since_epoch().max(0) as u32;
        days * 86_400 + self.time.minute_of_day() as u32 * 60 + self.second as u32
    }
}
