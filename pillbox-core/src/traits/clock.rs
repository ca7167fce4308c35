//! Wall-clock time source

use crate::time::{Date, DateTime, TimeOfDay};

/// Errors from the time source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Device did not answer
    NotFound,
    /// Bus transfer failed
    Bus,
    /// Device returned an impossible reading
    InvalidReading,
    /// Rejected time value
    InvalidTime,
    /// Rejected date value
    InvalidDate,
}

/// Battery-backed real-time clock
pub trait Clock {
    /// Current date and time
    fn now(&mut self) -> Result<DateTime, ClockError>;

    /// Set the time of day; seconds are zeroed and the date is kept
    fn set_time(&mut self, time: TimeOfDay) -> Result<(), ClockError>;

    /// Set the date; the time of day is kept
    fn set_date(&mut self, date: Date) -> Result<(), ClockError>;

    /// Whether the clock stopped since it was last set
    fn lost_power(&mut self) -> Result<bool, ClockError>;

    /// Set date and time together, clearing the lost-power flag
    fn set_datetime(&mut self, datetime: DateTime) -> Result<(), ClockError> {
        self.set_date(datetime.date)?;
        self.set_time(datetime.time)
    }
}
