//! Multi-field value editors
//!
//! NEXT bumps the selected field, OK moves right and BACK moves left. Moving
//! right past the last field commits; moving left from the first abandons.

use crate::time::{Date, TimeOfDay, MAX_YEAR};

/// Year the date editor wraps back to
const YEAR_WRAP_TO: u16 = 2024;

/// A value edited one field at a time
pub trait Editable: Copy {
    /// Number of editable fields
    const FIELDS: u8;

    /// Bump `field` by one, wrapping within its range
    fn increment(&mut self, field: u8);
}

impl Editable for TimeOfDay {
    /// hour, minute, AM/PM
    const FIELDS: u8 = 3;

    fn increment(&mut self, field: u8) {
        match field {
            0 => self.hour = self.hour % 12 + 1,
            1 => self.minute = (self.minute + 1) % 60,
            _ => self.pm = !self.pm,
        }
    }
}

impl Editable for Date {
    /// day, month, year
    const FIELDS: u8 = 3;

    fn increment(&mut self, field: u8) {
        match field {
            0 => self.day = self.day % 31 + 1,
            1 => self.month = self.month % 12 + 1,
            _ => {
                self.year = if self.year >= MAX_YEAR {
                    YEAR_WRAP_TO
                } else {
                    self.year + 1
                }
            }
        }
    }
}

/// Result of moving the field cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditStep {
    /// Still editing
    Continue,
    /// Moved past the last field
    Commit,
    /// Moved back from the first field
    Abandon,
}

/// Value under edit plus the selected field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldEdit<T> {
    pub value: T,
    pub field: u8,
}

impl<T: Editable> FieldEdit<T> {
    pub fn new(value: T) -> Self {
        Self { value, field: 0 }
    }

    pub fn increment(&mut self) {
        self.value.increment(self.field);
    }

    pub fn on_last_field(&self) -> bool {
        self.field + 1 >= T::FIELDS
    }

    pub fn advance(&mut self) -> EditStep {
        if self.on_last_field() {
            EditStep::Commit
        } else {
            self.field += 1;
            EditStep::Continue
        }
    }

    pub fn retreat(&mut self) -> EditStep {
        if self.field == 0 {
            EditStep::Abandon
        } else {
            self.field -= 1;
            EditStep::Continue
        }
    }
}
