//! Dose scheduling
//!
//! The scheduler owns the dose list. It keeps the list sorted by time of
//! day, enforces the minimum spacing between doses, and answers the two
//! questions the controller asks every poll: "is a dose due now?" and
//! "when is the next one?".

pub mod dose;
pub mod schedule;

pub use dose::{Dose, DoseId};
pub use schedule::{DoseScheduler, ScheduleError};
