//! Audible alarm
//!
//! The engine is pure timing state: it decides when the buzzer should be on
//! and the controller copies that level to the [`Buzzer`](crate::traits::Buzzer).

pub mod engine;
pub mod pattern;
pub mod tone;

pub use engine::{AlarmEngine, AlarmState};
pub use pattern::Pattern;
pub use tone::{Chirp, Tone};
