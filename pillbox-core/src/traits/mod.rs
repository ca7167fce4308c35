//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations. All calls are synchronous and
//! short; the controller runs them from its single loop.

pub mod buzzer;
pub mod clock;
pub mod display;

pub use buzzer::Buzzer;
pub use clock::{Clock, ClockError};
pub use display::{Display, DisplayError};
