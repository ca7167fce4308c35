//! Configuration types
//!
//! Timing constants, capacity limits, and the user settings stored as
//! postcard binary data.

pub mod settings;
pub mod timing;

pub use settings::*;
pub use timing::*;
