//! Display sink

use crate::view::View;

/// Errors from the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Controller did not respond during init
    InitFailed,
    /// Bus transfer failed
    Bus,
}

/// Screen that can draw any [`View`]
///
/// Layout and fonts are the implementation's business; the controller only
/// decides what is shown.
pub trait Display {
    /// Replace the screen contents with `view`
    fn render(&mut self, view: &View) -> Result<(), DisplayError>;

    /// Panel power (sleep when off)
    fn set_power(&mut self, on: bool) -> Result<(), DisplayError>;
}
