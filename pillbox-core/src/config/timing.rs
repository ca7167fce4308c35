//! Timing configuration
//!
//! Every duration the controller waits on, in one place. All values are
//! compared against wrap-safe elapsed milliseconds.

/// Button debounce window (ms)
pub const DEBOUNCE_MS: u32 = 50;

/// Hold time for a long press (ms)
pub const LONG_PRESS_MS: u32 = 3000;

/// Lid level must be stable this long before an edge is reported (ms)
pub const LID_STABLE_MS: u32 = 500;

/// Inactivity before the display sleeps (ms)
pub const SCREEN_TIMEOUT_MS: u32 = 180_000;

/// Snooze duration (s)
pub const SNOOZE_SECS: u16 = 300;

/// Interval between dose-time and day-rollover checks (ms)
pub const POLL_INTERVAL_MS: u32 = 1000;

/// How long a transient message stays on screen (ms)
pub const MESSAGE_MS: u32 = 1500;

/// Controller timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub debounce_ms: u32,
    pub long_press_ms: u32,
    pub lid_stable_ms: u32,
    pub screen_timeout_ms: u32,
    pub snooze_secs: u16,
    pub poll_interval_ms: u32,
    pub message_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
            long_press_ms: LONG_PRESS_MS,
            lid_stable_ms: LID_STABLE_MS,
            screen_timeout_ms: SCREEN_TIMEOUT_MS,
            snooze_secs: SNOOZE_SECS,
            poll_interval_ms: POLL_INTERVAL_MS,
            message_ms: MESSAGE_MS,
        }
    }
}
