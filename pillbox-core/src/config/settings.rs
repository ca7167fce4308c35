//! Persisted user settings and capacity limits

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of scheduled doses
pub const MAX_DOSES: usize = 10;

/// Minimum circular distance between two doses (minutes)
pub const MIN_DOSE_SPACING_MIN: u16 = 15;

/// Intake log capacity (oldest entries are overwritten)
pub const MAX_LOG_ENTRIES: usize = 100;

/// Persisted record format version
pub const STORAGE_VERSION: u8 = 1;

/// Default buzzer volume (0-255)
pub const DEFAULT_VOLUME: u8 = 128;

/// User settings that survive a power cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Dose alarms enabled
    pub alarm_enabled: bool,
    /// All sound suppressed, alarms included
    pub mute: bool,
    /// Buzzer volume (0-255)
    pub volume: u8,
}

impl Settings {
    /// Whether a dose alarm may sound at all
    pub fn alarms_audible(&self) -> bool {
        self.alarm_enabled && !self.mute
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alarm_enabled: true,
            mute: false,
            volume: DEFAULT_VOLUME,
        }
    }
}
