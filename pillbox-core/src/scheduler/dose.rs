//! Dose entry

use crate::time::TimeOfDay;

/// Position of a dose in the sorted list
///
/// Ids are reassigned whenever the list is re-sorted or compacted.
pub type DoseId = u8;

/// A scheduled dose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dose {
    /// When the dose is due
    pub time: TimeOfDay,
    /// Disabled doses never alarm
    pub enabled: bool,
    /// Taken today; cleared at day rollover
    pub taken: bool,
}

impl Dose {
    /// New enabled, untaken dose
    pub fn new(time: TimeOfDay) -> Self {
        Self {
            time,
            enabled: true,
            taken: false,
        }
    }

    /// Still waiting to be taken today
    pub fn is_pending(&self) -> bool {
        self.enabled && !self.taken
    }
}
