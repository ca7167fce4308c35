//! Fixed-layout payload records
//!
//! Multi-byte integers are little-endian.

use crate::frame::FrameError;

/// Time of day: `[hour 1-12][minute][pm 0/1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WireTime {
    pub hour: u8,
    pub minute: u8,
    pub pm: bool,
}

impl WireTime {
    pub const LEN: usize = 3;

    pub fn to_bytes(self) -> [u8; Self::LEN] {
        [self.hour, self.minute, self.pm as u8]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        match bytes {
            [hour, minute, pm, ..] => Ok(Self {
                hour: *hour,
                minute: *minute,
                pm: *pm != 0,
            }),
            _ => Err(FrameError::InvalidMessage),
        }
    }
}

/// Calendar date: `[day][month][year u16]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WireDate {
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl WireDate {
    pub const LEN: usize = 4;

    pub fn to_bytes(self) -> [u8; Self::LEN] {
        let [lo, hi] = self.year.to_le_bytes();
        [self.day, self.month, lo, hi]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        match bytes {
            [day, month, lo, hi, ..] => Ok(Self {
                day: *day,
                month: *month,
                year: u16::from_le_bytes([*lo, *hi]),
            }),
            _ => Err(FrameError::InvalidMessage),
        }
    }
}

/// Dose entry: `[id][time 3B][enabled][taken]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WireDose {
    pub id: u8,
    pub time: WireTime,
    pub enabled: bool,
    pub taken: bool,
}

impl WireDose {
    pub const LEN: usize = 6;

    pub fn to_bytes(self) -> [u8; Self::LEN] {
        let [h, m, pm] = self.time.to_bytes();
        [self.id, h, m, pm, self.enabled as u8, self.taken as u8]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < Self::LEN {
            return Err(FrameError::InvalidMessage);
        }
        Ok(Self {
            id: bytes[0],
            time: WireTime::from_bytes(&bytes[1..4])?,
            enabled: bytes[4] != 0,
            taken: bytes[5] != 0,
        })
    }
}

/// Dose id meaning "no dose" in a log entry
pub const NO_DOSE: u8 = 0xFF;

/// Intake log entry: `[timestamp u32][dose id or 0xFF][on_time]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WireLogEntry {
    pub timestamp: u32,
    pub dose: Option<u8>,
    pub on_time: bool,
}

impl WireLogEntry {
    pub const LEN: usize = 6;

    pub fn to_bytes(self) -> [u8; Self::LEN] {
        let [a, b, c, d] = self.timestamp.to_le_bytes();
        [a, b, c, d, self.dose.unwrap_or(NO_DOSE), self.on_time as u8]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < Self::LEN {
            return Err(FrameError::InvalidMessage);
        }
        Ok(Self {
            timestamp: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            dose: match bytes[4] {
                NO_DOSE => None,
                id => Some(id),
            },
            on_time: bytes[5] != 0,
        })
    }
}

/// Status snapshot served to the configuration API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WireStatus {
    pub time: WireTime,
    pub date: WireDate,
    pub dose_count: u8,
    pub doses_taken: u8,
    /// Minutes to the next pending dose, `None` if nothing is pending
    pub minutes_to_next: Option<u16>,
    pub alarm_enabled: bool,
    pub alarm_active: bool,
    pub snoozed: bool,
    pub time_edit_unlocked: bool,
    /// Lid switch has produced a reading
    pub lid_sensor: bool,
}

const FLAG_ALARM_ENABLED: u8 = 1 << 0;
const FLAG_ALARM_ACTIVE: u8 = 1 << 1;
const FLAG_SNOOZED: u8 = 1 << 2;
const FLAG_TIME_UNLOCKED: u8 = 1 << 3;
const FLAG_LID_SENSOR: u8 = 1 << 4;

impl WireStatus {
    pub const LEN: usize = WireTime::LEN + WireDate::LEN + 5;

    pub fn to_bytes(self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[0..3].copy_from_slice(&self.time.to_bytes());
        out[3..7].copy_from_slice(&self.date.to_bytes());
        out[7] = self.dose_count;
        out[8] = self.doses_taken;
        out[9..11].copy_from_slice(&self.minutes_to_next.unwrap_or(u16::MAX).to_le_bytes());

        let mut flags = 0;
        if self.alarm_enabled {
            flags |= FLAG_ALARM_ENABLED;
        }
        if self.alarm_active {
            flags |= FLAG_ALARM_ACTIVE;
        }
        if self.snoozed {
            flags |= FLAG_SNOOZED;
        }
        if self.time_edit_unlocked {
            flags |= FLAG_TIME_UNLOCKED;
        }
        if self.lid_sensor {
            flags |= FLAG_LID_SENSOR;
        }
        out[11] = flags;
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < Self::LEN {
            return Err(FrameError::InvalidMessage);
        }
        let minutes = u16::from_le_bytes([bytes[9], bytes[10]]);
        let flags = bytes[11];
        Ok(Self {
            time: WireTime::from_bytes(&bytes[0..3])?,
            date: WireDate::from_bytes(&bytes[3..7])?,
            dose_count: bytes[7],
            doses_taken: bytes[8],
            minutes_to_next: (minutes != u16::MAX).then_some(minutes),
            alarm_enabled: flags & FLAG_ALARM_ENABLED != 0,
            alarm_active: flags & FLAG_ALARM_ACTIVE != 0,
            snoozed: flags & FLAG_SNOOZED != 0,
            time_edit_unlocked: flags & FLAG_TIME_UNLOCKED != 0,
            lid_sensor: flags & FLAG_LID_SENSOR != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_year_little_endian() {
        let date = WireDate {
            day: 15,
            month: 6,
            year: 2025,
        };
        assert_eq!(date.to_bytes(), [15, 6, 0xE9, 0x07]);
    }

    #[test]
    fn test_log_entry_without_dose() {
        let entry = WireLogEntry {
            timestamp: 1_704_110_400,
            dose: None,
            on_time: false,
        };
        let bytes = entry.to_bytes();
        assert_eq!(bytes[4], NO_DOSE);
        assert_eq!(WireLogEntry::from_bytes(&bytes), Ok(entry));
    }

    #[test]
    fn test_status_flags_and_no_next_dose() {
        let status = WireStatus {
            time: WireTime {
                hour: 8,
                minute: 0,
                pm: false,
            },
            date: WireDate {
                day: 1,
                month: 1,
                year: 2024,
            },
            dose_count: 3,
            doses_taken: 1,
            minutes_to_next: None,
            alarm_enabled: true,
            alarm_active: false,
            snoozed: true,
            time_edit_unlocked: false,
            lid_sensor: true,
        };
        let bytes = status.to_bytes();
        assert_eq!(&bytes[9..11], &[0xFF, 0xFF]);
        assert_eq!(bytes[11], FLAG_ALARM_ENABLED | FLAG_SNOOZED | FLAG_LID_SENSOR);
        assert_eq!(WireStatus::from_bytes(&bytes), Ok(status));
    }

    #[test]
    fn test_truncated_records_rejected() {
        assert_eq!(WireTime::from_bytes(&[8, 0]), Err(FrameError::InvalidMessage));
        assert_eq!(WireDose::from_bytes(&[0; 5]), Err(FrameError::InvalidMessage));
        assert_eq!(WireStatus::from_bytes(&[0; 11]), Err(FrameError::InvalidMessage));
    }
}
