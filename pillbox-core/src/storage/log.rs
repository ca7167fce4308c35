//! Intake log
//!
//! Fixed-capacity ring of lid openings, whether they confirmed a due dose
//! or happened outside an alert. Once full, the oldest entry is
//! overwritten; the running total keeps counting.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::MAX_LOG_ENTRIES;
use crate::scheduler::DoseId;

/// One lid opening
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogEntry {
    /// Unix seconds
    pub timestamp: u32,
    /// Dose that was due, if any
    pub dose: Option<DoseId>,
    /// Taken while the alert for the dose was live
    pub on_time: bool,
}

/// Bounded intake history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntakeLog {
    entries: Vec<LogEntry, MAX_LOG_ENTRIES>,
    /// Slot the next entry overwrites once full
    next: u8,
    /// Entries ever recorded (saturating)
    total: u16,
}

impl IntakeLog {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next: 0,
            total: 0,
        }
    }

    pub fn record(&mut self, entry: LogEntry) {
        if self.entries.is_full() {
            self.entries[self.next as usize] = entry;
        } else {
            // Cannot fail: checked above
            let _ = self.entries.push(entry);
        }
        self.next = ((self.next as usize + 1) % MAX_LOG_ENTRIES) as u8;
        self.total = self.total.saturating_add(1);
    }

    /// Whether the write cursor agrees with the entries held
    ///
    /// A log that was not built through `record` (e.g. decoded from flash)
    /// must pass this before it is used.
    pub fn is_valid(&self) -> bool {
        let next = self.next as usize;
        if self.entries.is_full() {
            next < MAX_LOG_ENTRIES
        } else {
            next == self.entries.len() && self.total as usize >= self.entries.len()
        }
    }

    /// Entries ever recorded, including overwritten ones
    pub fn total(&self) -> u16 {
        self.total
    }

    /// Entries currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Held entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        let start = if self.entries.is_full() {
            self.next as usize
        } else {
            0
        };
        let (newer, older) = self.entries.split_at(start);
        older.iter().chain(newer.iter())
    }

    /// The `n` most recent entries, oldest first
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &LogEntry> + '_ {
        self.iter().skip(self.len().saturating_sub(n))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next = 0;
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: u32) -> LogEntry {
        LogEntry {
            timestamp,
            dose: Some(0),
            on_time: true,
        }
    }

    #[test]
    fn test_record_below_capacity() {
        let mut log = IntakeLog::new();
        log.record(entry(1));
        log.record(entry(2));
        assert_eq!(log.len(), 2);
        assert_eq!(log.total(), 2);
        let stamps: heapless::Vec<u32, 4> = log.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_wraps_and_keeps_order() {
        let mut log = IntakeLog::new();
        for t in 0..(MAX_LOG_ENTRIES as u32 + 5) {
            log.record(entry(t));
        }
        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        assert_eq!(log.total(), MAX_LOG_ENTRIES as u16 + 5);

        let first = log.iter().next().unwrap();
        assert_eq!(first.timestamp, 5);
        let last = log.iter().last().unwrap();
        assert_eq!(last.timestamp, MAX_LOG_ENTRIES as u32 + 4);

        let recent: heapless::Vec<u32, 3> = log.latest(3).map(|e| e.timestamp).collect();
        let top = MAX_LOG_ENTRIES as u32 + 4;
        assert_eq!(recent.as_slice(), &[top - 2, top - 1, top]);
    }

    #[test]
    fn test_cursor_checked() {
        let mut log = IntakeLog::new();
        assert!(log.is_valid());
        for t in 0..(MAX_LOG_ENTRIES as u32 + 3) {
            log.record(entry(t));
        }
        assert!(log.is_valid());

        let mut bad = log.clone();
        bad.next = 150;
        assert!(!bad.is_valid());

        let mut partial = IntakeLog::new();
        partial.record(entry(1));
        partial.next = 0;
        assert!(!partial.is_valid());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_decoded_cursor_out_of_range_is_rejected() {
        let mut log = IntakeLog::new();
        for t in 0..MAX_LOG_ENTRIES as u32 {
            log.record(entry(t));
        }
        let mut buffer = [0u8; 1024];
        let len = postcard::to_slice(&log, &mut buffer).unwrap().len();

        // Trailing fields: `next` (raw byte) then `total` (varint, 100 fits one byte)
        assert_eq!(buffer[len - 1], MAX_LOG_ENTRIES as u8);
        let next_at = len - 2;
        assert_eq!(buffer[next_at], 0);
        buffer[next_at] = 150;

        let decoded: IntakeLog = postcard::from_bytes(&buffer[..len]).unwrap();
        assert_eq!(decoded.next, 150);
        assert!(!decoded.is_valid());
    }

    #[test]
    fn test_clear() {
        let mut log = IntakeLog::new();
        log.record(entry(1));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.total(), 0);
    }
}
