//! Persisted data formats
//!
//! The core defines what is stored and how it is encoded; the firmware
//! decides where the bytes live.

pub mod key;
pub mod log;
pub mod records;

pub use key::{StorageError, StorageKey};
pub use log::{IntakeLog, LogEntry};
pub use records::{crc8, decode_doses, encode_doses, DOSE_RECORD_LEN, MAX_DOSE_BLOB_LEN};
