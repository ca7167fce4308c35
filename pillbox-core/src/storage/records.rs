//! Dose record codec
//!
//! Blob layout:
//! - VERSION (1 byte)
//! - COUNT (1 byte): number of records (0-10)
//! - RECORDS (4 bytes each): hour, minute, pm (0/1), enabled (0/1)
//! - CRC (1 byte): CRC-8 (poly 0x07, init 0x00) over RECORDS
//!
//! The taken flag is not stored; every dose loads as not taken.

use heapless::Vec;

use super::StorageError;
use crate::config::{MAX_DOSES, STORAGE_VERSION};
use crate::scheduler::Dose;
use crate::time::TimeOfDay;

/// Bytes per stored dose
pub const DOSE_RECORD_LEN: usize = 4;

/// Largest encoded blob
pub const MAX_DOSE_BLOB_LEN: usize = 2 + MAX_DOSES * DOSE_RECORD_LEN + 1;

/// CRC-8, polynomial 0x07, initial value 0, MSB first
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Encode `doses` into `buffer`; returns bytes written
pub fn encode_doses(doses: &[Dose], buffer: &mut [u8]) -> Result<usize, StorageError> {
    if doses.len() > MAX_DOSES {
        return Err(StorageError::BadCount);
    }
    let records_len = doses.len() * DOSE_RECORD_LEN;
    let total = 2 + records_len + 1;
    if buffer.len() < total {
        return Err(StorageError::BufferTooSmall);
    }

    buffer[0] = STORAGE_VERSION;
    buffer[1] = doses.len() as u8;
    for (i, dose) in doses.iter().enumerate() {
        let offset = 2 + i * DOSE_RECORD_LEN;
        buffer[offset] = dose.time.hour;
        buffer[offset + 1] = dose.time.minute;
        buffer[offset + 2] = dose.time.pm as u8;
        buffer[offset + 3] = dose.enabled as u8;
    }
    buffer[2 + records_len] = crc8(&buffer[2..2 + records_len]);

    Ok(total)
}

/// Decode a blob into `(time, enabled)` pairs
///
/// The pairs are not validated against the schedule rules; feed them
/// through [`DoseScheduler::restore`](crate::scheduler::DoseScheduler::restore).
pub fn decode_doses(bytes: &[u8]) -> Result<Vec<(TimeOfDay, bool), MAX_DOSES>, StorageError> {
    if bytes.len() < 2 {
        return Err(StorageError::ShortRead);
    }

    let version = bytes[0];
    if version > STORAGE_VERSION {
        return Err(StorageError::UnsupportedVersion(version));
    }
    if version < STORAGE_VERSION {
        migrate(version);
    }

    let count = bytes[1] as usize;
    if count > MAX_DOSES {
        return Err(StorageError::BadCount);
    }

    let records_len = count * DOSE_RECORD_LEN;
    if bytes.len() < 2 + records_len + 1 {
        return Err(StorageError::ShortRead);
    }
    let records = &bytes[2..2 + records_len];
    if crc8(records) != bytes[2 + records_len] {
        warn!("Dose records CRC mismatch");
        return Err(StorageError::Corrupted);
    }

    let mut out = Vec::new();
    for chunk in records.chunks_exact(DOSE_RECORD_LEN) {
        let time = TimeOfDay::new(chunk[0], chunk[1], chunk[2] == 1);
        out.push((time, chunk[3] == 1))
            .map_err(|_| StorageError::BadCount)?;
    }
    Ok(out)
}

/// Upgrade hook for older layouts
///
/// Every version so far shares the current record layout.
fn migrate(from: u8) {
    info!("Migrating dose records from version {}", from);
}
