//! Storage keys and errors

/// Keys for the persisted key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Dose records (see [`records`](super::records))
    Doses = 0,
    /// User settings (postcard)
    Settings = 1,
    /// Day of month seen at the last rollover
    LastDay = 2,
    /// Intake log ring (postcard)
    IntakeLog = 3,
}

impl StorageKey {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::Doses),
            1 => Some(StorageKey::Settings),
            2 => Some(StorageKey::LastDay),
            3 => Some(StorageKey::IntakeLog),
            _ => None,
        }
    }
}

/// Errors from persisting or restoring data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Flash operation failed
    Flash,
    /// Key not present
    NotFound,
    /// Fewer bytes than the header promised
    ShortRead,
    /// Record count above capacity
    BadCount,
    /// Checksum mismatch
    Corrupted,
    /// Written by a newer firmware
    UnsupportedVersion(u8),
    /// Output buffer too small
    BufferTooSmall,
    /// Encoding failed
    Serialize,
    /// Decoding failed
    Deserialize,
}

#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match StorageKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}
