//! Persistent storage in on-chip flash
//!
//! Uses sequential-storage for wear-leveled key-value storage in the last
//! 64KB of flash. Settings and the intake log are postcard-encoded; dose
//! records use the CRC-checked layout from `pillbox_core::storage`.

use defmt::*;
use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use heapless::Vec;
use pillbox_core::config::{Settings, MAX_DOSES};
use pillbox_core::controller::{Effect, Restored};
use pillbox_core::scheduler::Dose;
use pillbox_core::time::TimeOfDay;
use pillbox_core::storage::{
    decode_doses, encode_doses, IntakeLog, StorageError, StorageKey, MAX_DOSE_BLOB_LEN,
};

use crate::board::BoardController;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024;
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

/// Flash range for the settings partition
pub const CONFIG_RANGE: core::ops::Range<u32> =
    (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Largest stored item (the intake log)
const MAX_ITEM_SIZE: usize = 1024;

/// Scratch space for sequential-storage (item plus its header)
const DATA_BUFFER_SIZE: usize = MAX_ITEM_SIZE + 32;

/// Key-value store for everything that survives a power cycle
pub struct FlashStore<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> FlashStore<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Copy the item stored under `key` into `buffer`; returns its length
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(StorageError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(StorageError::NotFound),
            Err(_) => Err(StorageError::Flash),
        }
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        map::store_item(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        )
        .await
        .map_err(|_| StorageError::Flash)
    }

    /// Wipe the partition
    pub async fn erase_all(&mut self) -> Result<(), StorageError> {
        self.flash
            .erase(CONFIG_PARTITION_START as u32, FLASH_SIZE as u32)
            .await
            .map_err(|_| StorageError::Flash)
    }

    /// Everything needed to resume after a power cycle
    ///
    /// Missing or damaged items are left out; the controller falls back to
    /// defaults for them.
    pub async fn load(&mut self) -> Restored {
        let mut restored = Restored::default();

        restored.settings = report(StorageKey::Settings, self.load_settings().await);
        if let Some(doses) = report(StorageKey::Doses, self.load_doses().await) {
            restored.doses = doses;
        }
        restored.last_day = report(StorageKey::LastDay, self.load_last_day().await);
        restored.log = report(StorageKey::IntakeLog, self.load_log().await);

        info!(
            "Restored {} doses, settings: {}, log: {}",
            restored.doses.len(),
            restored.settings.is_some(),
            restored.log.is_some()
        );
        restored
    }

    async fn load_settings(&mut self) -> Result<Settings, StorageError> {
        let mut buffer = [0u8; 32];
        let len = self.read(StorageKey::Settings, &mut buffer).await?;
        postcard::from_bytes(&buffer[..len]).map_err(|_| StorageError::Deserialize)
    }

    async fn load_doses(&mut self) -> Result<Vec<(TimeOfDay, bool), MAX_DOSES>, StorageError> {
        let mut buffer = [0u8; MAX_DOSE_BLOB_LEN];
        let len = self.read(StorageKey::Doses, &mut buffer).await?;
        decode_doses(&buffer[..len])
    }

    async fn load_last_day(&mut self) -> Result<u8, StorageError> {
        let mut buffer = [0u8; 1];
        let len = self.read(StorageKey::LastDay, &mut buffer).await?;
        match buffer[..len] {
            [day @ 1..=31] => Ok(day),
            _ => Err(StorageError::Corrupted),
        }
    }

    async fn load_log(&mut self) -> Result<IntakeLog, StorageError> {
        let mut buffer = [0u8; MAX_ITEM_SIZE];
        let len = self.read(StorageKey::IntakeLog, &mut buffer).await?;
        let log: IntakeLog =
            postcard::from_bytes(&buffer[..len]).map_err(|_| StorageError::Deserialize)?;
        if !log.is_valid() {
            return Err(StorageError::Corrupted);
        }
        Ok(log)
    }

    pub async fn save_doses(&mut self, doses: &[Dose]) -> Result<(), StorageError> {
        let mut buffer = [0u8; MAX_DOSE_BLOB_LEN];
        let len = encode_doses(doses, &mut buffer)?;
        self.write(StorageKey::Doses, &buffer[..len]).await
    }

    pub async fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        let mut buffer = [0u8; 32];
        let bytes =
            postcard::to_slice(settings, &mut buffer).map_err(|_| StorageError::Serialize)?;
        self.write(StorageKey::Settings, bytes).await
    }

    pub async fn save_last_day(&mut self, day: u8) -> Result<(), StorageError> {
        self.write(StorageKey::LastDay, &[day]).await
    }

    pub async fn save_log(&mut self, log: &IntakeLog) -> Result<(), StorageError> {
        let mut buffer = [0u8; MAX_ITEM_SIZE];
        let bytes = postcard::to_slice(log, &mut buffer).map_err(|_| StorageError::Serialize)?;
        self.write(StorageKey::IntakeLog, bytes).await
    }

    /// Persist whatever `effect` says changed
    ///
    /// Returns false for effects that are not about storage.
    pub async fn apply(
        &mut self,
        effect: Effect,
        controller: &BoardController,
    ) -> Result<bool, StorageError> {
        match effect {
            Effect::SaveDoses => self.save_doses(controller.scheduler().doses()).await?,
            Effect::SaveSettings => self.save_settings(controller.settings()).await?,
            Effect::SaveLastDay(day) => self.save_last_day(day).await?,
            Effect::SaveLog => self.save_log(controller.log()).await?,
            Effect::SetLink(_) => return Ok(false),
        }
        debug!("Persisted {}", effect);
        Ok(true)
    }
}

/// Log a load failure; `NotFound` is normal on first boot
fn report<T>(key: StorageKey, result: Result<T, StorageError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(StorageError::NotFound) => {
            debug!("No {} in flash", key);
            None
        }
        Err(e) => {
            warn!("Failed to load {}: {}, using defaults", key, e);
            None
        }
    }
}
