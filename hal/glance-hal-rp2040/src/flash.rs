//! Flash-backed settings store for RP2040
//!
//! Settings live in a wear-levelled sequential-storage map in the last
//! 64KB of flash, one map item per [`StorageKey`].

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;
use sequential_storage::Error as SeqError;

pub use glance_hal::storage::{StorageError, StorageKey};

pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
pub const SETTINGS_PARTITION_SIZE: usize = 64 * 1024;
pub const SETTINGS_PARTITION_START: usize = FLASH_SIZE - SETTINGS_PARTITION_SIZE;

/// Flash erase size for RP2040
pub const FLASH_ERASE_SIZE: usize = ERASE_SIZE;

/// Flash range for the settings partition
pub const SETTINGS_RANGE: core::ops::Range<u32> =
    (SETTINGS_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer for one map item (key byte plus a small encoded value)
const ITEM_BUF_SIZE: usize = 32;

fn map_error<E>(e: SeqError<E>) -> StorageError {
    match e {
        SeqError::Storage { .. } => StorageError::Flash,
        SeqError::FullStorage => StorageError::Full,
        SeqError::Corrupted { .. } => StorageError::Corrupted,
        SeqError::BufferTooSmall { .. } | SeqError::ItemTooBig => StorageError::BufferTooSmall,
        _ => StorageError::Storage,
    }
}

/// RP2040 flash settings store
pub struct Rp2040FlashStore<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStore<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    async fn fetch<'b>(
        &mut self,
        key: StorageKey,
        scratch: &'b mut [u8; ITEM_BUF_SIZE],
    ) -> Result<Option<&'b [u8]>, StorageError> {
        map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            scratch,
            &key,
        )
        .await
        .map_err(map_error)
    }
}

impl<'d> glance_hal::KeyValueStore for Rp2040FlashStore<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let mut scratch = [0u8; ITEM_BUF_SIZE];
        let data = self.fetch(key, &mut scratch).await?.ok_or(StorageError::NotFound)?;
        let len = data.len();
        if buffer.len() < len {
            return Err(StorageError::BufferTooSmall);
        }
        buffer[..len].copy_from_slice(data);
        Ok(len)
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        let mut scratch = [0u8; ITEM_BUF_SIZE];
        map::store_item(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut scratch,
            &key,
            &data,
        )
        .await
        .map_err(map_error)
    }

    async fn exists(&mut self, key: StorageKey) -> bool {
        let mut scratch = [0u8; ITEM_BUF_SIZE];
        matches!(self.fetch(key, &mut scratch).await, Ok(Some(_)))
    }

    async fn erase_all(&mut self) -> Result<(), StorageError> {
        self.flash
            .erase(SETTINGS_PARTITION_START as u32, FLASH_SIZE as u32)
            .await
            .map_err(|_| StorageError::Flash)
    }
}
