//! Typed value access over the raw key-value store
//!
//! Values are postcard-encoded: a u32 is a varint, a bool a single byte.

use glance_hal::{KeyValueStore, StorageError, StorageKey};

/// Largest encoded value (a u32 varint takes at most 5 bytes)
const VALUE_BUF_SIZE: usize = 8;

/// Settings persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Underlying store failed
    Storage(StorageError),
    /// Value could not be encoded
    Encode,
    /// Stored bytes could not be decoded
    Decode,
}

impl From<StorageError> for SettingsError {
    fn from(e: StorageError) -> Self {
        SettingsError::Storage(e)
    }
}

/// Read a u32, `None` if the key was never written
pub async fn read_u32<S: KeyValueStore>(
    store: &mut S,
    key: StorageKey,
) -> Result<Option<u32>, SettingsError> {
    let mut buf = [0u8; VALUE_BUF_SIZE];
    match store.read(key, &mut buf).await {
        Ok(len) => postcard::from_bytes::<u32>(&buf[..len])
            .map(Some)
            .map_err(|_| SettingsError::Decode),
        Err(StorageError::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read a bool, `None` if the key was never written
pub async fn read_bool<S: KeyValueStore>(
    store: &mut S,
    key: StorageKey,
) -> Result<Option<bool>, SettingsError> {
    let mut buf = [0u8; VALUE_BUF_SIZE];
    match store.read(key, &mut buf).await {
        Ok(len) => postcard::from_bytes::<bool>(&buf[..len])
            .map(Some)
            .map_err(|_| SettingsError::Decode),
        Err(StorageError::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write a u32
pub async fn write_u32<S: KeyValueStore>(
    store: &mut S,
    key: StorageKey,
    value: u32,
) -> Result<(), SettingsError> {
    let mut buf = [0u8; VALUE_BUF_SIZE];
    let encoded = postcard::to_slice(&value, &mut buf).map_err(|_| SettingsError::Encode)?;
    store.write(key, &*encoded).await?;
    Ok(())
}

/// Write a bool
pub async fn write_bool<S: KeyValueStore>(
    store: &mut S,
    key: StorageKey,
    value: bool,
) -> Result<(), SettingsError> {
    let mut buf = [0u8; VALUE_BUF_SIZE];
    let encoded = postcard::to_slice(&value, &mut buf).map_err(|_| SettingsError::Encode)?;
    store.write(key, &*encoded).await?;
    Ok(())
}
