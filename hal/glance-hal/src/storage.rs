//! Persistent key-value storage abstractions
//!
//! The configurator writes settings under these keys and the background
//! worker reads them once at start. Each key holds one small value (a u32
//! or a bool) so reads and writes are atomic per key.

use core::future::Future;

/// Storage keys for persisted settings
///
/// The numeric ids are stable: they are what ends up in flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Window-open hour (0-23)
    StartHour = 0,
    /// Window-open minute (0-59)
    StartMinute = 1,
    /// Window-close hour (0-23)
    StopHour = 2,
    /// Window-close minute (0-59)
    StopMinute = 3,
    /// Last scheduled window-open alarm handle (diagnostic)
    StartAlarmId = 4,
    /// Last scheduled window-close alarm handle (diagnostic)
    StopAlarmId = 5,
    /// Gesture light-on duration (1-60 units)
    Duration = 6,
    /// Accelerometer batch size (1-100)
    Samples = 7,
    /// Keep light on while charging
    Charging = 8,
    /// Keep light on while plugged in
    Plugged = 9,
    /// Use ambient-aware light enable (worker-only)
    Ambient = 10,
}

impl StorageKey {
    /// Number of distinct keys
    pub const COUNT: usize = 11;

    /// All keys in id order
    pub const ALL: [StorageKey; Self::COUNT] = [
        StorageKey::StartHour,
        StorageKey::StartMinute,
        StorageKey::StopHour,
        StorageKey::StopMinute,
        StorageKey::StartAlarmId,
        StorageKey::StopAlarmId,
        StorageKey::Duration,
        StorageKey::Samples,
        StorageKey::Charging,
        StorageKey::Plugged,
        StorageKey::Ambient,
    ];

    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

/// Persistent key-value store
///
/// Implementations should handle:
/// - Wear leveling across flash sectors
/// - Data integrity (CRC or similar)
/// - Atomic writes per key
pub trait KeyValueStore {
    /// Read a value by key into the provided buffer
    ///
    /// Returns the number of bytes read, or [`StorageError::NotFound`] if
    /// the key has never been written.
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl Future<Output = Result<usize, StorageError>>;

    /// Write a value by key, replacing any previous value
    fn write(&mut self, key: StorageKey, data: &[u8])
        -> impl Future<Output = Result<(), StorageError>>;

    /// Check if a key exists in storage
    fn exists(&mut self, key: StorageKey) -> impl Future<Output = bool>;

    /// Erase all stored data
    fn erase_all(&mut self) -> impl Future<Output = Result<(), StorageError>>;
}

/// Largest value a [`MemoryStore`] slot can hold
pub const MEMORY_SLOT_SIZE: usize = 16;

/// RAM-backed store
///
/// Used for host-side testing and simulation. Contents are lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: [Option<([u8; MEMORY_SLOT_SIZE], usize)>; StorageKey::COUNT],
    writes: u32,
}

impl MemoryStore {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            slots: [None; StorageKey::COUNT],
            writes: 0,
        }
    }

    /// Total number of successful writes since creation
    pub fn write_count(&self) -> u32 {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let (data, len) = self.slots[key.as_u8() as usize].ok_or(StorageError::NotFound)?;
        if buffer.len() < len {
            return Err(StorageError::BufferTooSmall);
        }
        buffer[..len].copy_from_slice(&data[..len]);
        Ok(len)
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > MEMORY_SLOT_SIZE {
            return Err(StorageError::Full);
        }
        let mut slot = [0u8; MEMORY_SLOT_SIZE];
        slot[..data.len()].copy_from_slice(data);
        self.slots[key.as_u8() as usize] = Some((slot, data.len()));
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }

    async fn exists(&mut self, key: StorageKey) -> bool {
        self.slots[key.as_u8() as usize].is_some()
    }

    async fn erase_all(&mut self) -> Result<(), StorageError> {
        self.slots = [None; StorageKey::COUNT];
        Ok(())
    }
}

// Implement the sequential-storage Key trait when the feature is enabled
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

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_key_ids_are_stable() {
        assert_eq!(StorageKey::StartHour.as_u8(), 0);
        assert_eq!(StorageKey::StopAlarmId.as_u8(), 5);
        assert_eq!(StorageKey::Plugged.as_u8(), 9);
        assert_eq!(StorageKey::Ambient.as_u8(), 10);
    }

    #[test]
    fn test_key_from_u8() {
        for key in StorageKey::ALL {
            assert_eq!(StorageKey::from_u8(key.as_u8()), Some(key));
        }
        assert_eq!(StorageKey::from_u8(11), None);
    }

    #[test]
    fn test_memory_store_missing_key() {
        let mut store = MemoryStore::new();
        let mut buf = [0u8; 4];
        assert_eq!(
            block_on(store.read(StorageKey::Duration, &mut buf)),
            Err(StorageError::NotFound)
        );
        assert!(!block_on(store.exists(StorageKey::Duration)));
    }

    #[test]
    fn test_memory_store_overwrite() {
        let mut store = MemoryStore::new();
        block_on(store.write(StorageKey::Samples, &[7])).unwrap();
        block_on(store.write(StorageKey::Samples, &[9, 1])).unwrap();

        let mut buf = [0u8; 4];
        let len = block_on(store.read(StorageKey::Samples, &mut buf)).unwrap();
        assert_eq!(&buf[..len], &[9, 1]);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_memory_store_small_buffer() {
        let mut store = MemoryStore::new();
        block_on(store.write(StorageKey::Duration, &[1, 2, 3])).unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(
            block_on(store.read(StorageKey::Duration, &mut buf)),
            Err(StorageError::BufferTooSmall)
        );
    }

    #[test]
    fn test_memory_store_erase_all() {
        let mut store = MemoryStore::new();
        block_on(store.write(StorageKey::Charging, &[1])).unwrap();
        block_on(store.erase_all()).unwrap();
        assert!(!block_on(store.exists(StorageKey::Charging)));
    }
}
