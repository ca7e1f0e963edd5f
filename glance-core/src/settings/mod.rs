//! Shared settings contract
//!
//! The configurator is the only writer; the background worker and the wake
//! schedule read the store once when they start. Every value lives under
//! its own [`StorageKey`](glance_hal::StorageKey) so writes are atomic per
//! key.

pub mod store;
pub mod types;

pub use store::{read_bool, read_u32, write_bool, write_u32, SettingsError};
pub use types::*;
