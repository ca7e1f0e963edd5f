//! RP2040-specific HAL for the backlight firmware
//!
//! Implements the shared `glance-hal` traits on RP2040 peripherals:
//!
//! - Flash-backed settings store (implements `glance_hal::KeyValueStore`)
//! - RTC readout as a local time of day

#![no_std]

pub mod flash;
pub mod rtc;

pub use flash::Rp2040FlashStore;
pub use glance_hal::{KeyValueStore, StorageKey};
