//! Board configuration
//!
//! Pin assignments live in `main` (peripherals are typed per pin); the
//! values here are the remaining compile-time board settings.

use embassy_rp::gpio::{Input, Output};
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

use glance_drivers::accel::{DataRate, Lis3dh, Orientation};
use glance_drivers::light::{AlwaysDark, GpioBacklight};
use glance_drivers::power::ChargerPins;
use glance_hal_rp2040::Rp2040FlashStore;

/// LIS3DH address (SA0 tied low)
pub const ACCEL_ADDRESS: u8 = glance_drivers::accel::lis3dh::DEFAULT_ADDRESS;

/// Accelerometer sample rate
pub const ACCEL_RATE: DataRate = DataRate::Hz10;

/// Sensor mounted with x along the display, y across it, face up
pub const ACCEL_ORIENTATION: Orientation = Orientation {
    swap_xy: true,
    invert_x: false,
    invert_y: true,
    invert_z: false,
};

/// Backlight MOSFET gate is driven high to light the display
pub const BACKLIGHT_ACTIVE_LOW: bool = false;

/// I2C bus frequency
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Pause between killing and relaunching the worker
pub const RELAUNCH_DELAY_MS: u64 = 1000;

/// Button debounce interval
pub const DEBOUNCE_MS: u64 = 20;

pub type Accel = Lis3dh<I2c<'static, I2C0, Async>>;
pub type Charger = ChargerPins<Input<'static>, Input<'static>>;
pub type Light = GpioBacklight<Output<'static>, AlwaysDark>;
pub type Store = Rp2040FlashStore<'static>;

pub type SharedLight = Mutex<CriticalSectionRawMutex, Light>;
pub type SharedStore = Mutex<CriticalSectionRawMutex, Store>;
