//! Accelerometer drivers

pub mod lis3dh;

pub use lis3dh::{DataRate, Lis3dh, Orientation, MAX_BATCH};

/// Accelerometer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelError {
    /// I2C transfer failed
    Bus,
    /// WHO_AM_I did not match
    WrongDevice,
}
