//! Hardware driver implementations
//!
//! Concrete implementations of the `glance-core` effector traits and the
//! sensor inputs the worker consumes:
//!
//! - LIS3DH accelerometer (async I2C, FIFO batches in milli-g)
//! - GPIO display backlight with optional ambient light sensing
//! - Charger status pins (charging / power good)

#![no_std]
#![deny(unsafe_code)]

pub mod accel;
pub mod light;
pub mod power;
