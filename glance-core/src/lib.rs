//! Board-agnostic core logic for the auto-backlight firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Effector and scheduler traits (backlight, wake alarms, worker control)
//! - Shared settings contract over the persistent key-value store
//! - Wrist-raise gesture detector
//! - Light session controller
//! - Daily wake window scheduler and alarm table
//! - Background worker lifecycle
//! - Configurator command set

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod configurator;
pub mod gesture;
pub mod light;
pub mod schedule;
pub mod settings;
pub mod traits;
pub mod worker;
