//! Glance Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits that chip-specific
//! HALs implement, so the backlight logic in `glance-core` never touches a
//! concrete peripheral.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  glance-firmware / glance-core          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  glance-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  glance-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`storage::KeyValueStore`] - Persistent key-value settings store

#![no_std]
#![deny(unsafe_code)]

pub mod storage;

pub use storage::{KeyValueStore, StorageError, StorageKey};
