//! Light session control
//!
//! Owns the backlight. A wrist raise starts a timed session; charging or
//! plugged-in power holds the light on without expiry and suppresses
//! gesture sessions while it lasts.

pub mod controller;
pub mod session;

pub use controller::{LightConfig, LightController};
pub use session::{BatteryState, LightSession, SessionId, SessionReason};
