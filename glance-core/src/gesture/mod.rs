//! Wrist-raise gesture detection
//!
//! The detector watches accelerometer batches for the wrist settling into
//! the viewing position and emits one discrete event per raise.

pub mod detector;
pub mod sample;

pub use detector::{GestureDetector, GestureEvent, GestureWindowState};
pub use sample::{Sample, HYSTERESIS_X, HYSTERESIS_Y, TRIGGER_X, TRIGGER_Y};
