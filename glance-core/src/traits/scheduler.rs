//! One-shot wake alarm service

use core::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque handle to a scheduled wake alarm
///
/// Handles are never zero, so zero can be persisted to mean "no alarm".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlarmHandle(NonZeroU32);

impl AlarmHandle {
    /// Create a handle from its raw value, `None` for zero
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Raw handle value (never zero)
    pub const fn raw(self) -> u32 {
        self.0.get()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmHandle {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "#{}", self.raw())
    }
}

/// Errors from scheduling a wake alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// No free alarm slots
    Full,
    /// Scheduler refused the request
    Rejected,
}

/// Trait for the platform's one-shot wake alarm scheduler
///
/// An alarm fires once at an absolute monotonic instant and is delivered
/// together with the integer tag given at scheduling time.
pub trait WakeScheduler {
    /// Schedule an alarm at `at_s` (monotonic seconds) carrying `tag`
    fn schedule(&mut self, at_s: u64, tag: i32) -> Result<AlarmHandle, ScheduleError>;

    /// Cancel a pending alarm
    ///
    /// Cancelling a handle that already fired or was never scheduled is a
    /// no-op.
    fn cancel(&mut self, handle: AlarmHandle);

    /// Cancel every pending alarm
    fn cancel_all(&mut self);
}
