//! Hardware abstraction traits
//!
//! These traits define the interface between the backlight logic and the
//! platform: the display light, the one-shot wake alarm service, the
//! background worker process control, and the session timer.

pub mod backlight;
pub mod scheduler;
pub mod worker;

pub use backlight::{Backlight, BacklightError};
pub use scheduler::{AlarmHandle, ScheduleError, WakeScheduler};
pub use worker::{SessionTimer, WorkerControl, WorkerError};
