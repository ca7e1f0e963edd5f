//! Daily wake window
//!
//! Two independent one-shot alarms (window open, window close) are kept
//! armed for the next occurrence of their configured local time. Each fire
//! re-arms the same edge for the following day.

pub mod alarms;
pub mod entry;
pub mod manager;
pub mod offset;

pub use alarms::{Alarm, AlarmTable, MAX_ALARMS};
pub use entry::{ScheduleEntry, WindowKind};
pub use manager::{AlarmFired, ScheduleReport, Scheduled, WakeScheduleManager, WindowError};
pub use offset::{next_offset, offset_to};
