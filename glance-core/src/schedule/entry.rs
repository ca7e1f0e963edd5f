//! Window edges and their schedule entries

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::settings::WindowTime;
use crate::traits::AlarmHandle;
use crate::worker::WorkerCommand;

/// Which edge of the daily window an alarm belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WindowKind {
    /// Window opens: the worker starts
    Open,
    /// Window closes: the light goes off and the worker stops
    Close,
}

impl WindowKind {
    pub const ALL: [WindowKind; 2] = [WindowKind::Open, WindowKind::Close];

    /// Tag carried by the wake alarm
    pub const fn tag(self) -> i32 {
        match self {
            WindowKind::Open => 0,
            WindowKind::Close => 1,
        }
    }

    /// Recover the edge from an alarm tag
    pub const fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(WindowKind::Open),
            1 => Some(WindowKind::Close),
            _ => None,
        }
    }

    /// Worker command issued when this edge fires
    pub const fn worker_command(self) -> WorkerCommand {
        match self {
            WindowKind::Open => WorkerCommand::Start,
            WindowKind::Close => WorkerCommand::Stop,
        }
    }
}

/// One window edge: its local time and the alarm currently armed for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleEntry {
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Armed alarm, if any
    pub alarm: Option<AlarmHandle>,
}

impl ScheduleEntry {
    pub fn time(&self) -> WindowTime {
        WindowTime::new(self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for kind in WindowKind::ALL {
            assert_eq!(WindowKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(WindowKind::from_tag(7), None);
        assert_eq!(WindowKind::from_tag(-1), None);
    }

    #[test]
    fn test_worker_command_per_edge() {
        assert_eq!(WindowKind::Open.worker_command(), WorkerCommand::Start);
        assert_eq!(WindowKind::Close.worker_command(), WorkerCommand::Stop);
    }
}
