//! Fixed-capacity table of pending one-shot wake alarms

use heapless::Vec;

use crate::traits::{AlarmHandle, ScheduleError, WakeScheduler};

/// Maximum number of pending alarms
pub const MAX_ALARMS: usize = 8;

/// A pending alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alarm {
    pub handle: AlarmHandle,
    /// Fire time (monotonic seconds)
    pub at_s: u64,
    pub tag: i32,
}

/// In-memory wake alarm scheduler
///
/// The owner polls [`next_due`](Self::next_due) to know how long to sleep
/// and drains fired alarms with [`pop_due`](Self::pop_due). Handles are
/// handed out in increasing order and never reused.
#[derive(Debug, Clone, Default)]
pub struct AlarmTable {
    pending: Vec<Alarm, MAX_ALARMS>,
    last_handle: u32,
}

impl AlarmTable {
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            last_handle: 0,
        }
    }

    /// Number of pending alarms
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Check if `handle` is still pending
    pub fn is_live(&self, handle: AlarmHandle) -> bool {
        self.pending.iter().any(|a| a.handle == handle)
    }

    /// Number of pending alarms carrying `tag`
    pub fn live_count_for_tag(&self, tag: i32) -> usize {
        self.pending.iter().filter(|a| a.tag == tag).count()
    }

    /// Pending alarms in scheduling order
    pub fn iter(&self) -> impl Iterator<Item = &Alarm> {
        self.pending.iter()
    }

    /// Earliest pending fire time
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|a| a.at_s).min()
    }

    /// Remove and return the earliest alarm due at or before `now_s`
    pub fn pop_due(&mut self, now_s: u64) -> Option<Alarm> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, a)| a.at_s <= now_s)
            .min_by_key(|(_, a)| (a.at_s, a.handle))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx))
    }
}

impl WakeScheduler for AlarmTable {
    fn schedule(&mut self, at_s: u64, tag: i32) -> Result<AlarmHandle, ScheduleError> {
        if self.pending.is_full() {
            return Err(ScheduleError::Full);
        }
        let raw = self
            .last_handle
            .checked_add(1)
            .ok_or(ScheduleError::Rejected)?;
        let handle = AlarmHandle::from_raw(raw).ok_or(ScheduleError::Rejected)?;
        self.pending
            .push(Alarm { handle, at_s, tag })
            .map_err(|_| ScheduleError::Full)?;
        self.last_handle = raw;
        Ok(handle)
    }

    fn cancel(&mut self, handle: AlarmHandle) {
        self.pending.retain(|a| a.handle != handle);
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_increase_and_are_nonzero() {
        let mut table = AlarmTable::new();
        let a = table.schedule(100, 0).unwrap();
        let b = table.schedule(50, 1).unwrap();
        assert_eq!(a.raw(), 1);
        assert!(b > a);

        table.cancel(b);
        let c = table.schedule(50, 1).unwrap();
        assert!(c > b);
    }

    #[test]
    fn test_full_table_rejects() {
        let mut table = AlarmTable::new();
        for i in 0..MAX_ALARMS {
            table.schedule(i as u64, 0).unwrap();
        }
        assert_eq!(table.schedule(0, 0), Err(ScheduleError::Full));
    }

    #[test]
    fn test_cancel_unknown_is_noop() {
        let mut table = AlarmTable::new();
        let a = table.schedule(10, 0).unwrap();
        table.cancel(a);
        table.cancel(a);
        table.cancel(AlarmHandle::from_raw(99).unwrap());
        assert!(table.is_empty());
    }

    #[test]
    fn test_pop_due_earliest_first() {
        let mut table = AlarmTable::new();
        let late = table.schedule(200, 1).unwrap();
        let early = table.schedule(100, 0).unwrap();
        assert_eq!(table.next_due(), Some(100));

        assert_eq!(table.pop_due(99), None);
        assert_eq!(table.pop_due(250).map(|a| a.handle), Some(early));
        assert_eq!(table.pop_due(250).map(|a| a.handle), Some(late));
        assert_eq!(table.pop_due(250), None);
        assert_eq!(table.next_due(), None);
    }

    #[test]
    fn test_live_count_for_tag() {
        let mut table = AlarmTable::new();
        table.schedule(10, 0).unwrap();
        table.schedule(20, 1).unwrap();
        table.schedule(30, 1).unwrap();
        assert_eq!(table.live_count_for_tag(0), 1);
        assert_eq!(table.live_count_for_tag(1), 2);

        table.cancel_all();
        assert_eq!(table.live_count_for_tag(1), 0);
    }
}
