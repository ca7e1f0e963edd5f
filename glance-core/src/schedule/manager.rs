//! Wake schedule manager
//!
//! Owns the wake alarm scheduler and one [`ScheduleEntry`] per window edge.
//! Re-arming an edge always cancels its previous alarm first, so at most
//! one alarm per edge is ever live. Every new handle is persisted under the
//! edge's alarm-id key.

use glance_hal::KeyValueStore;

use super::entry::{ScheduleEntry, WindowKind};
use super::offset::next_offset;
use crate::clock::Now;
use crate::settings::{Settings, SettingsError, WindowTime};
use crate::traits::{AlarmHandle, ScheduleError, WakeScheduler};

/// Errors from arming a window edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowError {
    /// Scheduler refused the alarm; the edge stays unarmed
    Alarm(ScheduleError),
    /// Settings could not be persisted
    Settings(SettingsError),
}

impl From<ScheduleError> for WindowError {
    fn from(e: ScheduleError) -> Self {
        WindowError::Alarm(e)
    }
}

impl From<SettingsError> for WindowError {
    fn from(e: SettingsError) -> Self {
        WindowError::Settings(e)
    }
}

/// A freshly armed window edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scheduled {
    pub kind: WindowKind,
    pub handle: AlarmHandle,
    /// Seconds from now until the alarm
    pub offset_s: u32,
    /// Fire time (monotonic seconds)
    pub at_s: u64,
}

/// Outcome of re-arming both edges
pub type ScheduleReport = [(WindowKind, Result<Scheduled, WindowError>); 2];

/// A delivered wake alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmFired {
    /// Edge that fired
    pub kind: WindowKind,
    /// Re-arm result for the same edge's next occurrence
    pub next: Result<Scheduled, WindowError>,
}

/// Daily wake window manager
#[derive(Debug, Clone)]
pub struct WakeScheduleManager<A: WakeScheduler> {
    alarms: A,
    open: ScheduleEntry,
    close: ScheduleEntry,
}

impl<A: WakeScheduler> WakeScheduleManager<A> {
    /// Create a manager with both edges at 00:00 and nothing armed
    pub fn new(alarms: A) -> Self {
        Self {
            alarms,
            open: ScheduleEntry::default(),
            close: ScheduleEntry::default(),
        }
    }

    /// Create a manager from persisted settings
    pub fn from_settings(alarms: A, settings: &Settings) -> Self {
        let mut manager = Self::new(alarms);
        manager.restore(settings);
        manager
    }

    /// Reload both entries (times and handles) from settings
    pub fn restore(&mut self, settings: &Settings) {
        for kind in WindowKind::ALL {
            let time = settings.window(kind);
            *self.entry_mut(kind) = ScheduleEntry {
                hour: time.hour,
                minute: time.minute,
                alarm: settings.alarm_id(kind),
            };
        }
    }

    pub fn entry(&self, kind: WindowKind) -> &ScheduleEntry {
        match kind {
            WindowKind::Open => &self.open,
            WindowKind::Close => &self.close,
        }
    }

    fn entry_mut(&mut self, kind: WindowKind) -> &mut ScheduleEntry {
        match kind {
            WindowKind::Open => &mut self.open,
            WindowKind::Close => &mut self.close,
        }
    }

    pub fn alarms(&self) -> &A {
        &self.alarms
    }

    pub fn alarms_mut(&mut self) -> &mut A {
        &mut self.alarms
    }

    /// Arm `kind` for the next occurrence of `hour:minute`
    ///
    /// The edge's previous alarm is cancelled first. The new handle (or
    /// none, if the scheduler refused) is persisted. A refused alarm is not
    /// retried: the edge stays unarmed until the next reconfiguration.
    pub async fn schedule_next<S: KeyValueStore>(
        &mut self,
        kind: WindowKind,
        hour: u8,
        minute: u8,
        now: Now,
        settings: &mut Settings,
        store: &mut S,
    ) -> Result<Scheduled, WindowError> {
        let time = WindowTime::new(hour, minute);
        let entry = self.entry_mut(kind);
        let previous = entry.alarm.take();
        entry.hour = time.hour;
        entry.minute = time.minute;

        if let Some(previous) = previous {
            self.alarms.cancel(previous);
        }

        let offset_s = next_offset(now.local, time.hour, time.minute);
        let at_s = now.mono_s + offset_s as u64;
        let result = self.alarms.schedule(at_s, kind.tag());
        let handle = result.ok();
        self.entry_mut(kind).alarm = handle;

        settings.save_alarm_id(store, kind, handle).await?;
        let handle = result?;

        Ok(Scheduled {
            kind,
            handle,
            offset_s,
            at_s,
        })
    }

    /// Persist a new local time for `kind` and re-arm it
    pub async fn set_window<S: KeyValueStore>(
        &mut self,
        kind: WindowKind,
        time: WindowTime,
        now: Now,
        settings: &mut Settings,
        store: &mut S,
    ) -> Result<Scheduled, WindowError> {
        settings.save_window(store, kind, time).await?;
        self.schedule_next(kind, time.hour, time.minute, now, settings, store)
            .await
    }

    /// Handle a delivered wake alarm
    ///
    /// Returns `None` for tags that belong to no window edge. Otherwise the
    /// same edge is re-armed for its next occurrence; acting on the edge
    /// (starting or stopping the worker) is up to the caller.
    pub async fn on_alarm_fired<S: KeyValueStore>(
        &mut self,
        handle: AlarmHandle,
        tag: i32,
        now: Now,
        settings: &mut Settings,
        store: &mut S,
    ) -> Option<AlarmFired> {
        let kind = WindowKind::from_tag(tag)?;

        // A fired alarm is gone; forget it so the re-arm does not cancel it
        let entry = self.entry_mut(kind);
        if entry.alarm == Some(handle) {
            entry.alarm = None;
        }

        let ScheduleEntry { hour, minute, .. } = *self.entry(kind);
        let next = self
            .schedule_next(kind, hour, minute, now, settings, store)
            .await;
        Some(AlarmFired { kind, next })
    }

    /// Cancel every alarm and re-arm both edges from their current times
    pub async fn rearm_all<S: KeyValueStore>(
        &mut self,
        now: Now,
        settings: &mut Settings,
        store: &mut S,
    ) -> ScheduleReport {
        self.alarms.cancel_all();
        self.open.alarm = None;
        self.close.alarm = None;

        let open = *self.entry(WindowKind::Open);
        let open = self
            .schedule_next(WindowKind::Open, open.hour, open.minute, now, settings, store)
            .await;
        let close = *self.entry(WindowKind::Close);
        let close = self
            .schedule_next(WindowKind::Close, close.hour, close.minute, now, settings, store)
            .await;
        [(WindowKind::Open, open), (WindowKind::Close, close)]
    }

    /// Clear both edges to 00:00 and re-arm them
    ///
    /// With both edges equal the window is degenerate, which effectively
    /// disables it until reconfigured.
    pub async fn reset<S: KeyValueStore>(
        &mut self,
        now: Now,
        settings: &mut Settings,
        store: &mut S,
    ) -> ScheduleReport {
        let midnight = WindowTime::default();
        let open = self
            .set_window(WindowKind::Open, midnight, now, settings, store)
            .await;
        let close = self
            .set_window(WindowKind::Close, midnight, now, settings, store)
            .await;
        [(WindowKind::Open, open), (WindowKind::Close, close)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::LocalTime;
    use crate::schedule::AlarmTable;
    use embassy_futures::block_on;
    use glance_hal::storage::MemoryStore;
    use proptest::prelude::*;

    /// Scheduler that refuses everything
    struct Refusing;

    impl WakeScheduler for Refusing {
        fn schedule(&mut self, _at_s: u64, _tag: i32) -> Result<AlarmHandle, ScheduleError> {
            Err(ScheduleError::Rejected)
        }

        fn cancel(&mut self, _handle: AlarmHandle) {}

        fn cancel_all(&mut self) {}
    }

    fn at(mono_s: u64, hour: u8, minute: u8) -> Now {
        Now::new(mono_s, LocalTime::new(hour, minute, 0))
    }

    #[test]
    fn test_schedule_next_rolls_over_day() {
        let mut manager = WakeScheduleManager::new(AlarmTable::new());
        let mut settings = Settings::default();
        let mut store = MemoryStore::new();

        let scheduled = block_on(manager.schedule_next(
            WindowKind::Open,
            9,
            0,
            at(1_000, 20, 0),
            &mut settings,
            &mut store,
        ))
        .unwrap();
        assert_eq!(scheduled.offset_s, 46_800);
        assert_eq!(scheduled.at_s, 47_800);
        assert_eq!(manager.entry(WindowKind::Open).alarm, Some(scheduled.handle));
    }

    #[test]
    fn test_reschedule_replaces_handle() {
        let mut manager = WakeScheduleManager::new(AlarmTable::new());
        let mut settings = Settings::default();
        let mut store = MemoryStore::new();
        let now = at(0, 12, 0);

        let first = block_on(manager.schedule_next(
            WindowKind::Close,
            17,
            0,
            now,
            &mut settings,
            &mut store,
        ))
        .unwrap();
        let second = block_on(manager.schedule_next(
            WindowKind::Close,
            18,
            0,
            now,
            &mut settings,
            &mut store,
        ))
        .unwrap();

        assert!(!manager.alarms().is_live(first.handle));
        assert!(manager.alarms().is_live(second.handle));
        assert_eq!(manager.alarms().live_count_for_tag(WindowKind::Close.tag()), 1);
    }

    #[test]
    fn test_handle_is_persisted() {
        let mut manager = WakeScheduleManager::new(AlarmTable::new());
        let mut settings = Settings::default();
        let mut store = MemoryStore::new();

        let scheduled = block_on(manager.schedule_next(
            WindowKind::Open,
            6,
            30,
            at(0, 0, 0),
            &mut settings,
            &mut store,
        ))
        .unwrap();

        let reloaded = block_on(Settings::load(&mut store)).unwrap();
        assert_eq!(reloaded.alarm_id(WindowKind::Open), Some(scheduled.handle));
    }

    #[test]
    fn test_refused_alarm_clears_entry() {
        let mut manager = WakeScheduleManager::new(Refusing);
        let mut settings = Settings {
            start_alarm_id: 4,
            ..Default::default()
        };
        let mut store = MemoryStore::new();
        manager.restore(&settings);

        let result = block_on(manager.schedule_next(
            WindowKind::Open,
            9,
            0,
            at(0, 8, 0),
            &mut settings,
            &mut store,
        ));
        assert_eq!(result, Err(WindowError::Alarm(ScheduleError::Rejected)));
        assert_eq!(manager.entry(WindowKind::Open).alarm, None);
        assert_eq!(settings.start_alarm_id, 0);
    }

    #[test]
    fn test_fired_alarm_rearms_same_edge() {
        let mut manager = WakeScheduleManager::new(AlarmTable::new());
        let mut settings = Settings::default();
        let mut store = MemoryStore::new();

        let first = block_on(manager.set_window(
            WindowKind::Open,
            WindowTime::new(9, 0),
            at(0, 8, 0),
            &mut settings,
            &mut store,
        ))
        .unwrap();
        assert_eq!(first.offset_s, 3_600);

        let alarm = manager.alarms_mut().pop_due(3_600).unwrap();
        let fired = block_on(manager.on_alarm_fired(
            alarm.handle,
            alarm.tag,
            at(3_600, 9, 0),
            &mut settings,
            &mut store,
        ))
        .unwrap();

        assert_eq!(fired.kind, WindowKind::Open);
        let next = fired.next.unwrap();
        assert_eq!(next.offset_s, 86_400);
        assert_eq!(next.at_s, 90_000);
        assert_ne!(next.handle, first.handle);
        assert_eq!(manager.alarms().len(), 1);
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        let mut manager = WakeScheduleManager::new(AlarmTable::new());
        let mut settings = Settings::default();
        let mut store = MemoryStore::new();
        let handle = AlarmHandle::from_raw(1).unwrap();

        let fired = block_on(manager.on_alarm_fired(
            handle,
            42,
            at(0, 0, 0),
            &mut settings,
            &mut store,
        ));
        assert!(fired.is_none());
        assert!(manager.alarms().is_empty());
    }

    #[test]
    fn test_reset_zeroes_both_edges() {
        let mut manager = WakeScheduleManager::new(AlarmTable::new());
        let mut settings = Settings::default();
        let mut store = MemoryStore::new();
        let now = at(0, 10, 0);

        block_on(manager.set_window(
            WindowKind::Open,
            WindowTime::new(9, 0),
            now,
            &mut settings,
            &mut store,
        ))
        .unwrap();
        block_on(manager.set_window(
            WindowKind::Close,
            WindowTime::new(17, 0),
            now,
            &mut settings,
            &mut store,
        ))
        .unwrap();

        let report = block_on(manager.reset(now, &mut settings, &mut store));
        for (_, result) in report {
            assert_eq!(result.unwrap().offset_s, 14 * 3_600);
        }
        assert_eq!(manager.alarms().len(), 2);
        assert_eq!(settings.window(WindowKind::Open), WindowTime::default());
        assert_eq!(settings.window(WindowKind::Close), WindowTime::default());
    }

    #[test]
    fn test_rearm_all_drops_stale_alarms() {
        let mut alarms = AlarmTable::new();
        // Left over from an earlier run
        alarms.schedule(5, 0).unwrap();
        alarms.schedule(6, 1).unwrap();
        alarms.schedule(7, 9).unwrap();

        let mut settings = Settings::default();
        settings.start = WindowTime::new(7, 0);
        settings.stop = WindowTime::new(22, 0);
        let mut manager = WakeScheduleManager::from_settings(alarms, &settings);
        let mut store = MemoryStore::new();

        let report = block_on(manager.rearm_all(at(100, 6, 0), &mut settings, &mut store));
        assert!(report.iter().all(|(_, r)| r.is_ok()));
        assert_eq!(manager.alarms().len(), 2);
        assert_eq!(manager.alarms().live_count_for_tag(0), 1);
        assert_eq!(manager.alarms().live_count_for_tag(1), 1);
    }

    proptest! {
        #[test]
        fn prop_single_live_handle_per_kind(
            ops in prop::collection::vec((any::<bool>(), 0u8..24, 0u8..60), 1..30),
            now_s in 0u32..86_400,
        ) {
            let mut manager = WakeScheduleManager::new(AlarmTable::new());
            let mut settings = Settings::default();
            let mut store = MemoryStore::new();
            let now = Now::new(now_s as u64, LocalTime::from_seconds_of_day(now_s));

            for (open, hour, minute) in ops {
                let kind = if open { WindowKind::Open } else { WindowKind::Close };
                let scheduled = block_on(manager.schedule_next(
                    kind, hour, minute, now, &mut settings, &mut store,
                )).unwrap();
                prop_assert!(scheduled.at_s > now.mono_s);
                prop_assert!(scheduled.at_s <= now.mono_s + 86_400);

                for kind in WindowKind::ALL {
                    prop_assert!(manager.alarms().live_count_for_tag(kind.tag()) <= 1);
                }
            }
        }
    }
}
