//! One running instance of the background worker
//!
//! Built from the settings read at launch. Feeds accelerometer batches to
//! the gesture detector and routes gestures, battery reports and session
//! timer expiries into the light controller. Dropping the worker is the
//! kill: no state survives into the next launch.

use glance_hal::KeyValueStore;

use crate::gesture::{GestureDetector, GestureEvent, GestureWindowState, Sample};
use crate::light::{BatteryState, LightConfig, LightController, SessionId};
use crate::settings::{SettingsError, WorkerSettings};
use crate::traits::{Backlight, BacklightError, SessionTimer};

/// Background worker state
#[derive(Debug, Clone)]
pub struct Worker {
    settings: WorkerSettings,
    detector: GestureDetector,
    light: LightController,
}

impl Worker {
    /// Start a worker with already-loaded settings
    pub fn start(settings: WorkerSettings) -> Self {
        Self {
            settings,
            detector: GestureDetector::new(),
            light: LightController::new(LightConfig::from(&settings)),
        }
    }

    /// Read the worker settings from the store and start
    pub async fn launch<S: KeyValueStore>(store: &mut S) -> Result<Self, SettingsError> {
        let settings = WorkerSettings::load(store).await?;
        Ok(Self::start(settings))
    }

    /// Settings this instance was started with
    pub fn settings(&self) -> &WorkerSettings {
        &self.settings
    }

    /// Accelerometer batch size to subscribe with
    pub fn batch_size(&self) -> usize {
        self.settings.samples as usize
    }

    /// Check if battery reports are needed at all
    pub fn wants_battery_updates(&self) -> bool {
        self.settings.wants_battery_updates()
    }

    pub fn light(&self) -> &LightController {
        &self.light
    }

    pub fn gesture_state(&self) -> GestureWindowState {
        self.detector.state()
    }

    /// Handle one accelerometer batch received at `now_ms`
    ///
    /// While a charging or plugged session holds the light the batch is not
    /// scanned at all. Returns the gesture that started a session, if any.
    pub fn on_accel_batch<B, T>(
        &mut self,
        batch: &[Sample],
        now_ms: u64,
        backlight: &mut B,
        timer: &mut T,
    ) -> Result<Option<GestureEvent>, BacklightError>
    where
        B: Backlight + ?Sized,
        T: SessionTimer + ?Sized,
    {
        if self.light.override_active() {
            return Ok(None);
        }

        match self.detector.process(batch, now_ms) {
            Some(event) => {
                self.light.on_gesture_event(now_ms, backlight, timer)?;
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    /// Handle a battery state report
    pub fn on_battery_state<B>(
        &mut self,
        state: BatteryState,
        backlight: &mut B,
    ) -> Result<(), BacklightError>
    where
        B: Backlight + ?Sized,
    {
        self.light.on_battery_state(state, backlight)
    }

    /// Handle a session timer firing
    pub fn on_session_timer_expired<B>(
        &mut self,
        id: SessionId,
        backlight: &mut B,
    ) -> Result<(), BacklightError>
    where
        B: Backlight + ?Sized,
    {
        self.light.on_session_timer_expired(id, backlight)
    }

    /// End any session and turn the light off before the worker is dropped
    pub fn shutdown<B>(&mut self, backlight: &mut B) -> Result<(), BacklightError>
    where
        B: Backlight + ?Sized,
    {
        self.detector.reset();
        self.light.force_off(backlight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::controller::tests::{MockLight, MockTimer};
    use crate::light::SessionReason;
    use crate::settings::write_u32;
    use embassy_futures::block_on;
    use glance_hal::storage::MemoryStore;
    use glance_hal::StorageKey;
    use proptest::prelude::*;

    const RAISED: Sample = Sample::new(0, -700, -600);

    fn charging_worker() -> Worker {
        Worker::start(WorkerSettings {
            charging: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_launch_reads_store() {
        let mut store = MemoryStore::new();
        block_on(write_u32(&mut store, StorageKey::Samples, 25)).unwrap();
        block_on(write_u32(&mut store, StorageKey::Duration, 7)).unwrap();

        let worker = block_on(Worker::launch(&mut store)).unwrap();
        assert_eq!(worker.batch_size(), 25);
        assert_eq!(worker.light().config().duration_ms, 7_000);
        assert!(!worker.wants_battery_updates());
    }

    #[test]
    fn test_gesture_starts_session() {
        let mut worker = Worker::start(WorkerSettings::default());
        let mut light = MockLight::default();
        let mut timer = MockTimer::default();

        assert_eq!(
            worker.on_accel_batch(&[RAISED], 0, &mut light, &mut timer),
            Ok(None)
        );
        let event = worker
            .on_accel_batch(&[RAISED], 100, &mut light, &mut timer)
            .unwrap();
        assert!(event.is_some());
        assert!(light.on);
        assert_eq!(timer.armed[0].1, 5_000);
    }

    #[test]
    fn test_override_skips_scanning() {
        let mut worker = charging_worker();
        let mut light = MockLight::default();
        let mut timer = MockTimer::default();

        worker
            .on_battery_state(BatteryState::new(true, false), &mut light)
            .unwrap();
        worker
            .on_accel_batch(&[RAISED], 0, &mut light, &mut timer)
            .unwrap();
        // Detector never saw the sample
        assert_eq!(worker.gesture_state(), GestureWindowState::default());
        assert_eq!(
            worker.light().session().map(|s| s.reason),
            Some(SessionReason::Charging)
        );
    }

    #[test]
    fn test_shutdown_releases_override() {
        let mut worker = charging_worker();
        let mut light = MockLight::default();
        worker
            .on_battery_state(BatteryState::new(true, false), &mut light)
            .unwrap();
        assert!(light.on);

        worker.shutdown(&mut light).unwrap();
        assert!(!light.on);
        assert!(!worker.light().override_active());
    }

    #[test]
    fn test_fresh_launch_forgets_state() {
        let mut worker = Worker::start(WorkerSettings::default());
        let mut light = MockLight::default();
        let mut timer = MockTimer::default();
        worker
            .on_accel_batch(&[RAISED], 0, &mut light, &mut timer)
            .unwrap();
        assert!(worker.gesture_state().in_range_since.is_some());

        let worker = Worker::start(*worker.settings());
        assert_eq!(worker.gesture_state(), GestureWindowState::default());
        assert!(worker.light().session().is_none());
    }

    fn any_sample() -> impl Strategy<Value = Sample> {
        (-1500i16..1500, -1500i16..1500, -1500i16..1500).prop_map(|(x, y, z)| Sample::new(x, y, z))
    }

    proptest! {
        #[test]
        fn prop_no_gesture_while_override(
            batches in prop::collection::vec(prop::collection::vec(any_sample(), 1..8), 1..30),
            plugged in any::<bool>(),
        ) {
            let mut worker = Worker::start(WorkerSettings {
                charging: true,
                plugged: true,
                ..Default::default()
            });
            let mut light = MockLight::default();
            let mut timer = MockTimer::default();
            let state = if plugged {
                BatteryState::new(false, true)
            } else {
                BatteryState::new(true, false)
            };
            worker.on_battery_state(state, &mut light).unwrap();

            let mut now = 0;
            for batch in &batches {
                let event = worker.on_accel_batch(batch, now, &mut light, &mut timer).unwrap();
                prop_assert!(event.is_none());
                now += 100;
            }

            // A textbook raise is suppressed too
            for _ in 0..3 {
                let event = worker.on_accel_batch(&[RAISED], now, &mut light, &mut timer).unwrap();
                prop_assert!(event.is_none());
                now += 100;
            }
            prop_assert!(timer.armed.is_empty());
            prop_assert!(light.on);
        }
    }
}
