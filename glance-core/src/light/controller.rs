//! Light session state machine
//!
//! The controller holds only session state. The backlight and the session
//! timer are handed in on every notification, so the same controller works
//! whether the effectors are owned, borrowed, or behind a lock.

use super::session::{BatteryState, LightSession, SessionId, SessionReason};
use crate::settings::WorkerSettings;
use crate::traits::{Backlight, BacklightError, SessionTimer};

/// Light behaviour read once when the worker starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightConfig {
    /// Gesture session length (ms)
    pub duration_ms: u64,
    /// Hold the light on while charging
    pub charging: bool,
    /// Hold the light on while plugged in
    pub plugged: bool,
    /// Use the ambient-aware enable for gesture sessions
    pub ambient: bool,
}

impl From<&WorkerSettings> for LightConfig {
    fn from(settings: &WorkerSettings) -> Self {
        Self {
            duration_ms: settings.light_duration_ms(),
            charging: settings.charging,
            plugged: settings.plugged,
            ambient: settings.ambient,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::from(&WorkerSettings::default())
    }
}

/// Light session controller
#[derive(Debug, Clone)]
pub struct LightController {
    config: LightConfig,
    session: Option<LightSession>,
    last_id: u32,
}

impl LightController {
    pub fn new(config: LightConfig) -> Self {
        Self {
            config,
            session: None,
            last_id: 0,
        }
    }

    pub fn config(&self) -> &LightConfig {
        &self.config
    }

    /// Active session, if any
    pub fn session(&self) -> Option<&LightSession> {
        self.session.as_ref()
    }

    /// Check if a charging or plugged session holds the light
    pub fn override_active(&self) -> bool {
        self.session.is_some_and(|s| s.reason.is_override())
    }

    fn next_id(&mut self) -> SessionId {
        self.last_id = self.last_id.wrapping_add(1);
        SessionId(self.last_id)
    }

    /// Start a gesture session
    ///
    /// Ignored while an override holds. Any earlier gesture session is
    /// superseded: its timer may still fire but will no longer match.
    pub fn on_gesture_event<B, T>(
        &mut self,
        now_ms: u64,
        backlight: &mut B,
        timer: &mut T,
    ) -> Result<(), BacklightError>
    where
        B: Backlight + ?Sized,
        T: SessionTimer + ?Sized,
    {
        if self.override_active() {
            return Ok(());
        }

        let id = self.next_id();
        self.session = Some(LightSession {
            id,
            reason: SessionReason::Gesture,
            expires_at_ms: Some(now_ms.saturating_add(self.config.duration_ms)),
        });
        timer.arm(id, self.config.duration_ms);

        if self.config.ambient {
            backlight.light_interaction()
        } else {
            backlight.set_light(true)
        }
    }

    /// React to a battery state report
    pub fn on_battery_state<B>(
        &mut self,
        state: BatteryState,
        backlight: &mut B,
    ) -> Result<(), BacklightError>
    where
        B: Backlight + ?Sized,
    {
        let reason = if state.charging && self.config.charging {
            Some(SessionReason::Charging)
        } else if state.plugged && self.config.plugged {
            Some(SessionReason::Plugged)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                if self.session.map(|s| s.reason) != Some(reason) {
                    let id = self.next_id();
                    self.session = Some(LightSession {
                        id,
                        reason,
                        expires_at_ms: None,
                    });
                }
                backlight.set_light(true)
            }
            None if self.override_active() => {
                self.session = None;
                backlight.set_light(false)
            }
            None => Ok(()),
        }
    }

    /// Handle an armed session timer firing
    ///
    /// Only the current gesture session is ended. Timers for superseded
    /// sessions, or that fire under an override, are ignored.
    pub fn on_session_timer_expired<B>(
        &mut self,
        id: SessionId,
        backlight: &mut B,
    ) -> Result<(), BacklightError>
    where
        B: Backlight + ?Sized,
    {
        match self.session {
            Some(s) if s.reason == SessionReason::Gesture && s.id == id => {
                self.session = None;
                backlight.set_light(false)
            }
            _ => Ok(()),
        }
    }

    /// End any session and turn the light off
    pub fn force_off<B>(&mut self, backlight: &mut B) -> Result<(), BacklightError>
    where
        B: Backlight + ?Sized,
    {
        self.session = None;
        backlight.set_light(false)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use heapless::Vec;
    use proptest::prelude::*;

    #[derive(Debug, Default)]
    pub(crate) struct MockLight {
        pub on: bool,
        pub interactions: u32,
        pub writes: u32,
        pub fail: bool,
    }

    impl Backlight for MockLight {
        fn set_light(&mut self, on: bool) -> Result<(), BacklightError> {
            if self.fail {
                return Err(BacklightError::Bus);
            }
            self.on = on;
            self.writes += 1;
            Ok(())
        }

        fn light_interaction(&mut self) -> Result<(), BacklightError> {
            if self.fail {
                return Err(BacklightError::Bus);
            }
            self.on = true;
            self.interactions += 1;
            Ok(())
        }

        fn is_on(&self) -> bool {
            self.on
        }
    }

    #[derive(Debug, Default)]
    pub(crate) struct MockTimer {
        pub armed: Vec<(SessionId, u64), 16>,
    }

    impl SessionTimer for MockTimer {
        fn arm(&mut self, session: SessionId, after_ms: u64) {
            let _ = self.armed.push((session, after_ms));
        }
    }

    fn config(charging: bool, plugged: bool) -> LightConfig {
        LightConfig {
            duration_ms: 5_000,
            charging,
            plugged,
            ambient: false,
        }
    }

    #[test]
    fn test_gesture_session_lifecycle() {
        let mut ctl = LightController::new(config(false, false));
        let mut light = MockLight::default();
        let mut timer = MockTimer::default();

        ctl.on_gesture_event(1_000, &mut light, &mut timer).unwrap();
        assert!(light.on);
        let session = *ctl.session().unwrap();
        assert_eq!(session.reason, SessionReason::Gesture);
        assert_eq!(session.expires_at_ms, Some(6_000));
        assert_eq!(timer.armed.as_slice(), &[(session.id, 5_000)]);

        ctl.on_session_timer_expired(session.id, &mut light).unwrap();
        assert!(!light.on);
        assert!(ctl.session().is_none());
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut ctl = LightController::new(config(false, false));
        let mut light = MockLight::default();
        let mut timer = MockTimer::default();

        ctl.on_gesture_event(0, &mut light, &mut timer).unwrap();
        let first = timer.armed[0].0;
        ctl.on_gesture_event(3_000, &mut light, &mut timer).unwrap();
        let second = timer.armed[1].0;
        assert_ne!(first, second);

        ctl.on_session_timer_expired(first, &mut light).unwrap();
        assert!(light.on);

        ctl.on_session_timer_expired(second, &mut light).unwrap();
        assert!(!light.on);
    }

    #[test]
    fn test_ambient_uses_interaction_enable() {
        let mut ctl = LightController::new(LightConfig {
            ambient: true,
            ..config(false, false)
        });
        let mut light = MockLight::default();
        let mut timer = MockTimer::default();

        ctl.on_gesture_event(0, &mut light, &mut timer).unwrap();
        assert_eq!(light.interactions, 1);
        assert_eq!(light.writes, 0);
    }

    #[test]
    fn test_charging_override_suppresses_gesture() {
        let mut ctl = LightController::new(config(true, false));
        let mut light = MockLight::default();
        let mut timer = MockTimer::default();

        ctl.on_battery_state(BatteryState::new(true, true), &mut light)
            .unwrap();
        assert!(light.on);
        assert_eq!(ctl.session().unwrap().reason, SessionReason::Charging);
        assert_eq!(ctl.session().unwrap().expires_at_ms, None);

        ctl.on_gesture_event(100, &mut light, &mut timer).unwrap();
        assert!(timer.armed.is_empty());
        assert_eq!(ctl.session().unwrap().reason, SessionReason::Charging);
    }

    #[test]
    fn test_plugged_when_charging_flag_disabled() {
        let mut ctl = LightController::new(config(false, true));
        let mut light = MockLight::default();

        ctl.on_battery_state(BatteryState::new(true, true), &mut light)
            .unwrap();
        assert_eq!(ctl.session().unwrap().reason, SessionReason::Plugged);
    }

    #[test]
    fn test_flags_disabled_ignores_power() {
        let mut ctl = LightController::new(config(false, false));
        let mut light = MockLight::default();

        ctl.on_battery_state(BatteryState::new(true, true), &mut light)
            .unwrap();
        assert!(!light.on);
        assert!(ctl.session().is_none());
        assert_eq!(light.writes, 0);
    }

    #[test]
    fn test_override_ends_light_off() {
        let mut ctl = LightController::new(config(true, true));
        let mut light = MockLight::default();

        ctl.on_battery_state(BatteryState::new(false, true), &mut light)
            .unwrap();
        assert_eq!(ctl.session().unwrap().reason, SessionReason::Plugged);

        ctl.on_battery_state(BatteryState::new(false, false), &mut light)
            .unwrap();
        assert!(!light.on);
        assert!(ctl.session().is_none());
    }

    #[test]
    fn test_override_does_not_resurrect_gesture_timer() {
        let mut ctl = LightController::new(config(true, false));
        let mut light = MockLight::default();
        let mut timer = MockTimer::default();

        ctl.on_gesture_event(0, &mut light, &mut timer).unwrap();
        let gesture = timer.armed[0].0;
        ctl.on_battery_state(BatteryState::new(true, false), &mut light)
            .unwrap();
        ctl.on_battery_state(BatteryState::new(false, false), &mut light)
            .unwrap();
        assert!(ctl.session().is_none());

        // The old gesture timer no longer matches anything
        light.on = true;
        ctl.on_session_timer_expired(gesture, &mut light).unwrap();
        assert!(light.on);
    }

    #[test]
    fn test_timer_under_override_is_ignored() {
        let mut ctl = LightController::new(config(true, false));
        let mut light = MockLight::default();
        let mut timer = MockTimer::default();

        ctl.on_gesture_event(0, &mut light, &mut timer).unwrap();
        ctl.on_battery_state(BatteryState::new(true, false), &mut light)
            .unwrap();
        ctl.on_session_timer_expired(timer.armed[0].0, &mut light)
            .unwrap();
        assert!(light.on);
        assert_eq!(ctl.session().unwrap().reason, SessionReason::Charging);
    }

    #[test]
    fn test_repeated_override_report_keeps_session() {
        let mut ctl = LightController::new(config(true, false));
        let mut light = MockLight::default();

        ctl.on_battery_state(BatteryState::new(true, false), &mut light)
            .unwrap();
        let id = ctl.session().unwrap().id;
        ctl.on_battery_state(BatteryState::new(true, false), &mut light)
            .unwrap();
        assert_eq!(ctl.session().unwrap().id, id);
    }

    #[test]
    fn test_effector_failure_keeps_state() {
        let mut ctl = LightController::new(config(false, false));
        let mut light = MockLight {
            fail: true,
            ..Default::default()
        };
        let mut timer = MockTimer::default();

        assert_eq!(
            ctl.on_gesture_event(0, &mut light, &mut timer),
            Err(BacklightError::Bus)
        );
        // Session and timer still exist so expiry retries the write
        assert!(ctl.session().is_some());
        light.fail = false;
        light.on = true;
        ctl.on_session_timer_expired(timer.armed[0].0, &mut light)
            .unwrap();
        assert!(!light.on);
    }

    #[test]
    fn test_force_off() {
        let mut ctl = LightController::new(config(true, false));
        let mut light = MockLight::default();
        ctl.on_battery_state(BatteryState::new(true, false), &mut light)
            .unwrap();
        ctl.force_off(&mut light).unwrap();
        assert!(!light.on);
        assert!(!ctl.override_active());
    }

    proptest! {
        #[test]
        fn prop_idle_power_report_is_noop(
            charging_flag in any::<bool>(),
            plugged_flag in any::<bool>(),
            light_on in any::<bool>(),
            gesture in any::<bool>(),
        ) {
            let mut ctl = LightController::new(config(charging_flag, plugged_flag));
            let mut light = MockLight::default();
            let mut timer = MockTimer::default();
            if gesture {
                ctl.on_gesture_event(0, &mut light, &mut timer).unwrap();
            }
            light.on = light_on;
            let before = ctl.session().copied();
            let writes = light.writes;

            ctl.on_battery_state(BatteryState::new(false, false), &mut light).unwrap();
            prop_assert_eq!(light.on, light_on);
            prop_assert_eq!(light.writes, writes);
            prop_assert_eq!(ctl.session().copied(), before);
        }

        #[test]
        fn prop_at_most_one_session(
            events in prop::collection::vec((0u8..3, any::<bool>(), any::<bool>()), 0..40),
        ) {
            let mut ctl = LightController::new(config(true, true));
            let mut light = MockLight::default();
            let mut timer = MockTimer::default();
            let mut last_armed = None;
            for (i, (kind, a, b)) in events.into_iter().enumerate() {
                let now = i as u64 * 100;
                match kind {
                    0 => ctl.on_gesture_event(now, &mut light, &mut timer).unwrap(),
                    1 => ctl.on_battery_state(BatteryState::new(a, b), &mut light).unwrap(),
                    _ => {
                        if let Some(id) = last_armed {
                            ctl.on_session_timer_expired(id, &mut light).unwrap();
                        }
                    }
                }
                if let Some(&(id, _)) = timer.armed.last() {
                    last_armed = Some(id);
                }
                timer.armed.clear();
                // Light is on exactly when a session holds it
                prop_assert_eq!(light.on, ctl.session().is_some());
                if let Some(s) = ctl.session() {
                    prop_assert_eq!(s.expires_at_ms.is_some(), s.reason == SessionReason::Gesture);
                }
            }
        }
    }
}
