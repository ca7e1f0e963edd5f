//! Settings record and its defaults

use core::ops::RangeInclusive;

use glance_hal::{KeyValueStore, StorageKey};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::store::{read_bool, read_u32, write_bool, write_u32, SettingsError};
use crate::schedule::WindowKind;
use crate::traits::AlarmHandle;

/// Default gesture light-on duration (units)
pub const DEFAULT_DURATION: u8 = 5;

/// Allowed gesture light-on durations (units)
pub const DURATION_RANGE: RangeInclusive<u8> = 1..=60;

/// Length of one duration unit on the session timer
pub const DURATION_UNIT_MS: u64 = 1000;

/// Default accelerometer batch size
pub const DEFAULT_SAMPLES: u8 = 1;

/// Allowed accelerometer batch sizes
pub const SAMPLES_RANGE: RangeInclusive<u8> = 1..=100;

/// Largest valid hour
pub const MAX_HOUR: u8 = 23;

/// Largest valid minute
pub const MAX_MINUTE: u8 = 59;

/// Local time of a window edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowTime {
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
}

impl WindowTime {
    /// Create a window time, clamping fields into range
    pub fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour: hour.min(MAX_HOUR),
            minute: minute.min(MAX_MINUTE),
        }
    }
}

/// Complete persisted settings record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Window-open local time
    pub start: WindowTime,
    /// Window-close local time
    pub stop: WindowTime,
    /// Last scheduled window-open alarm (0 = none)
    pub start_alarm_id: u32,
    /// Last scheduled window-close alarm (0 = none)
    pub stop_alarm_id: u32,
    /// Gesture light-on duration (units)
    pub duration: u8,
    /// Accelerometer batch size
    pub samples: u8,
    /// Keep light on while charging
    pub charging: bool,
    /// Keep light on while plugged in
    pub plugged: bool,
    /// Use ambient-aware light enable for gestures
    pub ambient: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start: WindowTime::default(),
            stop: WindowTime::default(),
            start_alarm_id: 0,
            stop_alarm_id: 0,
            duration: DEFAULT_DURATION,
            samples: DEFAULT_SAMPLES,
            charging: false,
            plugged: false,
            ambient: false,
        }
    }
}

/// Map a stored value into range
///
/// Missing or zero means "unset" and yields the default; anything else is
/// clamped to the range.
fn sanitize(raw: Option<u32>, default: u8, range: &RangeInclusive<u8>) -> u8 {
    match raw {
        None | Some(0) => default,
        Some(v) => (v.min(*range.end() as u32) as u8).max(*range.start()),
    }
}

/// Read a u32, treating undecodable bytes as unset
async fn read_u32_lenient<S: KeyValueStore>(
    store: &mut S,
    key: StorageKey,
) -> Result<Option<u32>, SettingsError> {
    match read_u32(store, key).await {
        Err(SettingsError::Decode) => Ok(None),
        other => other,
    }
}

/// Read a bool, treating undecodable bytes as unset
async fn read_bool_lenient<S: KeyValueStore>(
    store: &mut S,
    key: StorageKey,
) -> Result<Option<bool>, SettingsError> {
    match read_bool(store, key).await {
        Err(SettingsError::Decode) => Ok(None),
        other => other,
    }
}

impl Settings {
    /// Load every setting from the store
    ///
    /// Missing, zero, or undecodable values fall back to their defaults.
    /// Only a failing store is an error.
    pub async fn load<S: KeyValueStore>(store: &mut S) -> Result<Self, SettingsError> {
        let start_hour = read_u32_lenient(store, StorageKey::StartHour).await?;
        let start_minute = read_u32_lenient(store, StorageKey::StartMinute).await?;
        let stop_hour = read_u32_lenient(store, StorageKey::StopHour).await?;
        let stop_minute = read_u32_lenient(store, StorageKey::StopMinute).await?;

        let worker = WorkerSettings::load(store).await?;

        Ok(Self {
            start: WindowTime::new(
                sanitize(start_hour, 0, &(0..=MAX_HOUR)),
                sanitize(start_minute, 0, &(0..=MAX_MINUTE)),
            ),
            stop: WindowTime::new(
                sanitize(stop_hour, 0, &(0..=MAX_HOUR)),
                sanitize(stop_minute, 0, &(0..=MAX_MINUTE)),
            ),
            start_alarm_id: read_u32_lenient(store, StorageKey::StartAlarmId)
                .await?
                .unwrap_or(0),
            stop_alarm_id: read_u32_lenient(store, StorageKey::StopAlarmId)
                .await?
                .unwrap_or(0),
            duration: worker.duration,
            samples: worker.samples,
            charging: worker.charging,
            plugged: worker.plugged,
            ambient: worker.ambient,
        })
    }

    /// Configured local time for one window edge
    pub fn window(&self, kind: WindowKind) -> WindowTime {
        match kind {
            WindowKind::Open => self.start,
            WindowKind::Close => self.stop,
        }
    }

    /// Last persisted alarm for one window edge
    pub fn alarm_id(&self, kind: WindowKind) -> Option<AlarmHandle> {
        match kind {
            WindowKind::Open => AlarmHandle::from_raw(self.start_alarm_id),
            WindowKind::Close => AlarmHandle::from_raw(self.stop_alarm_id),
        }
    }

    /// Subset read by the background worker
    pub fn worker(&self) -> WorkerSettings {
        WorkerSettings {
            duration: self.duration,
            samples: self.samples,
            charging: self.charging,
            plugged: self.plugged,
            ambient: self.ambient,
        }
    }

    /// Persist one window edge's local time
    pub async fn save_window<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        kind: WindowKind,
        time: WindowTime,
    ) -> Result<(), SettingsError> {
        let (hour_key, minute_key) = match kind {
            WindowKind::Open => (StorageKey::StartHour, StorageKey::StartMinute),
            WindowKind::Close => (StorageKey::StopHour, StorageKey::StopMinute),
        };
        write_u32(store, hour_key, time.hour as u32).await?;
        write_u32(store, minute_key, time.minute as u32).await?;

        match kind {
            WindowKind::Open => self.start = time,
            WindowKind::Close => self.stop = time,
        }
        Ok(())
    }

    /// Persist one window edge's alarm handle (`None` is stored as 0)
    pub async fn save_alarm_id<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        kind: WindowKind,
        handle: Option<AlarmHandle>,
    ) -> Result<(), SettingsError> {
        let raw = handle.map(AlarmHandle::raw).unwrap_or(0);
        match kind {
            WindowKind::Open => {
                write_u32(store, StorageKey::StartAlarmId, raw).await?;
                self.start_alarm_id = raw;
            }
            WindowKind::Close => {
                write_u32(store, StorageKey::StopAlarmId, raw).await?;
                self.stop_alarm_id = raw;
            }
        }
        Ok(())
    }

    /// Persist the gesture light duration, returning the clamped value
    pub async fn save_duration<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        duration: u8,
    ) -> Result<u8, SettingsError> {
        let duration = sanitize(Some(duration as u32), DEFAULT_DURATION, &DURATION_RANGE);
        write_u32(store, StorageKey::Duration, duration as u32).await?;
        self.duration = duration;
        Ok(duration)
    }

    /// Persist the accelerometer batch size, returning the clamped value
    pub async fn save_samples<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        samples: u8,
    ) -> Result<u8, SettingsError> {
        let samples = sanitize(Some(samples as u32), DEFAULT_SAMPLES, &SAMPLES_RANGE);
        write_u32(store, StorageKey::Samples, samples as u32).await?;
        self.samples = samples;
        Ok(samples)
    }

    /// Persist the light-while-charging flag
    pub async fn save_charging<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        enabled: bool,
    ) -> Result<(), SettingsError> {
        write_bool(store, StorageKey::Charging, enabled).await?;
        self.charging = enabled;
        Ok(())
    }

    /// Persist the light-while-plugged flag
    pub async fn save_plugged<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        enabled: bool,
    ) -> Result<(), SettingsError> {
        write_bool(store, StorageKey::Plugged, enabled).await?;
        self.plugged = enabled;
        Ok(())
    }

    /// Persist the ambient-aware enable flag
    pub async fn save_ambient<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        enabled: bool,
    ) -> Result<(), SettingsError> {
        write_bool(store, StorageKey::Ambient, enabled).await?;
        self.ambient = enabled;
        Ok(())
    }
}

/// Settings the background worker reads once at start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkerSettings {
    /// Gesture light-on duration (units)
    pub duration: u8,
    /// Accelerometer batch size
    pub samples: u8,
    /// Keep light on while charging
    pub charging: bool,
    /// Keep light on while plugged in
    pub plugged: bool,
    /// Use ambient-aware light enable for gestures
    pub ambient: bool,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Settings::default().worker()
    }
}

impl WorkerSettings {
    /// Load the worker's settings from the store
    ///
    /// Missing, zero, or undecodable values fall back to their defaults.
    pub async fn load<S: KeyValueStore>(store: &mut S) -> Result<Self, SettingsError> {
        let duration = read_u32_lenient(store, StorageKey::Duration).await?;
        let samples = read_u32_lenient(store, StorageKey::Samples).await?;

        Ok(Self {
            duration: sanitize(duration, DEFAULT_DURATION, &DURATION_RANGE),
            samples: sanitize(samples, DEFAULT_SAMPLES, &SAMPLES_RANGE),
            charging: read_bool_lenient(store, StorageKey::Charging)
                .await?
                .unwrap_or(false),
            plugged: read_bool_lenient(store, StorageKey::Plugged)
                .await?
                .unwrap_or(false),
            ambient: read_bool_lenient(store, StorageKey::Ambient)
                .await?
                .unwrap_or(false),
        })
    }

    /// Gesture session length in milliseconds
    pub fn light_duration_ms(&self) -> u64 {
        self.duration as u64 * DURATION_UNIT_MS
    }

    /// Whether the worker needs battery state updates at all
    pub fn wants_battery_updates(&self) -> bool {
        self.charging || self.plugged
    }
}
