//! Wall-clock time of day
//!
//! Alarms are scheduled on a monotonic seconds counter, but the window is
//! configured in local time. [`WallClock`] ties the two together from a
//! single local time reading.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: u32 = 60;
pub const SECONDS_PER_HOUR: u32 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: u32 = 24 * SECONDS_PER_HOUR;

/// Local time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalTime {
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

impl LocalTime {
    /// Create a time of day, wrapping out-of-range fields into the day
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        let secs = (hour as u32 * SECONDS_PER_HOUR)
            + (minute as u32 * SECONDS_PER_MINUTE)
            + second as u32;
        Self::from_seconds_of_day(secs)
    }

    /// Seconds elapsed since local midnight
    pub const fn seconds_of_day(&self) -> u32 {
        self.hour as u32 * SECONDS_PER_HOUR
            + self.minute as u32 * SECONDS_PER_MINUTE
            + self.second as u32
    }

    /// Build a time of day from seconds since midnight (wraps at 24h)
    pub const fn from_seconds_of_day(secs: u32) -> Self {
        let secs = secs % SECONDS_PER_DAY;
        Self {
            hour: (secs / SECONDS_PER_HOUR) as u8,
            minute: ((secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u8,
            second: (secs % SECONDS_PER_MINUTE) as u8,
        }
    }
}

/// A single reading of "now" in both time bases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Now {
    /// Monotonic seconds (the alarm time base)
    pub mono_s: u64,
    /// Local time of day
    pub local: LocalTime,
}

impl Now {
    pub const fn new(mono_s: u64, local: LocalTime) -> Self {
        Self { mono_s, local }
    }
}

/// Local time of day derived from a monotonic counter
///
/// Anchored once (typically from the RTC at boot) and advanced from the
/// monotonic clock afterwards, so both time bases always agree.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    base_mono_s: u64,
    base_local: LocalTime,
}

impl WallClock {
    /// Anchor `base_local` to the monotonic instant `base_mono_s`
    pub const fn new(base_mono_s: u64, base_local: LocalTime) -> Self {
        Self {
            base_mono_s,
            base_local,
        }
    }

    /// Re-anchor the clock (e.g. after the user sets the time)
    pub fn resync(&mut self, mono_s: u64, local: LocalTime) {
        self.base_mono_s = mono_s;
        self.base_local = local;
    }

    /// Read both time bases at monotonic instant `mono_s`
    ///
    /// Instants before the anchor are clamped to the anchor.
    pub fn now(&self, mono_s: u64) -> Now {
        let elapsed = mono_s.saturating_sub(self.base_mono_s) % SECONDS_PER_DAY as u64;
        let secs = self.base_local.seconds_of_day() + elapsed as u32;
        Now {
            mono_s: mono_s.max(self.base_mono_s),
            local: LocalTime::from_seconds_of_day(secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_of_day() {
        assert_eq!(LocalTime::new(0, 0, 0).seconds_of_day(), 0);
        assert_eq!(LocalTime::new(20, 0, 0).seconds_of_day(), 72_000);
        assert_eq!(LocalTime::new(23, 59, 59).seconds_of_day(), SECONDS_PER_DAY - 1);
    }

    #[test]
    fn test_from_seconds_wraps() {
        let t = LocalTime::from_seconds_of_day(SECONDS_PER_DAY + 61);
        assert_eq!(t, LocalTime::new(0, 1, 1));
    }

    #[test]
    fn test_wall_clock_advances() {
        let clock = WallClock::new(1_000, LocalTime::new(23, 59, 0));
        let now = clock.now(1_030);
        assert_eq!(now.mono_s, 1_030);
        assert_eq!(now.local, LocalTime::new(23, 59, 30));
    }

    #[test]
    fn test_wall_clock_crosses_midnight() {
        let clock = WallClock::new(0, LocalTime::new(23, 59, 0));
        let now = clock.now(120);
        assert_eq!(now.local, LocalTime::new(0, 1, 0));
    }

    #[test]
    fn test_wall_clock_resync() {
        let mut clock = WallClock::new(0, LocalTime::new(8, 0, 0));
        clock.resync(500, LocalTime::new(12, 0, 0));
        assert_eq!(clock.now(560).local, LocalTime::new(12, 1, 0));
    }
}
