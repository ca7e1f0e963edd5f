//! Accelerometer samples and the trigger envelope

use core::ops::RangeInclusive;

/// Trigger envelope on the x axis (milli-g)
pub const TRIGGER_X: RangeInclusive<i16> = -250..=250;

/// Trigger envelope on the y axis (milli-g)
pub const TRIGGER_Y: RangeInclusive<i16> = -1000..=-300;

/// Extra margin beyond the x envelope before detection re-arms
pub const HYSTERESIS_X: i16 = 50;

/// Extra margin beyond the y envelope before detection re-arms
pub const HYSTERESIS_Y: i16 = 100;

/// One 3-axis acceleration reading in milli-g
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Sample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Check if the wrist is in the viewing position
    ///
    /// Each axis is tested independently; z is ignored.
    pub fn in_envelope(&self) -> bool {
        TRIGGER_X.contains(&self.x) && TRIGGER_Y.contains(&self.y)
    }

    /// Check if the sample is beyond the hysteresis band on any axis
    pub fn beyond_hysteresis(&self) -> bool {
        let x = self.x as i32;
        let y = self.y as i32;
        x > *TRIGGER_X.end() as i32 + HYSTERESIS_X as i32
            || x < *TRIGGER_X.start() as i32 - HYSTERESIS_X as i32
            || y > *TRIGGER_Y.end() as i32 + HYSTERESIS_Y as i32
            || y < *TRIGGER_Y.start() as i32 - HYSTERESIS_Y as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_bounds_inclusive() {
        assert!(Sample::new(-250, -1000, 0).in_envelope());
        assert!(Sample::new(250, -300, 0).in_envelope());
        assert!(!Sample::new(251, -500, 0).in_envelope());
        assert!(!Sample::new(0, -299, 0).in_envelope());
    }

    #[test]
    fn test_z_is_ignored() {
        assert!(Sample::new(0, -600, i16::MAX).in_envelope());
        assert!(Sample::new(0, -600, i16::MIN).in_envelope());
    }

    #[test]
    fn test_hysteresis_band_is_neither() {
        // Between the envelope and the widened bound on each axis
        for s in [
            Sample::new(280, -600, 0),
            Sample::new(-300, -600, 0),
            Sample::new(0, -250, 0),
            Sample::new(0, -1100, 0),
        ] {
            assert!(!s.in_envelope());
            assert!(!s.beyond_hysteresis());
        }
    }

    #[test]
    fn test_beyond_hysteresis() {
        assert!(Sample::new(301, -600, 0).beyond_hysteresis());
        assert!(Sample::new(-301, -600, 0).beyond_hysteresis());
        assert!(Sample::new(0, -199, 0).beyond_hysteresis());
        assert!(Sample::new(0, -1101, 0).beyond_hysteresis());
        assert!(Sample::new(i16::MIN, i16::MAX, 0).beyond_hysteresis());
    }
}
