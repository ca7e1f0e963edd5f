//! Dwell and hysteresis filter over accelerometer batches
//!
//! A raise is recorded on the first in-envelope sample while detection is
//! armed and fires on the next batch that does not disarm it. Detection
//! re-arms only once a sample leaves the widened hysteresis band, so holding
//! the wrist still yields a single event.
//!
//! The dwell is one batch, not a wall-clock interval: the event fires on
//! the very next call regardless of how little time passed.

use super::sample::Sample;

/// Detector state between batches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureWindowState {
    /// When the wrist entered the envelope (ms), if a raise is pending
    pub in_range_since: Option<u64>,
    /// Detection is armed (the wrist has left the hysteresis band)
    pub outside_hysteresis: bool,
}

impl Default for GestureWindowState {
    fn default() -> Self {
        Self {
            in_range_since: None,
            outside_hysteresis: true,
        }
    }
}

/// A detected wrist raise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureEvent {
    /// Time the event fired (ms)
    pub at_ms: u64,
    /// Time between entering the envelope and firing (ms)
    pub dwell_ms: u64,
}

/// Wrist-raise detector
#[derive(Debug, Clone, Default)]
pub struct GestureDetector {
    state: GestureWindowState,
}

impl GestureDetector {
    /// Create an armed detector
    pub fn new() -> Self {
        Self::default()
    }

    /// Current filter state
    pub fn state(&self) -> GestureWindowState {
        self.state
    }

    /// Drop any pending raise and re-arm
    pub fn reset(&mut self) {
        self.state = GestureWindowState::default();
    }

    /// Process one accelerometer batch received at `now_ms`
    ///
    /// Scanning stops at the first sample that either records a raise or
    /// re-arms detection. An empty batch carries no observation and leaves
    /// the state untouched.
    pub fn process(&mut self, batch: &[Sample], now_ms: u64) -> Option<GestureEvent> {
        if batch.is_empty() {
            return None;
        }

        let mut recorded_now = false;
        for sample in batch {
            if sample.in_envelope() {
                if self.state.in_range_since.is_none() && self.state.outside_hysteresis {
                    self.state.in_range_since = Some(now_ms);
                    self.state.outside_hysteresis = false;
                    recorded_now = true;
                    break;
                }
            } else if sample.beyond_hysteresis() {
                self.state.in_range_since = None;
                self.state.outside_hysteresis = true;
                break;
            }
        }

        match self.state.in_range_since {
            Some(since) if !recorded_now => {
                self.state.in_range_since = None;
                Some(GestureEvent {
                    at_ms: now_ms,
                    dwell_ms: now_ms.saturating_sub(since),
                })
            }
            _ => None,
        }
    }
}
