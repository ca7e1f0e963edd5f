//! Light session types

/// Why the light is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionReason {
    /// Wrist raise (always expires)
    Gesture,
    /// Battery charging (held until charging stops)
    Charging,
    /// External power present (held until unplugged)
    Plugged,
}

impl SessionReason {
    /// Check if this reason holds the light without expiry
    pub fn is_override(&self) -> bool {
        matches!(self, SessionReason::Charging | SessionReason::Plugged)
    }
}

/// Identity of one light session
///
/// Every new session gets a fresh id, so a timer armed for an earlier
/// session can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionId(pub u32);

/// The active light session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightSession {
    /// Session identity
    pub id: SessionId,
    /// Why the light is on
    pub reason: SessionReason,
    /// Expiry time (ms), only for gesture sessions
    pub expires_at_ms: Option<u64>,
}

/// Battery state report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryState {
    /// Battery is charging
    pub charging: bool,
    /// External power is connected
    pub plugged: bool,
}

impl BatteryState {
    pub const fn new(charging: bool, plugged: bool) -> Self {
        Self { charging, plugged }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_reasons() {
        assert!(SessionReason::Charging.is_override());
        assert!(SessionReason::Plugged.is_override());
        assert!(!SessionReason::Gesture.is_override());
    }
}
