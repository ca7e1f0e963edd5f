//! Charger status pins
//!
//! Linear Li-ion chargers (MCP73831, TP4056 and similar) expose an
//! open-drain `CHG` line pulled low while charging, and a `PG` (power good)
//! line pulled low while input power is present.

use embedded_hal::digital::InputPin;
use glance_core::light::BatteryState;

/// Charger status read errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargerError {
    /// Status pin could not be read
    Pin,
}

/// Charger status inputs (both active low)
pub struct ChargerPins<C, G> {
    chg: C,
    pg: G,
}

impl<C: InputPin, G: InputPin> ChargerPins<C, G> {
    pub fn new(chg: C, pg: G) -> Self {
        Self { chg, pg }
    }

    /// Read the current battery state
    pub fn read(&mut self) -> Result<BatteryState, ChargerError> {
        let charging = self.chg.is_low().map_err(|_| ChargerError::Pin)?;
        let plugged = self.pg.is_low().map_err(|_| ChargerError::Pin)?;
        // Charging implies external power even if PG is not wired
        Ok(BatteryState::new(charging, plugged || charging))
    }
}
