//! GPIO display backlight
//!
//! The backlight is a single output pin (directly or through a MOSFET).
//! The ambient-aware enable consults an [`AmbientSense`] and only lights
//! the display when it is dark.

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use glance_core::traits::{Backlight, BacklightError};

/// Ambient light sensing
pub trait AmbientSense {
    /// Check if it is dark enough to need the backlight
    fn is_dark(&mut self) -> bool;
}

/// No ambient sensor: always light the display
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDark;

impl AmbientSense for AlwaysDark {
    fn is_dark(&mut self) -> bool {
        true
    }
}

/// Digital light sensor (comparator output)
pub struct DigitalAmbient<P> {
    pin: P,
    /// If true, the pin reads high in the dark
    dark_high: bool,
}

impl<P: InputPin> DigitalAmbient<P> {
    pub fn new(pin: P, dark_high: bool) -> Self {
        Self { pin, dark_high }
    }
}

impl<P: InputPin> AmbientSense for DigitalAmbient<P> {
    fn is_dark(&mut self) -> bool {
        // Treat an unreadable sensor as dark so the light still works
        self.pin.is_high().map_or(true, |high| high == self.dark_high)
    }
}

/// GPIO backlight output
pub struct GpioBacklight<P, A = AlwaysDark> {
    pin: P,
    ambient: A,
    /// If true, light ON = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin, A: AmbientSense> GpioBacklight<P, A> {
    /// Create a backlight, initially off
    pub fn new(pin: P, ambient: A, inverted: bool) -> Result<Self, BacklightError> {
        let mut light = Self {
            pin,
            ambient,
            inverted,
            on: false,
        };
        light.set_light(false)?;
        Ok(light)
    }
}

impl<P: OutputPin, A: AmbientSense> Backlight for GpioBacklight<P, A> {
    fn set_light(&mut self, on: bool) -> Result<(), BacklightError> {
        let level = PinState::from(on != self.inverted);
        self.pin.set_state(level).map_err(|_| BacklightError::Bus)?;
        self.on = on;
        Ok(())
    }

    fn light_interaction(&mut self) -> Result<(), BacklightError> {
        if self.ambient.is_dark() {
            self.set_light(true)
        } else {
            Ok(())
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
