//! Display backlight drivers

pub mod gpio;

pub use gpio::{AlwaysDark, AmbientSense, DigitalAmbient, GpioBacklight};
