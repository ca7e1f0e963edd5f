//! Display backlight effector

/// Errors that can occur driving the backlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightError {
    /// Output pin or bus write failed
    Bus,
    /// Light is not available (e.g. display powered down)
    Unavailable,
}

/// Trait for the display backlight
///
/// Two enable primitives exist: a direct enable that forces the light to
/// the requested level, and an ambient-aware "interaction" enable that lets
/// the platform decide whether light is needed at all.
pub trait Backlight {
    /// Force the light on or off
    fn set_light(&mut self, on: bool) -> Result<(), BacklightError>;

    /// Ambient-aware enable
    ///
    /// Implementations may leave the light off when ambient light is
    /// sufficient.
    fn light_interaction(&mut self) -> Result<(), BacklightError>;

    /// Check if the light is currently on
    fn is_on(&self) -> bool;
}
