//! Power supply status

pub mod charger;

pub use charger::{ChargerError, ChargerPins};
