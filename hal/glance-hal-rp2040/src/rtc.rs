//! Local time of day from the RP2040 RTC

use embassy_rp::rtc::{DateTime, Rtc};
use glance_core::clock::LocalTime;

/// Read the RTC as a local time of day
///
/// `None` if the RTC has not been set since power-up.
pub fn local_time(rtc: &Rtc<'_, embassy_rp::peripherals::RTC>) -> Option<LocalTime> {
    rtc.now().ok().map(|dt| from_datetime(&dt))
}

pub fn from_datetime(dt: &DateTime) -> LocalTime {
    LocalTime::new(dt.hour, dt.minute, dt.second)
}
