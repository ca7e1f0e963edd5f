//! Glance - wrist-raise auto-backlight firmware
//!
//! Main firmware binary for RP2040-based wearables. A foreground
//! configurator owns the settings and the daily wake window; a background
//! worker lights the display on wrist raises and while charging.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};
use embassy_sync::mutex::Mutex;
use embassy_time::Instant;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use glance_core::clock::{LocalTime, WallClock};
use glance_drivers::accel::Lis3dh;
use glance_drivers::light::{AlwaysDark, GpioBacklight};
use glance_drivers::power::ChargerPins;
use glance_hal_rp2040::{rtc, Rp2040FlashStore};

use crate::board::{SharedLight, SharedStore};

mod board;
mod channels;
mod tasks;
mod ui;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// Shared between the foreground and worker tasks
static STORE: StaticCell<SharedStore> = StaticCell::new();
static LIGHT: StaticCell<SharedLight> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Glance firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Anchor the wall clock once; an unset RTC starts the day at midnight
    let mut rtc = Rtc::new(p.RTC);
    let local = match rtc::local_time(&rtc) {
        Some(local) => local,
        None => {
            warn!("RTC not set, starting at 00:00");
            let midnight = DateTime {
                year: 2024,
                month: 1,
                day: 1,
                day_of_week: DayOfWeek::Monday,
                hour: 0,
                minute: 0,
                second: 0,
            };
            if rtc.set_datetime(midnight).is_err() {
                warn!("RTC set failed");
            }
            LocalTime::default()
        }
    };
    let clock = WallClock::new(Instant::now().as_secs(), local);
    info!(
        "Local time {:02}:{:02}:{:02}",
        local.hour, local.minute, local.second
    );

    let store = STORE.init(Mutex::new(Rp2040FlashStore::new(p.FLASH, p.DMA_CH0)));

    // Pin assignment is board-specific
    let backlight_pin = Output::new(p.PIN_15, Level::Low);
    let Ok(backlight) = GpioBacklight::new(backlight_pin, AlwaysDark, board::BACKLIGHT_ACTIVE_LOW)
    else {
        defmt::panic!("Backlight pin unusable");
    };
    let light = LIGHT.init(Mutex::new(backlight));

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = board::I2C_FREQUENCY_HZ;
    let bus = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
    let accel = Lis3dh::new(bus, board::ACCEL_ADDRESS, board::ACCEL_ORIENTATION);

    let charger = ChargerPins::new(
        Input::new(p.PIN_16, Pull::Up),
        Input::new(p.PIN_17, Pull::Up),
    );

    let back = Input::new(p.PIN_18, Pull::Up);
    let up = Input::new(p.PIN_19, Pull::Up);
    let select = Input::new(p.PIN_20, Pull::Up);
    let down = Input::new(p.PIN_21, Pull::Up);

    spawner
        .spawn(tasks::worker_task(store, light, accel, charger))
        .unwrap();
    spawner
        .spawn(tasks::buttons_task(back, up, select, down))
        .unwrap();
    spawner
        .spawn(tasks::foreground_task(store, light, clock))
        .unwrap();

    info!("All tasks spawned");
}
