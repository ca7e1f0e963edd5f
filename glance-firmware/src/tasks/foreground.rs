//! Foreground configurator task
//!
//! Owns the settings, the wake window and the worker supervisor. Starts
//! with a user launch (full reset), then serves button commands and fires
//! window alarms as they come due.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};

use glance_core::clock::{Now, WallClock};
use glance_core::configurator::{Configurator, LaunchReason, Outcome};
use glance_core::schedule::AlarmTable;
use glance_hal::KeyValueStore;

use super::worker::WorkerLink;
use crate::board::{SharedLight, SharedStore};
use crate::channels::BUTTON_CHANNEL;
use crate::ui::Ui;

type Foreground = Configurator<WorkerLink, AlarmTable>;

/// Foreground task
#[embassy_executor::task]
pub async fn foreground_task(
    store: &'static SharedStore,
    light: &'static SharedLight,
    clock: WallClock,
) {
    info!("Foreground task started");

    let Some(mut config) = load(store).await else {
        error!("Foreground giving up, no settings store");
        return;
    };
    let mut ui = Ui::new();

    launch(&mut config, LaunchReason::User, &clock, store, light).await;

    loop {
        let due = config.schedule().alarms().next_due();
        let alarm = async move {
            match due {
                Some(at_s) => Timer::at(Instant::from_secs(at_s)).await,
                None => core::future::pending().await,
            }
        };

        match select(BUTTON_CHANNEL.receive(), alarm).await {
            Either::First(button) => {
                let Some(command) = ui.on_button(button, config.settings()) else {
                    if let Some(label) = ui.highlighted() {
                        debug!("Menu: {}", label);
                    }
                    continue;
                };

                info!("Command: {}", command);
                let result = {
                    let mut store = store.lock().await;
                    config.apply(command, now(&clock), &mut *store).await
                };
                match result {
                    Ok(outcome) => report(&outcome),
                    Err(e) => error!("Command failed: {}", e),
                }
            }
            Either::Second(()) => {
                let mono_s = now(&clock).mono_s;
                while let Some(fired) = config.schedule_mut().alarms_mut().pop_due(mono_s) {
                    info!("Alarm {} fired (tag {})", fired.handle, fired.tag);
                    let reason = LaunchReason::Wakeup {
                        handle: fired.handle,
                        tag: fired.tag,
                    };
                    launch(&mut config, reason, &clock, store, light).await;
                }
            }
        }
    }
}

fn now(clock: &WallClock) -> Now {
    clock.now(Instant::now().as_secs())
}

/// Load the configurator, wiping a store that cannot be read
async fn load(store: &SharedStore) -> Option<Foreground> {
    let mut store = store.lock().await;
    match Configurator::load(&mut *store, WorkerLink, AlarmTable::new()).await {
        Ok(config) => return Some(config),
        Err(e) => error!("Settings unreadable ({}), erasing", e),
    }

    if let Err(e) = store.erase_all().await {
        error!("Settings erase failed: {}", e);
        return None;
    }
    match Configurator::load(&mut *store, WorkerLink, AlarmTable::new()).await {
        Ok(config) => Some(config),
        Err(e) => {
            error!("Settings still unreadable: {}", e);
            None
        }
    }
}

async fn launch(
    config: &mut Foreground,
    reason: LaunchReason,
    clock: &WallClock,
    store: &SharedStore,
    light: &SharedLight,
) {
    let outcome = {
        let mut store = store.lock().await;
        let mut light = light.lock().await;
        config
            .launch(reason, now(clock), &mut *store, &mut *light)
            .await
    };
    report(&outcome);
}

fn report(outcome: &Outcome) {
    if let Some(feedback) = &outcome.feedback {
        info!("{}", feedback);
    }
    for (kind, result) in &outcome.scheduled {
        match result {
            Ok(s) => info!("{} alarm {} in {} s", kind, s.handle, s.offset_s),
            Err(e) => warn!("{} alarm not armed: {}", kind, e),
        }
    }
    match &outcome.worker {
        Some(Ok(action)) => debug!("Worker: {}", action),
        Some(Err(e)) => warn!("Worker control failed: {}", e),
        None => {}
    }
    if let Some(Err(e)) = &outcome.light {
        warn!("Backlight write failed: {}", e);
    }
}
