//! Background worker task
//!
//! Idles until the supervisor requests a launch, then runs one `Worker`
//! instance: accelerometer batches at the sensor rate, charger polling when
//! the settings want it, and the gesture session deadline. A kill request
//! drops the instance; the next launch starts from freshly read settings.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_time::{Duration, Instant, Ticker, Timer};
use heapless::Vec;
use portable_atomic::Ordering;

use glance_core::gesture::Sample;
use glance_core::light::{BatteryState, SessionId};
use glance_core::settings::WorkerSettings;
use glance_core::traits::{SessionTimer, WorkerControl, WorkerError};
use glance_core::worker::Worker;
use glance_drivers::accel::MAX_BATCH;

use crate::board::{Accel, Charger, SharedLight, SharedStore, ACCEL_RATE, RELAUNCH_DELAY_MS};
use crate::channels::{worker_running, WorkerRequest, WORKER_REQUESTS, WORKER_RUNNING};

/// Supervisor side of the worker task
///
/// Requests are queued; the task applies them in order.
pub struct WorkerLink;

impl WorkerControl for WorkerLink {
    fn launch(&mut self) -> Result<(), WorkerError> {
        WORKER_REQUESTS
            .try_send(WorkerRequest::Launch)
            .map_err(|_| WorkerError::LaunchFailed)?;
        WORKER_RUNNING.store(true, Ordering::Release);
        Ok(())
    }

    fn kill(&mut self) -> Result<(), WorkerError> {
        WORKER_REQUESTS
            .try_send(WorkerRequest::Kill)
            .map_err(|_| WorkerError::KillFailed)?;
        WORKER_RUNNING.store(false, Ordering::Release);
        Ok(())
    }

    fn is_running(&self) -> bool {
        worker_running()
    }
}

/// Latest gesture session deadline
///
/// Only the newest session can still be expired by its timer, so earlier
/// deadlines are simply overwritten.
#[derive(Default)]
struct SessionDeadline {
    armed: Option<(SessionId, Instant)>,
}

impl SessionTimer for SessionDeadline {
    fn arm(&mut self, session: SessionId, after_ms: u64) {
        self.armed = Some((session, Instant::now() + Duration::from_millis(after_ms)));
    }
}

impl SessionDeadline {
    async fn expired(&self) -> SessionId {
        match self.armed {
            Some((id, at)) => {
                Timer::at(at).await;
                id
            }
            None => core::future::pending().await,
        }
    }
}

/// Worker task
#[embassy_executor::task]
pub async fn worker_task(
    store: &'static SharedStore,
    light: &'static SharedLight,
    mut accel: Accel,
    mut charger: Charger,
) {
    info!("Worker task started");

    loop {
        if WORKER_REQUESTS.receive().await != WorkerRequest::Launch {
            continue;
        }

        let loaded = {
            let mut store = store.lock().await;
            Worker::launch(&mut *store).await
        };
        let worker = match loaded {
            Ok(worker) => worker,
            Err(e) => {
                warn!("Worker settings unreadable ({}), using defaults", e);
                Worker::start(WorkerSettings::default())
            }
        };
        let settings = worker.settings();
        info!(
            "Worker launched: duration={} samples={} charging={} plugged={} ambient={}",
            settings.duration, settings.samples, settings.charging, settings.plugged, settings.ambient
        );

        let accel_ready = match accel.init(ACCEL_RATE).await {
            Ok(()) => true,
            Err(e) => {
                error!("Accelerometer init failed: {}", e);
                false
            }
        };

        run(worker, light, &mut accel, accel_ready, &mut charger).await;

        if accel_ready {
            if let Err(e) = accel.power_down().await {
                warn!("Accelerometer power down failed: {}", e);
            }
        }
        info!("Worker stopped");

        // Give a restart's relaunch a clean gap after the kill
        Timer::after_millis(RELAUNCH_DELAY_MS).await;
    }
}

/// Run one worker instance until a kill request arrives
async fn run(
    mut worker: Worker,
    light: &SharedLight,
    accel: &mut Accel,
    accel_ready: bool,
    charger: &mut Charger,
) {
    let mut batch: Vec<Sample, MAX_BATCH> = Vec::new();
    let mut deadline = SessionDeadline::default();
    let mut last_battery: Option<BatteryState> = None;
    let mut ticker = Ticker::every(Duration::from_millis(ACCEL_RATE.period_ms()));

    loop {
        let wake = select3(WORKER_REQUESTS.receive(), ticker.next(), deadline.expired()).await;
        match wake {
            Either3::First(WorkerRequest::Kill) => break,
            Either3::First(WorkerRequest::Launch) => {
                debug!("Worker already running");
            }
            Either3::Second(()) => {
                if worker.wants_battery_updates() {
                    match charger.read() {
                        Ok(state) if last_battery != Some(state) => {
                            last_battery = Some(state);
                            info!("Battery: charging={} plugged={}", state.charging, state.plugged);
                            let mut light = light.lock().await;
                            if let Err(e) = worker.on_battery_state(state, &mut *light) {
                                warn!("Backlight write failed: {}", e);
                            }
                        }
                        Ok(_) => {}
                        Err(e) => warn!("Charger read failed: {}", e),
                    }
                }

                if !accel_ready {
                    continue;
                }
                match accel.fill_batch(&mut batch, worker.batch_size()).await {
                    Ok(true) => {
                        let now_ms = Instant::now().as_millis();
                        let mut light = light.lock().await;
                        match worker.on_accel_batch(&batch, now_ms, &mut *light, &mut deadline) {
                            Ok(Some(event)) => debug!("Wrist raise after {} ms", event.dwell_ms),
                            Ok(None) => {}
                            Err(e) => warn!("Backlight write failed: {}", e),
                        }
                        batch.clear();
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Accelerometer read failed: {}", e);
                        batch.clear();
                    }
                }
            }
            Either3::Third(id) => {
                deadline.armed = None;
                debug!("Session {} timer expired", id.0);
                let mut light = light.lock().await;
                if let Err(e) = worker.on_session_timer_expired(id, &mut *light) {
                    warn!("Backlight write failed: {}", e);
                }
            }
        }
    }

    let mut light = light.lock().await;
    if let Err(e) = worker.shutdown(&mut *light) {
        warn!("Backlight write failed: {}", e);
    }
}
