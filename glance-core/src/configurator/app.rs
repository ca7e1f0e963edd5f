//! Configurator state and command handling

use core::fmt;

use glance_hal::KeyValueStore;
use heapless::Vec;

use super::menu::MenuCommand;
use crate::clock::Now;
use crate::schedule::{Scheduled, WakeScheduleManager, WindowError, WindowKind};
use crate::settings::{Settings, SettingsError, WindowTime};
use crate::traits::{
    AlarmHandle, Backlight, BacklightError, WakeScheduler, WorkerControl, WorkerError,
};
use crate::worker::{Supervisor, WorkerAction, WorkerCommand};

/// Why the foreground process was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LaunchReason {
    /// Opened by the user
    User,
    /// Woken by a window alarm
    Wakeup { handle: AlarmHandle, tag: i32 },
}

/// Hard configurator failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    Settings(SettingsError),
}

impl From<SettingsError> for ConfigError {
    fn from(e: SettingsError) -> Self {
        ConfigError::Settings(e)
    }
}

/// Message shown to the user after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feedback {
    Worker { running: bool },
    WindowSet { kind: WindowKind, time: WindowTime },
    TimeoutSet(u8),
    SamplesSet(u8),
    TimesCleared,
    ChargingLight(bool),
    PluggedLight(bool),
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |on: bool| if on { "on" } else { "off" };
        match self {
            Feedback::Worker { running } => write!(f, "Light {}", on_off(*running)),
            Feedback::WindowSet { kind, time } => {
                let edge = match kind {
                    WindowKind::Open => "Start",
                    WindowKind::Close => "Stop",
                };
                write!(f, "{} {:02}:{:02}", edge, time.hour, time.minute)
            }
            Feedback::TimeoutSet(d) => write!(f, "Duration {}", d),
            Feedback::SamplesSet(s) => write!(f, "Samples {}", s),
            Feedback::TimesCleared => write!(f, "Times cleared"),
            Feedback::ChargingLight(on) => {
                write!(f, "Light will be {} during charging", on_off(*on))
            }
            Feedback::PluggedLight(on) => {
                write!(f, "Light will be {} while plugged in", on_off(*on))
            }
        }
    }
}

/// Everything a command or launch did
///
/// Alarm, worker and backlight failures are transient and reported here
/// for the caller to log; none of them abort the rest of the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub feedback: Option<Feedback>,
    /// Window edges re-armed
    pub scheduled: Vec<(WindowKind, Result<Scheduled, WindowError>), 2>,
    /// Worker lifecycle step taken
    pub worker: Option<Result<WorkerAction, WorkerError>>,
    /// Forced backlight write
    pub light: Option<Result<(), BacklightError>>,
}

impl Outcome {
    fn new(feedback: Option<Feedback>) -> Self {
        Self {
            feedback,
            scheduled: Vec::new(),
            worker: None,
            light: None,
        }
    }

    fn push_scheduled(&mut self, kind: WindowKind, result: Result<Scheduled, WindowError>) {
        // Never more than one entry per edge
        let _ = self.scheduled.push((kind, result));
    }
}

/// Foreground configurator
pub struct Configurator<W: WorkerControl, A: WakeScheduler> {
    settings: Settings,
    schedule: WakeScheduleManager<A>,
    supervisor: Supervisor<W>,
}

impl<W: WorkerControl, A: WakeScheduler> Configurator<W, A> {
    /// Load settings and restore the window entries from them
    pub async fn load<S: KeyValueStore>(
        store: &mut S,
        control: W,
        alarms: A,
    ) -> Result<Self, ConfigError> {
        let settings = Settings::load(store).await?;
        Ok(Self {
            schedule: WakeScheduleManager::from_settings(alarms, &settings),
            supervisor: Supervisor::new(control),
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn schedule(&self) -> &WakeScheduleManager<A> {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut WakeScheduleManager<A> {
        &mut self.schedule
    }

    pub fn supervisor(&self) -> &Supervisor<W> {
        &self.supervisor
    }

    pub fn supervisor_mut(&mut self) -> &mut Supervisor<W> {
        &mut self.supervisor
    }

    /// Start-up handling
    ///
    /// A user launch is a complete reset: every alarm is cancelled, both
    /// edges are re-armed from the stored times and the worker is
    /// restarted. A wakeup handles the fired alarm: the window-open edge
    /// starts the worker, the window-close edge turns the light off and
    /// stops it. Either edge is re-armed for the next day.
    pub async fn launch<S, B>(
        &mut self,
        reason: LaunchReason,
        now: Now,
        store: &mut S,
        backlight: &mut B,
    ) -> Outcome
    where
        S: KeyValueStore,
        B: Backlight + ?Sized,
    {
        match reason {
            LaunchReason::User => {
                let mut outcome = Outcome::new(None);
                let report = self.schedule.rearm_all(now, &mut self.settings, store).await;
                for (kind, result) in report {
                    outcome.push_scheduled(kind, result);
                }
                outcome.worker = Some(self.supervisor.apply(WorkerCommand::Restart));
                outcome
            }
            LaunchReason::Wakeup { handle, tag } => {
                let mut outcome = Outcome::new(None);
                let Some(fired) = self
                    .schedule
                    .on_alarm_fired(handle, tag, now, &mut self.settings, store)
                    .await
                else {
                    return outcome;
                };

                if fired.kind == WindowKind::Close {
                    outcome.light = Some(backlight.set_light(false));
                }
                let command = fired.kind.worker_command();
                outcome.worker = Some(self.supervisor.apply(command));
                outcome.feedback = Some(Feedback::Worker {
                    running: self.supervisor.is_running(),
                });
                outcome.push_scheduled(fired.kind, fired.next);
                outcome
            }
        }
    }

    /// Apply a menu command
    ///
    /// Only a failure to persist a worker setting is an error; the command
    /// then has no further effect.
    pub async fn apply<S: KeyValueStore>(
        &mut self,
        command: MenuCommand,
        now: Now,
        store: &mut S,
    ) -> Result<Outcome, ConfigError> {
        let outcome = match command {
            MenuCommand::ToggleWorker => self.worker_command(None),
            MenuCommand::EnableWorker => self.worker_command(Some(WorkerCommand::Start)),
            MenuCommand::DisableWorker => self.worker_command(Some(WorkerCommand::Stop)),
            MenuCommand::SetStartTime { hour, minute } => {
                self.set_window(WindowKind::Open, hour, minute, now, store)
                    .await
            }
            MenuCommand::SetStopTime { hour, minute } => {
                self.set_window(WindowKind::Close, hour, minute, now, store)
                    .await
            }
            MenuCommand::ClearTimes => {
                let mut outcome = Outcome::new(Some(Feedback::TimesCleared));
                let report = self.schedule.reset(now, &mut self.settings, store).await;
                for (kind, result) in report {
                    outcome.push_scheduled(kind, result);
                }
                outcome
            }
            MenuCommand::SetTimeout(duration) => {
                let duration = self.settings.save_duration(store, duration).await?;
                self.restarted(Feedback::TimeoutSet(duration))
            }
            MenuCommand::SetResponsiveness(samples) => {
                let samples = self.settings.save_samples(store, samples).await?;
                let mut outcome = Outcome::new(Some(Feedback::SamplesSet(samples)));
                if self.supervisor.control().is_running() {
                    outcome.worker = Some(self.supervisor.apply(WorkerCommand::Restart));
                }
                outcome
            }
            MenuCommand::ToggleChargingLight => {
                let enabled = !self.settings.charging;
                self.settings.save_charging(store, enabled).await?;
                self.restarted(Feedback::ChargingLight(enabled))
            }
            MenuCommand::TogglePluggedLight => {
                let enabled = !self.settings.plugged;
                self.settings.save_plugged(store, enabled).await?;
                self.restarted(Feedback::PluggedLight(enabled))
            }
        };
        Ok(outcome)
    }

    /// Start, stop, or (for `None`) toggle the worker
    fn worker_command(&mut self, command: Option<WorkerCommand>) -> Outcome {
        let result = match command {
            Some(command) => self.supervisor.apply(command),
            None => self.supervisor.toggle(),
        };
        let mut outcome = Outcome::new(Some(Feedback::Worker {
            running: self.supervisor.is_running(),
        }));
        outcome.worker = Some(result);
        outcome
    }

    /// Restart the worker so it reloads its settings
    fn restarted(&mut self, feedback: Feedback) -> Outcome {
        let mut outcome = Outcome::new(Some(feedback));
        outcome.worker = Some(self.supervisor.apply(WorkerCommand::Restart));
        outcome
    }

    async fn set_window<S: KeyValueStore>(
        &mut self,
        kind: WindowKind,
        hour: u8,
        minute: u8,
        now: Now,
        store: &mut S,
    ) -> Outcome {
        let time = WindowTime::new(hour, minute);
        let mut outcome = Outcome::new(Some(Feedback::WindowSet { kind, time }));
        let result = self
            .schedule
            .set_window(kind, time, now, &mut self.settings, store)
            .await;
        outcome.push_scheduled(kind, result);
        outcome
    }
}
