//! Background worker process control and session timers

use crate::light::SessionId;

/// Errors from launching or killing the background worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkerError {
    /// Worker could not be started
    LaunchFailed,
    /// Worker could not be stopped
    KillFailed,
}

/// Trait for launching and killing the background sensor worker
///
/// A launched worker reads the settings store once at start; a kill ends
/// the process and drops all of its state.
pub trait WorkerControl {
    /// Launch the worker (no-op if already running)
    fn launch(&mut self) -> Result<(), WorkerError>;

    /// Kill the worker (no-op if not running)
    fn kill(&mut self) -> Result<(), WorkerError>;

    /// Check if the worker is running
    fn is_running(&self) -> bool;
}

/// Trait for the one-shot timer that ends a gesture light session
///
/// Arming a new timer does not need to cancel the previous one: the light
/// controller ignores expiries for sessions that are no longer current.
pub trait SessionTimer {
    /// Deliver `session` back to the controller after `after_ms`
    fn arm(&mut self, session: SessionId, after_ms: u64);
}
