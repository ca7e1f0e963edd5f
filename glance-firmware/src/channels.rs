//! Inter-task communication channels
//!
//! Static embassy-sync primitives shared between the foreground, worker and
//! button tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::{AtomicBool, Ordering};

use crate::ui::Button;

/// Channel capacity for button presses
const BUTTON_CHANNEL_SIZE: usize = 8;

/// Channel capacity for worker lifecycle requests (a restart queues two)
const WORKER_CHANNEL_SIZE: usize = 4;

/// Worker lifecycle request sent by the foreground supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum WorkerRequest {
    Launch,
    Kill,
}

/// Debounced button presses
pub static BUTTON_CHANNEL: Channel<CriticalSectionRawMutex, Button, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Lifecycle requests for the worker task
pub static WORKER_REQUESTS: Channel<CriticalSectionRawMutex, WorkerRequest, WORKER_CHANNEL_SIZE> =
    Channel::new();

/// Worker state as last requested by the supervisor
pub static WORKER_RUNNING: AtomicBool = AtomicBool::new(false);

/// Whether a launch has been requested and not yet killed
pub fn worker_running() -> bool {
    WORKER_RUNNING.load(Ordering::Acquire)
}
