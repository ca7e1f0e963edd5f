//! Embassy async tasks
//!
//! Each task handles a specific subsystem and communicates via channels.

mod buttons;
mod foreground;
mod worker;

pub use buttons::buttons_task;
pub use foreground::foreground_task;
pub use worker::{worker_task, WorkerLink};
