//! Background worker
//!
//! The worker is a separate process that reads its settings once when it
//! starts. Configuration changes only take effect through an explicit
//! restart (kill, then launch).

pub mod lifecycle;
pub mod runtime;

pub use lifecycle::{Supervisor, WorkerAction, WorkerCommand, WorkerState};
pub use runtime::Worker;
