//! Worker lifecycle state machine

use crate::traits::{WorkerControl, WorkerError};

/// Worker process states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkerState {
    #[default]
    Stopped,
    Running,
}

/// Commands that move the worker between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkerCommand {
    /// Launch if stopped
    Start,
    /// Kill if running
    Stop,
    /// Kill if running, then launch, so the worker re-reads its settings
    Restart,
}

/// Process control needed to carry out a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkerAction {
    /// Nothing to do
    None,
    Launch,
    Kill,
    /// Kill, then launch
    Relaunch,
}

impl WorkerState {
    pub fn is_running(&self) -> bool {
        matches!(self, WorkerState::Running)
    }

    /// Process a command and return the next state with the action it needs
    pub fn transition(self, command: WorkerCommand) -> (Self, WorkerAction) {
        use WorkerCommand::*;
        use WorkerState::*;

        match (self, command) {
            (Stopped, Start) => (Running, WorkerAction::Launch),
            (Running, Start) => (Running, WorkerAction::None),

            (Running, Stop) => (Stopped, WorkerAction::Kill),
            (Stopped, Stop) => (Stopped, WorkerAction::None),

            (Stopped, Restart) => (Running, WorkerAction::Launch),
            (Running, Restart) => (Running, WorkerAction::Relaunch),
        }
    }
}

/// Applies lifecycle commands to the worker's process control
#[derive(Debug)]
pub struct Supervisor<W: WorkerControl> {
    control: W,
    state: WorkerState,
}

impl<W: WorkerControl> Supervisor<W> {
    /// Wrap a process control, taking the current state from it
    pub fn new(control: W) -> Self {
        let state = if control.is_running() {
            WorkerState::Running
        } else {
            WorkerState::Stopped
        };
        Self { control, state }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn control(&self) -> &W {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut W {
        &mut self.control
    }

    /// Apply a command
    ///
    /// The state follows the command even when process control fails; the
    /// next command re-issues the launch or kill.
    pub fn apply(&mut self, command: WorkerCommand) -> Result<WorkerAction, WorkerError> {
        let (next, action) = self.state.transition(command);
        self.state = next;

        let result = match action {
            WorkerAction::None => Ok(()),
            WorkerAction::Launch => self.control.launch(),
            WorkerAction::Kill => self.control.kill(),
            WorkerAction::Relaunch => {
                let killed = self.control.kill();
                let launched = self.control.launch();
                killed.and(launched)
            }
        };

        result.map(|()| action)
    }

    /// Start if stopped, stop if running
    pub fn toggle(&mut self) -> Result<WorkerAction, WorkerError> {
        if self.control.is_running() {
            self.state = WorkerState::Running;
            self.apply(WorkerCommand::Stop)
        } else {
            self.state = WorkerState::Stopped;
            self.apply(WorkerCommand::Start)
        }
    }
}
