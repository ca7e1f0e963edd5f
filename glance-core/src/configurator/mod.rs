//! Foreground configurator
//!
//! The only writer of the settings store. Menu actions are a closed set of
//! commands; applying one persists the change, re-arms the wake window for
//! time changes, and restarts the worker so it picks up new settings.

pub mod app;
pub mod editor;
pub mod menu;

pub use app::{ConfigError, Configurator, Feedback, LaunchReason, Outcome};
pub use editor::{step_clamped, Editor, TimeEditor, TimeField, ValueEditor, ValueTarget};
pub use menu::{MenuCommand, MenuEntry, MenuItem, MenuSelection, MAIN_MENU};
