//! Menu entries and the commands they produce

use super::editor::{Editor, TimeEditor, ValueEditor, ValueTarget};
use crate::schedule::WindowKind;
use crate::settings::Settings;

/// Configuration commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuCommand {
    /// Stop the worker if running, otherwise start it
    ToggleWorker,
    EnableWorker,
    DisableWorker,
    /// Set the window-open time
    SetStartTime { hour: u8, minute: u8 },
    /// Set the window-close time
    SetStopTime { hour: u8, minute: u8 },
    /// Set the gesture light duration
    SetTimeout(u8),
    /// Reset both window edges to 00:00
    ClearTimes,
    /// Set the accelerometer batch size
    SetResponsiveness(u8),
    ToggleChargingLight,
    TogglePluggedLight,
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEntry {
    ToggleBacklight,
    EnableTime,
    DisableTime,
    SetTimeout,
    ClearTimes,
    Responsiveness,
    ChargingLight,
    PoweredLight,
}

/// What choosing a menu entry leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuSelection {
    /// Apply a command right away
    Command(MenuCommand),
    /// Open an editor seeded from the current settings
    Edit(Editor),
}

impl MenuEntry {
    /// Choose this entry given the current settings
    pub fn select(self, settings: &Settings) -> MenuSelection {
        use MenuSelection::*;

        match self {
            MenuEntry::ToggleBacklight => Command(MenuCommand::ToggleWorker),
            MenuEntry::EnableTime => Edit(Editor::Time(TimeEditor::new(
                WindowKind::Open,
                settings.window(WindowKind::Open),
            ))),
            MenuEntry::DisableTime => Edit(Editor::Time(TimeEditor::new(
                WindowKind::Close,
                settings.window(WindowKind::Close),
            ))),
            MenuEntry::SetTimeout => Edit(Editor::Value(ValueEditor::new(
                ValueTarget::Timeout,
                settings.duration,
            ))),
            MenuEntry::ClearTimes => Command(MenuCommand::ClearTimes),
            MenuEntry::Responsiveness => Edit(Editor::Value(ValueEditor::new(
                ValueTarget::Responsiveness,
                settings.samples,
            ))),
            MenuEntry::ChargingLight => Command(MenuCommand::ToggleChargingLight),
            MenuEntry::PoweredLight => Command(MenuCommand::TogglePluggedLight),
        }
    }
}

/// A labelled menu row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub entry: MenuEntry,
}

/// Main menu, in display order
pub const MAIN_MENU: [MenuItem; 8] = [
    MenuItem {
        label: "Toggle backlight",
        entry: MenuEntry::ToggleBacklight,
    },
    MenuItem {
        label: "Enable time",
        entry: MenuEntry::EnableTime,
    },
    MenuItem {
        label: "Disable time",
        entry: MenuEntry::DisableTime,
    },
    MenuItem {
        label: "Set Timeout",
        entry: MenuEntry::SetTimeout,
    },
    MenuItem {
        label: "Clear times",
        entry: MenuEntry::ClearTimes,
    },
    MenuItem {
        label: "Responsiveness",
        entry: MenuEntry::Responsiveness,
    },
    MenuItem {
        label: "Charging light",
        entry: MenuEntry::ChargingLight,
    },
    MenuItem {
        label: "Powered light",
        entry: MenuEntry::PoweredLight,
    },
];
