//! Button-driven menu navigation
//!
//! Home screen: up/down enable or disable the worker, select opens the main
//! menu. In the menu, up/down move and select picks an entry; editors step
//! their value with up/down and advance with select. Back always returns to
//! the home screen without applying anything.

use glance_core::configurator::{Editor, MenuCommand, MenuSelection, MAIN_MENU};
use glance_core::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Button {
    Back,
    Up,
    Select,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Home,
    Menu { index: usize },
    Edit(Editor),
}

/// Menu navigation state
pub struct Ui {
    screen: Screen,
}

impl Ui {
    pub const fn new() -> Self {
        Self {
            screen: Screen::Home,
        }
    }

    /// Label of the highlighted menu entry, if the menu is open
    pub fn highlighted(&self) -> Option<&'static str> {
        match self.screen {
            Screen::Menu { index } => Some(MAIN_MENU[index].label),
            _ => None,
        }
    }

    /// Handle a button press, returning the command it completes
    pub fn on_button(&mut self, button: Button, settings: &Settings) -> Option<MenuCommand> {
        let (next, command) = step(self.screen, button, settings);
        self.screen = next;
        command
    }
}

fn step(screen: Screen, button: Button, settings: &Settings) -> (Screen, Option<MenuCommand>) {
    let menu_len = MAIN_MENU.len();
    match (screen, button) {
        (_, Button::Back) => (Screen::Home, None),
        (Screen::Home, Button::Up) => (Screen::Home, Some(MenuCommand::EnableWorker)),
        (Screen::Home, Button::Down) => (Screen::Home, Some(MenuCommand::DisableWorker)),
        (Screen::Home, Button::Select) => (Screen::Menu { index: 0 }, None),
        (Screen::Menu { index }, Button::Up) => (
            Screen::Menu {
                index: (index + menu_len - 1) % menu_len,
            },
            None,
        ),
        (Screen::Menu { index }, Button::Down) => (
            Screen::Menu {
                index: (index + 1) % menu_len,
            },
            None,
        ),
        (Screen::Menu { index }, Button::Select) => match MAIN_MENU[index].entry.select(settings) {
            MenuSelection::Command(command) => (Screen::Home, Some(command)),
            MenuSelection::Edit(editor) => (Screen::Edit(editor), None),
        },
        (Screen::Edit(mut editor), Button::Up) => {
            editor.increment();
            (Screen::Edit(editor), None)
        }
        (Screen::Edit(mut editor), Button::Down) => {
            editor.decrement();
            (Screen::Edit(editor), None)
        }
        (Screen::Edit(mut editor), Button::Select) => match editor.select() {
            Some(command) => (Screen::Home, Some(command)),
            None => (Screen::Edit(editor), None),
        },
    }
}
