//! Value editors driven by up/down/select buttons

use core::ops::RangeInclusive;

use super::menu::MenuCommand;
use crate::schedule::WindowKind;
use crate::settings::{WindowTime, DURATION_RANGE, MAX_HOUR, MAX_MINUTE, SAMPLES_RANGE};

/// Step `value` by `delta`, saturating at the ends of `range`
pub fn step_clamped(value: u8, delta: i8, range: &RangeInclusive<u8>) -> u8 {
    let stepped = value as i16 + delta as i16;
    stepped.clamp(*range.start() as i16, *range.end() as i16) as u8
}

/// Step `value` by one within `0..=max`, wrapping at both ends
fn step_wrapping(value: u8, up: bool, max: u8) -> u8 {
    match (up, value) {
        (true, v) if v >= max => 0,
        (true, v) => v + 1,
        (false, 0) => max,
        (false, v) => v - 1,
    }
}

/// Field under the time editor's cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeField {
    Hours,
    Minutes,
}

/// Hour/minute editor for one window edge
///
/// Select moves from hours to minutes; the second select confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeEditor {
    kind: WindowKind,
    hour: u8,
    minute: u8,
    field: TimeField,
}

impl TimeEditor {
    pub fn new(kind: WindowKind, initial: WindowTime) -> Self {
        Self {
            kind,
            hour: initial.hour.min(MAX_HOUR),
            minute: initial.minute.min(MAX_MINUTE),
            field: TimeField::Hours,
        }
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn field(&self) -> TimeField {
        self.field
    }

    pub fn time(&self) -> WindowTime {
        WindowTime::new(self.hour, self.minute)
    }

    pub fn increment(&mut self) {
        self.step(true);
    }

    pub fn decrement(&mut self) {
        self.step(false);
    }

    fn step(&mut self, up: bool) {
        match self.field {
            TimeField::Hours => self.hour = step_wrapping(self.hour, up, MAX_HOUR),
            TimeField::Minutes => self.minute = step_wrapping(self.minute, up, MAX_MINUTE),
        }
    }

    /// Advance the cursor, or confirm once on minutes
    pub fn select(&mut self) -> Option<MenuCommand> {
        match self.field {
            TimeField::Hours => {
                self.field = TimeField::Minutes;
                None
            }
            TimeField::Minutes => {
                let (hour, minute) = (self.hour, self.minute);
                Some(match self.kind {
                    WindowKind::Open => MenuCommand::SetStartTime { hour, minute },
                    WindowKind::Close => MenuCommand::SetStopTime { hour, minute },
                })
            }
        }
    }
}

/// Setting a [`ValueEditor`] edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueTarget {
    /// Gesture light duration
    Timeout,
    /// Accelerometer batch size
    Responsiveness,
}

impl ValueTarget {
    pub fn range(&self) -> RangeInclusive<u8> {
        match self {
            ValueTarget::Timeout => DURATION_RANGE,
            ValueTarget::Responsiveness => SAMPLES_RANGE,
        }
    }
}

/// Saturating number editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValueEditor {
    target: ValueTarget,
    value: u8,
}

impl ValueEditor {
    pub fn new(target: ValueTarget, initial: u8) -> Self {
        Self {
            target,
            value: step_clamped(initial, 0, &target.range()),
        }
    }

    pub fn target(&self) -> ValueTarget {
        self.target
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn increment(&mut self) {
        self.value = step_clamped(self.value, 1, &self.target.range());
    }

    pub fn decrement(&mut self) {
        self.value = step_clamped(self.value, -1, &self.target.range());
    }

    pub fn select(&self) -> MenuCommand {
        match self.target {
            ValueTarget::Timeout => MenuCommand::SetTimeout(self.value),
            ValueTarget::Responsiveness => MenuCommand::SetResponsiveness(self.value),
        }
    }
}

/// An open editor screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Editor {
    Time(TimeEditor),
    Value(ValueEditor),
}

impl Editor {
    pub fn increment(&mut self) {
        match self {
            Editor::Time(e) => e.increment(),
            Editor::Value(e) => e.increment(),
        }
    }

    pub fn decrement(&mut self) {
        match self {
            Editor::Time(e) => e.decrement(),
            Editor::Value(e) => e.decrement(),
        }
    }

    /// Press select; returns the command once editing is complete
    pub fn select(&mut self) -> Option<MenuCommand> {
        match self {
            Editor::Time(e) => e.select(),
            Editor::Value(e) => Some(e.select()),
        }
    }
}
