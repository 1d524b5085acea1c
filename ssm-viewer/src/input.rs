//! Toolkit-independent input events and their command bindings

use crate::Command;
use ssm_core::{Error, Result};
use std::str::FromStr;

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Char(char),
}

/// A raw event from whatever is driving the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(Key),
    /// Mouse wheel or equivalent gesture; positive is away from the user
    Wheel { delta: f32 },
    CloseRequested,
}

/// Command bound to `event`, if any
pub fn map_input(event: &InputEvent) -> Option<Command> {
    match *event {
        InputEvent::Key(Key::Left) => Some(Command::RotateYawLeft),
        InputEvent::Key(Key::Right) => Some(Command::RotateYawRight),
        InputEvent::Key(Key::Up) => Some(Command::RotatePitchUp),
        InputEvent::Key(Key::Down) => Some(Command::RotatePitchDown),
        InputEvent::Key(Key::Escape) => Some(Command::Close),
        InputEvent::Key(Key::Char(c)) => match c.to_ascii_lowercase() {
            'w' => Some(Command::RotateRollCw),
            's' => Some(Command::RotateRollCcw),
            _ => None,
        },
        InputEvent::Wheel { delta } if delta > 0.0 => Some(Command::ZoomIn),
        InputEvent::Wheel { delta } if delta < 0.0 => Some(Command::ZoomOut),
        InputEvent::Wheel { .. } => None,
        InputEvent::CloseRequested => Some(Command::Close),
    }
}

/// Controls summary shown to users
pub const CONTROLS_HELP: &str = "\
Arrow keys and W/S rotate the model about its X, Y and Z axes.
The mouse wheel zooms in and out.
Esc closes the viewer.";

impl FromStr for InputEvent {
    type Err = Error;

    /// Parse a textual token such as `left`, `w`, `+` or `esc`
    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_ascii_lowercase();
        let event = match token.as_str() {
            "left" => InputEvent::Key(Key::Left),
            "right" => InputEvent::Key(Key::Right),
            "up" => InputEvent::Key(Key::Up),
            "down" => InputEvent::Key(Key::Down),
            "esc" | "escape" | "q" => InputEvent::Key(Key::Escape),
            "+" | "wheel-up" => InputEvent::Wheel { delta: 1.0 },
            "-" | "wheel-down" => InputEvent::Wheel { delta: -1.0 },
            "close" => InputEvent::CloseRequested,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => InputEvent::Key(Key::Char(c)),
                    _ => {
                        return Err(Error::InvalidData(format!("unknown input: {}", s.trim())))
                    }
                }
            }
        };
        Ok(event)
    }
}

/// Parse a comma or whitespace separated list of input tokens
pub fn parse_script(script: &str) -> Result<Vec<InputEvent>> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}
