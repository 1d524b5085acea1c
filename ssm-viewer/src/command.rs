//! Navigation commands understood by a viewer session

use ssm_core::{Axis, Direction, Error, Result};
use std::fmt;
use std::str::FromStr;

/// A discrete viewer command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    RotateYawLeft,
    RotateYawRight,
    RotatePitchUp,
    RotatePitchDown,
    RotateRollCw,
    RotateRollCcw,
    ZoomIn,
    ZoomOut,
    Close,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::RotateYawLeft,
        Command::RotateYawRight,
        Command::RotatePitchUp,
        Command::RotatePitchDown,
        Command::RotateRollCw,
        Command::RotateRollCcw,
        Command::ZoomIn,
        Command::ZoomOut,
        Command::Close,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::RotateYawLeft => "rotate-yaw-left",
            Command::RotateYawRight => "rotate-yaw-right",
            Command::RotatePitchUp => "rotate-pitch-up",
            Command::RotatePitchDown => "rotate-pitch-down",
            Command::RotateRollCw => "rotate-roll-cw",
            Command::RotateRollCcw => "rotate-roll-ccw",
            Command::ZoomIn => "zoom-in",
            Command::ZoomOut => "zoom-out",
            Command::Close => "close",
        }
    }

    /// Axis and direction of a rotate command
    ///
    /// Yaw turns about Y, pitch about X and roll about Z.
    pub fn rotation(self) -> Option<(Axis, Direction)> {
        match self {
            Command::RotateYawLeft => Some((Axis::Y, Direction::Forward)),
            Command::RotateYawRight => Some((Axis::Y, Direction::Backward)),
            Command::RotatePitchUp => Some((Axis::X, Direction::Backward)),
            Command::RotatePitchDown => Some((Axis::X, Direction::Forward)),
            Command::RotateRollCw => Some((Axis::Z, Direction::Forward)),
            Command::RotateRollCcw => Some((Axis::Z, Direction::Backward)),
            Command::ZoomIn | Command::ZoomOut | Command::Close => None,
        }
    }

    /// Rotate and zoom commands, which need a loaded archive
    pub fn is_navigation(self) -> bool {
        self != Command::Close
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Command::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| Error::InvalidData(format!("unknown command: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for command in Command::ALL {
            assert_eq!(command.name().parse::<Command>().unwrap(), command);
        }
        assert!("rotate-sideways".parse::<Command>().is_err());
    }

    #[test]
    fn test_rotation_mapping() {
        assert_eq!(Command::RotateYawLeft.rotation(), Some((Axis::Y, Direction::Forward)));
        assert_eq!(Command::RotatePitchUp.rotation(), Some((Axis::X, Direction::Backward)));
        assert_eq!(Command::RotateRollCcw.rotation(), Some((Axis::Z, Direction::Backward)));
        assert_eq!(Command::ZoomIn.rotation(), None);

        // Every rotate command has an opposite on the same axis
        for command in Command::ALL {
            if let Some((axis, direction)) = command.rotation() {
                let opposite = Command::ALL
                    .into_iter()
                    .filter(|c| c.rotation() == Some((axis, direction.reversed())))
                    .count();
                assert_eq!(opposite, 1, "{command}");
            }
        }
    }

    #[test]
    fn test_close_is_not_navigation() {
        assert!(!Command::Close.is_navigation());
        assert!(Command::ZoomOut.is_navigation());
    }
}
