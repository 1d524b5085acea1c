//! The 8×8×8 rotation grid
//!
//! Every snapshot is addressed by a [`RotationState`]: one [`Angle`] per axis,
//! each a multiple of 45° in `0..360`. Updates always wrap modulo 360, so a
//! state can never leave the grid.

use crate::error::{Error, Result};
use crate::point::Vector3f;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Degrees between two neighbouring grid angles
pub const STEP_DEGREES: u16 = 45;

/// Number of grid angles per axis
pub const STEPS_PER_TURN: usize = 8;

/// Number of states in the full grid
pub const GRID_SIZE: usize = STEPS_PER_TURN * STEPS_PER_TURN * STEPS_PER_TURN;

/// Principal rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axes in generation order: outer, middle, inner loop
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn unit_vector(self) -> Vector3f {
        match self {
            Axis::X => Vector3f::x(),
            Axis::Y => Vector3f::y(),
            Axis::Z => Vector3f::z(),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(name)
    }
}

/// Sense of a single 45° step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// +45°
    Forward,
    /// -45°
    Backward,
}

impl Direction {
    pub fn signed_degrees(self) -> i32 {
        match self {
            Direction::Forward => STEP_DEGREES as i32,
            Direction::Backward => -(STEP_DEGREES as i32),
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// One of the eight grid angles: 0, 45, ..., 315 degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Angle(u16);

impl Angle {
    pub const ZERO: Angle = Angle(0);

    pub const ALL: [Angle; STEPS_PER_TURN] = [
        Angle(0),
        Angle(45),
        Angle(90),
        Angle(135),
        Angle(180),
        Angle(225),
        Angle(270),
        Angle(315),
    ];

    /// Angle for grid index `step`, wrapping past a full turn
    pub fn from_step(step: usize) -> Self {
        Angle::ALL[step % STEPS_PER_TURN]
    }

    /// Validate a degree value, wrapping it into `0..360`
    ///
    /// Fails for values that are not a multiple of 45.
    pub fn try_from_degrees(degrees: i32) -> Result<Self> {
        if degrees.rem_euclid(STEP_DEGREES as i32) != 0 {
            return Err(Error::InvalidData(format!(
                "{} degrees is not a multiple of {}",
                degrees, STEP_DEGREES
            )));
        }
        Ok(Angle(degrees.rem_euclid(360) as u16))
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    /// Index of this angle in [`Angle::ALL`]
    pub fn step(self) -> usize {
        (self.0 / STEP_DEGREES) as usize
    }

    pub fn radians(self) -> f32 {
        (self.0 as f32).to_radians()
    }

    /// Neighbouring angle one step in `direction`, modulo 360
    pub fn stepped(self, direction: Direction) -> Self {
        let degrees = (self.0 as i32 + direction.signed_degrees()).rem_euclid(360);
        Angle(degrees as u16)
    }
}

impl TryFrom<u16> for Angle {
    type Error = Error;

    fn try_from(degrees: u16) -> Result<Self> {
        if degrees >= 360 {
            return Err(Error::InvalidData(format!("{} degrees is out of range", degrees)));
        }
        Angle::try_from_degrees(degrees as i32)
    }
}

impl From<Angle> for u16 {
    fn from(angle: Angle) -> u16 {
        angle.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Viewing orientation: one grid angle per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RotationState {
    pub x: Angle,
    pub y: Angle,
    pub z: Angle,
}

impl RotationState {
    pub fn new(x: Angle, y: Angle, z: Angle) -> Self {
        Self { x, y, z }
    }

    /// The (0, 0, 0) state every session starts in
    pub fn origin() -> Self {
        Self::default()
    }

    /// Build a state from raw degrees, validating each axis
    pub fn from_degrees(x: i32, y: i32, z: i32) -> Result<Self> {
        Ok(Self {
            x: Angle::try_from_degrees(x)?,
            y: Angle::try_from_degrees(y)?,
            z: Angle::try_from_degrees(z)?,
        })
    }

    pub fn get(&self, axis: Axis) -> Angle {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, angle: Angle) {
        match axis {
            Axis::X => self.x = angle,
            Axis::Y => self.y = angle,
            Axis::Z => self.z = angle,
        }
    }

    /// Step one axis by 45° in `direction`, wrapping modulo 360
    pub fn rotate(&mut self, axis: Axis, direction: Direction) {
        let angle = self.get(axis).stepped(direction);
        self.set(axis, angle);
    }

    /// Copy of this state stepped on one axis
    pub fn rotated(mut self, axis: Axis, direction: Direction) -> Self {
        self.rotate(axis, direction);
        self
    }

    /// Degrees in key field order
    pub fn degrees(&self) -> [u16; 3] {
        [self.x.degrees(), self.y.degrees(), self.z.degrees()]
    }

    /// Every state of the grid in generation order
    ///
    /// X is the outer loop, Y the middle and Z the inner one.
    pub fn grid() -> impl Iterator<Item = RotationState> {
        Angle::ALL.into_iter().flat_map(|x| {
            Angle::ALL.into_iter().flat_map(move |y| {
                Angle::ALL.into_iter().map(move |z| RotationState::new(x, y, z))
            })
        })
    }
}

impl fmt::Display for RotationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{} / Y:{} / Z:{}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_angle_wraps_negative_to_315() {
        assert_eq!(Angle::ZERO.stepped(Direction::Backward).degrees(), 315);
        assert_eq!(Angle::from_step(7).stepped(Direction::Forward), Angle::ZERO);
    }

    #[test]
    fn test_try_from_degrees() {
        assert_eq!(Angle::try_from_degrees(-45).unwrap().degrees(), 315);
        assert_eq!(Angle::try_from_degrees(405).unwrap().degrees(), 45);
        assert_eq!(Angle::try_from_degrees(720).unwrap(), Angle::ZERO);
        assert!(Angle::try_from_degrees(30).is_err());
        assert!(Angle::try_from(360u16).is_err());
        assert_eq!(Angle::try_from(270u16).unwrap().step(), 6);
    }

    #[test]
    fn test_eight_steps_return_to_start() {
        for axis in Axis::ALL {
            for direction in [Direction::Forward, Direction::Backward] {
                let start = RotationState::from_degrees(90, 135, 270).unwrap();
                let mut state = start;
                for _ in 0..STEPS_PER_TURN {
                    state.rotate(axis, direction);
                }
                assert_eq!(state, start);
            }
        }
    }

    #[test]
    fn test_step_then_reverse_is_identity() {
        let start = RotationState::origin();
        let moved = start.rotated(Axis::Y, Direction::Backward);
        assert_eq!(moved.y.degrees(), 315);
        assert_eq!(moved.rotated(Axis::Y, Direction::Forward), start);
    }

    #[test]
    fn test_rotation_touches_one_axis() {
        let state = RotationState::origin().rotated(Axis::Z, Direction::Forward);
        assert_eq!(state.degrees(), [0, 0, 45]);
    }

    #[test]
    fn test_grid_order_and_coverage() {
        let states: Vec<_> = RotationState::grid().collect();
        assert_eq!(states.len(), GRID_SIZE);
        assert_eq!(states.iter().collect::<HashSet<_>>().len(), GRID_SIZE);

        assert_eq!(states[0].degrees(), [0, 0, 0]);
        assert_eq!(states[1].degrees(), [0, 0, 45]);
        assert_eq!(states[8].degrees(), [0, 45, 0]);
        assert_eq!(states[64].degrees(), [45, 0, 0]);
        assert_eq!(states[GRID_SIZE - 1].degrees(), [315, 315, 315]);
    }

    #[test]
    fn test_off_grid_degrees_rejected() {
        let angle: std::result::Result<Angle, _> = Angle::try_from(46u16);
        assert!(angle.is_err());
    }
}
