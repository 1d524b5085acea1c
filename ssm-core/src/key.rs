//! Image keys: the file names snapshots are stored under
//!
//! A key concatenates the three zero-padded angles of a [`RotationState`] in
//! X, Y, Z order, e.g. `tmpModel_000045315.png` for (0, 45, 315). The
//! generator writes images under these names and the viewer resolves its
//! current state through the same function, so both sides agree on the
//! field order.

use crate::error::{Error, Result};
use crate::rotation::{Angle, RotationState};
use std::fmt;

/// Prefix shared by every snapshot name
pub const KEY_PREFIX: &str = "tmpModel_";

/// Extension of the stored snapshots
pub const KEY_EXTENSION: &str = "png";

/// Identifier of one stored snapshot
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    pub fn from_state(state: &RotationState) -> Self {
        let [x, y, z] = state.degrees();
        ImageKey(format!("{KEY_PREFIX}{x:03}{y:03}{z:03}.{KEY_EXTENSION}"))
    }

    /// Recover the rotation state a key was made from
    pub fn parse(name: &str) -> Result<RotationState> {
        let invalid = || Error::InvalidData(format!("not an image key: {name}"));

        let digits = name
            .strip_prefix(KEY_PREFIX)
            .and_then(|rest| rest.strip_suffix(KEY_EXTENSION))
            .and_then(|rest| rest.strip_suffix('.'))
            .ok_or_else(invalid)?;

        if digits.len() != 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let field = |range: std::ops::Range<usize>| -> Result<Angle> {
            let degrees: u16 = digits[range].parse().map_err(|_| invalid())?;
            Angle::try_from(degrees)
        };

        Ok(RotationState::new(field(0..3)?, field(3..6)?, field(6..9)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&RotationState> for ImageKey {
    fn from(state: &RotationState) -> Self {
        ImageKey::from_state(state)
    }
}

impl From<RotationState> for ImageKey {
    fn from(state: RotationState) -> Self {
        ImageKey::from_state(&state)
    }
}

impl AsRef<str> for ImageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::GRID_SIZE;
    use std::collections::HashSet;

    #[test]
    fn test_key_format() {
        let state = RotationState::from_degrees(0, 45, 315).unwrap();
        assert_eq!(ImageKey::from_state(&state).as_str(), "tmpModel_000045315.png");
        assert_eq!(
            ImageKey::from(RotationState::origin()).as_str(),
            "tmpModel_000000000.png"
        );
    }

    #[test]
    fn test_keys_are_unique_and_deterministic() {
        let keys: Vec<_> = RotationState::grid().map(ImageKey::from).collect();
        assert_eq!(keys.iter().collect::<HashSet<_>>().len(), GRID_SIZE);

        let again: Vec<_> = RotationState::grid().map(ImageKey::from).collect();
        assert_eq!(keys, again);
    }

    #[test]
    fn test_parse_inverts_from_state() {
        for state in RotationState::grid() {
            let key = ImageKey::from_state(&state);
            assert_eq!(ImageKey::parse(key.as_str()).unwrap(), state);
        }
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        assert!(ImageKey::parse("tmpModel_000000000.jpg").is_err());
        assert!(ImageKey::parse("model_000000000.png").is_err());
        assert!(ImageKey::parse("tmpModel_00000000.png").is_err());
        assert!(ImageKey::parse("tmpModel_00a000000.png").is_err());
        assert!(ImageKey::parse("tmpModel_000010000.png").is_err());
        assert!(ImageKey::parse("tmpModel_360000000.png").is_err());
    }
}
