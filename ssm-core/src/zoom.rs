//! Display magnification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest zoom factor: the original snapshot size
pub const MIN_ZOOM: f32 = 1.0;

/// Change applied by one zoom command
pub const ZOOM_STEP: f32 = 0.1;

/// Magnification applied to the displayed snapshot, never below 1.0
///
/// Stored as a count of steps above [`MIN_ZOOM`] so that zooming in and back
/// out lands exactly on the value it started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ZoomFactor {
    steps: u32,
}

impl ZoomFactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f32 {
        MIN_ZOOM + self.steps as f32 * ZOOM_STEP
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn zoom_in(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    /// Step back towards 1.0; a no-op once there
    pub fn zoom_out(&mut self) {
        self.steps = self.steps.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.steps = 0;
    }

    pub fn is_original_size(&self) -> bool {
        self.steps == 0
    }

    /// Scale a pixel dimension, truncating like an integer cast
    pub fn scale(&self, length: u32) -> u32 {
        (length as f32 * self.value()) as u32
    }
}

impl fmt::Display for ZoomFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zoom_out_clamps_at_one() {
        let mut zoom = ZoomFactor::new();
        zoom.zoom_out();
        assert_eq!(zoom.value(), 1.0);
        assert!(zoom.is_original_size());
    }

    #[test]
    fn test_zoom_in_increases_by_step() {
        let mut zoom = ZoomFactor::new();
        let mut previous = zoom.value();
        for i in 1..=20 {
            zoom.zoom_in();
            assert!(zoom.value() > previous);
            assert_relative_eq!(zoom.value() - previous, ZOOM_STEP, epsilon = 1e-5);
            assert_relative_eq!(zoom.value(), 1.0 + i as f32 * 0.1, epsilon = 1e-5);
            previous = zoom.value();
        }
    }

    #[test]
    fn test_in_then_out_is_exact() {
        let mut zoom = ZoomFactor::new();
        for _ in 0..7 {
            zoom.zoom_in();
        }
        for _ in 0..7 {
            zoom.zoom_out();
        }
        assert_eq!(zoom, ZoomFactor::new());
        assert_eq!(zoom.value(), MIN_ZOOM);
    }

    #[test]
    fn test_scale_and_reset() {
        let mut zoom = ZoomFactor::new();
        assert_eq!(zoom.scale(1200), 1200);
        zoom.zoom_in();
        zoom.zoom_in();
        assert_eq!(zoom.scale(800), 960);
        assert_eq!(zoom.to_string(), "1.2x");
        zoom.reset();
        assert_eq!(zoom.scale(800), 800);
    }
}
