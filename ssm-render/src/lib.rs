//! Snapshot rendering for Secure Share Model
//!
//! The generator only needs "an encoded image of this mesh in this pose".
//! [`SnapshotRenderer`] is that seam; [`SoftwareRenderer`] is a small CPU
//! rasterizer implementing it:
//! - Perspective camera framed once on the mesh
//! - Z-buffered, flat-shaded triangles
//! - PNG output

pub mod camera;
pub mod rasterizer;

pub use camera::*;
pub use rasterizer::*;

use serde::{Deserialize, Serialize};
use ssm_core::{Result, Transform3D, TriangleMesh};

/// Produces encoded snapshots of a mesh
pub trait SnapshotRenderer {
    /// Fit the view to `mesh`; called once before the first capture
    fn prepare(&mut self, mesh: &TriangleMesh) -> Result<()>;

    /// Encoded image of `mesh` with `transform` applied to it
    fn render(&mut self, mesh: &TriangleMesh, transform: &Transform3D) -> Result<Vec<u8>>;
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: [f32; 3],
    pub mesh_color: [f32; 3],
    /// Light reaching faces turned away from the light
    pub ambient: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            background_color: [0.0, 0.3, 1.0],
            mesh_color: [0.0, 1.0, 0.0],
            ambient: 0.25,
            fov_degrees: 45.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
