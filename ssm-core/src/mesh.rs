//! Mesh data structures and functionality

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Axis-aligned cube centred on `center` with the given half extent
    pub fn cube(center: Point3f, half_extent: f32) -> Self {
        let h = half_extent;
        let vertices = [
            [-h, -h, -h],
            [h, -h, -h],
            [h, h, -h],
            [-h, h, -h],
            [-h, -h, h],
            [h, -h, h],
            [h, h, h],
            [-h, h, h],
        ]
        .iter()
        .map(|[x, y, z]| Point3f::new(center.x + x, center.y + y, center.z + z))
        .collect();

        // Counter-clockwise seen from outside
        let faces = vec![
            [0, 2, 1], [0, 3, 2], // -z
            [4, 5, 6], [4, 6, 7], // +z
            [0, 1, 5], [0, 5, 4], // -y
            [3, 7, 6], [3, 6, 2], // +y
            [0, 4, 7], [0, 7, 3], // -x
            [1, 2, 6], [1, 6, 5], // +x
        ];

        Self::from_vertices_and_faces(vertices, faces)
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Arithmetic mean of all vertex coordinates
    ///
    /// Returns `None` for a mesh without vertices.
    pub fn centroid(&self) -> Option<Point3f> {
        if self.vertices.is_empty() {
            return None;
        }

        let sum = self
            .vertices
            .iter()
            .fold(Vector3f::zeros(), |acc, v| acc + v.coords);
        Some(Point3f::from(sum / self.vertices.len() as f32))
    }

    /// Largest distance from `pivot` to any vertex
    pub fn radius_about(&self, pivot: &Point3f) -> f32 {
        self.vertices
            .iter()
            .map(|v| (v - pivot).norm())
            .fold(0.0, f32::max)
    }

    /// Check that every face references an existing vertex
    pub fn has_valid_faces(&self) -> bool {
        let count = self.vertices.len();
        self.faces.iter().all(|face| face.iter().all(|&i| i < count))
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
