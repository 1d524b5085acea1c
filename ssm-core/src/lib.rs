//! Core data structures for Secure Share Model
//!
//! This crate provides the types shared by the generator and the viewer:
//! meshes and transforms for the generation side, and the rotation grid,
//! image keys and zoom factor that address stored snapshots.

pub mod point;
pub mod mesh;
pub mod transform;
pub mod rotation;
pub mod key;
pub mod zoom;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use transform::*;
pub use rotation::*;
pub use key::*;
pub use zoom::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4, UnitQuaternion};

