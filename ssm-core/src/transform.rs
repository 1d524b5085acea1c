//! 3D transformation utilities

use crate::point::{Point3f, Vector3f};
use crate::rotation::Axis;
use nalgebra::{Matrix4, Unit, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// A 3D transformation that can be applied to points and meshes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn translation(translation: Vector3f) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Create a rotation transformation from a quaternion
    pub fn rotation(rotation: UnitQuaternion<f32>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Rotation of `degrees` around a principal axis through the origin
    pub fn axis_rotation(axis: Axis, degrees: f32) -> Self {
        let unit = Unit::new_unchecked(axis.unit_vector());
        Self::rotation(UnitQuaternion::from_axis_angle(&unit, degrees.to_radians()))
    }

    /// Rotation around `pivot` instead of the world origin
    ///
    /// Equivalent to translating the pivot to the origin, rotating, and
    /// translating back.
    pub fn rotation_about(pivot: &Point3f, rotation: UnitQuaternion<f32>) -> Self {
        Self::translation(pivot.coords)
            * Self::rotation(rotation)
            * Self::translation(-pivot.coords)
    }

    /// Principal-axis rotation of `degrees` around `pivot`
    pub fn axis_rotation_about(pivot: &Point3f, axis: Axis, degrees: f32) -> Self {
        let unit = Unit::new_unchecked(axis.unit_vector());
        Self::rotation_about(pivot, UnitQuaternion::from_axis_angle(&unit, degrees.to_radians()))
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3f::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Compose this transformation with another
    ///
    /// `a.compose(b)` applies `b` first, then `a`.
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Check if this is approximately the identity transformation
    pub fn is_identity(&self, epsilon: f32) -> bool {
        let identity = Matrix4::identity();
        (self.matrix - identity).norm() < epsilon
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<Matrix4<f32>> for Transform3D {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }
}
