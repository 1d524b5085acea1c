//! Camera utilities for snapshot rendering

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

/// A 3D camera looking at the mesh being captured
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Camera on the +Z side of a sphere, far enough to see all of it
    ///
    /// The sphere around the rotation pivot contains the mesh in every
    /// orientation, so one framing serves the whole grid.
    pub fn framing(center: Point3<f32>, radius: f32, fov: f32, aspect_ratio: f32) -> Self {
        let radius = radius.max(f32::EPSILON);
        // The narrower of the two fields of view decides the distance
        let half_vertical = fov / 2.0;
        let half_horizontal = (half_vertical.tan() * aspect_ratio).atan();
        let half = half_vertical.min(half_horizontal);
        let distance = radius / half.sin() * 1.05;

        Self::new(
            center + Vector3::new(0.0, 0.0, distance),
            center,
            Vector3::y(),
            fov,
            aspect_ratio,
            (distance - radius * 1.5).max(distance * 0.01),
            distance + radius * 1.5,
        )
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Combined projection and view
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from the target towards the camera
    pub fn view_direction(&self) -> Vector3<f32> {
        (self.position - self.target).normalize()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            std::f32::consts::FRAC_PI_4,
            16.0 / 9.0,
            0.1,
            100.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn project(camera: &Camera, p: Point3<f32>) -> Point3<f32> {
        let clip = camera.view_projection() * p.to_homogeneous();
        Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let center = Point3::new(3.0, -1.0, 2.0);
        let camera = Camera::framing(center, 2.0, std::f32::consts::FRAC_PI_4, 1.5);
        let ndc = project(&camera, center);
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_framed_sphere_fits_in_view() {
        let center = Point3::origin();
        let radius = 1.0;
        let camera = Camera::framing(center, radius, std::f32::consts::FRAC_PI_4, 1.5);

        let extremes = [
            Point3::new(radius, 0.0, 0.0),
            Point3::new(-radius, 0.0, 0.0),
            Point3::new(0.0, radius, 0.0),
            Point3::new(0.0, -radius, 0.0),
            Point3::new(0.0, 0.0, radius),
            Point3::new(0.0, 0.0, -radius),
        ];
        for p in extremes {
            let ndc = project(&camera, p);
            assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0, "{p:?} -> {ndc:?}");
            assert!(ndc.z > -1.0 && ndc.z < 1.0, "{p:?} clipped at depth {}", ndc.z);
        }
    }

    #[test]
    fn test_view_direction() {
        let camera = Camera::default();
        assert_relative_eq!(camera.view_direction(), Vector3::z(), epsilon = 1e-6);
    }
}
