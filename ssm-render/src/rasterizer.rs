//! CPU triangle rasterizer producing PNG snapshots

use crate::{Camera, RenderConfig, SnapshotRenderer};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use nalgebra::{Matrix4, Point3, Vector3};
use ssm_core::{Error, Result, Transform3D, TriangleMesh};
use std::io::Cursor;

/// A triangle after projection: pixel x, pixel y, NDC depth
type ScreenTriangle = [Point3<f32>; 3];

/// Flat-shaded z-buffer renderer
///
/// [`SnapshotRenderer::prepare`] frames the camera on the sphere around the
/// mesh centroid that encloses every vertex. Every later capture reuses that
/// view, so only the mesh pose changes between snapshots.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    config: RenderConfig,
    camera: Option<Camera>,
}

impl SoftwareRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            camera: None,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Rasterize `mesh` in the pose given by `transform`
    pub fn rasterize(&self, mesh: &TriangleMesh, transform: &Transform3D) -> Result<RgbImage> {
        let camera = self
            .camera
            .as_ref()
            .ok_or_else(|| Error::Render("renderer used before prepare".to_string()))?;

        let (width, height) = (self.config.width, self.config.height);
        if width == 0 || height == 0 {
            return Err(Error::Render(format!(
                "invalid snapshot size {}x{}",
                width, height
            )));
        }

        let mut image = RgbImage::from_pixel(width, height, to_rgb(self.config.background_color));
        let mut depth = vec![f32::INFINITY; (width as usize) * (height as usize)];

        let view_projection = camera.view_projection();
        // Headlight: lit from where the camera stands
        let light = camera.view_direction();

        for face in &mesh.faces {
            let world = match face_vertices(mesh, face) {
                Some(vertices) => vertices.map(|v| transform.transform_point(&v)),
                None => {
                    return Err(Error::Render(format!(
                        "face {:?} references a missing vertex",
                        face
                    )))
                }
            };

            let normal = (world[1] - world[0]).cross(&(world[2] - world[0]));
            let Some(normal) = normal.try_normalize(f32::EPSILON) else {
                continue;
            };

            let Some(screen) = project(&view_projection, &world, width, height) else {
                continue;
            };

            // STL winding is not reliable, so light both sides
            let diffuse = normal.dot(&light).abs();
            let shade = self.config.ambient + (1.0 - self.config.ambient) * diffuse;
            let color = to_rgb(self.config.mesh_color.map(|c| c * shade));

            fill_triangle(&mut image, &mut depth, &screen, color);
        }

        Ok(image)
    }
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl SnapshotRenderer for SoftwareRenderer {
    fn prepare(&mut self, mesh: &TriangleMesh) -> Result<()> {
        let center = mesh
            .centroid()
            .ok_or_else(|| Error::Render("cannot frame an empty mesh".to_string()))?;
        let radius = mesh.radius_about(&center);

        let camera = Camera::framing(
            center,
            radius,
            self.config.fov_degrees.to_radians(),
            self.config.aspect_ratio(),
        );
        log::debug!(
            "Framed camera at {:?} (radius {:.3}, {}x{})",
            camera.position,
            radius,
            self.config.width,
            self.config.height
        );

        self.camera = Some(camera);
        Ok(())
    }

    fn render(&mut self, mesh: &TriangleMesh, transform: &Transform3D) -> Result<Vec<u8>> {
        let image = self.rasterize(mesh, transform)?;
        encode_png(image)
    }
}

/// Encode an RGB image as PNG bytes
pub fn encode_png(image: RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::Render(format!("PNG encoding failed: {}", e)))?;
    Ok(bytes)
}

fn to_rgb(color: [f32; 3]) -> Rgb<u8> {
    Rgb(color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
}

fn face_vertices(mesh: &TriangleMesh, face: &[usize; 3]) -> Option<[Point3<f32>; 3]> {
    Some([
        *mesh.vertices.get(face[0])?,
        *mesh.vertices.get(face[1])?,
        *mesh.vertices.get(face[2])?,
    ])
}

/// Project to pixel coordinates, dropping triangles that touch the near plane
fn project(
    view_projection: &Matrix4<f32>,
    world: &[Point3<f32>; 3],
    width: u32,
    height: u32,
) -> Option<ScreenTriangle> {
    let mut screen = [Point3::origin(); 3];
    for (out, point) in screen.iter_mut().zip(world) {
        let clip = view_projection * point.to_homogeneous();
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = Vector3::new(clip.x, clip.y, clip.z) / clip.w;
        *out = Point3::new(
            (ndc.x + 1.0) * 0.5 * width as f32,
            (1.0 - ndc.y) * 0.5 * height as f32,
            ndc.z,
        );
    }
    Some(screen)
}

fn edge(a: &Point3<f32>, b: &Point3<f32>, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Fill pixels whose centers fall inside `tri`, nearest depth wins
fn fill_triangle(image: &mut RgbImage, depth: &mut [f32], tri: &ScreenTriangle, color: Rgb<u8>) {
    let [a, b, c] = tri;
    let area = edge(a, b, c.x, c.y);
    if area.abs() <= f32::EPSILON {
        return;
    }

    let (width, height) = image.dimensions();
    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
    let max_x = a.x.max(b.x).max(c.x).ceil().min(width as f32) as u32;
    let max_y = a.y.max(b.y).max(c.y).ceil().min(height as f32) as u32;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(b, c, px, py) / area;
            let w1 = edge(c, a, px, py) / area;
            let w2 = edge(a, b, px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let z = w0 * a.z + w1 * b.z + w2 * c.z;
            if !(-1.0..=1.0).contains(&z) {
                continue;
            }
            let index = (y * width + x) as usize;
            if z < depth[index] {
                depth[index] = z;
                image.put_pixel(x, y, color);
            }
        }
    }
}
