//! Snapshot-grid generation

use crate::{CancellationToken, CaptureFailure, GenerationReport, GeneratorConfig};
use ssm_core::{
    Angle, Axis, Error, ImageKey, Result, RotationState, Transform3D, TriangleMesh, STEP_DEGREES,
};
use ssm_io::{ArchivePacker, WorkingDir};
use ssm_render::{SnapshotRenderer, SoftwareRenderer};
use std::fs;
use std::path::Path;

/// Captures the full rotation grid of a mesh and packs it into an archive
///
/// The mesh is never rotated in place. The generator keeps the cumulative
/// orientation as a [`Transform3D`] and composes one 45° step about the
/// centroid onto it after each capture, so the snapshot stored for
/// `(x, y, z)` shows the mesh under `Rz(z)·Ry(y)·Rx(x)`.
pub struct Generator<R> {
    renderer: R,
    config: GeneratorConfig,
    cancel: CancellationToken,
}

impl Generator<SoftwareRenderer> {
    /// Generator rendering with the built-in software rasterizer
    pub fn software(config: GeneratorConfig) -> Self {
        let renderer = SoftwareRenderer::new(config.render.clone());
        Self::new(renderer, config)
    }
}

impl<R: SnapshotRenderer> Generator<R> {
    pub fn new(renderer: R, config: GeneratorConfig) -> Self {
        Self {
            renderer,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `token` to stop the run from elsewhere
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Read the STL file at `path` and generate `<base name>.ssm` from it
    pub fn generate(&mut self, path: &Path) -> Result<GenerationReport> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Input(format!("no model name in {}", path.display())))?
            .to_string();

        let mesh = ssm_io::read_mesh(path)?;
        log::info!(
            "Loaded {} ({} vertices, {} faces)",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );

        self.generate_mesh(&mesh, &name)
    }

    /// Generate the archive for `mesh`, naming it after `name`
    pub fn generate_mesh(&mut self, mesh: &TriangleMesh, name: &str) -> Result<GenerationReport> {
        if mesh.is_empty() {
            return Err(Error::Input(format!("model {} has no geometry", name)));
        }
        if !mesh.has_valid_faces() {
            return Err(Error::Input(format!(
                "model {} has faces referencing missing vertices",
                name
            )));
        }

        let output = self.config.archive_path(name);
        let workdir = if self.config.working_dir_beside_output {
            WorkingDir::create(self.config.output_dir().join(name))?
        } else {
            WorkingDir::temporary(&format!("ssm-{}-", name))?
        };

        let (captured, failures) = match self.capture_grid(mesh, &workdir) {
            Ok(outcome) => outcome,
            Err(err) => {
                discard(workdir);
                return Err(err);
            }
        };

        if captured == 0 {
            discard(workdir);
            return Err(Error::Render(format!(
                "none of the snapshots of {} could be captured",
                name
            )));
        }
        if !failures.is_empty() {
            log::warn!(
                "{} of {} snapshots failed, archive will be partial",
                failures.len(),
                captured + failures.len()
            );
        }

        let summary = ArchivePacker::new(self.config.variant).pack_directory(workdir.path(), &output)?;
        workdir.close()?;

        Ok(GenerationReport {
            archive_path: summary.path,
            variant: summary.variant,
            captured,
            failures,
            bytes_written: summary.bytes_written,
        })
    }

    fn capture_grid(
        &mut self,
        mesh: &TriangleMesh,
        workdir: &WorkingDir,
    ) -> Result<(usize, Vec<CaptureFailure>)> {
        let pivot = mesh
            .centroid()
            .ok_or_else(|| Error::Input("model has no vertices".to_string()))?;
        let step = Axis::ALL.map(|axis| {
            Transform3D::axis_rotation_about(&pivot, axis, f32::from(STEP_DEGREES))
        });
        let [step_x, step_y, step_z] = step;

        self.renderer.prepare(mesh)?;

        let mut orientation = Transform3D::identity();
        let mut captured = 0;
        let mut failures = Vec::new();

        for (index, x) in Angle::ALL.into_iter().enumerate() {
            log::info!(
                "Capturing X = {} ({}/{})",
                x,
                index + 1,
                Angle::ALL.len()
            );
            for y in Angle::ALL {
                for z in Angle::ALL {
                    if self.cancel.is_cancelled() {
                        log::info!("Generation cancelled after {} snapshots", captured);
                        return Err(Error::Cancelled);
                    }

                    let state = RotationState::new(x, y, z);
                    match self.capture(mesh, &orientation, &state, workdir) {
                        Ok(()) => captured += 1,
                        Err(err) => {
                            log::warn!("Capture {} failed: {}", state, err);
                            failures.push(CaptureFailure {
                                state,
                                key: ImageKey::from_state(&state),
                                message: err.to_string(),
                            });
                        }
                    }

                    orientation = step_z * orientation;
                }
                orientation = step_y * orientation;
            }
            orientation = step_x * orientation;
        }

        Ok((captured, failures))
    }

    fn capture(
        &mut self,
        mesh: &TriangleMesh,
        orientation: &Transform3D,
        state: &RotationState,
        workdir: &WorkingDir,
    ) -> Result<()> {
        let key = ImageKey::from_state(state);
        let bytes = self.renderer.render(mesh, orientation)?;

        let path = workdir.join(key.as_str());
        fs::write(&path, &bytes).map_err(|e| Error::resource(&path, e))?;
        log::debug!("Captured {} ({} bytes)", key, bytes.len());
        Ok(())
    }
}

fn discard(workdir: WorkingDir) {
    if let Err(err) = workdir.close() {
        log::warn!("Failed to remove working directory: {}", err);
    }
}
