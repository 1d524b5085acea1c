//! The viewer state machine

use crate::{open_store, Command, Frame, ImageStore, ViewerConfig};
use ssm_core::{Error, ImageKey, Result, RotationState, ZoomFactor};
use std::path::{Path, PathBuf};

/// What handling a command produced
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Nothing changed
    Ignored,
    /// The frame to show now
    Frame(Frame),
    /// The current state has no displayable snapshot; keep the last frame
    LookupFailed { key: ImageKey, reason: String },
    /// The session ended
    Closed,
}

/// Rotation, zoom and snapshot storage for one loaded archive
///
/// Starts at rotation (0, 0, 0) and zoom 1.0 with interaction disabled.
/// Rotate and zoom commands are ignored until an archive has been loaded.
/// `close` is always accepted and ends the session for good.
pub struct ViewerSession {
    config: ViewerConfig,
    store: Option<Box<dyn ImageStore>>,
    source: Option<PathBuf>,
    rotation: RotationState,
    zoom: ZoomFactor,
    interactive: bool,
    closed: bool,
}

impl ViewerSession {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            store: None,
            source: None,
            rotation: RotationState::origin(),
            zoom: ZoomFactor::new(),
            interactive: false,
            closed: false,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn zoom(&self) -> ZoomFactor {
        self.zoom
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Archive currently loaded
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn store(&self) -> Option<&dyn ImageStore> {
        self.store.as_deref()
    }

    /// Load the archive at `path` and show its first snapshot
    ///
    /// The new archive is opened before anything else changes, so a failed
    /// load leaves the session exactly as it was. On success the previous
    /// archive's storage is released and rotation and zoom start over.
    pub fn load(&mut self, path: &Path) -> Result<Response> {
        if self.closed {
            return Err(Error::Input("viewer session is closed".to_string()));
        }

        let store = open_store(path, &self.config)?;
        log::info!(
            "Loaded {} ({} snapshots, {})",
            path.display(),
            store.len(),
            store.variant()
        );

        self.release_store();
        self.store = Some(store);
        self.source = Some(path.to_path_buf());
        self.rotation = RotationState::origin();
        self.zoom.reset();
        self.interactive = true;

        Ok(self.refresh())
    }

    /// Apply `command` and say what to display next
    pub fn handle(&mut self, command: Command) -> Response {
        if self.closed {
            return Response::Ignored;
        }

        if command == Command::Close {
            if let Err(err) = self.close() {
                log::warn!("Failed to release viewer storage: {}", err);
            }
            return Response::Closed;
        }

        if !self.interactive {
            log::debug!("Ignoring {} before an archive is loaded", command);
            return Response::Ignored;
        }

        match command {
            Command::ZoomIn => self.zoom.zoom_in(),
            Command::ZoomOut => self.zoom.zoom_out(),
            _ => {
                if let Some((axis, direction)) = command.rotation() {
                    self.rotation.rotate(axis, direction);
                }
            }
        }
        log::debug!("{} -> {} at {}", command, self.rotation, self.zoom);

        self.refresh()
    }

    /// Frame for the current state
    ///
    /// A missing or undecodable snapshot is reported as
    /// [`Response::LookupFailed`] and never ends the session.
    pub fn refresh(&self) -> Response {
        let Some(store) = self.store.as_deref() else {
            return Response::Ignored;
        };

        let key = ImageKey::from_state(&self.rotation);
        let frame = store.fetch(&key).and_then(|bytes| {
            Frame::compose(
                &bytes,
                key.clone(),
                self.rotation,
                self.zoom,
                self.config.canvas_size(),
            )
        });

        match frame {
            Ok(frame) => Response::Frame(frame),
            Err(err) => {
                log::warn!("Cannot display {}: {}", key, err);
                Response::LookupFailed {
                    key,
                    reason: err.to_string(),
                }
            }
        }
    }

    /// End the session and release its storage
    ///
    /// Cleanup failures are returned; the session is closed either way.
    pub fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.interactive = false;
        self.source = None;
        match self.store.take() {
            Some(store) => store.close(),
            None => Ok(()),
        }
    }

    fn release_store(&mut self) {
        if let Some(store) = self.store.take() {
            if let Err(err) = store.close() {
                log::warn!("Failed to release previous archive: {}", err);
            }
        }
    }
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl std::fmt::Debug for ViewerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerSession")
            .field("source", &self.source)
            .field("rotation", &self.rotation)
            .field("zoom", &self.zoom)
            .field("interactive", &self.interactive)
            .field("closed", &self.closed)
            .finish()
    }
}
