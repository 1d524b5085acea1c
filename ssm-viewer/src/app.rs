//! Binding a viewer session to a display

use crate::{map_input, Display, InputEvent, Response, ViewerConfig, ViewerSession};
use ssm_core::Result;
use std::path::Path;

/// A viewer: one session, one display and the input bindings between them
#[derive(Debug)]
pub struct ViewerApp<D: Display> {
    session: ViewerSession,
    display: D,
    running: bool,
}

impl<D: Display> ViewerApp<D> {
    pub fn new(config: ViewerConfig, display: D) -> Self {
        Self {
            session: ViewerSession::new(config),
            display,
            running: true,
        }
    }

    /// Load `path` and show its first snapshot
    ///
    /// Failures are reported on the display and returned; the viewer keeps
    /// running with whatever it had loaded before.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        match self.session.load(path) {
            Ok(response) => {
                self.show(&response);
                Ok(())
            }
            Err(err) => {
                self.display
                    .report(&format!("Cannot load {}: {}", path.display(), err));
                Err(err)
            }
        }
    }

    /// Route one input event through the session to the display
    pub fn dispatch(&mut self, event: InputEvent) -> Response {
        let Some(command) = map_input(&event) else {
            return Response::Ignored;
        };

        let response = self.session.handle(command);
        self.show(&response);
        response
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session(&self) -> &ViewerSession {
        &self.session
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    fn show(&mut self, response: &Response) {
        match response {
            Response::Frame(frame) => {
                if let Err(err) = self.display.present(frame) {
                    self.display.report(&format!("Cannot show {}: {}", frame.key, err));
                }
            }
            Response::LookupFailed { key, reason } => {
                self.display
                    .report(&format!("No image for {}: {}", key, reason));
            }
            Response::Closed => self.running = false,
            Response::Ignored => {}
        }
    }
}
