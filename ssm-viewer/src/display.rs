//! Presentation of frames

use crate::{Frame, ViewerConfig};
use image::{imageops, Rgba, RgbaImage};
use ssm_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Title shown before any archive is loaded
pub const DEFAULT_TITLE: &str = "Secure Share Model";

/// Something frames can be shown on
pub trait Display {
    /// Replace what is shown with `frame`
    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// Tell the user about a problem without changing what is shown
    fn report(&mut self, message: &str);
}

/// A fixed-size canvas, optionally mirrored to a PNG file
///
/// Frames larger than the canvas are cropped and smaller ones are
/// surrounded by the background color, like a non-resizable window.
#[derive(Debug, Clone)]
pub struct CanvasDisplay {
    canvas: RgbaImage,
    background: Rgba<u8>,
    title: String,
    output: Option<PathBuf>,
    presented: usize,
    messages: Vec<String>,
}

impl CanvasDisplay {
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        let [r, g, b] = background;
        let background = Rgba([r, g, b, 255]);
        Self {
            canvas: RgbaImage::from_pixel(width, height, background),
            background,
            title: DEFAULT_TITLE.to_string(),
            output: None,
            presented: 0,
            messages: Vec::new(),
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.canvas_width, config.canvas_height, config.background)
    }

    /// Also write the canvas to `path` after every presented frame
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Frames presented so far
    pub fn presented(&self) -> usize {
        self.presented
    }

    /// Problems reported so far, oldest first
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Display for CanvasDisplay {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        for pixel in self.canvas.pixels_mut() {
            *pixel = self.background;
        }
        imageops::overlay(&mut self.canvas, &frame.image, frame.offset.0, frame.offset.1);
        self.title = frame.title();
        self.presented += 1;

        if let Some(path) = &self.output {
            self.canvas
                .save(path)
                .map_err(|e| Error::Render(format!("cannot write {}: {}", path.display(), e)))?;
            log::debug!("Wrote frame {} to {}", frame.key, path.display());
        }
        Ok(())
    }

    fn report(&mut self, message: &str) {
        log::warn!("{}", message);
        self.messages.push(message.to_string());
    }
}
