//! Error types for Secure Share Model

use std::path::PathBuf;
use thiserror::Error;

/// Main error type shared by the generator and the viewer
#[derive(Error, Debug)]
pub enum Error {
    /// No usable mesh: nothing selected, unreadable or empty
    #[error("Input error: {0}")]
    Input(String),

    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Archive could not be parsed or uses a different packing variant
    #[error("Decode error: {0}")]
    Decode(String),

    /// An image key has no stored image
    #[error("No image stored for key {key}")]
    Lookup { key: String },

    /// Working directory could not be created or removed
    #[error("Resource error at {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an I/O failure on a working location
    pub fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Resource {
            path: path.into(),
            source,
        }
    }

    /// Whether the viewer should treat this as a recoverable lookup miss
    pub fn is_lookup(&self) -> bool {
        matches!(self, Error::Lookup { .. })
    }
}

/// Result type alias for Secure Share Model operations
pub type Result<T> = std::result::Result<T, Error>;
