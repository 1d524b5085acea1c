//! Outcome of a generation run

use ssm_core::{ImageKey, RotationState, GRID_SIZE};
use ssm_io::ArchiveVariant;
use std::path::PathBuf;

/// A snapshot that could not be captured
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureFailure {
    pub state: RotationState,
    pub key: ImageKey,
    pub message: String,
}

/// What a generation run produced
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub archive_path: PathBuf,
    pub variant: ArchiveVariant,
    /// Snapshots written to the archive
    pub captured: usize,
    pub failures: Vec<CaptureFailure>,
    pub bytes_written: u64,
}

impl GenerationReport {
    /// Whether every orientation of the grid made it into the archive
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.captured == GRID_SIZE
    }

    /// Keys left out of the archive
    pub fn missing_keys(&self) -> impl Iterator<Item = &ImageKey> {
        self.failures.iter().map(|failure| &failure.key)
    }
}
