//! Viewer configuration

use serde::{Deserialize, Serialize};
use ssm_io::{ArchiveUnpacker, ArchiveVariant};

/// Where a loaded archive's snapshots are kept while viewing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreMode {
    /// Decoded entries stay in memory
    Memory,
    /// Extracted into a fresh temporary directory
    #[default]
    Temporary,
    /// Extracted into a fresh `<archive dir>/<archive name>-XXXXXX/` per load,
    /// removed on close
    BesideArchive,
}

/// Configuration for a viewer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Canvas width in pixels (default: 1200)
    pub canvas_width: u32,
    /// Canvas height in pixels (default: 800)
    pub canvas_height: u32,
    /// Canvas color around a frame smaller than the canvas
    pub background: [u8; 3],
    pub store: StoreMode,
    /// Only accept archives of this variant (default: either)
    pub variant: Option<ArchiveVariant>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200,
            canvas_height: 800,
            background: [217, 217, 217],
            store: StoreMode::Temporary,
            variant: None,
        }
    }
}

impl ViewerConfig {
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn unpacker(&self) -> ArchiveUnpacker {
        match self.variant {
            Some(variant) => ArchiveUnpacker::expecting(variant),
            None => ArchiveUnpacker::new(),
        }
    }
}
