//! Generator configuration

use serde::{Deserialize, Serialize};
use ssm_io::ArchiveVariant;
use ssm_render::RenderConfig;
use std::path::{Path, PathBuf};

/// Extension given to generated archives
pub const ARCHIVE_EXTENSION: &str = "ssm";

/// Configuration for a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Archive packing variant (default: plain)
    pub variant: ArchiveVariant,
    /// Directory receiving the archive (default: current directory)
    pub output_dir: Option<PathBuf>,
    /// Write snapshots to `<output_dir>/<model name>/` instead of a
    /// temporary directory; that directory must not exist yet (default: false)
    pub working_dir_beside_output: bool,
    /// Snapshot rendering settings
    pub render: RenderConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            variant: ArchiveVariant::Plain,
            output_dir: None,
            working_dir_beside_output: false,
            render: RenderConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Directory the archive is written to
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }

    /// Archive path for a model called `name`
    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.output_dir()
            .join(format!("{}.{}", name, ARCHIVE_EXTENSION))
    }
}
