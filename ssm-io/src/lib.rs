//! I/O operations for Secure Share Model
//!
//! This crate reads the STL meshes snapshots are generated from and packs the
//! generated snapshots into single `.ssm` archives:
//! - STL mesh reading (ASCII and binary)
//! - The tagged `.ssm` archive container, plain and compressed variants
//! - Packing a working directory into an archive and unpacking it again
//! - Session-scoped working directories that are reclaimed on close

pub mod archive;
pub mod error;
pub mod pack;
pub mod stl;
pub mod workdir;

#[cfg(test)]
mod tests;

pub use archive::{Archive, ArchiveEntry, ArchiveVariant, FORMAT_VERSION, MAGIC};
pub use error::ArchiveError;
pub use pack::{is_image_file, ArchivePacker, ArchiveUnpacker, PackSummary, IMAGE_EXTENSIONS};
pub use stl::StlReader;
pub use workdir::WorkingDir;

use ssm_core::{Error, Result, TriangleMesh};
use std::path::Path;

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh>;
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some("stl") => stl::StlReader::read_mesh(path),
        _ => Err(Error::Input(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}
