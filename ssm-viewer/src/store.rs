//! Snapshot storage backing a viewer session

use crate::{StoreMode, ViewerConfig};
use ssm_core::{Error, ImageKey, Result};
use ssm_io::{Archive, ArchiveUnpacker, ArchiveVariant, WorkingDir};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Snapshots addressable by key
pub trait ImageStore {
    /// Encoded image stored under `key`, or [`Error::Lookup`]
    fn fetch(&self, key: &ImageKey) -> Result<Vec<u8>>;

    /// Number of stored snapshots
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Variant of the archive the snapshots came from
    fn variant(&self) -> ArchiveVariant;

    /// Directory the snapshots were extracted to, if any
    fn location(&self) -> Option<&Path> {
        None
    }

    /// Release the backing storage
    fn close(self: Box<Self>) -> Result<()>;
}

/// Snapshots kept in memory, straight from the decoded archive
#[derive(Debug)]
pub struct MemoryStore {
    archive: Archive,
    variant: ArchiveVariant,
}

impl MemoryStore {
    pub fn new(archive: Archive, variant: ArchiveVariant) -> Self {
        Self { archive, variant }
    }

    pub fn read(path: &Path, unpacker: &ArchiveUnpacker) -> Result<Self> {
        let (archive, variant) = unpacker.read(path)?;
        Ok(Self::new(archive, variant))
    }
}

impl ImageStore for MemoryStore {
    fn fetch(&self, key: &ImageKey) -> Result<Vec<u8>> {
        self.archive
            .get(key.as_str())
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::Lookup {
                key: key.to_string(),
            })
    }

    fn len(&self) -> usize {
        self.archive.len()
    }

    fn variant(&self) -> ArchiveVariant {
        self.variant
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Snapshots extracted to a working directory owned by the store
#[derive(Debug)]
pub struct DirectoryStore {
    dir: WorkingDir,
    entries: usize,
    variant: ArchiveVariant,
}

impl DirectoryStore {
    /// Extract `path` into `dir`
    ///
    /// `dir` is removed again if extraction fails.
    pub fn extract(path: &Path, dir: WorkingDir, unpacker: &ArchiveUnpacker) -> Result<Self> {
        match unpacker.unpack(path, dir.path()) {
            Ok((archive, variant)) => Ok(Self {
                dir,
                entries: archive.len(),
                variant,
            }),
            Err(err) => {
                if let Err(cleanup) = dir.close() {
                    log::warn!("Failed to remove partial extraction: {}", cleanup);
                }
                Err(err)
            }
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl ImageStore for DirectoryStore {
    fn fetch(&self, key: &ImageKey) -> Result<Vec<u8>> {
        let path = self.dir.join(key.as_str());
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::Lookup {
                key: key.to_string(),
            },
            _ => Error::resource(&path, e),
        })
    }

    fn len(&self) -> usize {
        self.entries
    }

    fn variant(&self) -> ArchiveVariant {
        self.variant
    }

    fn location(&self) -> Option<&Path> {
        Some(self.dir.path())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.dir.close()
    }
}

/// Open the archive at `path` with the storage `config` asks for
///
/// Nothing is created when `path` is not an existing file.
pub fn open_store(path: &Path, config: &ViewerConfig) -> Result<Box<dyn ImageStore>> {
    if !path.is_file() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }

    let unpacker = config.unpacker();
    let store: Box<dyn ImageStore> = match config.store {
        StoreMode::Memory => Box::new(MemoryStore::read(path, &unpacker)?),
        StoreMode::Temporary => {
            let dir = WorkingDir::temporary("ssm-view-")?;
            Box::new(DirectoryStore::extract(path, dir, &unpacker)?)
        }
        StoreMode::BesideArchive => {
            let (parent, prefix) = beside_archive(path)?;
            let dir = WorkingDir::temporary_in(&parent, &prefix)?;
            Box::new(DirectoryStore::extract(path, dir, &unpacker)?)
        }
    };
    Ok(store)
}

/// Parent directory and name prefix for an extraction next to `path`
fn beside_archive(path: &Path) -> Result<(PathBuf, String)> {
    let stem = path
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::Input(format!("no archive name in {}", path.display())))?;
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((parent.to_path_buf(), format!("{}-", stem.to_string_lossy())))
}
