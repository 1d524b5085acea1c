//! Working directories owned by one generation run or viewer session

use ssm_core::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

enum Backing {
    Temporary(TempDir),
    Explicit,
}

/// A directory with exactly one owner, removed when the owner is done
///
/// [`WorkingDir::close`] removes it and reports failures. Dropping a
/// directory that was not closed removes it too, logging instead of
/// failing. A directory that is already gone counts as removed.
pub struct WorkingDir {
    path: PathBuf,
    backing: Option<Backing>,
}

impl WorkingDir {
    /// Fresh directory under the system temp location
    pub fn temporary(prefix: &str) -> Result<Self> {
        let parent = std::env::temp_dir();
        Self::temporary_in(&parent, prefix)
    }

    /// Fresh uniquely named directory inside `parent`
    pub fn temporary_in(parent: &Path, prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(parent)
            .map_err(|e| Error::resource(parent, e))?;
        let path = dir.path().to_path_buf();
        log::debug!("Created working directory {}", path.display());

        Ok(Self {
            path,
            backing: Some(Backing::Temporary(dir)),
        })
    }

    /// Create `path` as a new working directory
    ///
    /// Fails with [`Error::Resource`] if `path` already exists, so only a
    /// directory this call made is ever removed again. Missing parents are
    /// created and left in place.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::resource(parent, e))?;
        }
        fs::create_dir(&path).map_err(|e| Error::resource(&path, e))?;
        log::debug!("Created working directory {}", path.display());

        Ok(Self {
            path,
            backing: Some(Backing::Explicit),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// Remove the directory and everything in it
    pub fn close(mut self) -> Result<()> {
        self.remove()
    }

    fn remove(&mut self) -> Result<()> {
        let result = match self.backing.take() {
            Some(Backing::Temporary(dir)) => dir.close(),
            Some(Backing::Explicit) => fs::remove_dir_all(&self.path),
            None => return Ok(()),
        };

        match result {
            Ok(()) => {
                log::debug!("Removed working directory {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::resource(&self.path, e)),
        }
    }
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        if let Err(err) = self.remove() {
            log::warn!("Failed to clean up working directory: {}", err);
        }
    }
}

impl std::fmt::Debug for WorkingDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingDir")
            .field("path", &self.path)
            .field("open", &self.backing.is_some())
            .finish()
    }
}
