//! Packing snapshot directories into archives and unpacking them again

use crate::archive::{Archive, ArchiveVariant};
use ssm_core::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// File extensions the packer picks up from a working directory
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Whether `path` has one of [`IMAGE_EXTENSIONS`], ignoring case
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Outcome of writing an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSummary {
    pub path: PathBuf,
    pub entries: usize,
    pub bytes_written: u64,
    pub variant: ArchiveVariant,
}

/// Writes archives in one variant
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchivePacker {
    variant: ArchiveVariant,
}

impl ArchivePacker {
    pub fn new(variant: ArchiveVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> ArchiveVariant {
        self.variant
    }

    /// Load every image file directly inside `dir`
    pub fn collect_directory(dir: &Path) -> Result<Archive> {
        let mut archive = Archive::new();

        for entry in fs::read_dir(dir).map_err(|e| Error::resource(dir, e))? {
            let entry = entry.map_err(|e| Error::resource(dir, e))?;
            let path = entry.path();
            if !path.is_file() || !is_image_file(&path) {
                continue;
            }

            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                log::warn!("Skipping image with non UTF-8 name: {}", path.display());
                continue;
            };
            let data = fs::read(&path)?;
            archive
                .insert(name, data)
                .map_err(Error::from)?;
        }

        Ok(archive)
    }

    /// Write `archive` to `output`
    ///
    /// The archive is written next to `output` first and moved into place
    /// once complete, so a failed write never leaves a truncated file behind.
    pub fn pack(&self, archive: &Archive, output: &Path) -> Result<PackSummary> {
        let partial = partial_path(output);

        let written = (|| -> Result<()> {
            let mut writer = BufWriter::new(File::create(&partial)?);
            archive.write_to(&mut writer, self.variant)?;
            writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
            fs::rename(&partial, output)?;
            Ok(())
        })();

        if let Err(err) = written {
            let _ = fs::remove_file(&partial);
            return Err(err);
        }

        let bytes_written = fs::metadata(output)?.len();
        log::info!(
            "Packed {} entries into {} ({} bytes, {})",
            archive.len(),
            output.display(),
            bytes_written,
            self.variant
        );

        Ok(PackSummary {
            path: output.to_path_buf(),
            entries: archive.len(),
            bytes_written,
            variant: self.variant,
        })
    }

    /// Pack the images in `dir` into `output`, then remove `dir`
    ///
    /// The archive becomes the only durable artifact. If the directory
    /// cannot be removed the archive is kept and the failure is returned as
    /// [`Error::Resource`].
    pub fn pack_directory(&self, dir: &Path, output: &Path) -> Result<PackSummary> {
        let archive = Self::collect_directory(dir)?;
        let summary = self.pack(&archive, output)?;

        fs::remove_dir_all(dir).map_err(|e| Error::resource(dir, e))?;
        log::debug!("Removed working directory {}", dir.display());

        Ok(summary)
    }
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    output.with_file_name(name)
}

/// Reads archives, optionally insisting on one variant
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveUnpacker {
    expected: Option<ArchiveVariant>,
}

impl ArchiveUnpacker {
    /// Unpacker that accepts either variant
    pub fn new() -> Self {
        Self::default()
    }

    /// Unpacker that rejects archives packed with any other variant
    pub fn expecting(variant: ArchiveVariant) -> Self {
        Self {
            expected: Some(variant),
        }
    }

    pub fn expected(&self) -> Option<ArchiveVariant> {
        self.expected
    }

    /// Decode the archive at `path` into memory
    ///
    /// Fails with [`Error::NotFound`] before reading anything when `path` is
    /// not an existing file, and with [`Error::Decode`] for foreign or
    /// corrupt data. The archive file is only read.
    pub fn read(&self, path: &Path) -> Result<(Archive, ArchiveVariant)> {
        if !path.is_file() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        let mut reader = BufReader::new(file);
        let (archive, variant) = Archive::read_from(&mut reader, self.expected)?;

        log::debug!(
            "Read {} entries from {} ({})",
            archive.len(),
            path.display(),
            variant
        );
        Ok((archive, variant))
    }

    /// Extract the archive at `path` into `dest`, creating it if needed
    ///
    /// Returns the decoded archive so callers can inspect what was written.
    pub fn unpack(&self, path: &Path, dest: &Path) -> Result<(Archive, ArchiveVariant)> {
        let (archive, variant) = self.read(path)?;

        fs::create_dir_all(dest).map_err(|e| Error::resource(dest, e))?;
        for (name, data) in archive.iter() {
            let target = dest.join(name);
            fs::write(&target, data).map_err(|e| Error::resource(&target, e))?;
        }

        log::info!(
            "Extracted {} entries from {} into {}",
            archive.len(),
            path.display(),
            dest.display()
        );
        Ok((archive, variant))
    }
}
