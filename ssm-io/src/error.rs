//! Error types for archive decoding

use ssm_core::Error;
use std::path::PathBuf;
use thiserror::Error;

/// Format-level failures while reading or writing a `.ssm` archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Archive not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Not a snapshot archive: bad magic bytes")]
    BadMagic,

    #[error("Unsupported archive version {0}")]
    UnsupportedVersion(u8),

    #[error("Unknown archive variant tag {0}")]
    UnknownVariant(u8),

    #[error("Archive variant mismatch: expected {expected}, found {found}")]
    VariantMismatch { expected: String, found: String },

    #[error("Malformed archive payload: {message}")]
    Payload { message: String },

    #[error("Invalid entry name {name:?}")]
    EntryName { name: String },

    #[error("Duplicate entry {name:?}")]
    DuplicateEntry { name: String },

    #[error("Invalid base64 image data in {name:?}: {source}")]
    Encoding {
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    pub(crate) fn payload(message: impl std::fmt::Display) -> Self {
        ArchiveError::Payload {
            message: message.to_string(),
        }
    }
}

impl From<ArchiveError> for Error {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::NotFound { path } => Error::NotFound { path },
            ArchiveError::Io(e) => Error::Io(e),
            other => Error::Decode(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_errors_become_decode_errors() {
        let err: Error = ArchiveError::BadMagic.into();
        assert!(matches!(err, Error::Decode(_)));

        let err: Error = ArchiveError::VariantMismatch {
            expected: "plain".to_string(),
            found: "compressed".to_string(),
        }
        .into();
        match err {
            Error::Decode(message) => assert!(message.contains("expected plain")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_not_found_is_preserved() {
        let err: Error = ArchiveError::NotFound { path: PathBuf::from("a.ssm") }.into();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
