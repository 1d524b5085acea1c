//! The `.ssm` snapshot archive container
//!
//! An archive is a flat collection of `(name, bytes)` entries behind a small
//! header that says how the payload is packed:
//!
//! ```text
//! offset 0  4 bytes  magic "SSM\0"
//! offset 4  1 byte   format version
//! offset 5  1 byte   variant tag (0 = plain, 1 = compressed)
//! offset 6  ...      payload
//! ```
//!
//! The plain payload is a CBOR array of `[name, bytes]` pairs. The compressed
//! payload is an XZ stream holding a CBOR array of `[name, base64 text]`
//! pairs.

use crate::error::ArchiveError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ciborium::value::Value as CborValue;
use serde::{Deserialize, Serialize};
use ssm_core::{ImageKey, RotationState};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};
use std::path::{Component, Path};
use std::str::FromStr;

pub const MAGIC: [u8; 4] = *b"SSM\0";
pub const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 6;

/// How the archive payload is packed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveVariant {
    /// Raw image bytes, payload stored as is
    #[default]
    Plain,
    /// Base64 image text, payload XZ-compressed
    Compressed,
}

impl ArchiveVariant {
    pub fn tag(self) -> u8 {
        match self {
            ArchiveVariant::Plain => 0,
            ArchiveVariant::Compressed => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, ArchiveError> {
        match tag {
            0 => Ok(ArchiveVariant::Plain),
            1 => Ok(ArchiveVariant::Compressed),
            other => Err(ArchiveError::UnknownVariant(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArchiveVariant::Plain => "plain",
            ArchiveVariant::Compressed => "compressed",
        }
    }
}

impl fmt::Display for ArchiveVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArchiveVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(ArchiveVariant::Plain),
            "compressed" | "xz" => Ok(ArchiveVariant::Compressed),
            other => Err(format!("unknown archive variant: {other}")),
        }
    }
}

/// One stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Check that an entry name is a single plain file name
///
/// Unpacking joins the name onto a destination directory, so separators,
/// `.`/`..` and absolute paths are refused.
pub fn validate_entry_name(name: &str) -> Result<(), ArchiveError> {
    let invalid = || ArchiveError::EntryName {
        name: name.to_string(),
    };

    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return Err(invalid());
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid()),
    }
}

/// In-memory archive, keyed by entry name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an archive from entries, rejecting invalid or repeated names
    pub fn from_entries<I>(entries: I) -> Result<Self, ArchiveError>
    where
        I: IntoIterator<Item = ArchiveEntry>,
    {
        let mut archive = Archive::new();
        for entry in entries {
            archive.try_insert(entry.name, entry.data)?;
        }
        Ok(archive)
    }

    /// Insert an entry, replacing any previous data under the same name
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) -> Result<(), ArchiveError> {
        let name = name.into();
        validate_entry_name(&name)?;
        self.entries.insert(name, data);
        Ok(())
    }

    fn try_insert(&mut self, name: String, data: Vec<u8>) -> Result<(), ArchiveError> {
        validate_entry_name(&name)?;
        if self.entries.contains_key(&name) {
            return Err(ArchiveError::DuplicateEntry { name });
        }
        self.entries.insert(name, data);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn total_bytes(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn into_entries(self) -> Vec<ArchiveEntry> {
        self.entries
            .into_iter()
            .map(|(name, data)| ArchiveEntry { name, data })
            .collect()
    }

    /// Grid keys with no entry in this archive
    pub fn missing_keys(&self) -> Vec<ImageKey> {
        RotationState::grid()
            .map(ImageKey::from)
            .filter(|key| !self.contains(key.as_str()))
            .collect()
    }

    /// Serialize the archive, header included
    pub fn write_to<W: Write>(&self, writer: &mut W, variant: ArchiveVariant) -> Result<(), ArchiveError> {
        writer.write_all(&MAGIC)?;
        writer.write_all(&[FORMAT_VERSION, variant.tag()])?;

        match variant {
            ArchiveVariant::Plain => {
                let value = self.to_cbor(|data| CborValue::Bytes(data.to_vec()));
                ciborium::ser::into_writer(&value, &mut *writer)
                    .map_err(|e| ArchiveError::payload(format!("{e:?}")))?;
            }
            ArchiveVariant::Compressed => {
                let value = self.to_cbor(|data| CborValue::Text(STANDARD.encode(data)));
                let mut payload = Vec::new();
                ciborium::ser::into_writer(&value, &mut payload)
                    .map_err(|e| ArchiveError::payload(format!("{e:?}")))?;
                lzma_rs::xz_compress(&mut payload.as_slice(), writer)?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Parse an archive, returning it with the variant it was packed with
    ///
    /// With `expected` set, an archive packed with the other variant is
    /// rejected instead of being decoded.
    pub fn read_from<R: Read>(
        reader: &mut R,
        expected: Option<ArchiveVariant>,
    ) -> Result<(Self, ArchiveVariant), ArchiveError> {
        let mut header = [0u8; HEADER_LEN];
        reader.read_exact(&mut header).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => ArchiveError::BadMagic,
            _ => ArchiveError::Io(e),
        })?;

        if header[..4] != MAGIC {
            return Err(ArchiveError::BadMagic);
        }
        if header[4] != FORMAT_VERSION {
            return Err(ArchiveError::UnsupportedVersion(header[4]));
        }
        let variant = ArchiveVariant::from_tag(header[5])?;
        if let Some(expected) = expected {
            if expected != variant {
                return Err(ArchiveError::VariantMismatch {
                    expected: expected.to_string(),
                    found: variant.to_string(),
                });
            }
        }

        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        let value = match variant {
            ArchiveVariant::Plain => decode_cbor(&body)?,
            ArchiveVariant::Compressed => {
                let mut payload = Vec::new();
                lzma_rs::xz_decompress(&mut body.as_slice(), &mut payload)
                    .map_err(|e| ArchiveError::payload(format!("xz: {e:?}")))?;
                decode_cbor(&payload)?
            }
        };

        let archive = Self::from_cbor(value, variant)?;
        Ok((archive, variant))
    }

    fn to_cbor(&self, encode: impl Fn(&[u8]) -> CborValue) -> CborValue {
        CborValue::Array(
            self.entries
                .iter()
                .map(|(name, data)| CborValue::Array(vec![CborValue::Text(name.clone()), encode(data)]))
                .collect(),
        )
    }

    fn from_cbor(value: CborValue, variant: ArchiveVariant) -> Result<Self, ArchiveError> {
        let CborValue::Array(items) = value else {
            return Err(ArchiveError::payload("payload is not an entry list"));
        };

        let mut archive = Archive::new();
        for (index, item) in items.into_iter().enumerate() {
            let CborValue::Array(pair) = item else {
                return Err(ArchiveError::payload(format!("entry {index} is not a pair")));
            };
            let [name, data]: [CborValue; 2] = pair
                .try_into()
                .map_err(|_| ArchiveError::payload(format!("entry {index} is not a pair")))?;

            let CborValue::Text(name) = name else {
                return Err(ArchiveError::payload(format!("entry {index} has no name")));
            };

            let data = match (variant, data) {
                (ArchiveVariant::Plain, CborValue::Bytes(bytes)) => bytes,
                (ArchiveVariant::Compressed, CborValue::Text(text)) => STANDARD
                    .decode(text.as_bytes())
                    .map_err(|source| ArchiveError::Encoding {
                        name: name.clone(),
                        source,
                    })?,
                (variant, _) => {
                    return Err(ArchiveError::payload(format!(
                        "entry {name:?} is not encoded for a {variant} archive"
                    )))
                }
            };

            archive.try_insert(name, data)?;
        }

        Ok(archive)
    }
}

/// Decode exactly one CBOR value spanning all of `bytes`
fn decode_cbor(bytes: &[u8]) -> Result<CborValue, ArchiveError> {
    let mut rest = bytes;
    let value = ciborium::de::from_reader(&mut rest)
        .map_err(|e| ArchiveError::payload(format!("{e:?}")))?;
    if !rest.is_empty() {
        return Err(ArchiveError::payload(format!(
            "{} unexpected bytes after the entry list",
            rest.len()
        )));
    }
    Ok(value)
}
