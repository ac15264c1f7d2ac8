//! Module entries and their lazily-loaded content.

use crate::error::Result;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Something that yields the entry's bytes on demand.
///
/// The pipeline never holds all bundle bytes in memory at once; entries read
/// straight out of the source archive when the serializer asks for them.
#[derive(Clone)]
pub enum ByteSource {
    Memory(Arc<Vec<u8>>),
    File(PathBuf),
    /// An entry still sitting in a zip archive on disk.
    ZipEntry { archive: PathBuf, name: String },
}

impl ByteSource {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Memory(Arc::new(bytes.into()))
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::Memory(bytes) => Ok(bytes.as_ref().clone()),
            Self::File(path) => Ok(std::fs::read(path)?),
            Self::ZipEntry { archive, name } => {
                let file = File::open(archive)?;
                let mut zip = zip::ZipArchive::new(file)?;
                let mut entry = zip.by_name(name)?;
                let mut bytes = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }

    /// Uncompressed size without materializing the content where possible.
    pub fn len(&self) -> Result<u64> {
        match self {
            Self::Memory(bytes) => Ok(bytes.len() as u64),
            Self::File(path) => Ok(std::fs::metadata(path)?.len()),
            Self::ZipEntry { archive, name } => {
                let file = File::open(archive)?;
                let mut zip = zip::ZipArchive::new(file)?;
                let entry = zip.by_name(name)?;
                Ok(entry.size())
            }
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(bytes) => write!(f, "ByteSource::Memory({} bytes)", bytes.len()),
            Self::File(path) => write!(f, "ByteSource::File({})", path.display()),
            Self::ZipEntry { archive, name } => {
                write!(f, "ByteSource::ZipEntry({}!{})", archive.display(), name)
            }
        }
    }
}

/// One file of a module, keyed by its normalized zip-style path.
#[derive(Clone, Debug)]
pub struct ModuleEntry {
    path: String,
    content: ByteSource,
    /// The serializer must store this entry without compression.
    pub force_uncompressed: bool,
    /// The entry is an embedded APK that must be signed with the app key.
    pub should_sign: bool,
}

impl ModuleEntry {
    pub fn new(path: impl Into<String>, content: ByteSource) -> Self {
        Self {
            path: path.into(),
            content,
            force_uncompressed: false,
            should_sign: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &ByteSource {
        &self.content
    }

    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }

    pub fn with_content(&self, content: ByteSource) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }

    pub fn with_force_uncompressed(&self, force_uncompressed: bool) -> Self {
        Self {
            force_uncompressed,
            ..self.clone()
        }
    }

    pub fn with_should_sign(&self, should_sign: bool) -> Self {
        Self {
            should_sign,
            ..self.clone()
        }
    }
}

/// Normalizes and validates a zip-style path: forward slashes, relative,
/// no `.`/`..` segments, no empty segments.
pub fn normalize_entry_path(path: &str) -> Option<String> {
    if path.is_empty() || path.contains('\\') || path.starts_with('/') || path.ends_with('/') {
        return None;
    }
    let segments: Vec<&str> = path.split('/').collect();
    if segments
        .iter()
        .any(|segment| segment.is_empty() || *segment == "." || *segment == "..")
    {
        return None;
    }
    Some(segments.join("/"))
}
