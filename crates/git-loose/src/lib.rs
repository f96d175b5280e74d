//! Loose object storage: zlib-compressed objects addressed by identity.
//!
//! Each loose object lives at `objects/XX/YYYY...` where `XX` is the first
//! byte of the OID in hex and `YYYY...` is the rest. The file content is
//! normally zlib-compressed `"<type> <size>\0<content>"`; the older
//! pack-style framing (a binary type/size header followed by the
//! compressed content) is accepted on read.

mod codec;
mod read;
mod write;

pub use codec::{decode_loose, encode_loose, is_zlib_header};

use git_hash::ObjectId;
use std::path::{Path, PathBuf};

/// Interface to a loose object directory.
pub struct LooseObjectStore {
    /// Path to the objects directory.
    objects_dir: PathBuf,
    /// Zlib compression level.
    compression_level: flate2::Compression,
    /// Re-hash every object read through [`LooseObjectStore::read`].
    verify_on_read: bool,
}

impl LooseObjectStore {
    /// Open the loose object store at the given path.
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            compression_level: flate2::Compression::default(),
            verify_on_read: false,
        }
    }

    /// Set the zlib compression level (0–9).
    pub fn set_compression_level(&mut self, level: u32) {
        self.compression_level = flate2::Compression::new(level.min(9));
    }

    pub fn compression_level(&self) -> u32 {
        self.compression_level.level()
    }

    /// Make every read check that the content hashes to the requested OID.
    pub fn set_verify_on_read(&mut self, verify: bool) {
        self.verify_on_read = verify;
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Get the file path for a given OID.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        oid.sharded_path(&self.objects_dir)
    }
}

/// Errors from loose object operations.
#[derive(Debug, thiserror::Error)]
pub enum LooseError {
    #[error("corrupt loose object: {reason}")]
    Corrupt { reason: String },

    #[error("decompression error: {0}")]
    Decompress(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("object error: {0}")]
    Object(#[from] git_object::ObjectError),

    #[error("hash error: {0}")]
    Hash(#[from] git_hash::HashError),
}

impl LooseError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }

    /// The underlying object error, if this failure came from the object layer.
    pub fn object_error(&self) -> Option<&git_object::ObjectError> {
        match self {
            Self::Object(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_is_sharded() {
        let store = LooseObjectStore::open("/tmp/objects");
        let oid = ObjectId::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        let path = store.object_path(&oid);
        assert_eq!(
            path,
            PathBuf::from("/tmp/objects/da/39a3ee5e6b4b0d3255bfef95601890afd80709")
        );
    }

    #[test]
    fn compression_level_is_clamped() {
        let mut store = LooseObjectStore::open("/tmp/objects");
        assert_eq!(store.compression_level(), flate2::Compression::default().level());
        store.set_compression_level(9);
        assert_eq!(store.compression_level(), 9);
        store.set_compression_level(42);
        assert_eq!(store.compression_level(), 9);
    }
}
