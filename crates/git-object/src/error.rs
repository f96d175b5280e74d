use bstr::BString;
use git_hash::hex::hex_to_string;
use git_hash::{HashError, ObjectId, SHA1_LEN};

use crate::ObjectType;

/// Errors produced by object operations.
///
/// Framing failures, failed structural checks and malformed identities are
/// all "format errors" (see [`ObjectError::is_format_error`]). The remaining
/// variants are raised by object stores built on this crate.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("invalid object type: {0}")]
    InvalidType(BString),

    #[error("invalid object header: {0}")]
    InvalidHeader(String),

    #[error("object length mismatch: header declares {expected} bytes, payload has {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid tree entry at offset {offset}: {reason}")]
    InvalidTreeEntry { offset: usize, reason: String },

    #[error("invalid {object}: missing '{field}' header")]
    MissingField {
        object: ObjectType,
        field: &'static str,
    },

    #[error("{reason}{}", raw_suffix(.raw))]
    Malformed {
        reason: String,
        raw: Option<BString>,
    },

    #[error(
        "checksum mismatch: expected {}, got {}{}",
        render_digest(.expected),
        render_digest(.actual),
        extra_suffix(.extra)
    )]
    ChecksumMismatch {
        expected: Vec<u8>,
        actual: Vec<u8>,
        extra: Option<String>,
    },

    #[error("{oid} is not in the object store")]
    MissingObject { oid: ObjectId },

    #[error("{oid} is not a {expected}")]
    WrongKind { oid: ObjectId, expected: ObjectType },

    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ObjectError {
    /// A structural problem described by `reason`.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
            raw: None,
        }
    }

    /// A structural problem together with the offending raw bytes.
    pub fn malformed_raw(reason: impl Into<String>, raw: impl AsRef<[u8]>) -> Self {
        Self::Malformed {
            reason: reason.into(),
            raw: Some(BString::from(raw.as_ref())),
        }
    }

    pub fn checksum_mismatch(
        expected: impl AsRef<[u8]>,
        actual: impl AsRef<[u8]>,
        extra: Option<String>,
    ) -> Self {
        Self::ChecksumMismatch {
            expected: expected.as_ref().to_vec(),
            actual: actual.as_ref().to_vec(),
            extra,
        }
    }

    pub fn not_commit(oid: ObjectId) -> Self {
        Self::WrongKind {
            oid,
            expected: ObjectType::Commit,
        }
    }

    pub fn not_tree(oid: ObjectId) -> Self {
        Self::WrongKind {
            oid,
            expected: ObjectType::Tree,
        }
    }

    pub fn not_tag(oid: ObjectId) -> Self {
        Self::WrongKind {
            oid,
            expected: ObjectType::Tag,
        }
    }

    pub fn not_blob(oid: ObjectId) -> Self {
        Self::WrongKind {
            oid,
            expected: ObjectType::Blob,
        }
    }

    /// Whether this error means the bytes are malformed, as opposed to a
    /// lookup or integrity failure.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidType(_)
                | Self::InvalidHeader(_)
                | Self::LengthMismatch { .. }
                | Self::InvalidTreeEntry { .. }
                | Self::MissingField { .. }
                | Self::Malformed { .. }
                | Self::Hash(_)
        )
    }
}

fn raw_suffix(raw: &Option<BString>) -> String {
    match raw {
        Some(raw) => format!(": {raw:?}"),
        None => String::new(),
    }
}

fn extra_suffix(extra: &Option<String>) -> String {
    match extra {
        Some(extra) => format!("; {extra}"),
        None => String::new(),
    }
}

/// Raw 20-byte digests render as hex; anything else is shown as text.
fn render_digest(digest: &[u8]) -> String {
    if digest.len() == SHA1_LEN {
        hex_to_string(digest)
    } else {
        String::from_utf8_lossy(digest).into_owned()
    }
}
