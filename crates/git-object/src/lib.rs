//! Git object model: blob, tree, commit, tag parsing and serialization.
//!
//! This crate provides Rust types for git's four object types, their parsing
//! from raw bytes, serialization to canonical format, the structural checks
//! that go beyond parsing, and the [`ShaFile`] wrapper that ties an object to
//! its identity.
//!
//! Parsing and checking are separate steps: [`Object::parse_content`]
//! accepts anything it can interpret field by field, while [`check`]
//! additionally rejects out-of-order or duplicated headers, malformed
//! identities, unknown or zero-padded tree modes and unsorted trees.

mod blob;
mod check;
mod commit;
mod error;
mod fields;
pub mod header;
mod shafile;
mod signature;
mod tag;
mod timezone;
mod tree;

pub use blob::Blob;
pub use check::{check, check_blob, check_commit, check_entry_name, check_tag, check_tree};
pub use commit::{decode_text, Commit};
pub use error::ObjectError;
pub use shafile::ShaFile;
pub use signature::{check_identity, Signature};
pub use tag::Tag;
pub use timezone::Timezone;
pub use tree::{parse_tree, sort_entries, tree_order_cmp, FileMode, RawTreeEntry, Tree, TreeEntry};

use bstr::BString;
use git_hash::ObjectId;

/// The four types of git objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    /// Parse from the type string in object headers.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            b"commit" => Ok(Self::Commit),
            b"tag" => Ok(Self::Tag),
            _ => Err(ObjectError::InvalidType(BString::from(s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }

    /// The canonical byte representation.
    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// Type number used in pack entry headers.
    pub fn type_num(&self) -> u8 {
        match self {
            Self::Commit => 1,
            Self::Tree => 2,
            Self::Blob => 3,
            Self::Tag => 4,
        }
    }

    pub fn from_type_num(num: u8) -> Option<Self> {
        match num {
            1 => Some(Self::Commit),
            2 => Some(Self::Tree),
            3 => Some(Self::Blob),
            4 => Some(Self::Tag),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectType {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A parsed git object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    /// Parse from raw bytes (header + content).
    ///
    /// The declared size must match the content length exactly.
    pub fn parse(data: &[u8]) -> Result<Self, ObjectError> {
        let (obj_type, content) = header::split_envelope(data)?;
        Self::parse_content(obj_type, content)
    }

    /// Parse from content bytes with known type (no header).
    pub fn parse_content(obj_type: ObjectType, content: &[u8]) -> Result<Self, ObjectError> {
        match obj_type {
            ObjectType::Blob => Ok(Self::Blob(Blob::parse(content)?)),
            ObjectType::Tree => Ok(Self::Tree(Tree::parse(content)?)),
            ObjectType::Commit => Ok(Self::Commit(Commit::parse(content)?)),
            ObjectType::Tag => Ok(Self::Tag(Tag::parse(content)?)),
        }
    }

    /// Serialize to canonical git format (header + content).
    pub fn serialize(&self) -> Vec<u8> {
        let content = self.serialize_content();
        let hdr = header::write_header(self.object_type(), content.len());
        let mut out = Vec::with_capacity(hdr.len() + content.len());
        out.extend_from_slice(&hdr);
        out.extend_from_slice(&content);
        out
    }

    /// Serialize just the content (no header).
    pub fn serialize_content(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.serialize_content().to_vec(),
            Self::Tree(t) => t.serialize_content(),
            Self::Commit(c) => c.serialize_content(),
            Self::Tag(t) => t.serialize_content(),
        }
    }

    /// Get the object type.
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Blob(_) => ObjectType::Blob,
            Self::Tree(_) => ObjectType::Tree,
            Self::Commit(_) => ObjectType::Commit,
            Self::Tag(_) => ObjectType::Tag,
        }
    }

    /// Compute the OID by hashing the serialized form.
    pub fn compute_oid(&self) -> Result<ObjectId, ObjectError> {
        let content = self.serialize_content();
        Ok(git_hash::hasher::Hasher::hash_object(
            self.object_type().as_str(),
            &content,
        )?)
    }

    /// Run the structural checks over the canonical serialized form.
    ///
    /// Serialization writes headers in canonical order and modes without
    /// leading zeros, so this cannot report those problems in bytes the
    /// object was parsed from. Use [`ShaFile::check`] or [`crate::check`]
    /// with the stored payload to validate stored bytes.
    pub fn check(&self) -> Result<(), ObjectError> {
        check(self.object_type(), &self.serialize_content())
    }

    /// Get the size of the content (excluding header).
    pub fn content_size(&self) -> usize {
        match self {
            Self::Blob(b) => b.data.len(),
            Self::Tree(t) => t.serialize_content().len(),
            Self::Commit(c) => c.serialize_content().len(),
            Self::Tag(t) => t.serialize_content().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_type_from_bytes() {
        assert_eq!(ObjectType::from_bytes(b"blob").unwrap(), ObjectType::Blob);
        assert_eq!(ObjectType::from_bytes(b"tree").unwrap(), ObjectType::Tree);
        assert_eq!(
            ObjectType::from_bytes(b"commit").unwrap(),
            ObjectType::Commit
        );
        assert_eq!(ObjectType::from_bytes(b"tag").unwrap(), ObjectType::Tag);
        assert!(ObjectType::from_bytes(b"unknown").is_err());
        assert!(ObjectType::from_bytes(b"Blob").is_err());
    }

    #[test]
    fn object_type_display() {
        assert_eq!(ObjectType::Blob.to_string(), "blob");
        assert_eq!(ObjectType::Commit.to_string(), "commit");
    }

    #[test]
    fn object_type_from_str() {
        assert_eq!("tree".parse::<ObjectType>().unwrap(), ObjectType::Tree);
        assert!("invalid".parse::<ObjectType>().is_err());
    }

    #[test]
    fn type_numbers() {
        for ty in [ObjectType::Blob, ObjectType::Tree, ObjectType::Commit, ObjectType::Tag] {
            assert_eq!(ObjectType::from_type_num(ty.type_num()), Some(ty));
        }
        assert_eq!(ObjectType::Commit.type_num(), 1);
        assert_eq!(ObjectType::Tag.type_num(), 4);
        assert_eq!(ObjectType::from_type_num(0), None);
        assert_eq!(ObjectType::from_type_num(7), None);
    }

    #[test]
    fn parse_envelope_dispatches_on_type() {
        let obj = Object::parse(b"blob 11\0hello world").unwrap();
        assert_eq!(obj.object_type(), ObjectType::Blob);
        assert_eq!(obj.serialize(), b"blob 11\0hello world");
        assert_eq!(
            obj.compute_oid().unwrap().to_hex(),
            "95d09f2b10159347eece71399a7e2e907ea3df4f"
        );
        assert!(matches!(
            Object::parse(b"bloob 1\0x"),
            Err(ObjectError::InvalidType(_))
        ));
    }

    #[test]
    fn object_check_sees_canonical_form_only() {
        let mut raw = b"0100644 foo\0".to_vec();
        raw.extend_from_slice(&[0x11; 20]);
        let obj = Object::parse_content(ObjectType::Tree, &raw).unwrap();
        obj.check().unwrap();
        assert!(check(ObjectType::Tree, &raw).is_err());
        assert!(ShaFile::from_raw(ObjectType::Tree, raw).unwrap().check().is_err());
    }

    #[test]
    fn commit_id() {
        let data = b"tree d80c186a03f423a81b39df39dc87fd269736ca86\n\
parent ab64bbdcc51b170d21588e5c5d391ee5c0c96dfd\n\
parent 4cffe90e0a41ad3f5190079d7c8f036bde29cbe6\n\
author James Westby <jw+debian@jameswestby.net> 1174773719 +0000\n\
committer James Westby <jw+debian@jameswestby.net> 1174773719 +0000\n\
\n\
Merge ../b\n";
        let obj = Object::parse_content(ObjectType::Commit, data).unwrap();
        obj.check().unwrap();
        assert_eq!(obj.content_size(), data.len());
        assert_eq!(
            obj.compute_oid().unwrap().to_hex(),
            "5dac377bdded4c9aeb8dff595f0faeebcc8498cc"
        );
    }
}
