//! Structural validation of object payloads.
//!
//! Parsing accepts anything it can interpret field by field. The checks here
//! run over the raw payload and additionally enforce header order, header
//! uniqueness, identity syntax, the tree mode set and spelling, and tree
//! entry order.

use std::cmp::Ordering;
use std::collections::HashSet;

use bstr::ByteSlice;
use git_hash::hex::check_hex_sha;
use tracing::debug;

use crate::fields::Headers;
use crate::signature::check_identity;
use crate::tree::{parse_tree, tree_order_cmp};
use crate::{ObjectError, ObjectType, Signature};

/// Validate `content` as a payload of type `obj_type`.
///
/// Fails on the first violation found.
pub fn check(obj_type: ObjectType, content: &[u8]) -> Result<(), ObjectError> {
    let result = match obj_type {
        ObjectType::Blob => check_blob(content),
        ObjectType::Tree => check_tree(content),
        ObjectType::Commit => check_commit(content),
        ObjectType::Tag => check_tag(content),
    };
    if let Err(ref err) = result {
        debug!(kind = %obj_type, %err, "object failed structural check");
    }
    result
}

/// Blobs are opaque; any payload is valid.
pub fn check_blob(_content: &[u8]) -> Result<(), ObjectError> {
    Ok(())
}

/// Names must be non-empty, not `.` or `..`, and free of `/`.
pub fn check_entry_name(name: &[u8]) -> Result<(), ObjectError> {
    if name.is_empty() || name == b"." || name == b".." || name.contains(&b'/') {
        return Err(ObjectError::malformed_raw("invalid name in tree entry", name));
    }
    Ok(())
}

/// Entries must be well named, use a canonical recognized mode, be in tree
/// order and carry each name once. A file and a directory of the same name
/// need not be adjacent (`a`, `a.c`, `a/`), so every name seen is kept.
pub fn check_tree(content: &[u8]) -> Result<(), ObjectError> {
    let mut seen: HashSet<&[u8]> = HashSet::new();
    let mut last: Option<(&[u8], bool)> = None;
    for entry in parse_tree(content) {
        let entry = entry?;
        check_entry_name(entry.name)?;
        if !entry.mode.is_recognized() {
            return Err(ObjectError::malformed_raw("invalid mode in tree entry", entry.mode_text));
        }
        if !entry.has_canonical_mode() {
            return Err(ObjectError::malformed_raw(
                "zero-padded mode in tree entry",
                entry.mode_text,
            ));
        }

        if !seen.insert(entry.name.as_bytes()) {
            return Err(ObjectError::malformed_raw("duplicate entry in tree", entry.name));
        }
        let is_dir = entry.mode.is_tree();
        if let Some((last_name, last_is_dir)) = last {
            if tree_order_cmp(last_name, last_is_dir, entry.name, is_dir) == Ordering::Greater {
                return Err(ObjectError::malformed_raw("entries not sorted in tree", entry.name));
            }
        }
        last = Some((entry.name.as_bytes(), is_dir));
    }
    Ok(())
}

fn check_signature(field: &str, value: &[u8]) -> Result<(), ObjectError> {
    let sig = Signature::parse(value)
        .map_err(|_| ObjectError::malformed_raw(format!("invalid {field}"), value))?;
    check_identity(&sig.identity)
}

fn check_sha(field: &str, value: &[u8]) -> Result<(), ObjectError> {
    check_hex_sha(value).map_err(|_| ObjectError::malformed_raw(format!("invalid {field} sha"), value))
}

fn unexpected(field: &[u8]) -> ObjectError {
    ObjectError::malformed_raw("unexpected header", field)
}

fn missing(object: ObjectType, field: &'static str) -> ObjectError {
    ObjectError::MissingField { object, field }
}

/// Headers must read `tree, parent*, author, committer, [encoding], extra*`.
pub fn check_commit(content: &[u8]) -> Result<(), ObjectError> {
    let mut last: Option<&[u8]> = None;
    let (mut has_tree, mut has_author, mut has_committer) = (false, false, false);

    for (key, value) in Headers::new(content) {
        match key {
            b"tree" => {
                if last.is_some() {
                    return Err(unexpected(key));
                }
                check_sha("tree", &value)?;
                has_tree = true;
            }
            b"parent" => {
                if !matches!(last, Some(b"tree" | b"parent")) {
                    return Err(unexpected(key));
                }
                check_sha("parent", &value)?;
            }
            b"author" => {
                if !matches!(last, Some(b"tree" | b"parent")) {
                    return Err(unexpected(key));
                }
                check_signature("author", &value)?;
                has_author = true;
            }
            b"committer" => {
                if last != Some(b"author".as_slice()) {
                    return Err(unexpected(key));
                }
                check_signature("committer", &value)?;
                has_committer = true;
            }
            b"encoding" => {
                if last != Some(b"committer".as_slice()) {
                    return Err(unexpected(key));
                }
            }
            _ => {}
        }
        last = Some(key);
    }

    if !has_tree {
        return Err(missing(ObjectType::Commit, "tree"));
    }
    if !has_author {
        return Err(missing(ObjectType::Commit, "author"));
    }
    if !has_committer {
        return Err(missing(ObjectType::Commit, "committer"));
    }
    Ok(())
}

/// Headers must read `object, type, tag, [tagger]`.
pub fn check_tag(content: &[u8]) -> Result<(), ObjectError> {
    let mut last: Option<&[u8]> = None;
    let (mut has_object, mut has_type, mut has_name) = (false, false, false);

    for (key, value) in Headers::new(content) {
        match key {
            b"object" => {
                if last.is_some() {
                    return Err(unexpected(key));
                }
                check_sha("object", &value)?;
                has_object = true;
            }
            b"type" => {
                if last != Some(b"object".as_slice()) {
                    return Err(unexpected(key));
                }
                ObjectType::from_bytes(&value)?;
                has_type = true;
            }
            b"tag" => {
                if last != Some(b"type".as_slice()) {
                    return Err(unexpected(key));
                }
                if value.is_empty() {
                    return Err(ObjectError::malformed("empty tag name"));
                }
                has_name = true;
            }
            b"tagger" => {
                if last != Some(b"tag".as_slice()) {
                    return Err(unexpected(key));
                }
                check_signature("tagger", &value)?;
            }
            _ => return Err(ObjectError::malformed_raw("unknown field in tag", key)),
        }
        last = Some(key);
    }

    if !has_object {
        return Err(missing(ObjectType::Tag, "object"));
    }
    if !has_type {
        return Err(missing(ObjectType::Tag, "type"));
    }
    if !has_name {
        return Err(missing(ObjectType::Tag, "tag"));
    }
    Ok(())
}
