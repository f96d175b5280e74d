use std::borrow::Cow;

use bstr::{BStr, BString, ByteSlice};
use git_hash::ObjectId;

use crate::fields::{write_header, Headers};
use crate::{ObjectError, Signature};

/// A git commit object.
///
/// `tree`, `author` and `committer` are `None` when the header is absent.
/// Such a commit still parses and serializes; [`crate::check_commit`]
/// rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// OID of the root tree.
    pub tree: Option<ObjectId>,
    /// Parent commit OIDs in header order (empty for a root commit).
    pub parents: Vec<ObjectId>,
    /// Author identity and timestamp.
    pub author: Option<Signature>,
    /// Committer identity and timestamp.
    pub committer: Option<Signature>,
    /// Optional encoding header (e.g., "UTF-8", "ISO-8859-1").
    pub encoding: Option<BString>,
    /// Unrecognized headers (gpgsig, mergetag, ...) in encounter order.
    pub extra: Vec<(BString, BString)>,
    /// Commit message (everything after the blank line separator).
    pub message: BString,
}

impl Commit {
    /// Parse commit content from raw bytes (no object header).
    ///
    /// Header order, repeated headers and missing headers are not enforced
    /// here; a repeated `tree`, `author`, `committer` or `encoding` keeps the
    /// last value.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut commit = Self {
            tree: None,
            parents: Vec::new(),
            author: None,
            committer: None,
            encoding: None,
            extra: Vec::new(),
            message: BString::default(),
        };

        let mut headers = Headers::new(content);
        for (key, value) in headers.by_ref() {
            match key {
                b"tree" => commit.tree = Some(ObjectId::from_hex(&*value)?),
                b"parent" => commit.parents.push(ObjectId::from_hex(&*value)?),
                b"author" => commit.author = Some(Signature::parse(&value)?),
                b"committer" => commit.committer = Some(Signature::parse(&value)?),
                b"encoding" => commit.encoding = Some(BString::from(value.into_owned())),
                _ => commit
                    .extra
                    .push((BString::from(key), BString::from(value.into_owned()))),
            }
        }
        commit.message = BString::from(headers.message());
        Ok(commit)
    }

    /// Serialize commit content to bytes (no object header).
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();

        if let Some(ref tree) = self.tree {
            write_header(&mut out, b"tree", tree.to_hex().as_bytes());
        }
        for parent in &self.parents {
            write_header(&mut out, b"parent", parent.to_hex().as_bytes());
        }
        if let Some(ref author) = self.author {
            write_header(&mut out, b"author", &author.to_bytes());
        }
        if let Some(ref committer) = self.committer {
            write_header(&mut out, b"committer", &committer.to_bytes());
        }
        if let Some(ref enc) = self.encoding {
            write_header(&mut out, b"encoding", enc);
        }
        for (key, val) in &self.extra {
            write_header(&mut out, key, val);
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    /// Get the first parent (or None for root commits).
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    /// Is this a merge commit? (more than one parent)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Is this a root commit? (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Look up the first extra header named `key`.
    pub fn extra_header(&self, key: &[u8]) -> Option<&BStr> {
        self.extra
            .iter()
            .find(|(k, _)| k.as_bytes() == key)
            .map(|(_, v)| v.as_bstr())
    }

    /// Get just the summary (first line) of the message.
    pub fn summary(&self) -> &BStr {
        let msg: &[u8] = self.message.as_ref();
        match msg.find_byte(b'\n') {
            Some(pos) => BStr::new(&msg[..pos]),
            None => BStr::new(msg),
        }
    }

    /// Get the message body (everything after the first blank line in the message).
    pub fn body(&self) -> Option<&BStr> {
        let msg: &[u8] = self.message.as_ref();
        msg.find(b"\n\n").map(|pos| BStr::new(&msg[pos + 2..]))
    }

    /// Decode header or message bytes as text using this commit's `encoding`.
    ///
    /// Never fails: unknown encodings and invalid sequences fall back to
    /// lossy UTF-8.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        decode_text(bytes, self.encoding.as_ref().map(|e| e.as_bstr()))
    }

    /// The message decoded as text.
    pub fn decoded_message(&self) -> Cow<'_, str> {
        self.decode(&self.message)
    }
}

/// Best-effort text decoding for the encodings git commonly records.
pub fn decode_text<'a>(bytes: &'a [u8], encoding: Option<&BStr>) -> Cow<'a, str> {
    let latin1 = encoding.is_some_and(|enc| {
        matches!(
            enc.to_ascii_lowercase().as_slice(),
            b"iso-8859-1" | b"iso8859-1" | b"latin1" | b"latin-1" | b"l1"
        )
    });
    if latin1 && bytes.to_str().is_err() {
        return Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect());
    }
    String::from_utf8_lossy(bytes)
}
