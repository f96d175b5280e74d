use std::borrow::Cow;
use std::sync::OnceLock;

use git_hash::hasher::Hasher;
use git_hash::ObjectId;

use crate::header::{split_envelope, write_header};
use crate::{check, Blob, Commit, Object, ObjectError, ObjectType, Tag, Tree};

/// An object together with its identity.
///
/// When built from raw bytes the exact payload is retained, so the identity
/// and [`ShaFile::check`] see the bytes as they were stored even if they are
/// not in canonical form. Mutating the object through
/// [`ShaFile::object_mut`] or [`ShaFile::set_raw`] drops the retained bytes
/// and the cached identity; the next [`ShaFile::id`] hashes the serialized
/// object instead.
#[derive(Debug, Clone)]
pub struct ShaFile {
    object: Object,
    raw: Option<Vec<u8>>,
    id: OnceLock<ObjectId>,
}

impl ShaFile {
    pub fn new(object: Object) -> Self {
        Self {
            object,
            raw: None,
            id: OnceLock::new(),
        }
    }

    /// Parse a payload without structural validation.
    pub fn from_raw(obj_type: ObjectType, payload: impl Into<Vec<u8>>) -> Result<Self, ObjectError> {
        let payload = payload.into();
        let object = Object::parse_content(obj_type, &payload)?;
        Ok(Self {
            object,
            raw: Some(payload),
            id: OnceLock::new(),
        })
    }

    /// Parse a payload that arrived in pieces.
    pub fn from_chunks<I, C>(obj_type: ObjectType, chunks: I) -> Result<Self, ObjectError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        let mut payload = Vec::new();
        for chunk in chunks {
            payload.extend_from_slice(chunk.as_ref());
        }
        Self::from_raw(obj_type, payload)
    }

    /// Validate a payload, then parse it.
    pub fn from_raw_checked(
        obj_type: ObjectType,
        payload: impl Into<Vec<u8>>,
    ) -> Result<Self, ObjectError> {
        let payload = payload.into();
        check(obj_type, &payload)?;
        Self::from_raw(obj_type, payload)
    }

    /// Parse a full `"<type> <size>\0<payload>"` envelope.
    pub fn parse_envelope(data: &[u8]) -> Result<Self, ObjectError> {
        let (obj_type, payload) = split_envelope(data)?;
        Self::from_raw(obj_type, payload)
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    /// Mutable access to the object. Invalidates the retained payload and
    /// the cached identity.
    pub fn object_mut(&mut self) -> &mut Object {
        self.invalidate();
        &mut self.object
    }

    pub fn into_object(self) -> Object {
        self.object
    }

    /// Replace the contents with a freshly parsed payload.
    ///
    /// On error the previous contents are kept.
    pub fn set_raw(&mut self, obj_type: ObjectType, payload: impl Into<Vec<u8>>) -> Result<(), ObjectError> {
        *self = Self::from_raw(obj_type, payload)?;
        Ok(())
    }

    fn invalidate(&mut self) {
        self.raw = None;
        self.id = OnceLock::new();
    }

    pub fn object_type(&self) -> ObjectType {
        self.object.object_type()
    }

    /// The payload: the retained raw bytes, or the serialized object.
    pub fn as_raw_bytes(&self) -> Cow<'_, [u8]> {
        match self.raw {
            Some(ref raw) => Cow::Borrowed(raw),
            None => Cow::Owned(self.object.serialize_content()),
        }
    }

    pub fn raw_length(&self) -> usize {
        match self.raw {
            Some(ref raw) => raw.len(),
            None => self.object.content_size(),
        }
    }

    /// The payload with its `"<type> <size>\0"` header.
    pub fn to_envelope(&self) -> Vec<u8> {
        let payload = self.as_raw_bytes();
        let mut out = write_header(self.object_type(), payload.len());
        out.extend_from_slice(&payload);
        out
    }

    /// SHA-1 of the envelope, computed once and cached.
    pub fn id(&self) -> Result<ObjectId, ObjectError> {
        if let Some(id) = self.id.get() {
            return Ok(*id);
        }
        let id = Hasher::hash_object(self.object_type().as_str(), &self.as_raw_bytes())?;
        Ok(*self.id.get_or_init(|| id))
    }

    /// Run the structural checks over the payload.
    pub fn check(&self) -> Result<(), ObjectError> {
        check(self.object_type(), &self.as_raw_bytes())
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self.object {
            Object::Blob(ref b) => Some(b),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self.object {
            Object::Tree(ref t) => Some(t),
            _ => None,
        }
    }

    pub fn as_commit(&self) -> Option<&Commit> {
        match self.object {
            Object::Commit(ref c) => Some(c),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self.object {
            Object::Tag(ref t) => Some(t),
            _ => None,
        }
    }

    /// The blob, or [`ObjectError::WrongKind`] naming this object.
    pub fn expect_blob(&self) -> Result<&Blob, ObjectError> {
        match self.as_blob() {
            Some(b) => Ok(b),
            None => Err(ObjectError::not_blob(self.id()?)),
        }
    }

    pub fn expect_tree(&self) -> Result<&Tree, ObjectError> {
        match self.as_tree() {
            Some(t) => Ok(t),
            None => Err(ObjectError::not_tree(self.id()?)),
        }
    }

    pub fn expect_commit(&self) -> Result<&Commit, ObjectError> {
        match self.as_commit() {
            Some(c) => Ok(c),
            None => Err(ObjectError::not_commit(self.id()?)),
        }
    }

    pub fn expect_tag(&self) -> Result<&Tag, ObjectError> {
        match self.as_tag() {
            Some(t) => Ok(t),
            None => Err(ObjectError::not_tag(self.id()?)),
        }
    }
}

/// Two objects are equal when their identities are: same type, same payload.
impl PartialEq for ShaFile {
    fn eq(&self, other: &Self) -> bool {
        self.object_type() == other.object_type() && self.as_raw_bytes() == other.as_raw_bytes()
    }
}

impl Eq for ShaFile {}

impl From<Object> for ShaFile {
    fn from(object: Object) -> Self {
        Self::new(object)
    }
}

impl From<Blob> for ShaFile {
    fn from(blob: Blob) -> Self {
        Self::new(Object::Blob(blob))
    }
}

impl From<Tree> for ShaFile {
    fn from(tree: Tree) -> Self {
        Self::new(Object::Tree(tree))
    }
}

impl From<Commit> for ShaFile {
    fn from(commit: Commit) -> Self {
        Self::new(Object::Commit(commit))
    }
}

impl From<Tag> for ShaFile {
    fn from(tag: Tag) -> Self {
        Self::new(Object::Tag(tag))
    }
}
