use bstr::{BStr, BString, ByteSlice};
use git_hash::ObjectId;

use crate::fields::{write_header, Headers};
use crate::{ObjectError, ObjectType, Signature};

const SIGNATURE_MARKERS: [&[u8]; 2] = [
    b"-----BEGIN PGP SIGNATURE-----",
    b"-----BEGIN SSH SIGNATURE-----",
];

/// A git annotated tag object.
///
/// The `object`, `type` and `tag` headers are `None` when absent; parsing
/// leaves their presence to [`crate::check_tag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// OID of the tagged object.
    pub target: Option<ObjectId>,
    /// Type of the tagged object.
    pub target_type: Option<ObjectType>,
    /// Tag name.
    pub tag_name: Option<BString>,
    /// Tagger identity and timestamp (optional for some old tags).
    pub tagger: Option<Signature>,
    /// Tag message, including any trailing signature block.
    pub message: BString,
}

impl Tag {
    /// Parse tag content from raw bytes (no object header).
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut tag = Self {
            target: None,
            target_type: None,
            tag_name: None,
            tagger: None,
            message: BString::default(),
        };

        let mut headers = Headers::new(content);
        for (key, value) in headers.by_ref() {
            match key {
                b"object" => tag.target = Some(ObjectId::from_hex(&*value)?),
                b"type" => tag.target_type = Some(ObjectType::from_bytes(&value)?),
                b"tag" => tag.tag_name = Some(BString::from(value.into_owned())),
                b"tagger" => tag.tagger = Some(Signature::parse(&value)?),
                _ => return Err(ObjectError::malformed_raw("unknown field in tag", key)),
            }
        }
        tag.message = BString::from(headers.message());
        Ok(tag)
    }

    /// Serialize tag content to bytes (no object header).
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();

        if let Some(ref target) = self.target {
            write_header(&mut out, b"object", target.to_hex().as_bytes());
        }
        if let Some(target_type) = self.target_type {
            write_header(&mut out, b"type", target_type.as_bytes());
        }
        if let Some(ref name) = self.tag_name {
            write_header(&mut out, b"tag", name);
        }
        if let Some(ref tagger) = self.tagger {
            write_header(&mut out, b"tagger", &tagger.to_bytes());
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    /// The tagged object as a `(type, id)` pair, if both headers are present.
    pub fn object(&self) -> Option<(ObjectType, ObjectId)> {
        Some((self.target_type?, self.target?))
    }

    pub fn set_object(&mut self, target_type: ObjectType, target: ObjectId) {
        self.target_type = Some(target_type);
        self.target = Some(target);
    }

    /// The trailing PGP or SSH signature block of the message, if any.
    ///
    /// The block stays part of `message`; it is not verified.
    pub fn signature(&self) -> Option<&BStr> {
        SIGNATURE_MARKERS
            .iter()
            .filter_map(|marker| self.message.find(marker))
            .min()
            .map(|start| self.message[start..].as_bstr())
    }

    /// The message without its trailing signature block.
    pub fn message_body(&self) -> &BStr {
        let end = self
            .signature()
            .map_or(self.message.len(), |sig| self.message.len() - sig.len());
        self.message[..end].as_bstr()
    }
}
