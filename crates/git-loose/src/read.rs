use std::fs;

use git_hash::ObjectId;
use git_object::{ObjectError, ObjectType, ShaFile};
use tracing::debug;

use crate::codec::decode_loose;
use crate::{LooseError, LooseObjectStore};

impl LooseObjectStore {
    /// Check if a loose object exists.
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Read a loose object by OID.
    ///
    /// Returns `Ok(None)` if the object does not exist and `Err` if it
    /// exists but is corrupt. The content is only re-hashed when
    /// verification on read is enabled.
    pub fn read(&self, oid: &ObjectId) -> Result<Option<ShaFile>, LooseError> {
        let file = match self.read_unverified(oid)? {
            Some(file) => file,
            None => return Ok(None),
        };
        if self.verify_on_read {
            verify(oid, &file)?;
        }
        Ok(Some(file))
    }

    /// Read a loose object and verify that it hashes to `oid`.
    ///
    /// A mismatch is reported as [`ObjectError::ChecksumMismatch`].
    pub fn read_verified(&self, oid: &ObjectId) -> Result<Option<ShaFile>, LooseError> {
        let file = match self.read_unverified(oid)? {
            Some(file) => file,
            None => return Ok(None),
        };
        verify(oid, &file)?;
        Ok(Some(file))
    }

    /// Read an object that must exist and be of kind `expected`.
    pub fn read_as(&self, oid: &ObjectId, expected: ObjectType) -> Result<ShaFile, LooseError> {
        let file = self
            .read(oid)?
            .ok_or(ObjectError::MissingObject { oid: *oid })?;
        if file.object_type() != expected {
            return Err(ObjectError::WrongKind { oid: *oid, expected }.into());
        }
        Ok(file)
    }

    fn read_unverified(&self, oid: &ObjectId) -> Result<Option<ShaFile>, LooseError> {
        let path = self.object_path(oid);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LooseError::Io(e)),
        };

        let file = decode_loose(&compressed)?;
        debug!(%oid, kind = %file.object_type(), size = file.raw_length(), "read loose object");
        Ok(Some(file))
    }
}

fn verify(oid: &ObjectId, file: &ShaFile) -> Result<(), LooseError> {
    let actual = file.id()?;
    if actual != *oid {
        debug!(expected = %oid, %actual, "loose object checksum mismatch");
        return Err(ObjectError::checksum_mismatch(
            oid.as_bytes(),
            actual.as_bytes(),
            Some("loose object".into()),
        )
        .into());
    }
    Ok(())
}
