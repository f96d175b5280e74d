use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use git_hash::ObjectId;
use git_object::{Object, ObjectType, ShaFile};
use tracing::debug;

use crate::codec::encode_loose;
use crate::{LooseError, LooseObjectStore};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

impl LooseObjectStore {
    /// Write an object to the loose store. Returns the OID.
    ///
    /// No-op if the object already exists (idempotent).
    /// The file is written atomically (temp file + rename).
    pub fn write(&self, file: &ShaFile) -> Result<ObjectId, LooseError> {
        let oid = file.id()?;

        // Skip if object already exists.
        if self.contains(&oid) {
            return Ok(oid);
        }

        // Ensure the fan-out directory exists.
        let final_path = self.object_path(&oid);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let compressed = encode_loose(file, self.compression_level)?;
        let tmp_path = write_to_temp(&self.objects_dir, &compressed)?;
        finalize_object(&tmp_path, &final_path)?;

        debug!(%oid, kind = %file.object_type(), size = file.raw_length(), "wrote loose object");
        Ok(oid)
    }

    /// Serialize and write an in-memory object.
    pub fn write_object(&self, obj: &Object) -> Result<ObjectId, LooseError> {
        self.write(&ShaFile::new(obj.clone()))
    }

    /// Write a payload of a known type. The payload must parse.
    pub fn write_raw(&self, obj_type: ObjectType, content: &[u8]) -> Result<ObjectId, LooseError> {
        self.write(&ShaFile::from_raw(obj_type, content)?)
    }
}

/// Write compressed bytes to a fresh temp file under `objects_dir`.
fn write_to_temp(objects_dir: &Path, compressed: &[u8]) -> Result<PathBuf, LooseError> {
    let tmp_path = objects_dir.join(format!(
        "tmp_obj_{}_{}",
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    fs::write(&tmp_path, compressed)?;

    // Loose objects are immutable once written.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o444))?;
    }

    Ok(tmp_path)
}

/// Atomically move a temp file to its final destination.
///
/// If the destination already exists (race with another writer), the temp file
/// is removed and the write is treated as successful.
fn finalize_object(tmp: &Path, final_path: &Path) -> Result<(), LooseError> {
    match fs::rename(tmp, final_path) {
        Ok(()) => Ok(()),
        Err(_) if final_path.exists() => {
            let _ = fs::remove_file(tmp);
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(tmp);
            Err(LooseError::Io(e))
        }
    }
}
