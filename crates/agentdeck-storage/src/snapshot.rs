//! Snapshot storage - whole collections serialized under a fixed key.

use crate::{SimpleStorage, define_simple_storage};
use anyhow::Result;

define_simple_storage! {
    /// Keyed blob storage; each key holds one complete serialized collection.
    pub struct SnapshotStorage { table: "snapshots" }
}

impl SnapshotStorage {
    /// Replace the blob under `key` with the output of `apply` atomically.
    ///
    /// `apply` sees the current blob (if any). Returning an error aborts the
    /// write and leaves the previous blob in place.
    pub fn replace_with<F>(&self, key: &str, apply: F) -> Result<()>
    where
        F: FnOnce(Option<&[u8]>) -> Result<Vec<u8>>,
    {
        self.modify_raw(key, |current| apply(current).map(Some))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redb::Database;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn setup() -> (SnapshotStorage, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = SnapshotStorage::new(db).unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_replace_with_sees_previous_blob() {
        let (storage, _temp_dir) = setup();

        storage
            .replace_with("key", |current| {
                assert!(current.is_none());
                Ok(b"[1]".to_vec())
            })
            .unwrap();
        storage
            .replace_with("key", |current| {
                assert_eq!(current, Some(&b"[1]"[..]));
                Ok(b"[1,2]".to_vec())
            })
            .unwrap();

        assert_eq!(storage.get_raw("key").unwrap().unwrap(), b"[1,2]");
    }

    #[test]
    fn test_replace_with_error_keeps_blob() {
        let (storage, _temp_dir) = setup();
        storage.put_raw("key", b"[1]").unwrap();

        let result = storage.replace_with("key", |_| Err(anyhow::anyhow!("rejected")));
        assert!(result.is_err());
        assert_eq!(storage.get_raw("key").unwrap().unwrap(), b"[1]");
    }

    #[test]
    fn test_data_survives_reopen() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        {
            let db = Arc::new(Database::create(&db_path).unwrap());
            let storage = SnapshotStorage::new(db).unwrap();
            storage.put_raw("key", b"persisted").unwrap();
        }

        let db = Arc::new(Database::create(&db_path).unwrap());
        let storage = SnapshotStorage::new(db).unwrap();
        assert_eq!(storage.get_raw("key").unwrap().unwrap(), b"persisted");
    }
}
