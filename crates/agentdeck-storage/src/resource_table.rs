//! Resource row storage - byte-level API, one row per resource id.

use crate::{SimpleStorage, define_simple_storage};
use anyhow::Result;

define_simple_storage! {
    /// Row-level resource storage with byte-level API.
    pub struct ResourceTableStorage { table: "resources" }
}

impl ResourceTableStorage {
    /// Rewrite an existing row in one transaction.
    ///
    /// Returns false without writing when the row does not exist.
    pub fn update_raw_with<F>(&self, id: &str, apply: F) -> Result<bool>
    where
        F: FnOnce(&[u8]) -> Result<Vec<u8>>,
    {
        self.modify_raw(id, |current| match current {
            Some(bytes) => apply(bytes).map(Some),
            None => Ok(None),
        })
    }
}
