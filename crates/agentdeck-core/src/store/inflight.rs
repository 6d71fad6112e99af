//! Per-key mutation serialization.

use std::collections::HashSet;

use parking_lot::Mutex;

/// Keys with a mutation still waiting on the adapter.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    keys: Mutex<HashSet<String>>,
}

impl InFlight {
    /// Claim `key`, or `None` if another mutation already holds it.
    pub(crate) fn try_acquire(&self, key: String) -> Option<InFlightGuard<'_>> {
        if !self.keys.lock().insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard { owner: self, key })
    }

    pub(crate) fn id_key(id: &str) -> String {
        format!("id:{id}")
    }

    /// Names are claimed lower-cased so that case variants collide.
    pub(crate) fn name_key(name: &str) -> String {
        format!("name:{}", name.to_lowercase())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.keys.lock().len()
    }
}

/// Releases its key on drop, including when the holding future is dropped.
pub(crate) struct InFlightGuard<'a> {
    owner: &'a InFlight,
    key: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.keys.lock().remove(&self.key);
    }
}
