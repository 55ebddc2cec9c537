//! In-memory `KvStore` fake.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{StateError, StateResult};
use crate::store::KvStore;

/// Map-backed store. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys ever written.
    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> StateResult<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|e| StateError::Read(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StateResult<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| StateError::Write(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_slots() {
        let store = MemoryStore::new();
        let clone = store.clone();
        assert!(store.is_empty());

        clone.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_key_reads_none() {
        assert_eq!(MemoryStore::new().get("nope").unwrap(), None);
    }
}
