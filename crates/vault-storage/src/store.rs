//! The storage adapter interface and the two non-cookie media.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{StorageError, StorageResult};

/// A client-side key/value text store.
///
/// This is the whole capability a session provider needs: read every
/// visible entry, and set one entry. Path, lifetime, and security
/// attributes are the adapter's business, not the caller's.
pub trait SessionStore: Send + Sync {
    /// All entries currently visible in the medium.
    fn read(&self) -> StorageResult<HashMap<String, String>>;

    /// Set `key` to `value`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn read(&self) -> StorageResult<HashMap<String, String>> {
        (**self).read()
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Box<T> {
    fn read(&self) -> StorageResult<HashMap<String, String>> {
        (**self).read()
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn read(&self) -> StorageResult<HashMap<String, String>> {
        (**self).read()
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }
}

/// Plain in-memory map. No expiry, no cookie rules.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry, like a user clearing site data.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl SessionStore for MemoryStore {
    fn read(&self) -> StorageResult<HashMap<String, String>> {
        Ok(self.entries.lock().clone())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage that is switched off, e.g. cookies blocked or a sandboxed frame.
///
/// Every operation fails with [`StorageError::Unavailable`].
#[derive(Debug, Clone)]
pub struct DisabledStore {
    reason: String,
}

impl DisabledStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for DisabledStore {
    fn default() -> Self {
        Self::new("storage disabled")
    }
}

impl SessionStore for DisabledStore {
    fn read(&self) -> StorageResult<HashMap<String, String>> {
        Err(StorageError::unavailable(self.reason.clone()))
    }

    fn write(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_write_then_read() {
        let store = MemoryStore::new();
        store.write("session-a", "1").unwrap();
        store.write("session-a", "2").unwrap();
        let map = store.read().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["session-a"], "2");
    }

    #[test]
    fn memory_store_prepopulated_and_cleared() {
        let store = MemoryStore::with_entries([("session-acct1", "abc123")]);
        assert_eq!(store.get("session-acct1").as_deref(), Some("abc123"));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn disabled_store_always_fails() {
        let store = DisabledStore::new("sandboxed");
        assert!(matches!(store.read(), Err(StorageError::Unavailable(r)) if r == "sandboxed"));
        assert!(store.write("k", "v").is_err());
    }

    #[test]
    fn blanket_impls_forward() {
        let store = Arc::new(MemoryStore::new());
        let boxed: Box<dyn SessionStore> = Box::new(Arc::clone(&store));
        boxed.write("k", "v").unwrap();
        assert_eq!((&*store).read().unwrap()["k"], "v");
    }

    #[test]
    fn session_store_is_object_safe() {
        fn _accept(_s: &dyn SessionStore) {}
    }
}
