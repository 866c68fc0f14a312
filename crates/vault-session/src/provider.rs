//! Per-account session identity assignment.
//!
//! Read-or-create against the injected storage medium, failing open: any
//! storage failure yields a fresh identifier that is not persisted, so a
//! blocked cookie store costs session continuity and nothing else.

use vault_storage::{SessionStore, StorageError};
use vault_types::{AccountId, SessionId, SessionIdentity, SessionOrigin, StorageKey};

/// Hands out one stable session id per account per storage lifetime.
///
/// Stateless apart from the store: every call re-reads storage. Two first
/// calls racing for the same account may both generate and write; the last
/// write wins and each caller keeps the id it was given.
#[derive(Debug, Clone)]
pub struct SessionIdentityProvider<S> {
    store: S,
}

impl<S: SessionStore> SessionIdentityProvider<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The session id for `account`. Never fails.
    pub fn session_id(&self, account: &AccountId) -> SessionId {
        self.identify(account).session_id
    }

    /// Like [`session_id`](Self::session_id), also reporting where the id came from.
    pub fn identify(&self, account: &AccountId) -> SessionIdentity {
        let key = account.storage_key();
        let (session_id, origin) = match self.lookup_or_create(&key) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(
                    account = %account,
                    error = %e,
                    "session storage unreadable, using unpersisted id"
                );
                (SessionId::generate(), SessionOrigin::Unpersisted)
            }
        };
        SessionIdentity::new(account.clone(), session_id, origin)
    }

    /// Only a failed read is an error here. A failed write still returns the
    /// generated id, marked unpersisted.
    fn lookup_or_create(
        &self,
        key: &StorageKey,
    ) -> Result<(SessionId, SessionOrigin), StorageError> {
        let mut entries = self.store.read()?;
        if let Some(existing) = entries.remove(key.as_str()).filter(|v| !v.is_empty()) {
            return Ok((SessionId::from(existing), SessionOrigin::Restored));
        }

        let fresh = SessionId::generate();
        match self.store.write(key.as_str(), fresh.as_str()) {
            Ok(()) => {
                tracing::trace!(key = %key, session = fresh.short(), "new session id stored");
                Ok((fresh, SessionOrigin::Created))
            }
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "session id not persisted");
                Ok((fresh, SessionOrigin::Unpersisted))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use parking_lot::Mutex;
    use vault_storage::{CookieDefaults, CookieJar, DisabledStore, MemoryStore, StorageResult};

    /// Store whose reads succeed and whose writes always fail.
    #[derive(Default)]
    struct ReadOnlyStore {
        writes: Mutex<usize>,
    }

    impl SessionStore for ReadOnlyStore {
        fn read(&self) -> StorageResult<HashMap<String, String>> {
            Ok(HashMap::new())
        }

        fn write(&self, _key: &str, _value: &str) -> StorageResult<()> {
            *self.writes.lock() += 1;
            Err(StorageError::rejected("quota exceeded"))
        }
    }

    fn is_uuid(id: &SessionId) -> bool {
        uuid::Uuid::parse_str(id.as_str()).is_ok()
    }

    #[test]
    fn repeated_lookups_are_stable() {
        let provider = SessionIdentityProvider::new(MemoryStore::new());
        let account = AccountId::from("acct1");
        let first = provider.session_id(&account);
        let second = provider.session_id(&account);
        assert_eq!(first, second);
    }

    #[test]
    fn existing_entry_returned_unchanged() {
        let store = MemoryStore::with_entries([("session-acct1", "abc123")]);
        let provider = SessionIdentityProvider::new(&store);
        let identity = provider.identify(&AccountId::from("acct1"));
        assert_eq!(identity.session_id, "abc123");
        assert_eq!(identity.origin, SessionOrigin::Restored);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("session-acct1").as_deref(), Some("abc123"));
    }

    #[test]
    fn empty_storage_generates_and_stores() {
        let store = MemoryStore::new();
        let provider = SessionIdentityProvider::new(&store);
        let identity = provider.identify(&AccountId::from("acct1"));
        assert!(is_uuid(&identity.session_id));
        assert_eq!(identity.origin, SessionOrigin::Created);
        assert_eq!(
            store.get("session-acct1").as_deref(),
            Some(identity.session_id.as_str())
        );
    }

    #[test]
    fn empty_stored_value_counts_as_absent() {
        let store = MemoryStore::with_entries([("session-acct1", "")]);
        let provider = SessionIdentityProvider::new(&store);
        let id = provider.session_id(&AccountId::from("acct1"));
        assert!(is_uuid(&id));
        assert_eq!(store.get("session-acct1").as_deref(), Some(id.as_str()));
    }

    #[test]
    fn accounts_get_independent_ids() {
        let store = MemoryStore::new();
        let provider = SessionIdentityProvider::new(&store);
        let a = provider.session_id(&AccountId::from("acct1"));
        let b = provider.session_id(&AccountId::from("acct2"));
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn failing_read_falls_back_without_persisting() {
        let provider = SessionIdentityProvider::new(DisabledStore::default());
        let account = AccountId::from("acct1");
        let first = provider.identify(&account);
        let second = provider.identify(&account);
        assert!(is_uuid(&first.session_id));
        assert!(is_uuid(&second.session_id));
        assert_ne!(first.session_id, second.session_id);
        assert_eq!(first.origin, SessionOrigin::Unpersisted);
    }

    #[test]
    fn failing_write_still_returns_generated_id() {
        let store = ReadOnlyStore::default();
        let provider = SessionIdentityProvider::new(&store);
        let identity = provider.identify(&AccountId::from("acct1"));
        assert!(is_uuid(&identity.session_id));
        assert_eq!(identity.origin, SessionOrigin::Unpersisted);
        assert_eq!(*store.writes.lock(), 1);
    }

    #[test]
    fn invalid_cookie_name_degrades_to_unpersisted() {
        let provider = SessionIdentityProvider::new(CookieJar::default());
        let account = AccountId::from("acct;1");
        let identity = provider.identify(&account);
        assert_eq!(identity.origin, SessionOrigin::Unpersisted);
        assert!(provider.store().cookies().is_empty());
    }

    #[test]
    fn spaced_and_non_ascii_accounts_persist() {
        let provider = SessionIdentityProvider::new(CookieJar::default());
        for raw in ["acct 1", "kontö"] {
            let account = AccountId::from(raw);
            let first = provider.identify(&account);
            assert_eq!(first.origin, SessionOrigin::Created, "{raw:?}");
            let second = provider.identify(&account);
            assert_eq!(second.origin, SessionOrigin::Restored, "{raw:?}");
            assert_eq!(second.session_id, first.session_id);
        }
    }

    #[test]
    fn zero_lifetime_jar_reports_unpersisted() {
        let provider = SessionIdentityProvider::new(CookieJar::new(CookieDefaults {
            lifetime_secs: Some(0),
            ..CookieDefaults::default()
        }));
        let identity = provider.identify(&AccountId::from("acct1"));
        assert_eq!(identity.origin, SessionOrigin::Unpersisted);
        assert!(provider.store().cookies().is_empty());
    }

    #[test]
    fn cookie_jar_round_trip() {
        let provider = SessionIdentityProvider::new(CookieJar::default());
        let account = AccountId::from("9b63c4d8");
        let id = provider.session_id(&account);
        assert_eq!(
            provider.store().cookie_header(),
            format!("session-9b63c4d8={id}")
        );
        assert_eq!(provider.session_id(&account), id);
    }

    #[test]
    fn clearing_storage_starts_new_session() {
        let provider = SessionIdentityProvider::new(MemoryStore::new());
        let account = AccountId::from("acct1");
        let before = provider.session_id(&account);
        provider.store().clear();
        let after = provider.session_id(&account);
        assert_ne!(before, after);
    }
}
