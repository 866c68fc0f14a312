//! Typed identifiers for accounts, sessions, and storage keys.
//!
//! All three wrap plain strings. A `SessionId` is *generated* as a random
//! UUID (v4, hyphenated) but is never parsed afterwards: whatever the storage
//! medium hands back is carried through untouched, so a legacy or foreign
//! value like `"abc123"` survives a lookup unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix prepended to the account id to form the storage key.
pub const SESSION_KEY_PREFIX: &str = "session-";

/// An analytics account identifier.
///
/// Supplied by the caller and not validated here. An empty or odd value just
/// yields a different storage key.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

/// An opaque session identifier, scoped to one account.
#[derive(Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

/// Key under which an account's session id is stored.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct StorageKey(String);

// ── AccountId ───────────────────────────────────────────────────────────────

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The storage key holding this account's session id.
    pub fn storage_key(&self) -> StorageKey {
        StorageKey::for_account(self)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({:?})", self.0)
    }
}

// ── SessionId ───────────────────────────────────────────────────────────────

impl SessionId {
    /// Generate a fresh random identifier (UUIDv4, lowercase hyphenated).
    ///
    /// No uniqueness registry is consulted.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters, for log lines only. Never a lookup key.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> String {
        id.0
    }
}

impl PartialEq<str> for SessionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SessionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.short())
    }
}

// ── StorageKey ──────────────────────────────────────────────────────────────

impl StorageKey {
    /// `"session-" + account id`. Injective over account ids.
    pub fn for_account(account: &AccountId) -> Self {
        Self(format!("{SESSION_KEY_PREFIX}{}", account.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageKey({:?})", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
