//! Account and session identity types for vault.
//!
//! A leaf crate: no internal dependencies. The storage adapters and the
//! session provider both build on these types.
//!
//! # Relationships
//!
//! ```text
//! Account (AccountId) ← analytics tenant, opaque string from the caller
//!     └── derives StorageKey ("session-" + account id)
//!             └── maps to SessionId in the storage medium
//!
//! SessionIdentity ← one lookup result (account + key + id + origin)
//! ```
//!
//! # Key Types
//!
//! |-----------------------|---------------------------------------------|
//! | Type                  | Purpose                                     |
//! |-----------------------|---------------------------------------------|
//! | [`AccountId`]         | Which analytics account (never validated)   |
//! | [`SessionId`]         | Opaque per-account session token            |
//! | [`StorageKey`]        | Where the token lives in the storage medium |
//! | [`SessionIdentity`]   | Result of a lookup, with its origin         |
//! | [`SessionOrigin`]     | Restored, created, or unpersisted           |
//! |-----------------------|---------------------------------------------|

pub mod identity;
pub mod ids;

pub use identity::{SessionIdentity, SessionOrigin};
pub use ids::{AccountId, SESSION_KEY_PREFIX, SessionId, StorageKey};
