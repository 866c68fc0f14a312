//! # vault-session
//!
//! Per-account session identifiers for privacy-oriented web analytics.
//!
//! Each analytics account gets its own opaque session id, stored under
//! `"session-" + account id` in a client-side storage medium. Ids are never
//! shared across accounts, so sessions cannot be cross-referenced.
//!
//! ```
//! use vault_session::SessionIdentityProvider;
//! use vault_storage::CookieJar;
//! use vault_types::AccountId;
//!
//! let provider = SessionIdentityProvider::new(CookieJar::default());
//! let account = AccountId::from("9b63c4d8");
//! let first = provider.session_id(&account);
//! assert_eq!(provider.session_id(&account), first);
//! ```
//!
//! When storage is blocked the provider still answers, with a fresh id
//! each time that nothing remembers.

pub mod config;
pub mod provider;

pub use config::{ConfigError, VaultConfig};
pub use provider::SessionIdentityProvider;
