//! Client-side storage media for vault session identifiers.
//!
//! Everything a session provider persists goes through [`SessionStore`]:
//! `read` all visible entries, `write` one entry. The adapters here decide
//! how that is stored and which cookie attributes apply.
//!
//! |-------------------|------------------------------------------------|
//! | Adapter           | Medium                                         |
//! |-------------------|------------------------------------------------|
//! | [`CookieJar`]     | In-memory cookie jar, `Set-Cookie` round trip  |
//! | [`FileJar`]       | Cookie jar persisted as JSON on disk           |
//! | [`MemoryStore`]   | Plain map, no cookie rules                     |
//! | [`DisabledStore`] | Always fails (blocked / sandboxed storage)     |
//! |-------------------|------------------------------------------------|

pub mod cookie;
pub mod error;
pub mod file_jar;
pub mod jar;
pub mod store;

pub use cookie::{CookieDefaults, SameSite, SetCookie, parse_cookie_header};
pub use error::{StorageError, StorageResult};
pub use file_jar::FileJar;
pub use jar::{CookieJar, StoredCookie};
pub use store::{DisabledStore, MemoryStore, SessionStore};
