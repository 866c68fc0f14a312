//! In-memory cookie jar.
//!
//! Models a page's view of its cookie store: writes are `Set-Cookie`
//! strings, reads are the `Cookie` header string. The jar enforces expiry;
//! nothing above it does.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::cookie::{CookieDefaults, SetCookie, parse_cookie_header};
use crate::error::StorageResult;
use crate::store::SessionStore;

/// A cookie as held by a jar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    /// `None` = browser-session cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl StoredCookie {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }
}

/// Cookie list shared by [`CookieJar`] and [`crate::FileJar`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct JarState {
    #[serde(default)]
    pub(crate) cookies: Vec<StoredCookie>,
}

impl JarState {
    /// Apply one `Set-Cookie`, upserting by (name, path).
    ///
    /// A cookie that is already expired deletes the entry instead.
    pub(crate) fn apply(&mut self, cookie: &SetCookie, now: DateTime<Utc>) {
        let path = cookie.path_or_root().to_string();
        let expires = cookie.expiry(now);
        let existing = self
            .cookies
            .iter()
            .position(|c| c.name == cookie.name && c.path == path);

        if expires.is_some_and(|at| at <= now) {
            if let Some(idx) = existing {
                self.cookies.remove(idx);
            }
            return;
        }

        let stored = StoredCookie {
            name: cookie.name.clone(),
            value: cookie.value.clone(),
            path,
            expires,
        };
        match existing {
            Some(idx) => self.cookies[idx] = stored,
            None => self.cookies.push(stored),
        }
    }

    /// `name=value` pairs of live cookies, longest path first.
    pub(crate) fn header(&self, now: DateTime<Utc>) -> String {
        let mut live: Vec<&StoredCookie> =
            self.cookies.iter().filter(|c| !c.is_expired(now)).collect();
        live.sort_by_key(|c| Reverse(c.path.len()));
        live.iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Drop expired cookies. Returns how many were removed.
    pub(crate) fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.cookies.len();
        self.cookies.retain(|c| !c.is_expired(now));
        before - self.cookies.len()
    }
}

/// An in-memory cookie jar, scoped to one process ("page context").
#[derive(Debug, Default)]
pub struct CookieJar {
    state: Mutex<JarState>,
    defaults: CookieDefaults,
}

impl CookieJar {
    pub fn new(defaults: CookieDefaults) -> Self {
        Self {
            state: Mutex::new(JarState::default()),
            defaults,
        }
    }

    /// Store a cookie from a `Set-Cookie` string.
    pub fn set_cookie(&self, header: &str) -> StorageResult<()> {
        self.set_cookie_at(header, Utc::now())
    }

    pub fn set_cookie_at(&self, header: &str, now: DateTime<Utc>) -> StorageResult<()> {
        let cookie = SetCookie::parse(header)?;
        self.state.lock().apply(&cookie, now);
        Ok(())
    }

    /// The `Cookie` header string for live cookies.
    pub fn cookie_header(&self) -> String {
        self.cookie_header_at(Utc::now())
    }

    pub fn cookie_header_at(&self, now: DateTime<Utc>) -> String {
        self.state.lock().header(now)
    }

    /// Snapshot of every stored cookie, expired ones included.
    pub fn cookies(&self) -> Vec<StoredCookie> {
        self.state.lock().cookies.clone()
    }

    pub fn clear(&self) {
        self.state.lock().cookies.clear();
    }
}

impl SessionStore for CookieJar {
    fn read(&self) -> StorageResult<HashMap<String, String>> {
        Ok(parse_cookie_header(&self.cookie_header()))
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let now = Utc::now();
        let cookie = self.defaults.cookie(key, value, now)?;
        self.set_cookie_at(&cookie.to_string(), now)
    }
}
