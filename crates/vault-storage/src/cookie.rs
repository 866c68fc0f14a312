//! Cookie codec: `Cookie` header parsing, `Set-Cookie` serialization, and
//! the default attribute policy applied to every cookie a jar writes.
//!
//! Only the subset a session cookie needs is supported: `Path`, `Expires`,
//! `Max-Age`, `SameSite`, `Secure`. `Domain` and `HttpOnly` are ignored on
//! parse and never emitted (a script-readable, host-only cookie).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// IMF-fixdate, the `Expires` format browsers emit.
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parse a `Cookie` header (or a browser's cookie string) into name → value.
///
/// Pairs are split on `;` and at the first `=`. Pairs without `=` or with an
/// empty name are skipped. Double quotes around a value are stripped. When
/// a name repeats, the first occurrence wins: browsers list the cookie with
/// the most specific path first.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for pair in header.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let value = unquote(value.trim());
        cookies
            .entry(name.to_string())
            .or_insert_with(|| value.to_string());
    }
    cookies
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Check a cookie name the way a user agent does (RFC 6265bis): anything
/// but `;`, `=` and control characters.
///
/// Surrounding whitespace is refused too, since the header parser trims it
/// and the cookie could never be found again under the same name.
pub fn validate_name(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::rejected("empty cookie name"));
    }
    if name.trim() != name {
        return Err(StorageError::rejected(format!(
            "cookie name {name:?} has surrounding whitespace"
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_control() || matches!(c, ';' | '='))
    {
        return Err(StorageError::rejected(format!(
            "cookie name {name:?} contains {c:?}"
        )));
    }
    Ok(())
}

/// Check a cookie value against the RFC 6265 cookie-octet grammar.
pub fn validate_value(value: &str) -> StorageResult<()> {
    if let Some(c) = value
        .chars()
        .find(|c| !c.is_ascii_graphic() || matches!(c, '"' | ',' | ';' | '\\'))
    {
        return Err(StorageError::rejected(format!(
            "cookie value {value:?} contains {c:?}"
        )));
    }
    Ok(())
}

// ── SameSite ────────────────────────────────────────────────────────────────

/// The `SameSite` cookie attribute.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

// ── SetCookie ───────────────────────────────────────────────────────────────

/// One cookie as written by a `Set-Cookie` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    /// Seconds; takes precedence over `expires`.
    pub max_age: Option<i64>,
    pub same_site: Option<SameSite>,
    pub secure: bool,
}

impl SetCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            expires: None,
            max_age: None,
            same_site: None,
            secure: false,
        }
    }

    /// Parse a `Set-Cookie` header value.
    ///
    /// Attribute names are case-insensitive, unknown attributes are ignored,
    /// and an unparseable `Expires` is dropped (the cookie becomes a session
    /// cookie), matching what browsers do.
    pub fn parse(header: &str) -> StorageResult<Self> {
        let mut parts = header.split(';');
        let first = parts.next().unwrap_or_default();
        let (name, value) = first
            .split_once('=')
            .ok_or_else(|| StorageError::rejected(format!("no name=value in {header:?}")))?;
        let name = name.trim();
        validate_name(name)?;
        let mut cookie = SetCookie::new(name, unquote(value.trim()));

        for attr in parts {
            let (key, val) = match attr.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (attr.trim(), ""),
            };
            match key.to_ascii_lowercase().as_str() {
                "path" => {
                    // Anything but an absolute path means the default path.
                    if val.starts_with('/') {
                        cookie.path = Some(val.to_string());
                    }
                }
                "expires" => cookie.expires = parse_expires(val),
                "max-age" => {
                    if let Ok(secs) = val.parse::<i64>() {
                        cookie.max_age = Some(secs);
                    }
                }
                "samesite" => cookie.same_site = SameSite::from_str(val).ok(),
                "secure" => cookie.secure = true,
                _ => {}
            }
        }
        Ok(cookie)
    }

    /// Absolute expiry of this cookie if it was received at `received`.
    ///
    /// `None` means a browser-session cookie.
    pub fn expiry(&self, received: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.max_age {
            Some(secs) => Some(
                Duration::try_seconds(secs)
                    .and_then(|d| received.checked_add_signed(d))
                    .unwrap_or(if secs > 0 {
                        DateTime::<Utc>::MAX_UTC
                    } else {
                        DateTime::<Utc>::MIN_UTC
                    }),
            ),
            None => self.expires,
        }
    }

    /// The effective path, defaulting to `/`.
    pub fn path_or_root(&self) -> &str {
        self.path.as_deref().unwrap_or("/")
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }
        if let Some(expires) = &self.expires {
            write!(f, "; Expires={}", expires.format(EXPIRES_FORMAT))?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        if let Some(same_site) = self.same_site {
            write!(f, "; SameSite={same_site}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

fn parse_expires(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, EXPIRES_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc2822(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        })
}

// ── CookieDefaults ──────────────────────────────────────────────────────────

/// Attribute policy a jar applies to every cookie it writes.
///
/// The default is a host-wide (`Path=/`), `SameSite=Lax`, non-secure
/// browser-session cookie.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CookieDefaults {
    pub path: String,
    pub same_site: SameSite,
    pub secure: bool,
    /// Cookie lifetime in seconds. `None` = expires with the browsing session.
    pub lifetime_secs: Option<u64>,
}

impl Default for CookieDefaults {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            same_site: SameSite::Lax,
            secure: false,
            lifetime_secs: None,
        }
    }
}

impl CookieDefaults {
    /// Reject a policy whose cookies a user agent would drop or mangle.
    ///
    /// `path` must be absolute with no `;` or control characters, and a
    /// lifetime of zero would expire the cookie on arrival.
    pub fn validate(&self) -> StorageResult<()> {
        if !self.path.starts_with('/') {
            return Err(StorageError::rejected(format!(
                "cookie path {:?} must start with '/'",
                self.path
            )));
        }
        if let Some(c) = self.path.chars().find(|c| c.is_control() || *c == ';') {
            return Err(StorageError::rejected(format!(
                "cookie path {:?} contains {c:?}",
                self.path
            )));
        }
        if self.lifetime_secs == Some(0) {
            return Err(StorageError::rejected("cookie lifetime must be positive"));
        }
        Ok(())
    }

    /// Build the `Set-Cookie` for `name=value` written at `now`.
    ///
    /// `SameSite=None` is only honored on secure cookies, so it forces `Secure`.
    pub fn cookie(&self, name: &str, value: &str, now: DateTime<Utc>) -> StorageResult<SetCookie> {
        self.validate()?;
        validate_name(name)?;
        validate_value(value)?;

        let expires = match self.lifetime_secs {
            Some(secs) => Some(
                i64::try_from(secs)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .and_then(|d| now.checked_add_signed(d))
                    .ok_or_else(|| {
                        StorageError::rejected(format!("cookie lifetime {secs}s out of range"))
                    })?,
            ),
            None => None,
        };

        Ok(SetCookie {
            name: name.to_string(),
            value: value.to_string(),
            path: Some(self.path.clone()),
            expires,
            max_age: None,
            same_site: Some(self.same_site),
            secure: self.secure || self.same_site == SameSite::None,
        })
    }
}
