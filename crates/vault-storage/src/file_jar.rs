//! Cookie jar persisted to a JSON file.
//!
//! Lets a session id outlive the process, the way a browser's cookie store
//! outlives a page load. The file is re-read on every operation so that
//! separate processes sharing a jar see each other's writes.
//!
//! Writers serialize on an exclusive advisory lock held on a sibling
//! `<jar>.lock` file for the whole load, modify and save cycle, so writes for
//! different accounts never drop each other. Readers take no lock: each save
//! replaces the jar atomically from a uniquely named temp file.
//!
//! ```json
//! {"cookies":[{"name":"session-acct1","value":"…","path":"/","expires":"2026-…Z"}]}
//! ```

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::cookie::{CookieDefaults, parse_cookie_header};
use crate::error::{StorageError, StorageResult};
use crate::jar::{JarState, StoredCookie};
use crate::store::SessionStore;

/// A cookie jar backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileJar {
    path: PathBuf,
    defaults: CookieDefaults,
}

impl FileJar {
    /// Point a jar at `path`. Nothing is touched until the first read/write.
    pub fn open(path: impl Into<PathBuf>, defaults: CookieDefaults) -> Self {
        Self {
            path: path.into(),
            defaults,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Live cookies at `now`.
    pub fn cookies_at(&self, now: DateTime<Utc>) -> StorageResult<Vec<StoredCookie>> {
        let mut state = self.load()?;
        state.prune(now);
        Ok(state.cookies)
    }

    /// Remove the jar file. A missing file is not an error.
    pub fn clear(&self) -> StorageResult<()> {
        let _lock = self.lock()?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "cookie jar cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    /// Block until this process holds the jar's writer lock.
    ///
    /// The lock file is never deleted, so every writer locks the same inode.
    /// The lock is released when the returned handle is dropped.
    fn lock(&self) -> StorageResult<File> {
        self.create_parent()?;
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        let lock_path = PathBuf::from(name);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StorageError::io(&lock_path, e))?;
        file.lock_exclusive()
            .map_err(|e| StorageError::io(&lock_path, e))?;
        Ok(file)
    }

    fn create_parent(&self) -> StorageResult<()> {
        if let Some(parent) = self.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        Ok(())
    }

    fn parent(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn load(&self) -> StorageResult<JarState> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(JarState::default()),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JarState::default());
        }
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Write a uniquely named temp file in the jar's directory and rename it
    /// over the jar, so readers never see a half-written file.
    fn save(&self, state: &JarState) -> StorageResult<()> {
        self.create_parent()?;
        let json = serde_json::to_vec_pretty(state).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let dir = self.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
        tmp.write_all(&json)
            .map_err(|e| StorageError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StorageError::io(&self.path, e.error))?;
        Ok(())
    }
}

impl SessionStore for FileJar {
    fn read(&self) -> StorageResult<HashMap<String, String>> {
        let state = self.load()?;
        Ok(parse_cookie_header(&state.header(Utc::now())))
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let now = Utc::now();
        let cookie = self.defaults.cookie(key, value, now)?;
        let _lock = self.lock()?;
        let mut state = self.load()?;
        let pruned = state.prune(now);
        if pruned > 0 {
            tracing::trace!(pruned, path = %self.path.display(), "pruned expired cookies");
        }
        state.apply(&cookie, now);
        self.save(&state)
    }
}
