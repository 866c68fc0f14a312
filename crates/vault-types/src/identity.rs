//! Session identity lookup results.

use serde::{Deserialize, Serialize};

use crate::ids::{AccountId, SessionId, StorageKey};

/// How a session id was obtained.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionOrigin {
    /// Read back from the storage medium.
    Restored,
    /// Generated and handed to the storage medium.
    Created,
    /// Generated while storage failed; nothing was persisted.
    Unpersisted,
}

/// One session id lookup for one account.
///
/// Ephemeral: built per request, never destroyed explicitly. The backing
/// storage entry expires by the medium's own policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionIdentity {
    pub account_id: AccountId,
    pub session_id: SessionId,
    #[serde(skip)]
    pub storage_key: StorageKey,
    pub origin: SessionOrigin,
}

impl SessionIdentity {
    pub fn new(account_id: AccountId, session_id: SessionId, origin: SessionOrigin) -> Self {
        let storage_key = account_id.storage_key();
        Self {
            account_id,
            session_id,
            storage_key,
            origin,
        }
    }

    /// Whether the id can be expected on the next lookup.
    pub fn is_persisted(&self) -> bool {
        !matches!(self.origin, SessionOrigin::Unpersisted)
    }
}
