/*
    user.rs - User model

    A user record mirrors the profile supplied by the external identity
    provider, plus presence state owned by this engine. Records are
    upserted on every session start and never hard-deleted.
*/

use super::types::{ExternalUserId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A directory entry for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Internal id, stable for the lifetime of the record
    pub id: UserId,

    /// Identity-provider id this record is keyed by
    pub external_id: ExternalUserId,

    /// Display name (mutable, refreshed on every sync)
    pub name: String,

    /// Contact address
    pub email: String,

    /// Avatar reference
    pub avatar_url: String,

    /// Whether a session for this user is currently connected
    pub is_online: bool,

    /// Last time presence or profile was refreshed
    pub last_seen: Timestamp,
}

impl User {
    /// Create a freshly-synced user. New users come up online.
    pub fn new(
        external_id: ExternalUserId,
        name: String,
        email: String,
        avatar_url: String,
        now: Timestamp,
    ) -> Self {
        User {
            id: UserId::generate(),
            external_id,
            name,
            email,
            avatar_url,
            is_online: true,
            last_seen: now,
        }
    }

    /// Refresh mutable profile fields from the identity provider.
    /// The sync also counts as a presence signal.
    pub fn sync_profile(&mut self, name: String, email: String, avatar_url: String, now: Timestamp) {
        self.name = name;
        self.email = email;
        self.avatar_url = avatar_url;
        self.is_online = true;
        self.last_seen = now;
    }

    /// Flip the presence flag
    pub fn set_online(&mut self, is_online: bool, now: Timestamp) {
        self.is_online = is_online;
        self.last_seen = now;
    }
}
