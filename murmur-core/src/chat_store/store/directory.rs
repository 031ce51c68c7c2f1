/*
    directory.rs - User directory

    Owns user records and the online-presence flag. Leaf component: no
    dependencies on the rest of the engine.

    Records are keyed internally by UserId with a secondary index from
    the identity provider's external id. Both maps live behind one lock
    because an upsert must check the index and insert the record as a
    unit.
*/

use crate::chat_store::model::{ExternalUserId, Timestamp, User, UserId};
use crate::chat_store::store::errors::{handle_poison, StoreResult};
use crate::metrics::{record_counter, record_gauge};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

#[derive(Default)]
struct DirectoryInner {
    users: HashMap<UserId, User>,
    by_external: HashMap<ExternalUserId, UserId>,
}

/// User records plus presence, upserted from the identity provider
pub struct UserDirectory {
    inner: RwLock<DirectoryInner>,
}

impl UserDirectory {
    pub fn new() -> Self {
        UserDirectory {
            inner: RwLock::new(DirectoryInner::default()),
        }
    }

    /// Sync a user from the identity provider. Inserts on first sight,
    /// otherwise refreshes profile fields; either way the user comes up
    /// online with `last_seen` refreshed. Idempotent, safe on every
    /// session start.
    pub fn upsert_user(
        &self,
        external_id: ExternalUserId,
        name: String,
        email: String,
        avatar_url: String,
    ) -> StoreResult<UserId> {
        self.upsert_user_at(external_id, name, email, avatar_url, Timestamp::now())
    }

    pub fn upsert_user_at(
        &self,
        external_id: ExternalUserId,
        name: String,
        email: String,
        avatar_url: String,
        now: Timestamp,
    ) -> StoreResult<UserId> {
        let mut inner = self.inner.write().map_err(handle_poison)?;

        if let Some(user_id) = inner.by_external.get(&external_id).cloned() {
            if let Some(user) = inner.users.get_mut(&user_id) {
                user.sync_profile(name, email, avatar_url, now);
            }
            debug!(user = %user_id, "refreshed user profile");
            record_counter("directory.users.upserted", 1);
            return Ok(user_id);
        }

        let user = User::new(external_id.clone(), name, email, avatar_url, now);
        let user_id = user.id.clone();
        inner.by_external.insert(external_id, user_id.clone());
        inner.users.insert(user_id.clone(), user);

        info!(user = %user_id, "created user");
        record_counter("directory.users.upserted", 1);
        record_gauge("directory.users.total", inner.users.len() as f64);
        Ok(user_id)
    }

    /// Flip the presence flag. Unknown users are a silent no-op: the
    /// disconnect handler can race with the first upsert.
    pub fn set_online_status(&self, external_id: &ExternalUserId, is_online: bool) -> StoreResult<()> {
        self.set_online_status_at(external_id, is_online, Timestamp::now())
    }

    pub fn set_online_status_at(
        &self,
        external_id: &ExternalUserId,
        is_online: bool,
        now: Timestamp,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(handle_poison)?;

        let Some(user_id) = inner.by_external.get(external_id).cloned() else {
            return Ok(());
        };
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.set_online(is_online, now);
            debug!(user = %user_id, is_online, "presence updated");
            record_counter("directory.presence.updates", 1);
        }
        Ok(())
    }

    /// Retrieve a user by internal id
    pub fn get(&self, user_id: &UserId) -> StoreResult<Option<User>> {
        let inner = self.inner.read().map_err(handle_poison)?;
        Ok(inner.users.get(user_id).cloned())
    }

    /// Retrieve a user by the identity provider's id
    pub fn get_by_external_id(&self, external_id: &ExternalUserId) -> StoreResult<Option<User>> {
        let inner = self.inner.read().map_err(handle_poison)?;
        let user = inner
            .by_external
            .get(external_id)
            .and_then(|id| inner.users.get(id))
            .cloned();
        Ok(user)
    }

    /// Everyone except the given user, sorted by display name. Feeds
    /// the "start a new conversation" picker.
    pub fn list_other_users(&self, excluding: &ExternalUserId) -> StoreResult<Vec<User>> {
        let inner = self.inner.read().map_err(handle_poison)?;
        let mut users: Vec<User> = inner
            .users
            .values()
            .filter(|u| &u.external_id != excluding)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    /// All users currently flagged online
    pub fn list_online_users(&self) -> StoreResult<Vec<User>> {
        let inner = self.inner.read().map_err(handle_poison)?;
        Ok(inner.users.values().filter(|u| u.is_online).cloned().collect())
    }

    /// True if the user id references a known record
    pub fn exists(&self, user_id: &UserId) -> StoreResult<bool> {
        let inner = self.inner.read().map_err(handle_poison)?;
        Ok(inner.users.contains_key(user_id))
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}
