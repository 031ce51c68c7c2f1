/*
    registry.rs - Conversation registry

    Creates and finds direct conversations and owns the membership rows
    (read cursor, typing flag) for every (conversation, user) pair.

    Locking: one RwLock per collection. Lock order is
    direct_index -> conversations -> members -> by_user; never acquire
    in the other direction. Conversation creation is the only multi-row
    invariant (one conversation + one member row per participant, at
    most one conversation per unordered pair) and is serialized by
    holding the direct_index writer across all dependent inserts, so
    two participants racing to start the same conversation resolve to a
    single winner and the loser gets the winner's id.
*/

use crate::chat_store::model::{
    Conversation, ConversationId, ConversationMember, MessageId, PairKey, Timestamp, UserId,
};
use crate::chat_store::store::directory::UserDirectory;
use crate::chat_store::store::errors::{handle_poison, StoreError, StoreResult};
use crate::metrics::record_counter;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// How long a stored typing flag stays trustworthy. Readers treat
/// anything older as "not typing", which makes the indicator
/// self-healing when a client never sends its stop event.
pub const TYPING_FRESHNESS_MS: u64 = 2000;

/// Conversation and membership state
pub struct ConversationRegistry {
    directory: Arc<UserDirectory>,
    direct_index: RwLock<HashMap<PairKey, ConversationId>>,
    conversations: RwLock<HashMap<ConversationId, Conversation>>,
    members: RwLock<HashMap<ConversationId, HashMap<UserId, ConversationMember>>>,
    by_user: RwLock<HashMap<UserId, Vec<ConversationId>>>,
}

impl ConversationRegistry {
    pub fn new(directory: Arc<UserDirectory>) -> Self {
        ConversationRegistry {
            directory,
            direct_index: RwLock::new(HashMap::new()),
            conversations: RwLock::new(HashMap::new()),
            members: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
        }
    }

    /// Find the direct conversation between two users, creating it on
    /// first contact. Argument order does not matter. Finding an
    /// existing conversation touches nothing: no new rows, no
    /// timestamp bump.
    pub fn find_or_create_direct(&self, a: &UserId, b: &UserId) -> StoreResult<ConversationId> {
        self.find_or_create_direct_at(a, b, Timestamp::now())
    }

    pub fn find_or_create_direct_at(
        &self,
        a: &UserId,
        b: &UserId,
        now: Timestamp,
    ) -> StoreResult<ConversationId> {
        if a == b {
            return Err(StoreError::Validation(
                "a direct conversation needs two distinct participants".to_string(),
            ));
        }
        for user in [a, b] {
            if !self.directory.exists(user)? {
                return Err(StoreError::NotFound(format!("user {user}")));
            }
        }

        let pair = PairKey::new(a.clone(), b.clone());

        // Fast path: pair already registered.
        if let Some(id) = self.direct_index.read().map_err(handle_poison)?.get(&pair) {
            record_counter("registry.conversations.reused", 1);
            return Ok(id.clone());
        }

        // Creation path. The index writer is held across the dependent
        // inserts; a racing creator blocks here and then takes the
        // fast path below.
        let mut index = self.direct_index.write().map_err(handle_poison)?;
        if let Some(id) = index.get(&pair) {
            record_counter("registry.conversations.reused", 1);
            return Ok(id.clone());
        }

        let conversation = Conversation::new_direct(ConversationId::generate(), &pair, now);
        let id = conversation.id.clone();

        {
            let mut conversations = self.conversations.write().map_err(handle_poison)?;
            conversations.insert(id.clone(), conversation);
        }
        {
            let mut members = self.members.write().map_err(handle_poison)?;
            let rows = members.entry(id.clone()).or_default();
            for user in [a, b] {
                rows.insert(
                    user.clone(),
                    ConversationMember::new(id.clone(), user.clone(), now),
                );
            }
        }
        {
            let mut by_user = self.by_user.write().map_err(handle_poison)?;
            for user in [a, b] {
                by_user.entry(user.clone()).or_default().push(id.clone());
            }
        }
        index.insert(pair, id.clone());

        info!(conversation = %id, a = %a, b = %b, "created direct conversation");
        record_counter("registry.conversations.created", 1);
        Ok(id)
    }

    /// Advance the member's read cursor to now. Missing memberships are
    /// a silent no-op; read marks are best-effort signals.
    pub fn mark_read(&self, conversation_id: &ConversationId, user_id: &UserId) -> StoreResult<()> {
        self.mark_read_at(conversation_id, user_id, Timestamp::now())
    }

    pub fn mark_read_at(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
        now: Timestamp,
    ) -> StoreResult<()> {
        let mut members = self.members.write().map_err(handle_poison)?;
        if let Some(member) = members
            .get_mut(conversation_id)
            .and_then(|rows| rows.get_mut(user_id))
        {
            member.last_read_at = now;
            debug!(conversation = %conversation_id, user = %user_id, "read cursor advanced");
            record_counter("registry.read_marks", 1);
        }
        Ok(())
    }

    /// Set the member's typing flag and refresh its staleness clock.
    /// Missing memberships are a silent no-op.
    pub fn set_typing(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
        is_typing: bool,
    ) -> StoreResult<()> {
        self.set_typing_at(conversation_id, user_id, is_typing, Timestamp::now())
    }

    pub fn set_typing_at(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
        is_typing: bool,
        now: Timestamp,
    ) -> StoreResult<()> {
        let mut members = self.members.write().map_err(handle_poison)?;
        if let Some(member) = members
            .get_mut(conversation_id)
            .and_then(|rows| rows.get_mut(user_id))
        {
            member.is_typing = is_typing;
            member.typing_updated_at = now;
            record_counter("registry.typing.updates", 1);
        }
        Ok(())
    }

    /// Members of the conversation, excluding the caller, whose typing
    /// flag is both set and fresh relative to `now`. Staleness is
    /// authoritative: a stored `true` older than the window reads as
    /// not typing. No background sweeper exists or is needed.
    pub fn list_typing_users(
        &self,
        conversation_id: &ConversationId,
        excluding: &UserId,
        now: Timestamp,
    ) -> StoreResult<Vec<UserId>> {
        let members = self.members.read().map_err(handle_poison)?;
        let Some(rows) = members.get(conversation_id) else {
            return Ok(Vec::new());
        };
        let typing = rows
            .values()
            .filter(|m| {
                &m.user_id != excluding
                    && m.is_typing
                    && now.millis_since(m.typing_updated_at) <= TYPING_FRESHNESS_MS
            })
            .map(|m| m.user_id.clone())
            .collect();
        Ok(typing)
    }

    /// Record a send against the conversation summary: move the
    /// denormalized last-message pointer and bump activity, then
    /// advance the sender's own cursor so their own message never
    /// counts as unread. The pointer only moves forward in sequence
    /// order, so a send that lost the append race cannot overwrite a
    /// newer pointer.
    pub(crate) fn record_send(
        &self,
        conversation_id: &ConversationId,
        sender_id: &UserId,
        message_id: &MessageId,
        sent_at: Timestamp,
        seq: u64,
    ) -> StoreResult<()> {
        {
            let mut conversations = self.conversations.write().map_err(handle_poison)?;
            let conversation = conversations
                .get_mut(conversation_id)
                .ok_or_else(|| StoreError::NotFound(format!("conversation {conversation_id}")))?;
            if seq > conversation.last_message_seq {
                conversation.last_message_id = Some(message_id.clone());
                conversation.last_message_seq = seq;
                conversation.updated_at = conversation.updated_at.max(sent_at);
            }
        }

        let mut members = self.members.write().map_err(handle_poison)?;
        if let Some(member) = members
            .get_mut(conversation_id)
            .and_then(|rows| rows.get_mut(sender_id))
        {
            member.last_read_at = member.last_read_at.max(sent_at);
        }
        Ok(())
    }

    pub fn get_conversation(&self, conversation_id: &ConversationId) -> StoreResult<Option<Conversation>> {
        let conversations = self.conversations.read().map_err(handle_poison)?;
        Ok(conversations.get(conversation_id).cloned())
    }

    pub fn conversation_exists(&self, conversation_id: &ConversationId) -> StoreResult<bool> {
        let conversations = self.conversations.read().map_err(handle_poison)?;
        Ok(conversations.contains_key(conversation_id))
    }

    /// Membership row for one (conversation, user) pair
    pub fn member(
        &self,
        conversation_id: &ConversationId,
        user_id: &UserId,
    ) -> StoreResult<Option<ConversationMember>> {
        let members = self.members.read().map_err(handle_poison)?;
        Ok(members
            .get(conversation_id)
            .and_then(|rows| rows.get(user_id))
            .cloned())
    }

    /// All membership rows of a conversation
    pub fn members_of(&self, conversation_id: &ConversationId) -> StoreResult<Vec<ConversationMember>> {
        let members = self.members.read().map_err(handle_poison)?;
        Ok(members
            .get(conversation_id)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    /// Ids of every conversation the user belongs to
    pub fn conversations_for_user(&self, user_id: &UserId) -> StoreResult<Vec<ConversationId>> {
        let by_user = self.by_user.read().map_err(handle_poison)?;
        Ok(by_user.get(user_id).cloned().unwrap_or_default())
    }
}
