/*
    message_log.rs - Append-only per-conversation message history

    One vector per conversation behind a RwLock. Appends assign a
    strictly-increasing per-conversation sequence number and clamp the
    timestamp to the previous message's, so the stored order is always
    the total order (created_at, seq) and the feed reads back
    non-decreasing even if the wall clock steps backwards.

    The append path releases the message lock before touching the
    registry; the sequence-guarded pointer update in record_send keeps
    the denormalized summary correct under concurrent sends without a
    cross-collection lock.
*/

use crate::chat_store::model::{ConversationId, Message, MessageId, Timestamp, UserId};
use crate::chat_store::store::errors::{handle_poison, StoreError, StoreResult};
use crate::chat_store::store::registry::ConversationRegistry;
use crate::metrics::record_counter;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Append-only message history
pub struct MessageLog {
    registry: Arc<ConversationRegistry>,
    messages: RwLock<HashMap<ConversationId, Vec<Message>>>,
}

impl MessageLog {
    pub fn new(registry: Arc<ConversationRegistry>) -> Self {
        MessageLog {
            registry,
            messages: RwLock::new(HashMap::new()),
        }
    }

    /// Append a message. One logical unit: the insert, the
    /// conversation's last-message pointer and activity bump, and the
    /// advance of the sender's own read cursor. Other members' cursors
    /// are untouched, which is exactly what makes the message unread
    /// for them.
    pub fn append(
        &self,
        conversation_id: &ConversationId,
        sender_id: &UserId,
        content: &str,
    ) -> StoreResult<MessageId> {
        self.append_at(conversation_id, sender_id, content, Timestamp::now())
    }

    pub fn append_at(
        &self,
        conversation_id: &ConversationId,
        sender_id: &UserId,
        content: &str,
        now: Timestamp,
    ) -> StoreResult<MessageId> {
        let content = content.trim();
        if content.is_empty() {
            record_counter("log.messages.rejected", 1);
            return Err(StoreError::Validation(
                "message content must not be empty".to_string(),
            ));
        }
        if !self.registry.conversation_exists(conversation_id)? {
            record_counter("log.messages.rejected", 1);
            return Err(StoreError::NotFound(format!(
                "conversation {conversation_id}"
            )));
        }
        if self.registry.member(conversation_id, sender_id)?.is_none() {
            record_counter("log.messages.rejected", 1);
            return Err(StoreError::NotFound(format!(
                "user {sender_id} is not a member of conversation {conversation_id}"
            )));
        }

        let (message_id, created_at, seq) = {
            let mut messages = self.messages.write().map_err(handle_poison)?;
            let log = messages.entry(conversation_id.clone()).or_default();
            let created_at = match log.last() {
                Some(last) => now.max(last.created_at),
                None => now,
            };
            let seq = log.last().map(|m| m.seq + 1).unwrap_or(1);
            let message = Message::new(
                conversation_id.clone(),
                sender_id.clone(),
                content.to_string(),
                created_at,
                seq,
            );
            let id = message.id.clone();
            log.push(message);
            (id, created_at, seq)
        };

        // Append is all-or-nothing: if the summary update cannot land
        // (a poisoned registry lock), the row must not stay visible
        // with a stale last-message pointer. Roll it back and surface
        // the retryable failure.
        if let Err(err) =
            self.registry
                .record_send(conversation_id, sender_id, &message_id, created_at, seq)
        {
            let mut messages = self.messages.write().map_err(handle_poison)?;
            if let Some(log) = messages.get_mut(conversation_id) {
                log.retain(|m| m.id != message_id);
            }
            record_counter("log.messages.rejected", 1);
            return Err(err);
        }

        debug!(conversation = %conversation_id, sender = %sender_id, message = %message_id, "message appended");
        record_counter("log.messages.appended", 1);
        Ok(message_id)
    }

    /// Full history of a conversation, ascending by (created_at, seq)
    pub fn list_for_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> StoreResult<Vec<Message>> {
        if !self.registry.conversation_exists(conversation_id)? {
            return Err(StoreError::NotFound(format!(
                "conversation {conversation_id}"
            )));
        }
        let messages = self.messages.read().map_err(handle_poison)?;
        Ok(messages.get(conversation_id).cloned().unwrap_or_default())
    }

    /// Messages strictly newer than the cursor. The scan is bounded by
    /// the conversation's own history, never by global message volume.
    pub fn count_after(
        &self,
        conversation_id: &ConversationId,
        cursor: Timestamp,
    ) -> StoreResult<usize> {
        let messages = self.messages.read().map_err(handle_poison)?;
        let count = messages
            .get(conversation_id)
            .map(|log| log.iter().filter(|m| m.created_at > cursor).count())
            .unwrap_or(0);
        Ok(count)
    }

    /// Look up one message. Scans from the tail since callers mostly
    /// resolve the conversation's last-message pointer.
    pub fn get_message(
        &self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
    ) -> StoreResult<Option<Message>> {
        let messages = self.messages.read().map_err(handle_poison)?;
        Ok(messages
            .get(conversation_id)
            .and_then(|log| log.iter().rev().find(|m| &m.id == message_id))
            .cloned())
    }
}
