/*
    views.rs - Client-facing read models

    The projector composes the directory, registry, and log into
    denormalized views for display. It owns no state; every view is
    recomputed per request, so concurrent sends and read marks show up
    immediately on the next poll.

    Sender names are joined against the sender's current profile at
    read time: a rename deliberately relabels history rather than
    snapshotting the name at send time.
*/

use crate::chat_store::model::{
    ConversationId, ExternalUserId, Message, MessageId, Timestamp, User, UserId,
};
use crate::chat_store::store::{
    ConversationRegistry, MessageLog, StoreError, StoreResult, UserDirectory,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Profile snapshot of another participant, with presence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantView {
    pub user_id: UserId,
    pub name: String,
    pub avatar_url: String,
    pub is_online: bool,
}

/// Preview of the latest message, for sidebar rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePreview {
    pub content: String,
    pub created_at: Timestamp,
    pub sender_name: String,
}

/// One sidebar row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation_id: ConversationId,
    pub is_group: bool,
    pub name: Option<String>,
    pub other_participants: Vec<ParticipantView>,
    pub last_message: Option<MessagePreview>,
    pub unread_count: usize,
    pub updated_at: Timestamp,
}

/// One message in the feed, joined with the sender's current profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: MessageId,
    pub content: String,
    pub created_at: Timestamp,
    pub is_deleted: bool,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_avatar_url: String,
}

/// A member currently typing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingUser {
    pub user_id: UserId,
    pub name: String,
}

/// Stateless read-side composition over the three write components
pub struct ViewProjector {
    directory: Arc<UserDirectory>,
    registry: Arc<ConversationRegistry>,
    log: Arc<MessageLog>,
}

impl ViewProjector {
    pub fn new(
        directory: Arc<UserDirectory>,
        registry: Arc<ConversationRegistry>,
        log: Arc<MessageLog>,
    ) -> Self {
        ViewProjector {
            directory,
            registry,
            log,
        }
    }

    /// Sidebar conversation list, newest activity first. Unread counts
    /// are computed against the caller's own cursor on every call.
    pub fn list_conversations_for_user(
        &self,
        user_id: &UserId,
    ) -> StoreResult<Vec<ConversationSummary>> {
        if !self.directory.exists(user_id)? {
            return Err(StoreError::NotFound(format!("user {user_id}")));
        }

        let mut summaries = Vec::new();
        for conversation_id in self.registry.conversations_for_user(user_id)? {
            let Some(conversation) = self.registry.get_conversation(&conversation_id)? else {
                continue;
            };
            let Some(member) = self.registry.member(&conversation_id, user_id)? else {
                continue;
            };

            let mut other_participants = Vec::new();
            for other_id in conversation.other_participants(user_id) {
                if let Some(user) = self.directory.get(&other_id)? {
                    other_participants.push(ParticipantView {
                        user_id: user.id,
                        name: user.name,
                        avatar_url: user.avatar_url,
                        is_online: user.is_online,
                    });
                }
            }

            let last_message = match &conversation.last_message_id {
                Some(message_id) => self
                    .log
                    .get_message(&conversation_id, message_id)?
                    .map(|m| self.preview(m))
                    .transpose()?,
                None => None,
            };

            let unread_count = self.log.count_after(&conversation_id, member.last_read_at)?;

            summaries.push(ConversationSummary {
                conversation_id,
                is_group: conversation.is_group,
                name: conversation.name,
                other_participants,
                last_message,
                unread_count,
                updated_at: conversation.updated_at,
            });
        }

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    fn preview(&self, message: Message) -> StoreResult<MessagePreview> {
        let sender_name = self
            .directory
            .get(&message.sender_id)?
            .map(|u| u.name)
            .unwrap_or_default();
        Ok(MessagePreview {
            content: message.content,
            created_at: message.created_at,
            sender_name,
        })
    }

    /// Everyone except the caller for the new-conversation picker,
    /// case-insensitively filtered on display name when a search term
    /// is present, name-ascending otherwise.
    pub fn list_users_for_sidebar(
        &self,
        caller: &ExternalUserId,
        search: Option<&str>,
    ) -> StoreResult<Vec<User>> {
        let users = self.directory.list_other_users(caller)?;
        let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(users);
        };
        let term = term.to_lowercase();
        Ok(users
            .into_iter()
            .filter(|u| u.name.to_lowercase().contains(&term))
            .collect())
    }

    /// Ordered message feed, each message joined with the sender's
    /// current name and avatar. Messages whose sender is missing from
    /// the directory are skipped.
    pub fn list_for_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> StoreResult<Vec<MessageView>> {
        let mut views = Vec::new();
        for message in self.log.list_for_conversation(conversation_id)? {
            let Some(sender) = self.directory.get(&message.sender_id)? else {
                continue;
            };
            views.push(MessageView {
                id: message.id,
                content: message.content,
                created_at: message.created_at,
                is_deleted: message.is_deleted,
                sender_id: sender.id,
                sender_name: sender.name,
                sender_avatar_url: sender.avatar_url,
            });
        }
        Ok(views)
    }

    /// Who else is typing in the conversation right now
    pub fn typing_for_conversation(
        &self,
        conversation_id: &ConversationId,
        caller: &UserId,
        now: Timestamp,
    ) -> StoreResult<Vec<TypingUser>> {
        let mut typing = Vec::new();
        for user_id in self
            .registry
            .list_typing_users(conversation_id, caller, now)?
        {
            if let Some(user) = self.directory.get(&user_id)? {
                typing.push(TypingUser {
                    user_id: user.id,
                    name: user.name,
                });
            }
        }
        Ok(typing)
    }
}
