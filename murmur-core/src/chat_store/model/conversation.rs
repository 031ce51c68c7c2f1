/*
    conversation.rs - Conversation and membership models

    A conversation is shared state: the participant set, the
    denormalized last-message pointer, and the activity timestamp.
    Per-user state (read cursor, typing flag) lives on
    ConversationMember, one row per (conversation, user), so members
    never contend on each other's cursors.

    Invariant: at most one non-group conversation exists per unordered
    participant pair. PairKey is the canonical encoding used to enforce
    that at creation time.
*/

use super::types::{ConversationId, MessageId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Canonical order-independent key for a direct-conversation pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey(UserId, UserId);

impl PairKey {
    /// Build the canonical key: the lexicographically smaller id first,
    /// so (a, b) and (b, a) map to the same key.
    pub fn new(a: UserId, b: UserId) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    pub fn users(&self) -> (&UserId, &UserId) {
        (&self.0, &self.1)
    }
}

/// Conversation metadata shared by all participants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation id
    pub id: ConversationId,

    /// Participant user ids. Exactly two entries for direct
    /// conversations; kept as an ordered set so group support does not
    /// require a storage migration.
    pub participants: Vec<UserId>,

    /// Denormalized pointer to the latest message. A cache for list
    /// rendering; the message log remains the source of truth.
    pub last_message_id: Option<MessageId>,

    /// Sequence number of the message behind `last_message_id`. Guards
    /// the pointer against out-of-order updates from concurrent sends.
    pub last_message_seq: u64,

    /// Last activity (creation or latest send)
    pub updated_at: Timestamp,

    /// Group flag; the creation path only produces direct conversations
    pub is_group: bool,

    /// Display name, group conversations only
    pub name: Option<String>,
}

impl Conversation {
    /// Create a direct conversation between two users
    pub fn new_direct(id: ConversationId, pair: &PairKey, now: Timestamp) -> Self {
        let (a, b) = pair.users();
        Conversation {
            id,
            participants: vec![a.clone(), b.clone()],
            last_message_id: None,
            last_message_seq: 0,
            updated_at: now,
            is_group: false,
            name: None,
        }
    }

    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// Everyone except the given user
    pub fn other_participants(&self, user_id: &UserId) -> Vec<UserId> {
        self.participants
            .iter()
            .filter(|p| *p != user_id)
            .cloned()
            .collect()
    }
}

/// Per-user per-conversation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMember {
    pub conversation_id: ConversationId,
    pub user_id: UserId,

    /// Read cursor: messages at or before this instant are read
    pub last_read_at: Timestamp,

    /// Typing flag as last reported by the owning client
    pub is_typing: bool,

    /// When the typing flag was last refreshed. Readers treat flags
    /// older than the freshness window as "not typing" regardless of
    /// the stored value.
    pub typing_updated_at: Timestamp,
}

impl ConversationMember {
    /// New membership row. The cursor starts at creation time so
    /// nothing that predates the membership counts as unread.
    pub fn new(conversation_id: ConversationId, user_id: UserId, now: Timestamp) -> Self {
        ConversationMember {
            conversation_id,
            user_id,
            last_read_at: now,
            is_typing: false,
            typing_updated_at: now,
        }
    }
}
