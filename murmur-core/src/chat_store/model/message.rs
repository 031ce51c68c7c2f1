/*
    message.rs - Message model

    A message is immutable once appended except for the soft-delete
    tombstone. Ordering within a conversation is by creation timestamp
    with the per-conversation sequence number breaking ties.
*/

use super::types::{ConversationId, MessageId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// One message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message id
    pub id: MessageId,

    /// Conversation this message belongs to
    pub conversation_id: ConversationId,

    /// User who sent this message
    pub sender_id: UserId,

    /// Trimmed text body, never empty
    pub content: String,

    /// When the message was appended
    pub created_at: Timestamp,

    /// Position within the conversation, assigned at append time.
    /// Strictly increasing per conversation.
    pub seq: u64,

    /// Soft-delete tombstone, reserved; no current flow sets it
    pub is_deleted: bool,
}

impl Message {
    pub fn new(
        conversation_id: ConversationId,
        sender_id: UserId,
        content: String,
        created_at: Timestamp,
        seq: u64,
    ) -> Self {
        Message {
            id: MessageId::generate(),
            conversation_id,
            sender_id,
            content,
            created_at,
            seq,
            is_deleted: false,
        }
    }

    /// Mark as deleted (tombstone)
    pub fn delete(&mut self) {
        self.is_deleted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_survives_a_serde_round_trip() {
        let message = Message::new(
            ConversationId::generate(),
            UserId::generate(),
            "hi".to_string(),
            Timestamp::from_millis(100),
            1,
        );
        let json = serde_json::to_string(&message).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, message.id);
        assert_eq!(back.sender_id, message.sender_id);
        assert_eq!(back.content, "hi");
        assert_eq!(back.created_at, Timestamp::from_millis(100));
        assert_eq!(back.seq, 1);
        assert!(!back.is_deleted);
    }

    #[test]
    fn test_delete_sets_the_tombstone() {
        let mut message = Message::new(
            ConversationId::generate(),
            UserId::generate(),
            "hi".to_string(),
            Timestamp::from_millis(100),
            1,
        );
        assert!(!message.is_deleted);
        message.delete();
        assert!(message.is_deleted);
    }
}
