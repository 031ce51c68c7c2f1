/*
    chat_store - Conversation/messaging state engine

    The authoritative state layer for the direct-messaging backend.
    Handles:
    - Data models (users, conversations, memberships, messages)
    - Write-side components (directory, registry, message log)
    - Read-side projections (sidebar summaries, feeds, typing sets)

    Writes flow one way (directory -> registry -> log); reads fan in
    through the projector.
*/

pub mod model;
pub mod store;
pub mod query;

#[cfg(test)]
pub mod tests;

// Re-export commonly used types
pub use model::{ConversationId, ExternalUserId, MessageId, Timestamp, UserId};
pub use query::{ConversationSummary, MessageView, TypingUser, ViewProjector};
pub use store::{
    ConversationRegistry, MessageLog, StoreError, StoreResult, UserDirectory, TYPING_FRESHNESS_MS,
};

use std::sync::Arc;

/// Fully wired engine: the three write components plus the projector.
/// Construction mirrors the write-side dependency order.
pub struct ChatStore {
    pub directory: Arc<UserDirectory>,
    pub registry: Arc<ConversationRegistry>,
    pub log: Arc<MessageLog>,
    pub views: ViewProjector,
}

impl ChatStore {
    pub fn new() -> Self {
        let directory = Arc::new(UserDirectory::new());
        let registry = Arc::new(ConversationRegistry::new(Arc::clone(&directory)));
        let log = Arc::new(MessageLog::new(Arc::clone(&registry)));
        let views = ViewProjector::new(
            Arc::clone(&directory),
            Arc::clone(&registry),
            Arc::clone(&log),
        );
        ChatStore {
            directory,
            registry,
            log,
            views,
        }
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}
