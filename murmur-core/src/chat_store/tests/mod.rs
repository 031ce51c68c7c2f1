/*
    Integration tests for the chat_store subsystem

    Test suite covering:
    - Directory upserts and presence
    - Conversation pair dedup, read cursors, typing lifecycle
    - The three-part append effect and message ordering
    - Read-model projections (sidebar, feed, typing set)
    - Races: concurrent creation and concurrent sends
*/

pub mod directory_tests;
pub mod registry_tests;

use crate::chat_store::model::{ExternalUserId, Timestamp, UserId};
use crate::chat_store::ChatStore;

/// Shorthand for a deterministic clock value
pub fn t(millis: u64) -> Timestamp {
    Timestamp::from_millis(millis)
}

/// Seed a user with a predictable external id and profile
pub fn seed_user(store: &ChatStore, name: &str, now: Timestamp) -> UserId {
    store
        .directory
        .upsert_user_at(
            ExternalUserId::new(format!("ext-{}", name.to_lowercase())),
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            format!("https://avatars.example.com/{}.png", name.to_lowercase()),
            now,
        )
        .expect("seed user")
}
