/*
    Store subsystem - Mutable engine state

    Write-side components, leaves first: the user directory, the
    conversation registry, and the append-only message log. Writes flow
    directory -> registry -> log; the read side composes all three (see
    query).
*/

pub mod errors;
pub mod directory;
pub mod registry;
pub mod message_log;

pub use errors::{StoreError, StoreResult};
pub use directory::UserDirectory;
pub use registry::{ConversationRegistry, TYPING_FRESHNESS_MS};
pub use message_log::MessageLog;
