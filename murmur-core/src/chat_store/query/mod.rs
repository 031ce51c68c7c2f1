/*
    Query subsystem - Derived read models

    Pure composition over the store; no state of its own.
*/

pub mod views;

pub use views::{
    ConversationSummary, MessagePreview, MessageView, ParticipantView, TypingUser, ViewProjector,
};
