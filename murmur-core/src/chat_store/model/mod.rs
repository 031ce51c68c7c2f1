/*
    Model subsystem - Data structures for entities
*/

pub mod types;
pub mod user;
pub mod conversation;
pub mod message;

pub use types::*;
pub use user::*;
pub use conversation::*;
pub use message::*;
