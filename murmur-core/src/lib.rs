pub mod chat_store;
pub mod logging;
pub mod metrics;

pub use chat_store::ChatStore;
pub use logging::{init_logging, LogLevel};
pub use metrics::init_metrics;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Ensure the main exports are accessible
        let _ = LogLevel::Info;
        let _ = ChatStore::new();
    }
}
