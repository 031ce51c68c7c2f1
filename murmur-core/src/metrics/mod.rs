//! Metrics collection for the messaging engine

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Initialize metrics with descriptions
pub fn init_metrics() {
    // Directory metrics
    describe_counter!("directory.users.upserted", "Number of user upserts (insert or refresh)");
    describe_counter!("directory.presence.updates", "Number of online-status updates");
    describe_gauge!("directory.users.total", "Current number of user records");

    // Registry metrics
    describe_counter!("registry.conversations.created", "Number of conversations created");
    describe_counter!("registry.conversations.reused", "find-or-create calls resolved to an existing conversation");
    describe_counter!("registry.read_marks", "Number of read-cursor advances");
    describe_counter!("registry.typing.updates", "Number of typing-flag updates");

    // Message log metrics
    describe_counter!("log.messages.appended", "Number of messages appended");
    describe_counter!("log.messages.rejected", "Sends rejected before any mutation");
}

/// Record a counter metric
pub fn record_counter(name: &'static str, value: u64) {
    counter!(name).increment(value);
}

/// Record a gauge metric
pub fn record_gauge(name: &'static str, value: f64) {
    gauge!(name).set(value);
}
