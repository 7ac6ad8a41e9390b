use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec};

/// `app_queries_status_counter{operation, status}`. Incremented exactly
/// once per processed inbound message, after the reply has been sent.
pub static QUERIES_STATUS_COUNTER: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "app_queries_status_counter",
        "Count of processed queries by operation and response status",
        &["operation", "status"]
    )
    .expect("app_queries_status_counter registration should never fail")
});

pub fn record(operation: &str, status: u16) {
    QUERIES_STATUS_COUNTER
        .with_label_values(&[operation, &status.to_string()])
        .inc();
}
