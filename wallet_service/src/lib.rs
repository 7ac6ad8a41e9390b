pub mod config;
pub mod consumer;
pub mod dispatch;
pub mod domain;
pub mod handlers;
pub mod infrastructure;
pub mod metrics;
