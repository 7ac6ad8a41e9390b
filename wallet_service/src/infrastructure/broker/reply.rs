use async_trait::async_trait;

/// The fields of an inbound message the dispatcher needs in order to reply.
/// Carried separately from the raw broker delivery so handlers and tests
/// never depend on `lapin` directly.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub routing_key: String,
    pub correlation_id: Option<String>,
    pub reply_to: Option<String>,
    pub body: Vec<u8>,
}

/// Publishes a reply envelope to the address named by an inbound delivery's
/// `reply-to`, preserving its `correlation-id` verbatim. A failure to
/// publish is logged by the implementation and must never propagate as a
/// reason to withhold acknowledgement of the original message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplyPublisher: Send + Sync {
    async fn publish_reply(&self, reply_to: &str, correlation_id: Option<&str>, body: Vec<u8>) -> anyhow::Result<()>;
}
