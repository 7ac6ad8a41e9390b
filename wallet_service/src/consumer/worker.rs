use crate::dispatch::dispatch;
use crate::domain::repository::Repository;
use crate::infrastructure::broker::{Delivery, ReplyPublisher};
use crate::metrics;
use futures_util::StreamExt;
use lapin::options::BasicAckOptions;
use lapin::Consumer;
use std::sync::Arc;
use tokio::sync::watch;

/// Blocks on a message or a stop signal, runs the dispatcher (which replies
/// before returning), then acknowledges. A
/// failure to publish the reply still acknowledges the message; a panic or
/// crash mid-handler leaves it unacknowledged for redelivery.
pub async fn run(
    worker_id: usize,
    mut consumer: Consumer,
    publisher: impl ReplyPublisher,
    repo: Arc<dyn Repository>,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;

            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    tracing::info!(worker_id, "consumer worker stopping");
                    return;
                }
            }
            next = consumer.next() => {
                match next {
                    Some(Ok(delivery)) => {
                        process_one(worker_id, &delivery, &publisher, repo.as_ref()).await;
                        if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
                            tracing::warn!(worker_id, error = %e, "failed to ack delivery");
                        }
                    }
                    Some(Err(e)) => {
                        tracing::error!(worker_id, error = %e, "error receiving delivery");
                    }
                    None => {
                        tracing::warn!(worker_id, "consumer stream closed");
                        return;
                    }
                }
            }
        }
    }
}

async fn process_one(
    worker_id: usize,
    raw: &lapin::message::Delivery,
    publisher: &impl ReplyPublisher,
    repo: &dyn Repository,
) {
    let delivery: Delivery = raw.into();
    let reply = dispatch(repo, &delivery.routing_key, &delivery.body).await;
    let status = reply.code();
    let operation = reply.operation().to_string();

    match delivery.reply_to.as_deref() {
        Some(reply_to) => {
            let body = serde_json::to_vec(&reply).unwrap_or_default();
            if let Err(e) = publisher
                .publish_reply(reply_to, delivery.correlation_id.as_deref(), body)
                .await
            {
                tracing::warn!(worker_id, error = %e, "failed to publish reply");
            }
        }
        None => tracing::warn!(worker_id, operation, "delivery had no reply-to, dropping reply"),
    }

    metrics::record(&operation, status);
}
