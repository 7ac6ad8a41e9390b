use crate::consumer::worker;
use crate::domain::repository::Repository;
use crate::infrastructure::broker::RabbitBroker;
use lapin::Connection;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A fixed-size pool of `N` cooperating workers sharing one queue.
/// Each worker owns its own channel (and therefore its own prefetch=1
/// subscription), so the broker load-balances deliveries across them.
pub struct ConsumerPool {
    stop_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl ConsumerPool {
    /// Spawns `worker_count` workers, each declaring its own channel against
    /// `queue_name` and consuming under a distinct consumer tag.
    pub async fn start(
        connection: &Connection,
        queue_name: &str,
        worker_count: usize,
        repo: Arc<dyn Repository>,
    ) -> anyhow::Result<Self> {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut handles = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let channel = connection.create_channel().await?;
            let broker = RabbitBroker::from_channel(channel);
            let consumer = broker
                .consume(queue_name, &format!("wallet-worker-{worker_id}"))
                .await?;

            let repo = repo.clone();
            let stop_rx = stop_rx.clone();
            handles.push(tokio::spawn(worker::run(worker_id, consumer, broker, repo, stop_rx)));
        }

        Ok(Self { stop_tx, handles })
    }

    /// Signals every worker to stop, then waits for in-flight handlers
    /// (including their replies) to finish before the caller closes the
    /// broker connection and database pool.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "consumer worker task panicked");
            }
        }
    }
}
