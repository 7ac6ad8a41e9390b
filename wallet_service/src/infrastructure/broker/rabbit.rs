use crate::infrastructure::broker::reply::{Delivery, ReplyPublisher};
use async_trait::async_trait;
use lapin::options::{
    BasicConsumeOptions, BasicPublishOptions, BasicQosOptions, ExchangeDeclareOptions, QueueBindOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, Consumer, ExchangeKind};

/// Topic exchange every worker publishes requests against and every queue
/// binds to.
pub const EXCHANGE: &str = "queries";

/// The three routing keys the consumer queue is bound on.
pub const ROUTING_KEYS: [&str; 3] = ["invoice", "withdraw", "balance"];

/// Thin wrapper over a `lapin` channel: declares the exchange once at
/// startup, hands out a bound consumer, and publishes reply envelopes.
pub struct RabbitBroker {
    channel: Channel,
}

impl RabbitBroker {
    /// Wraps an already-open channel. Used by the consumer pool to give
    /// each worker its own channel.
    pub fn from_channel(channel: Channel) -> Self {
        Self { channel }
    }

    /// Opens a connection and channel, declaring the topic exchange. Returns
    /// the connection alongside the broker so the caller can close it last,
    /// after the consumer workers have stopped.
    pub async fn connect(amqp_addr: &str) -> anyhow::Result<(Connection, Self)> {
        let conn = Connection::connect(
            amqp_addr,
            ConnectionProperties::default()
                .with_executor(tokio_executor_trait::Tokio::current())
                .with_reactor(tokio_reactor_trait::Tokio),
        )
        .await?;
        let channel = conn.create_channel().await?;
        channel
            .exchange_declare(
                EXCHANGE,
                ExchangeKind::Topic,
                ExchangeDeclareOptions::default(),
                FieldTable::default(),
            )
            .await?;

        Ok((conn, Self { channel }))
    }

    /// Declares `queue_name`, binds it to all three routing keys, sets
    /// prefetch = 1 (one unacknowledged message per worker), and starts
    /// consuming under `consumer_tag`.
    pub async fn consume(&self, queue_name: &str, consumer_tag: &str) -> anyhow::Result<Consumer> {
        self.channel.basic_qos(1, BasicQosOptions::default()).await?;

        let queue = self
            .channel
            .queue_declare(queue_name, QueueDeclareOptions::default(), FieldTable::default())
            .await?;

        for key in ROUTING_KEYS {
            self.channel
                .queue_bind(
                    queue.name().as_str(),
                    EXCHANGE,
                    key,
                    QueueBindOptions::default(),
                    FieldTable::default(),
                )
                .await?;
        }

        let consumer = self
            .channel
            .basic_consume(
                queue.name().as_str(),
                consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        Ok(consumer)
    }
}

#[async_trait]
impl ReplyPublisher for RabbitBroker {
    /// Publishes to the default exchange with routing key = `reply_to`,
    /// carrying `correlation_id` verbatim.
    async fn publish_reply(&self, reply_to: &str, correlation_id: Option<&str>, body: Vec<u8>) -> anyhow::Result<()> {
        let mut props = BasicProperties::default().with_content_type("application/json".into());
        if let Some(cid) = correlation_id {
            props = props.with_correlation_id(cid.into());
        }

        self.channel
            .basic_publish("", reply_to, BasicPublishOptions::default(), &body, props)
            .await?
            .await?;

        Ok(())
    }
}

impl From<&lapin::message::Delivery> for Delivery {
    fn from(delivery: &lapin::message::Delivery) -> Self {
        Delivery {
            routing_key: delivery.routing_key.to_string(),
            correlation_id: delivery
                .properties
                .correlation_id()
                .as_ref()
                .map(|cid| cid.to_string()),
            reply_to: delivery.properties.reply_to().as_ref().map(|rt| rt.to_string()),
            body: delivery.data.clone(),
        }
    }
}
