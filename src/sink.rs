//! Destinations for streamed orders.

use anyhow::Context;
use async_trait::async_trait;
use order_generator::OrderRecord;
use orders_kafka::KafkaOrderPublisher;
use tracing::info;

/// Consumer of streamed orders.
///
/// `close` takes the sink by value, so a sink is closed at most once.
#[async_trait]
pub trait OrderSink: Send {
    /// Deliver one order.
    async fn emit(&mut self, order: &OrderRecord) -> anyhow::Result<()>;

    /// Flush and release the sink's resources.
    async fn close(self) -> anyhow::Result<()>
    where
        Self: Sized;
}

#[async_trait]
impl OrderSink for KafkaOrderPublisher {
    async fn emit(&mut self, order: &OrderRecord) -> anyhow::Result<()> {
        self.publish(order)
            .await
            .with_context(|| format!("Failed to publish {} to Kafka", order.order_id))
    }

    async fn close(self) -> anyhow::Result<()> {
        KafkaOrderPublisher::close(self)
            .await
            .context("Failed to flush Kafka producer")
    }
}

/// Writes each order as a JSON line to the log instead of publishing it.
#[derive(Debug, Default)]
pub struct LogSink {
    emitted: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderSink for LogSink {
    async fn emit(&mut self, order: &OrderRecord) -> anyhow::Result<()> {
        let json = serde_json::to_string(order)?;
        info!(target: "order_sim::orders", "{json}");
        self.emitted += 1;
        Ok(())
    }

    async fn close(self) -> anyhow::Result<()> {
        info!("Dry run finished after {} orders", self.emitted);
        Ok(())
    }
}
