//! Kafka publisher for streamed orders.
//!
//! Orders are published as JSON messages keyed by `order_id`. The same
//! producer works against plain Kafka brokers and against the Kafka endpoint
//! of an Azure Event Hubs namespace (SASL_SSL with the connection string as
//! password).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use orders_kafka::{KafkaConfig, KafkaOrderPublisher};
//!
//! # async fn run(order: order_generator::OrderRecord) -> Result<(), orders_kafka::KafkaPublishError> {
//! let config = KafkaConfig::new("localhost:9092", "orders");
//! let mut publisher = KafkaOrderPublisher::new(config)?;
//! publisher.create_topic_if_not_exists(3).await?;
//! publisher.publish(&order).await?;
//! publisher.close().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod publisher;

pub use config::{KafkaConfig, SaslConfig, EVENT_HUBS_KAFKA_PORT};
pub use error::KafkaPublishError;
pub use publisher::{encode_order, KafkaOrderPublisher, DEFAULT_FLUSH_TIMEOUT};
