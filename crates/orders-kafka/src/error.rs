//! Error types for the Kafka publisher.

use thiserror::Error;

/// Errors that can occur while publishing orders.
#[derive(Error, Debug)]
pub enum KafkaPublishError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Topic creation error: {0}")]
    TopicCreation(String),

    #[error("Invalid Event Hubs connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Flush task failed: {0}")]
    Flush(String),
}
