//! Kafka publisher for streamed orders.

use crate::config::KafkaConfig;
use crate::error::KafkaPublishError;
use order_generator::OrderRecord;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use std::time::Duration;
use tracing::{debug, info};

/// How long `close` waits for outstanding deliveries.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Encode an order as the JSON message payload.
pub fn encode_order(order: &OrderRecord) -> Result<Vec<u8>, KafkaPublishError> {
    Ok(serde_json::to_vec(order)?)
}

/// Publishes orders as JSON messages keyed by order id.
///
/// # Example
///
/// ```ignore
/// let mut publisher = KafkaOrderPublisher::new(KafkaConfig::new("localhost:9092", "orders"))?;
/// publisher.create_topic_if_not_exists(3).await?;
/// publisher.publish(&order).await?;
/// publisher.close().await?;
/// ```
pub struct KafkaOrderPublisher {
    producer: FutureProducer,
    config: KafkaConfig,
    published: u64,
}

impl KafkaOrderPublisher {
    /// Create a publisher. No connection is made until the first message.
    pub fn new(config: KafkaConfig) -> Result<Self, KafkaPublishError> {
        let producer: FutureProducer = config.client_config().create()?;

        info!(
            "Kafka producer created for topic '{}' on {}",
            config.topic, config.brokers
        );

        Ok(Self {
            producer,
            config,
            published: 0,
        })
    }

    /// Topic orders are published to.
    pub fn topic(&self) -> &str {
        &self.config.topic
    }

    /// Number of orders delivered so far.
    pub fn published_count(&self) -> u64 {
        self.published
    }

    /// Create the topic if it doesn't exist.
    pub async fn create_topic_if_not_exists(&self, partitions: i32) -> Result<(), KafkaPublishError> {
        let admin_client: AdminClient<DefaultClientContext> =
            self.config.client_config().create()?;

        let new_topic = NewTopic::new(&self.config.topic, partitions, TopicReplication::Fixed(1));
        let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(5)));

        let results = admin_client
            .create_topics(&[new_topic], &opts)
            .await
            .map_err(|e| KafkaPublishError::TopicCreation(e.to_string()))?;

        for result in results {
            match result {
                Ok(topic_name) => info!("Topic '{topic_name}' created successfully"),
                Err((topic_name, err)) => {
                    // Topic already exists is not an error
                    if err.to_string().contains("already exists") {
                        info!("Topic '{topic_name}' already exists");
                    } else {
                        return Err(KafkaPublishError::TopicCreation(format!(
                            "{topic_name}: {err}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Publish one order and wait for its delivery report.
    pub async fn publish(&mut self, order: &OrderRecord) -> Result<(), KafkaPublishError> {
        let payload = encode_order(order)?;
        let record = FutureRecord::to(&self.config.topic)
            .key(order.order_id.as_bytes())
            .payload(&payload);

        self.producer
            .send(record, self.config.message_timeout)
            .await
            .map_err(|(err, _)| err)?;

        self.published += 1;
        debug!("Published order message: {}", order.order_id);
        Ok(())
    }

    /// Flush outstanding messages and release the producer.
    pub async fn close(self) -> Result<(), KafkaPublishError> {
        self.close_with_timeout(DEFAULT_FLUSH_TIMEOUT).await
    }

    /// Like [`close`](Self::close) with an explicit flush timeout.
    pub async fn close_with_timeout(self, timeout: Duration) -> Result<(), KafkaPublishError> {
        let producer = self.producer;
        // librdkafka's flush blocks the calling thread
        tokio::task::spawn_blocking(move || producer.flush(timeout))
            .await
            .map_err(|e| KafkaPublishError::Flush(e.to_string()))??;

        info!(
            "Kafka producer closed after {} messages to '{}'",
            self.published, self.config.topic
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use order_generator::{
        ItemQuantities, MenuItem, OrderSize, RegisterType, WeatherCondition, WeatherState,
    };
    use rust_decimal::Decimal;

    fn sample_order() -> OrderRecord {
        let ts = Utc.with_ymd_and_hms(2025, 5, 1, 8, 15, 0).unwrap();
        let mut items = ItemQuantities::new();
        items.insert(MenuItem::FriedChicken, 3);
        items.insert(MenuItem::Drink, 2);
        OrderRecord {
            order_id: "order_12".to_string(),
            timestamp: ts,
            restaurant_id: "restaurant_001".to_string(),
            register_type: RegisterType::Kiosk,
            register_id: "kiosk_1".to_string(),
            employee_id: "employee_3".to_string(),
            order_size: OrderSize::Large,
            items,
            total_amount: Decimal::new(52, 0),
            processing_time: ts,
            weather: WeatherState {
                temperature: 21.4,
                humidity: 47.9,
                condition: WeatherCondition::Sunny,
            },
        }
    }

    #[test]
    fn test_encode_order_payload() {
        let payload = encode_order(&sample_order()).unwrap();
        let json = String::from_utf8(payload).unwrap();

        assert_eq!(
            json,
            concat!(
                r#"{"order_id":"order_12","timestamp":"2025-05-01T08:15:00Z","#,
                r#""restaurant_id":"restaurant_001","register_type":"kiosk","#,
                r#""register_id":"kiosk_1","employee_id":"employee_3","order_size":"large","#,
                r#""items":{"fried_chicken":3,"drink":2},"total_amount":52.0,"#,
                r#""processing_time":"2025-05-01T08:15:00Z","#,
                r#""IsWeather":{"temperature":21.4,"humidity":47.9,"condition":"sunny"}}"#
            )
        );
    }

    #[test]
    fn test_payload_roundtrip() {
        let order = sample_order();
        let payload = encode_order(&order).unwrap();
        let parsed: OrderRecord = serde_json::from_slice(&payload).unwrap();
        assert_eq!(parsed, order);
    }

    #[test]
    fn test_new_publisher_does_not_connect() {
        // librdkafka connects lazily, so creating a producer for an
        // unreachable broker succeeds
        let publisher =
            KafkaOrderPublisher::new(KafkaConfig::new("127.0.0.1:1", "orders")).unwrap();
        assert_eq!(publisher.topic(), "orders");
        assert_eq!(publisher.published_count(), 0);
    }
}
