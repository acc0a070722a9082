//! order-sim
//!
//! Synthetic point-of-sale order events for a fast-food restaurant.
//!
//! # Modes
//!
//! - Streaming: one order per interval, stamped with the wall clock, published
//!   to Kafka or Azure Event Hubs until interrupted
//! - Historical: one order per interval between two timestamps, written to CSV
//!
//! Both modes draw order ids from the same durable counter file, so ids never
//! repeat across runs.
//!
//! # CLI Usage
//!
//! ```bash
//! # Stream to a local Kafka broker every 15 seconds
//! order-sim stream --kafka-brokers localhost:9092 --topic orders
//!
//! # Stream to Azure Event Hubs
//! EVENTHUB_CONN_STR="Endpoint=sb://..." EVENTHUB_NAME=orders order-sim stream
//!
//! # Print orders instead of publishing them
//! order-sim stream --interval 1 --dry-run
//!
//! # Backfill a day of orders
//! order-sim historical --start-date 2025-01-01T00:00:00 \
//!   --end-date 2025-01-02T00:00:00 --interval 30 --output orders.csv
//! ```

use clap::Parser;
use order_generator::{OrderSimulator, SequenceAllocator, SimulationProfile};
use orders_kafka::KafkaConfig;
use tracing::info;

pub mod config;
pub mod historical;
pub mod sink;
pub mod stream;

pub use config::ConfigError;

/// Streaming destination options
#[derive(Parser, Clone, Debug)]
pub struct KafkaOpts {
    /// Kafka bootstrap servers
    #[arg(long, default_value = "localhost:9092", env = "KAFKA_BROKERS")]
    pub kafka_brokers: String,

    /// Topic to publish orders to
    #[arg(long, default_value = "orders", env = "ORDERS_TOPIC")]
    pub topic: String,

    /// SASL PLAIN username (enables SASL_SSL)
    #[arg(long, env = "KAFKA_SASL_USERNAME")]
    pub sasl_username: Option<String>,

    /// SASL PLAIN password
    #[arg(long, env = "KAFKA_SASL_PASSWORD", hide_env_values = true)]
    pub sasl_password: Option<String>,

    /// Azure Event Hubs connection string; overrides the broker options
    #[arg(long, env = "EVENTHUB_CONN_STR", hide_env_values = true)]
    pub eventhub_connection_string: Option<String>,

    /// Event hub name, used when the connection string has no EntityPath
    #[arg(long, env = "EVENTHUB_NAME")]
    pub eventhub_name: Option<String>,

    /// Partitions for the topic if it has to be created
    #[arg(long, default_value = "3")]
    pub partitions: i32,
}

impl KafkaOpts {
    /// Resolve the options into a publisher configuration.
    pub fn to_config(&self) -> Result<KafkaConfig, ConfigError> {
        if let Some(conn) = &self.eventhub_connection_string {
            return KafkaConfig::from_event_hubs(conn, self.eventhub_name.as_deref())
                .map_err(|e| ConfigError::InvalidKafkaConfig(e.to_string()));
        }

        let config = KafkaConfig::new(&self.kafka_brokers, &self.topic);
        match (&self.sasl_username, &self.sasl_password) {
            (Some(user), Some(password)) => Ok(config.with_sasl_plain(user, password)),
            (None, None) => Ok(config),
            (Some(_), None) => Err(ConfigError::InvalidKafkaConfig(
                "--sasl-username requires --sasl-password".to_string(),
            )),
            (None, Some(_)) => Err(ConfigError::InvalidKafkaConfig(
                "--sasl-password requires --sasl-username".to_string(),
            )),
        }
    }
}

/// Build a simulator, seeded when `seed` is given.
pub fn build_simulator<S: SequenceAllocator>(
    profile: &SimulationProfile,
    sequence: S,
    seed: Option<u64>,
) -> anyhow::Result<OrderSimulator<S>> {
    let simulator = match seed {
        Some(seed) => {
            info!("Using seed {seed}");
            OrderSimulator::new(profile, sequence, seed)?
        }
        None => OrderSimulator::from_entropy(profile, sequence)?,
    };
    Ok(simulator)
}
