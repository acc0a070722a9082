//! Connection settings for plain Kafka brokers and Azure Event Hubs.

use crate::error::KafkaPublishError;
use rdkafka::ClientConfig;
use std::fmt;
use std::time::Duration;

/// Port of the Kafka endpoint of an Event Hubs namespace.
pub const EVENT_HUBS_KAFKA_PORT: u16 = 9093;

/// SASL credentials.
#[derive(Clone)]
pub struct SaslConfig {
    pub mechanism: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SaslConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaslConfig")
            .field("mechanism", &self.mechanism)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where and how to publish orders.
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Comma-separated `host:port` list
    pub brokers: String,
    pub topic: String,
    /// SASL_SSL credentials; `None` connects in plaintext
    pub sasl: Option<SaslConfig>,
    /// Delivery timeout for a single message
    pub message_timeout: Duration,
}

impl KafkaConfig {
    /// Plaintext connection to `brokers`.
    pub fn new(brokers: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            topic: topic.into(),
            sasl: None,
            message_timeout: Duration::from_secs(5),
        }
    }

    /// Use SASL_SSL with the PLAIN mechanism.
    pub fn with_sasl_plain(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.sasl = Some(SaslConfig {
            mechanism: "PLAIN".to_string(),
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Build a config for the Kafka endpoint of an Event Hubs namespace.
    ///
    /// The connection string has the form
    /// `Endpoint=sb://NAMESPACE.servicebus.windows.net/;SharedAccessKeyName=..;SharedAccessKey=..[;EntityPath=HUB]`.
    /// The topic is `EntityPath` when present, otherwise `hub_name`.
    pub fn from_event_hubs(
        connection_string: &str,
        hub_name: Option<&str>,
    ) -> Result<Self, KafkaPublishError> {
        let mut endpoint = None;
        let mut entity_path = None;

        for part in connection_string.split(';').filter(|p| !p.trim().is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                KafkaPublishError::InvalidConnectionString(format!("malformed segment '{part}'"))
            })?;
            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value.trim()),
                "entitypath" => entity_path = Some(value.trim()),
                _ => {}
            }
        }

        let endpoint = endpoint.ok_or_else(|| {
            KafkaPublishError::InvalidConnectionString("missing Endpoint".to_string())
        })?;
        let host = endpoint
            .strip_prefix("sb://")
            .unwrap_or(endpoint)
            .trim_end_matches('/');
        if host.is_empty() {
            return Err(KafkaPublishError::InvalidConnectionString(
                "empty Endpoint host".to_string(),
            ));
        }

        let topic = entity_path
            .filter(|p| !p.is_empty())
            .or(hub_name)
            .ok_or_else(|| {
                KafkaPublishError::InvalidConnectionString(
                    "no EntityPath and no event hub name given".to_string(),
                )
            })?;

        Ok(Self::new(format!("{host}:{EVENT_HUBS_KAFKA_PORT}"), topic)
            .with_sasl_plain("$ConnectionString", connection_string))
    }

    /// Whether this config uses SASL (Event Hubs and other managed brokers).
    pub fn is_authenticated(&self) -> bool {
        self.sasl.is_some()
    }

    pub(crate) fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set(
                "message.timeout.ms",
                self.message_timeout.as_millis().to_string(),
            );

        if let Some(sasl) = &self.sasl {
            config
                .set("security.protocol", "SASL_SSL")
                .set("sasl.mechanism", &sasl.mechanism)
                .set("sasl.username", &sasl.username)
                .set("sasl.password", &sasl.password);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONN: &str = "Endpoint=sb://pos-demo.servicebus.windows.net/;SharedAccessKeyName=send;SharedAccessKey=abc123+/xyz=;EntityPath=orders";

    #[test]
    fn test_plain_config() {
        let config = KafkaConfig::new("localhost:9092", "orders");
        let client = config.client_config();

        assert!(!config.is_authenticated());
        assert_eq!(client.get("bootstrap.servers"), Some("localhost:9092"));
        assert_eq!(client.get("message.timeout.ms"), Some("5000"));
        assert_eq!(client.get("security.protocol"), None);
    }

    #[test]
    fn test_event_hubs_connection_string() {
        let config = KafkaConfig::from_event_hubs(CONN, None).unwrap();

        assert_eq!(config.brokers, "pos-demo.servicebus.windows.net:9093");
        assert_eq!(config.topic, "orders");
        assert!(config.is_authenticated());

        let client = config.client_config();
        assert_eq!(client.get("security.protocol"), Some("SASL_SSL"));
        assert_eq!(client.get("sasl.mechanism"), Some("PLAIN"));
        assert_eq!(client.get("sasl.username"), Some("$ConnectionString"));
        assert_eq!(client.get("sasl.password"), Some(CONN));
    }

    #[test]
    fn test_event_hubs_name_fallback() {
        let conn = "Endpoint=sb://pos-demo.servicebus.windows.net/;SharedAccessKeyName=send;SharedAccessKey=k=";
        let config = KafkaConfig::from_event_hubs(conn, Some("toa-orders")).unwrap();
        assert_eq!(config.topic, "toa-orders");

        let result = KafkaConfig::from_event_hubs(conn, None);
        assert!(matches!(
            result,
            Err(KafkaPublishError::InvalidConnectionString(_))
        ));
    }

    #[test]
    fn test_entity_path_wins_over_hub_name() {
        let config = KafkaConfig::from_event_hubs(CONN, Some("other")).unwrap();
        assert_eq!(config.topic, "orders");
    }

    #[test]
    fn test_missing_endpoint() {
        let result = KafkaConfig::from_event_hubs("SharedAccessKey=x;EntityPath=orders", None);
        assert!(matches!(
            result,
            Err(KafkaPublishError::InvalidConnectionString(msg)) if msg.contains("Endpoint")
        ));
    }

    #[test]
    fn test_malformed_segment() {
        let result = KafkaConfig::from_event_hubs("Endpoint=sb://x/;garbage", None);
        assert!(matches!(
            result,
            Err(KafkaPublishError::InvalidConnectionString(_))
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = KafkaConfig::from_event_hubs(CONN, None).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("abc123"));
        assert!(debug.contains("<redacted>"));
    }
}
