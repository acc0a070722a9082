//! Run configuration and its validation.
//!
//! Everything here is checked before the first order is generated, so a bad
//! command line never touches the counter file or the sink.

mod duration;

use chrono::{DateTime, Utc};
use order_generator::{parse_timestamp, HistoricalRange, ProfileError, SimulationProfile};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use duration::parse_interval;

/// Invalid or missing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Historical mode requires both --start-date and --end-date")]
    MissingHistoricalRange,

    #[error("Invalid timestamp '{0}': expected ISO 8601, e.g. 2025-01-01T00:00:00")]
    InvalidTimestamp(String),

    #[error("End date {end} is before start date {start}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Historical interval must be greater than zero")]
    ZeroHistoricalInterval,

    #[error("Invalid interval '{0}': expected seconds, optionally suffixed with s, m or h")]
    InvalidInterval(String),

    #[error("Invalid Kafka configuration: {0}")]
    InvalidKafkaConfig(String),

    #[error("Invalid profile: {0}")]
    Profile(#[from] ProfileError),
}

/// Validated settings for a historical run.
#[derive(Debug, Clone)]
pub struct HistoricalConfig {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval: Duration,
    pub output: PathBuf,
    range: HistoricalRange,
}

impl HistoricalConfig {
    /// Validate the historical command line.
    pub fn new(
        start: Option<&str>,
        end: Option<&str>,
        interval: Duration,
        output: PathBuf,
    ) -> Result<Self, ConfigError> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(ConfigError::MissingHistoricalRange);
        };
        let start =
            parse_timestamp(start).ok_or_else(|| ConfigError::InvalidTimestamp(start.to_string()))?;
        let end = parse_timestamp(end).ok_or_else(|| ConfigError::InvalidTimestamp(end.to_string()))?;

        if end < start {
            return Err(ConfigError::InvalidRange { start, end });
        }
        if interval.is_zero() {
            return Err(ConfigError::ZeroHistoricalInterval);
        }
        let range = HistoricalRange::new(start, end, interval)
            .ok_or_else(|| ConfigError::InvalidInterval(format!("{}s", interval.as_secs())))?;

        Ok(Self {
            start,
            end,
            interval,
            output,
            range,
        })
    }

    /// Timestamps to generate orders for.
    pub fn range(&self) -> HistoricalRange {
        self.range.clone()
    }
}

/// Load the profile at `path`, or the default profile.
pub fn load_profile(path: Option<&Path>) -> Result<SimulationProfile, ConfigError> {
    match path {
        Some(path) => Ok(SimulationProfile::from_file(path)?),
        None => Ok(SimulationProfile::default()),
    }
}
