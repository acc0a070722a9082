//! Interval parsing utilities.

use std::time::Duration;

use super::ConfigError;

/// Parse an interval string like "1h", "30m", "15s", "15" into a duration.
/// Supports:
/// - Plain numbers (interpreted as seconds): "15"
/// - Seconds suffix: "15s"
/// - Minutes suffix: "30m"
/// - Hours suffix: "1h"
pub fn parse_interval(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let invalid = || ConfigError::InvalidInterval(s.to_string());
    if s.is_empty() {
        return Err(invalid());
    }

    let (num_str, multiplier) = if let Some(num_str) = s.strip_suffix('h') {
        (num_str, 3600)
    } else if let Some(num_str) = s.strip_suffix('m') {
        (num_str, 60)
    } else if let Some(num_str) = s.strip_suffix('s') {
        (num_str, 1)
    } else {
        // No suffix - treat as seconds
        (s, 1)
    };

    let value: u64 = num_str.trim().parse().map_err(|_| invalid())?;
    let secs = value.checked_mul(multiplier).ok_or_else(invalid)?;
    Ok(Duration::from_secs(secs))
}
