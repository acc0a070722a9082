//! Simulated clock for historical generation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::time::Duration;

/// Inclusive sequence of timestamps `start, start + step, ...` up to `end`.
#[derive(Debug, Clone)]
pub struct HistoricalRange {
    next: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
    step: chrono::Duration,
}

impl HistoricalRange {
    /// Returns `None` if `step` is zero or too large to represent.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> Option<Self> {
        if step.is_zero() {
            return None;
        }
        let step = chrono::Duration::from_std(step).ok()?;
        Some(Self {
            next: Some(start),
            end,
            step,
        })
    }

    /// Number of timestamps remaining.
    pub fn remaining(&self) -> u64 {
        match self.next {
            Some(next) if next <= self.end => {
                let span = (self.end - next).num_milliseconds() as u64;
                let step = self.step.num_milliseconds().max(1) as u64;
                span / step + 1
            }
            _ => 0,
        }
    }
}

impl Iterator for HistoricalRange {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|ts| *ts <= self.end)?;
        self.next = current.checked_add_signed(self.step);
        Some(current)
    }
}

/// Parse a timestamp in one of the accepted formats:
///
/// - RFC 3339 with offset: `2025-01-01T00:00:00Z`, `2025-01-01T02:00:00+02:00`
/// - ISO 8601 without offset, read as UTC: `2025-01-01T00:00:00`, `2025-01-01T00:00:00.250`
/// - Date only, read as midnight UTC: `2025-01-01`
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
