//! Weather random walk attached to every generated order.
//!
//! Temperature and humidity drift by a small uniform step each tick and are
//! clamped to their plausible ranges. The condition only changes on an
//! occasional regime shift, when a new value is drawn from all four
//! conditions (the current one included).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Allowed temperature range in degrees Celsius.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = -5.0..=35.0;

/// Allowed relative humidity range in percent.
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 20.0..=90.0;

/// Maximum absolute temperature change per step.
pub const TEMPERATURE_DRIFT: f64 = 0.2;

/// Maximum absolute humidity change per step.
pub const HUMIDITY_DRIFT: f64 = 0.5;

/// Probability that a step redraws the weather condition.
pub const CONDITION_CHANGE_PROBABILITY: f64 = 0.05;

/// Sky condition reported alongside temperature and humidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

impl WeatherCondition {
    /// Every condition, in the order used for uniform draws.
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
        WeatherCondition::Snowy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Snowy => "snowy",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weather at a single point in simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    /// Degrees Celsius, within [`TEMPERATURE_RANGE`]
    pub temperature: f64,
    /// Relative humidity percent, within [`HUMIDITY_RANGE`]
    pub humidity: f64,
    pub condition: WeatherCondition,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            humidity: 50.0,
            condition: WeatherCondition::Sunny,
        }
    }
}

impl WeatherState {
    /// Whether both numeric fields sit inside their allowed ranges.
    pub fn is_within_bounds(&self) -> bool {
        TEMPERATURE_RANGE.contains(&self.temperature) && HUMIDITY_RANGE.contains(&self.humidity)
    }
}

/// Owns the evolving weather for one simulation run.
#[derive(Debug, Clone)]
pub struct WeatherModel {
    current: WeatherState,
}

impl WeatherModel {
    /// Start the walk from `initial`, pulled into the allowed ranges.
    pub fn new(initial: WeatherState) -> Self {
        Self {
            current: WeatherState {
                temperature: clamp_round(initial.temperature, &TEMPERATURE_RANGE),
                humidity: clamp_round(initial.humidity, &HUMIDITY_RANGE),
                condition: initial.condition,
            },
        }
    }

    /// Current weather without advancing the walk.
    pub fn current(&self) -> WeatherState {
        self.current
    }

    /// Advance one step and return a copy of the new state.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> WeatherState {
        let temperature =
            self.current.temperature + rng.gen_range(-TEMPERATURE_DRIFT..=TEMPERATURE_DRIFT);
        let humidity = self.current.humidity + rng.gen_range(-HUMIDITY_DRIFT..=HUMIDITY_DRIFT);

        self.current.temperature = clamp_round(temperature, &TEMPERATURE_RANGE);
        self.current.humidity = clamp_round(humidity, &HUMIDITY_RANGE);

        if rng.gen_bool(CONDITION_CHANGE_PROBABILITY) {
            let idx = rng.gen_range(0..WeatherCondition::ALL.len());
            self.current.condition = WeatherCondition::ALL[idx];
        }

        self.current
    }
}

impl Default for WeatherModel {
    fn default() -> Self {
        Self::new(WeatherState::default())
    }
}

/// Clamp into `range`, then round to one decimal place.
///
/// Both range bounds are whole numbers, so rounding never leaves the range.
fn clamp_round(value: f64, range: &RangeInclusive<f64>) -> f64 {
    let clamped = value.clamp(*range.start(), *range.end());
    (clamped * 10.0).round() / 10.0
}
