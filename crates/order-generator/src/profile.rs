//! Restaurant profile: the fixed context orders are drawn from.
//!
//! A profile can be loaded from YAML. Every field is optional and falls back
//! to the defaults below:
//!
//! ```yaml
//! restaurant_id: restaurant_001
//! employee_count: 15
//! registers:
//!   stationary: 3
//!   drive: 2
//!   kiosk: 2
//! initial_weather:
//!   temperature: 20.0
//!   humidity: 50.0
//!   condition: sunny
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::order::RegisterType;
use crate::weather::WeatherState;

/// Error type for profile loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Failed to read profile file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse profile YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("restaurant_id must not be empty")]
    EmptyRestaurantId,

    #[error("Pool '{0}' must contain at least one entry")]
    EmptyPool(&'static str),

    #[error("Initial weather out of range: temperature {temperature}, humidity {humidity}")]
    WeatherOutOfRange { temperature: f64, humidity: f64 },
}

/// Number of registers of each type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegisterPoolSizes {
    pub stationary: usize,
    pub drive: usize,
    pub kiosk: usize,
}

impl Default for RegisterPoolSizes {
    fn default() -> Self {
        Self {
            stationary: 3,
            drive: 2,
            kiosk: 2,
        }
    }
}

impl RegisterPoolSizes {
    pub fn size_of(&self, register_type: RegisterType) -> usize {
        match register_type {
            RegisterType::Stationary => self.stationary,
            RegisterType::Drive => self.drive,
            RegisterType::Kiosk => self.kiosk,
        }
    }
}

/// Static context for one generator instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationProfile {
    /// Stamped on every order
    pub restaurant_id: String,
    /// Employees are named `employee_1..=employee_count`
    pub employee_count: usize,
    pub registers: RegisterPoolSizes,
    /// Starting point of the weather walk
    pub initial_weather: WeatherState,
}

impl Default for SimulationProfile {
    fn default() -> Self {
        Self {
            restaurant_id: "restaurant_001".to_string(),
            employee_count: 15,
            registers: RegisterPoolSizes::default(),
            initial_weather: WeatherState::default(),
        }
    }
}

impl SimulationProfile {
    /// Load and validate a profile from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a profile from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let profile: SimulationProfile = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check that every pool can be drawn from.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.restaurant_id.trim().is_empty() {
            return Err(ProfileError::EmptyRestaurantId);
        }
        if self.employee_count == 0 {
            return Err(ProfileError::EmptyPool("employee"));
        }
        for register_type in RegisterType::ALL {
            if self.registers.size_of(register_type) == 0 {
                return Err(ProfileError::EmptyPool(register_type.as_str()));
            }
        }
        if !self.initial_weather.is_within_bounds() {
            return Err(ProfileError::WeatherOutOfRange {
                temperature: self.initial_weather.temperature,
                humidity: self.initial_weather.humidity,
            });
        }
        Ok(())
    }

    /// `employee_1..=employee_count`
    pub fn employee_ids(&self) -> Vec<String> {
        (1..=self.employee_count)
            .map(|i| format!("employee_{i}"))
            .collect()
    }

    /// Register identifiers for one register type, e.g. `drive_1`, `drive_2`.
    pub fn register_ids(&self, register_type: RegisterType) -> Vec<String> {
        (1..=self.registers.size_of(register_type))
            .map(|i| format!("{}_{i}", register_type.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherCondition;

    #[test]
    fn test_default_profile() {
        let profile = SimulationProfile::default();
        profile.validate().unwrap();

        assert_eq!(profile.restaurant_id, "restaurant_001");
        assert_eq!(profile.employee_ids().len(), 15);
        assert_eq!(profile.employee_ids()[0], "employee_1");
        assert_eq!(profile.employee_ids()[14], "employee_15");
        assert_eq!(
            profile.register_ids(RegisterType::Stationary),
            vec!["stationary_1", "stationary_2", "stationary_3"]
        );
        assert_eq!(
            profile.register_ids(RegisterType::Drive),
            vec!["drive_1", "drive_2"]
        );
        assert_eq!(
            profile.register_ids(RegisterType::Kiosk),
            vec!["kiosk_1", "kiosk_2"]
        );
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let profile = SimulationProfile::from_yaml(
            r#"
restaurant_id: restaurant_042
registers:
  kiosk: 4
initial_weather:
  temperature: -2.5
  humidity: 80.0
  condition: snowy
"#,
        )
        .unwrap();

        assert_eq!(profile.restaurant_id, "restaurant_042");
        assert_eq!(profile.employee_count, 15);
        assert_eq!(profile.registers.stationary, 3);
        assert_eq!(profile.registers.drive, 2);
        assert_eq!(profile.registers.kiosk, 4);
        assert_eq!(profile.initial_weather.condition, WeatherCondition::Snowy);
        assert_eq!(profile.initial_weather.temperature, -2.5);
    }

    #[test]
    fn test_empty_pool_rejected() {
        let result = SimulationProfile::from_yaml("registers:\n  drive: 0\n");
        assert!(matches!(result, Err(ProfileError::EmptyPool("drive"))));

        let result = SimulationProfile::from_yaml("employee_count: 0\n");
        assert!(matches!(result, Err(ProfileError::EmptyPool("employee"))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = SimulationProfile::from_yaml("restaurant: x\n");
        assert!(matches!(result, Err(ProfileError::Yaml(_))));
    }

    #[test]
    fn test_weather_out_of_range_rejected() {
        let result = SimulationProfile::from_yaml(
            "initial_weather:\n  temperature: 50.0\n  humidity: 50.0\n  condition: sunny\n",
        );
        assert!(matches!(
            result,
            Err(ProfileError::WeatherOutOfRange { .. })
        ));
    }
}
