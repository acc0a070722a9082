//! Order records and the factory that assembles them.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::menu::{generate_items, ItemQuantities};
use crate::profile::{ProfileError, SimulationProfile};
use crate::sequence::{SequenceAllocator, SequenceError};
use crate::weather::WeatherState;

/// Probability that an order is [`OrderSize::Small`].
pub const SMALL_ORDER_PROBABILITY: f64 = 0.6;

/// Where the order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterType {
    /// In-store counter
    Stationary,
    /// Drive-through
    Drive,
    /// Self-service kiosk
    Kiosk,
}

impl RegisterType {
    pub const ALL: [RegisterType; 3] = [
        RegisterType::Stationary,
        RegisterType::Drive,
        RegisterType::Kiosk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RegisterType::Stationary => "stationary",
            RegisterType::Drive => "drive",
            RegisterType::Kiosk => "kiosk",
        }
    }
}

impl fmt::Display for RegisterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order size category, which bounds item quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSize {
    Small,
    Large,
}

impl OrderSize {
    /// Largest quantity of a single item in an order of this size.
    pub fn max_quantity(self) -> u32 {
        match self {
            OrderSize::Small => 2,
            OrderSize::Large => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderSize::Small => "small",
            OrderSize::Large => "large",
        }
    }
}

impl fmt::Display for OrderSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthetic point-of-sale order.
///
/// Field order is the serialized field order consumers rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub timestamp: DateTime<Utc>,
    pub restaurant_id: String,
    pub register_type: RegisterType,
    pub register_id: String,
    pub employee_id: String,
    pub order_size: OrderSize,
    pub items: ItemQuantities,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Same instant as `timestamp`; fulfillment delay is not modeled
    pub processing_time: DateTime<Utc>,
    #[serde(rename = "IsWeather")]
    pub weather: WeatherState,
}

/// Column names in serialized order.
pub const ORDER_FIELDS: [&str; 11] = [
    "order_id",
    "timestamp",
    "restaurant_id",
    "register_type",
    "register_id",
    "employee_id",
    "order_size",
    "items",
    "total_amount",
    "processing_time",
    "IsWeather",
];

/// Error type for order generation.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// No identifier could be allocated for the order
    #[error("Failed to allocate order id: {0}")]
    Sequence(#[from] SequenceError),

    /// The profile cannot be drawn from
    #[error("Invalid profile: {0}")]
    Profile(#[from] ProfileError),
}

/// Assembles orders from a profile, a weather snapshot and random draws.
pub struct OrderFactory<S> {
    restaurant_id: String,
    employees: Vec<String>,
    stationary: Vec<String>,
    drive: Vec<String>,
    kiosk: Vec<String>,
    sequence: S,
}

impl<S: SequenceAllocator> OrderFactory<S> {
    /// Create a factory drawing from the pools of `profile`.
    pub fn new(profile: &SimulationProfile, sequence: S) -> Result<Self, GeneratorError> {
        profile.validate()?;
        Ok(Self {
            restaurant_id: profile.restaurant_id.clone(),
            employees: profile.employee_ids(),
            stationary: profile.register_ids(RegisterType::Stationary),
            drive: profile.register_ids(RegisterType::Drive),
            kiosk: profile.register_ids(RegisterType::Kiosk),
            sequence,
        })
    }

    fn registers(&self, register_type: RegisterType) -> &[String] {
        match register_type {
            RegisterType::Stationary => &self.stationary,
            RegisterType::Drive => &self.drive,
            RegisterType::Kiosk => &self.kiosk,
        }
    }

    /// Build one order placed at `timestamp` under `weather`.
    ///
    /// The identifier is allocated last, so a failed allocation consumes
    /// random draws but never an identifier.
    pub fn create<R: Rng>(
        &mut self,
        rng: &mut R,
        timestamp: DateTime<Utc>,
        weather: WeatherState,
    ) -> Result<OrderRecord, GeneratorError> {
        let register_type = RegisterType::ALL[rng.gen_range(0..RegisterType::ALL.len())];
        let registers = self.registers(register_type);
        // pools are non-empty, checked by `SimulationProfile::validate`
        let register_id = registers[rng.gen_range(0..registers.len())].clone();
        let employee_id = self.employees[rng.gen_range(0..self.employees.len())].clone();

        let order_size = if rng.gen_bool(SMALL_ORDER_PROBABILITY) {
            OrderSize::Small
        } else {
            OrderSize::Large
        };

        let item_set = generate_items(rng, order_size);
        let order_id = self.sequence.next_id()?;

        Ok(OrderRecord {
            order_id,
            timestamp,
            restaurant_id: self.restaurant_id.clone(),
            register_type,
            register_id,
            employee_id,
            order_size,
            items: item_set.items,
            total_amount: item_set.total,
            processing_time: timestamp,
            weather,
        })
    }

    /// The allocator backing this factory.
    pub fn sequence(&self) -> &S {
        &self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::price_items;
    use crate::sequence::{parse_order_id, InMemorySequence};
    use crate::weather::WeatherCondition;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    /// Allocator whose store is down.
    struct UnavailableSequence;

    impl SequenceAllocator for UnavailableSequence {
        fn next_id(&mut self) -> Result<String, SequenceError> {
            Err(SequenceError::Unavailable(std::io::Error::other("disk gone")))
        }
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn weather() -> WeatherState {
        WeatherState {
            temperature: 18.3,
            humidity: 61.2,
            condition: WeatherCondition::Cloudy,
        }
    }

    #[test]
    fn test_create_populates_all_fields() {
        let profile = SimulationProfile::default();
        let mut factory = OrderFactory::new(&profile, InMemorySequence::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let order = factory.create(&mut rng, ts(), weather()).unwrap();

        assert_eq!(order.order_id, "order_1");
        assert_eq!(order.timestamp, ts());
        assert_eq!(order.processing_time, order.timestamp);
        assert_eq!(order.restaurant_id, "restaurant_001");
        assert!(order
            .register_id
            .starts_with(&format!("{}_", order.register_type)));
        assert!(profile.employee_ids().contains(&order.employee_id));
        assert_eq!(order.weather, weather());
        assert_eq!(order.total_amount, price_items(&order.items));
        for qty in order.items.values() {
            assert!(*qty >= 1 && *qty <= order.order_size.max_quantity());
        }
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut factory =
            OrderFactory::new(&SimulationProfile::default(), InMemorySequence::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let mut last = 0;
        for _ in 0..1_000 {
            let order = factory.create(&mut rng, ts(), weather()).unwrap();
            let n = parse_order_id(&order.order_id).unwrap();
            assert!(n > last);
            last = n;
        }
        assert_eq!(factory.sequence().last(), 1_000);
    }

    #[test]
    fn test_context_distribution() {
        let profile = SimulationProfile::default();
        let mut factory = OrderFactory::new(&profile, InMemorySequence::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 20_000;

        let mut small = 0u32;
        let mut by_type: HashMap<RegisterType, u32> = HashMap::new();
        for _ in 0..trials {
            let order = factory.create(&mut rng, ts(), weather()).unwrap();
            if order.order_size == OrderSize::Small {
                small += 1;
            }
            *by_type.entry(order.register_type).or_default() += 1;
            assert!(profile
                .register_ids(order.register_type)
                .contains(&order.register_id));
        }

        let small_rate = f64::from(small) / f64::from(trials);
        assert!((small_rate - SMALL_ORDER_PROBABILITY).abs() < 0.02);

        for register_type in RegisterType::ALL {
            let rate = f64::from(by_type[&register_type]) / f64::from(trials);
            assert!((rate - 1.0 / 3.0).abs() < 0.02, "{register_type}: {rate}");
        }
    }

    #[test]
    fn test_allocation_failure_propagates() {
        let mut factory =
            OrderFactory::new(&SimulationProfile::default(), UnavailableSequence).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let result = factory.create(&mut rng, ts(), weather());
        assert!(matches!(
            result,
            Err(GeneratorError::Sequence(SequenceError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let mut profile = SimulationProfile::default();
        profile.registers.kiosk = 0;
        let result = OrderFactory::new(&profile, InMemorySequence::new());
        assert!(matches!(result, Err(GeneratorError::Profile(_))));
    }

    #[test]
    fn test_json_field_order() {
        let mut factory =
            OrderFactory::new(&SimulationProfile::default(), InMemorySequence::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let order = factory.create(&mut rng, ts(), weather()).unwrap();

        let json = serde_json::to_string(&order).unwrap();
        let mut last_pos = 0;
        for field in ORDER_FIELDS {
            let pos = json
                .find(&format!("\"{field}\":"))
                .unwrap_or_else(|| panic!("missing field {field}"));
            assert!(pos >= last_pos, "field {field} out of order");
            last_pos = pos;
        }
        assert!(json.contains(r#""timestamp":"2025-01-01T12:00:00Z""#));
        assert!(json.contains(r#""IsWeather":{"temperature":18.3,"humidity":61.2,"condition":"cloudy"}"#));
    }

    #[test]
    fn test_json_roundtrip_keeps_items() {
        let mut factory =
            OrderFactory::new(&SimulationProfile::default(), InMemorySequence::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..200 {
            let order = factory.create(&mut rng, ts(), weather()).unwrap();
            let json = serde_json::to_string(&order).unwrap();
            let parsed: OrderRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, order);
        }
    }
}
