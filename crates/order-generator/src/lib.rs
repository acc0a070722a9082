//! Synthetic restaurant order generator.
//!
//! This crate produces point-of-sale order records with a plausible
//! statistical shape: a slowly drifting weather walk, probabilistic item
//! selection and randomly drawn register/employee/size context. All
//! randomness comes from an explicit RNG so that runs can be reproduced
//! from a seed.
//!
//! # Architecture
//!
//! ```text
//! driver loop (stream / historical)
//!        │ timestamp
//!        ▼
//! ┌──────────────────────┐
//! │   OrderSimulator     │
//! │                      │
//! │  - rng (StdRng)      │
//! │  - WeatherModel ─────┼──► step() ──► WeatherState
//! │  - OrderFactory      │                    │
//! │      ├ generate_items│                    │
//! │      └ SequenceAllocator                  │
//! └──────────┬───────────┘◄───────────────────┘
//!            ▼
//!       OrderRecord
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use order_generator::{InMemorySequence, OrderSimulator, SimulationProfile};
//!
//! let profile = SimulationProfile::default();
//! let mut simulator = OrderSimulator::new(&profile, InMemorySequence::new(), 42).unwrap();
//! let order = simulator.next_order(Utc::now()).unwrap();
//! assert_eq!(order.order_id, "order_1");
//! assert_eq!(order.restaurant_id, "restaurant_001");
//! ```

pub mod generator;
pub mod menu;
pub mod order;
pub mod profile;
pub mod sequence;
pub mod timestamp;
pub mod weather;

// Re-exports for convenience
pub use generator::OrderSimulator;
pub use menu::{generate_items, price_items, ItemQuantities, ItemSet, MenuItem};
pub use order::{
    GeneratorError, OrderFactory, OrderRecord, OrderSize, RegisterType, ORDER_FIELDS,
    SMALL_ORDER_PROBABILITY,
};
pub use profile::{ProfileError, RegisterPoolSizes, SimulationProfile};
pub use sequence::{
    format_order_id, parse_order_id, InMemorySequence, SequenceAllocator, SequenceError,
};
pub use timestamp::{parse_timestamp, HistoricalRange};
pub use weather::{WeatherCondition, WeatherModel, WeatherState};
