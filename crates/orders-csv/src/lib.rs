//! Historical CSV emitter for order-sim.
//!
//! Writes generated orders to a flat CSV file, one row per order, with the
//! columns in serialized field order. The nested `items` and `IsWeather`
//! columns hold compact JSON objects. The reader in this crate parses such a
//! file back into `OrderRecord`s.
//!
//! # Example
//!
//! ```ignore
//! use orders_csv::CsvPopulator;
//!
//! let range = HistoricalRange::new(start, end, Duration::from_secs(15)).unwrap();
//! let metrics = CsvPopulator::new("orders.csv").populate(&mut simulator, range)?;
//! ```

mod error;
mod populator;
mod record;

pub use error::CsvOrderError;
pub use populator::{CsvPopulator, PopulateMetrics, DEFAULT_BUFFER_SIZE};
pub use record::{read_orders, read_orders_from_reader, CsvOrderWriter};
