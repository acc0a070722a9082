//! Durable order id counters for order-sim
//!
//! Order identifiers must keep increasing across restarts, so the last
//! allocated value is persisted before an identifier is handed out.
//!
//! ## Storage Backends
//!
//! - `FileSequence` - Stores the counter as a plain integer in a text file
//!
//! The in-memory allocator used by tests and dry runs lives in
//! `order_generator::InMemorySequence`.

mod filesystem;


pub use filesystem::FileSequence;

// Re-export the allocator trait so callers only need this crate
pub use order_generator::{SequenceAllocator, SequenceError};

/// Default counter file name, relative to the working directory.
pub const DEFAULT_COUNTER_FILE: &str = "order_id_counter.txt";
