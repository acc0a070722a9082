//! Order identifier allocation.
//!
//! The generator only needs a source of strictly increasing identifiers.
//! Where the counter lives (memory, a file, a database) is up to the
//! implementation; see `order-sequence` for the file-backed one.

/// Prefix shared by every order identifier.
pub const ORDER_ID_PREFIX: &str = "order_";

/// Error type for identifier allocation.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// The backing store could not be read or written
    #[error("Sequence store unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// The backing store holds something that is not a counter
    #[error("Sequence store is corrupt: {0}")]
    Corrupt(String),

    /// The counter cannot be advanced any further
    #[error("Sequence exhausted")]
    Exhausted,
}

/// Source of unique, strictly increasing order identifiers.
pub trait SequenceAllocator {
    /// Allocate the next identifier.
    ///
    /// A failed call must leave the allocator able to hand out the same
    /// identifier on the next attempt.
    fn next_id(&mut self) -> Result<String, SequenceError>;
}

impl<T: SequenceAllocator + ?Sized> SequenceAllocator for Box<T> {
    fn next_id(&mut self) -> Result<String, SequenceError> {
        (**self).next_id()
    }
}

impl<T: SequenceAllocator + ?Sized> SequenceAllocator for &mut T {
    fn next_id(&mut self) -> Result<String, SequenceError> {
        (**self).next_id()
    }
}

/// Format counter value `n` as an order identifier.
pub fn format_order_id(n: u64) -> String {
    format!("{ORDER_ID_PREFIX}{n}")
}

/// Extract the counter value from an order identifier.
pub fn parse_order_id(id: &str) -> Option<u64> {
    id.strip_prefix(ORDER_ID_PREFIX)?.parse().ok()
}

/// Non-durable allocator, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct InMemorySequence {
    last: u64,
}

impl InMemorySequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after a previously allocated value.
    pub fn starting_after(last: u64) -> Self {
        Self { last }
    }

    /// Last value handed out (0 if none).
    pub fn last(&self) -> u64 {
        self.last
    }
}

impl SequenceAllocator for InMemorySequence {
    fn next_id(&mut self) -> Result<String, SequenceError> {
        let next = self.last.checked_add(1).ok_or(SequenceError::Exhausted)?;
        self.last = next;
        Ok(format_order_id(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_sequence_increments() {
        let mut seq = InMemorySequence::new();
        assert_eq!(seq.next_id().unwrap(), "order_1");
        assert_eq!(seq.next_id().unwrap(), "order_2");
        assert_eq!(seq.next_id().unwrap(), "order_3");
        assert_eq!(seq.last(), 3);
    }

    #[test]
    fn test_starting_after() {
        let mut seq = InMemorySequence::starting_after(41);
        assert_eq!(seq.next_id().unwrap(), "order_42");
    }

    #[test]
    fn test_exhausted() {
        let mut seq = InMemorySequence::starting_after(u64::MAX);
        assert!(matches!(seq.next_id(), Err(SequenceError::Exhausted)));
        assert_eq!(seq.last(), u64::MAX);
    }

    #[test]
    fn test_parse_order_id() {
        assert_eq!(parse_order_id("order_17"), Some(17));
        assert_eq!(parse_order_id(&format_order_id(9000)), Some(9000));
        assert_eq!(parse_order_id("order_"), None);
        assert_eq!(parse_order_id("ticket_3"), None);
    }

    #[test]
    fn test_boxed_allocator() {
        let mut seq: Box<dyn SequenceAllocator> = Box::new(InMemorySequence::new());
        assert_eq!(seq.next_id().unwrap(), "order_1");
        assert_eq!(seq.next_id().unwrap(), "order_2");
    }
}
