//! Identifier generation for new destination records.

use std::collections::VecDeque;
use std::sync::Mutex;

use uuid::Uuid;

/// Source of unique identifiers for new records.
pub trait IdGenerator: Send + Sync {
    /// Produce the next unique identifier.
    fn next(&self) -> Uuid;
}

/// Random v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// A fixed identifier sequence, for deterministic tests.
///
/// Falls back to random identifiers once the sequence is exhausted.
#[derive(Debug, Default)]
pub struct FixedIds {
    queue: Mutex<VecDeque<Uuid>>,
}

impl FixedIds {
    /// Create a generator yielding the given identifiers in order.
    pub fn new(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            queue: Mutex::new(ids.into_iter().collect()),
        }
    }
}

impl IdGenerator for FixedIds {
    fn next(&self) -> Uuid {
        match self.queue.lock() {
            Ok(mut queue) => queue.pop_front().unwrap_or_else(Uuid::new_v4),
            Err(_) => Uuid::new_v4(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_ids_yield_in_order_then_fall_back() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let ids = FixedIds::new([first, second]);

        assert_eq!(ids.next(), first);
        assert_eq!(ids.next(), second);
        // Exhausted: still yields something usable.
        let fallback = ids.next();
        assert_ne!(fallback, first);
        assert_ne!(fallback, second);
    }
}
