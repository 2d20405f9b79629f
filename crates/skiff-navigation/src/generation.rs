//! Generation tokens for invalidating stale asynchronous results.
//!
//! Every superseding event (navigation, tab switch, keystroke) advances a
//! [`Generation`]. Work that crosses a suspension point carries the
//! [`Ticket`] it was issued under and applies its result only while that
//! ticket is still current.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Generation {
    counter: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate every outstanding ticket and issue a fresh one.
    pub fn advance(&self) -> Ticket {
        let value = self.counter.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            value,
            counter: Arc::clone(&self.counter),
        }
    }

    /// A ticket for the current generation, without invalidating anything.
    pub fn ticket(&self) -> Ticket {
        Ticket {
            value: self.counter.load(Ordering::Acquire),
            counter: Arc::clone(&self.counter),
        }
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    value: u64,
    counter: Arc<AtomicU64>,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::Acquire) == self.value
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_invalidates_outstanding_tickets() {
        let generation = Generation::new();
        let first = generation.ticket();
        assert!(first.is_current());

        let second = generation.advance();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(second.value(), first.value() + 1);
    }

    #[test]
    fn test_clones_share_the_counter() {
        let generation = Generation::new();
        let shared = generation.clone();
        let ticket = generation.ticket();

        shared.advance();
        assert!(!ticket.is_current());
        assert_eq!(generation.current(), 1);
    }
}
