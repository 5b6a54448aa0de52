//! Message id generation
//!
//! The store takes the generator as an injected dependency so tests can use
//! deterministic ids.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::MessageId;

/// Source of unique message ids.
pub trait IdGenerator: Send + Sync {
    /// Produce the next id
    fn next_id(&self) -> MessageId;
}

/// Default generator: random v4 uuids.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> MessageId {
        MessageId::new(format!("msg-{}", uuid::Uuid::new_v4()))
    }
}

/// Deterministic sequential generator for tests.
#[derive(Debug, Default)]
pub struct SequenceIds {
    next: AtomicU64,
}

impl SequenceIds {
    /// Create a generator starting at `msg-0`
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequenceIds {
    fn next_id(&self) -> MessageId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        MessageId::new(format!("msg-{n}"))
    }
}
