//! Reputation Memory
//!
//! A bounded, least-recently-used record of whether past exchanges with a
//! given opponent went well.

use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;

use crate::components::agent::AgentId;

/// Fixed-capacity LRU map from opponent id to "trustworthy".
///
/// Writes and the owner's own lookups refresh recency; peeking (as a
/// neighbour consulting the role model does) does not.
pub struct ReputationMemory {
    entries: LruCache<AgentId, bool>,
}

impl ReputationMemory {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Looks up `partner` and marks the entry as recently used.
    pub fn recall(&mut self, partner: AgentId) -> Option<bool> {
        self.entries.get(&partner).copied()
    }

    /// Looks up `partner` without touching recency.
    pub fn peek(&self, partner: AgentId) -> Option<bool> {
        self.entries.peek(&partner).copied()
    }

    /// Stores the outcome with `partner`, evicting the least recently used
    /// entry when full.
    pub fn remember(&mut self, partner: AgentId, trustworthy: bool) {
        self.entries.put(partner, trustworthy);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl fmt::Debug for ReputationMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReputationMemory")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
