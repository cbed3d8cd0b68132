//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! Evicts keys in insertion order. Hits leave the queue untouched, which makes
//! FIFO a cheap admission tier: a key's stay is bounded by the tier size no
//! matter how often it is hit.
//!
//! # Performance
//!
//! - **Time Complexity:** O(1) expected for every operation
//! - **Space Complexity:** O(C) where C is the capacity

use super::list::KeyList;
use super::lru::preallocation;
use super::{Access, EvictionPolicy};
use crate::common::{ConsistencyFault, FaultLog, SimKey};

/// FIFO policy state.
#[derive(Debug)]
pub struct FifoQueue<K> {
    queue: KeyList<K>,
    capacity: u64,
    faults: FaultLog,
}

impl<K: SimKey> FifoQueue<K> {
    /// Creates an empty queue holding at most `capacity` keys.
    pub fn new(capacity: u64) -> Self {
        Self {
            queue: KeyList::with_capacity(preallocation(capacity)),
            capacity,
            faults: FaultLog::new(),
        }
    }
}

impl<K: SimKey> EvictionPolicy<K> for FifoQueue<K> {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn capacity(&self) -> u64 {
        self.capacity
    }

    fn occupancy(&self) -> u64 {
        self.queue.len() as u64
    }

    fn contains(&self, key: &K) -> bool {
        self.queue.contains(key)
    }

    fn access(&mut self, key: &K) -> Access<K> {
        if self.queue.contains(key) {
            return Access::hit();
        }
        let evicted = if self.occupancy() >= self.capacity {
            self.queue.pop_front()
        } else {
            None
        };
        let _ = self.queue.push_back(key.clone());
        Access::miss(evicted)
    }

    fn evict_one(&mut self) -> Option<K> {
        let victim = self.queue.pop_front();
        if victim.is_none() {
            self.faults
                .record(ConsistencyFault::EvictFromEmpty { policy: "fifo" });
        }
        victim
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn drain_faults(&mut self) -> Vec<ConsistencyFault> {
        self.faults.drain()
    }
}
