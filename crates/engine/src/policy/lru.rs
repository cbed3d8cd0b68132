//! Least Recently Used (LRU) Replacement Policy.
//!
//! The baseline policy. Resident keys are kept in a recency-ordered list with the
//! most recently used key at the tail. A hit moves the key to the tail; a miss
//! appends it, first evicting the head if the queue is full. Insertion order is
//! total, so the victim is always unique.
//!
//! # Performance
//!
//! - **Time Complexity:** `contains()`, `access()`, `evict_one()`: O(1) expected
//! - **Space Complexity:** O(C) where C is the capacity
//! - **Best Case:** Workloads with strong temporal locality
//! - **Worst Case:** Cyclic scans larger than the capacity (thrashing)

use super::list::KeyList;
use super::{Access, EvictionPolicy};
use crate::common::{ConsistencyFault, FaultLog, SimKey};

/// LRU policy state.
#[derive(Debug)]
pub struct RecencyQueue<K> {
    /// Head is LRU, tail is MRU.
    order: KeyList<K>,
    capacity: u64,
    faults: FaultLog,
}

impl<K: SimKey> RecencyQueue<K> {
    /// Creates an empty queue holding at most `capacity` keys.
    pub fn new(capacity: u64) -> Self {
        Self {
            order: KeyList::with_capacity(preallocation(capacity)),
            capacity,
            faults: FaultLog::new(),
        }
    }

    /// The key that would be evicted next.
    pub fn peek_lru(&self) -> Option<&K> {
        self.order.front()
    }

    /// Resident keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }
}

impl<K: SimKey> EvictionPolicy<K> for RecencyQueue<K> {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn capacity(&self) -> u64 {
        self.capacity
    }

    fn occupancy(&self) -> u64 {
        self.order.len() as u64
    }

    fn contains(&self, key: &K) -> bool {
        self.order.contains(key)
    }

    /// Moves a resident key to the MRU end, or inserts it after evicting the LRU
    /// key when the queue is full.
    fn access(&mut self, key: &K) -> Access<K> {
        if self.order.move_to_back(key) {
            return Access::hit();
        }
        let evicted = if self.occupancy() >= self.capacity {
            self.order.pop_front()
        } else {
            None
        };
        let _ = self.order.push_back(key.clone());
        Access::miss(evicted)
    }

    fn evict_one(&mut self) -> Option<K> {
        let victim = self.order.pop_front();
        if victim.is_none() {
            self.faults
                .record(ConsistencyFault::EvictFromEmpty { policy: "lru" });
        }
        victim
    }

    fn clear(&mut self) {
        self.order.clear();
    }

    fn drain_faults(&mut self) -> Vec<ConsistencyFault> {
        self.faults.drain()
    }
}

/// Upper bound on up-front allocation so huge capacities grow lazily.
pub(crate) fn preallocation(capacity: u64) -> usize {
    const MAX_PREALLOC: u64 = 1 << 16;
    capacity.min(MAX_PREALLOC) as usize
}
