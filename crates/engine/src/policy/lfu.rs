//! Least Frequently Used (LFU) Replacement Policy.
//!
//! Keys are grouped into buckets by access count. The victim is the oldest key
//! of the lowest-count bucket, so ties between equally popular keys fall back to
//! recency. Used as the default retention tier of a cascade: keys promoted from
//! admission start at count 1 and must earn their stay.
//!
//! # Performance
//!
//! - **Time Complexity:** O(log F) where F is the number of distinct counts
//! - **Space Complexity:** O(C) where C is the capacity

use std::collections::{BTreeMap, HashMap};

use super::list::KeyList;
use super::lru::preallocation;
use super::{Access, EvictionPolicy};
use crate::common::{ConsistencyFault, FaultLog, SimKey};

/// LFU policy state.
#[derive(Debug)]
pub struct LfuPolicy<K> {
    counts: HashMap<K, u64>,
    /// Access count -> keys with that count, oldest first.
    buckets: BTreeMap<u64, KeyList<K>>,
    capacity: u64,
    faults: FaultLog,
}

impl<K: SimKey> LfuPolicy<K> {
    /// Creates an empty policy holding at most `capacity` keys.
    pub fn new(capacity: u64) -> Self {
        Self {
            counts: HashMap::with_capacity(preallocation(capacity)),
            buckets: BTreeMap::new(),
            capacity,
            faults: FaultLog::new(),
        }
    }

    /// Access count of a resident key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.counts.get(key).copied()
    }

    fn bucket_insert(&mut self, count: u64, key: K) {
        let _ = self.buckets.entry(count).or_default().push_back(key);
    }

    fn bucket_remove(&mut self, count: u64, key: &K) {
        if let Some(bucket) = self.buckets.get_mut(&count) {
            let _ = bucket.remove(key);
            if bucket.is_empty() {
                let _ = self.buckets.remove(&count);
            }
        }
    }

    fn pop_victim(&mut self) -> Option<K> {
        let mut entry = self.buckets.first_entry()?;
        let victim = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            let _ = entry.remove();
        }
        if let Some(key) = &victim {
            let _ = self.counts.remove(key);
        }
        victim
    }
}

impl<K: SimKey> EvictionPolicy<K> for LfuPolicy<K> {
    fn name(&self) -> &'static str {
        "lfu"
    }

    fn capacity(&self) -> u64 {
        self.capacity
    }

    fn occupancy(&self) -> u64 {
        self.counts.len() as u64
    }

    fn contains(&self, key: &K) -> bool {
        self.counts.contains_key(key)
    }

    fn access(&mut self, key: &K) -> Access<K> {
        if let Some(count) = self.counts.get_mut(key) {
            let old = *count;
            *count = old.saturating_add(1);
            let new = *count;
            self.bucket_remove(old, key);
            self.bucket_insert(new, key.clone());
            return Access::hit();
        }
        let evicted = if self.occupancy() >= self.capacity {
            self.pop_victim()
        } else {
            None
        };
        let _ = self.counts.insert(key.clone(), 1);
        self.bucket_insert(1, key.clone());
        Access::miss(evicted)
    }

    fn evict_one(&mut self) -> Option<K> {
        let victim = self.pop_victim();
        if victim.is_none() {
            self.faults
                .record(ConsistencyFault::EvictFromEmpty { policy: "lfu" });
        }
        victim
    }

    fn clear(&mut self) {
        self.counts.clear();
        self.buckets.clear();
    }

    fn drain_faults(&mut self) -> Vec<ConsistencyFault> {
        self.faults.drain()
    }
}
