//! LFU Tests.

use cachesim_core::policy::LfuPolicy;
use cachesim_core::{EvictionPolicy, Outcome};
use pretty_assertions::assert_eq;

#[test]
fn lfu_counts_accesses() {
    let mut policy = LfuPolicy::new(4);
    let _ = policy.access(&1);
    let _ = policy.access(&1);
    let _ = policy.access(&1);
    let _ = policy.access(&2);
    assert_eq!(policy.frequency(&1), Some(3));
    assert_eq!(policy.frequency(&2), Some(1));
    assert_eq!(policy.frequency(&3), None);
}

#[test]
fn lfu_evicts_least_frequent() {
    let mut policy = LfuPolicy::new(2);
    let _ = policy.access(&1);
    let _ = policy.access(&1);
    let _ = policy.access(&2);
    let access = policy.access(&3);
    assert_eq!(access.outcome, Outcome::Miss);
    assert_eq!(access.evicted, Some(2));
    assert!(policy.contains(&1));
}

/// Equal counts fall back to recency: the oldest key in the bucket goes first.
#[test]
fn lfu_ties_break_by_age() {
    let mut policy = LfuPolicy::new(3);
    let _ = policy.access(&1);
    let _ = policy.access(&2);
    let _ = policy.access(&3);
    assert_eq!(policy.access(&4).evicted, Some(1));
    assert_eq!(policy.access(&5).evicted, Some(2));
}

#[test]
fn lfu_evict_one_drains_lowest_bucket_first() {
    let mut policy = LfuPolicy::new(3);
    for key in [1, 1, 2, 3, 3, 3] {
        let _ = policy.access(&key);
    }
    assert_eq!(policy.evict_one(), Some(2));
    assert_eq!(policy.evict_one(), Some(1));
    assert_eq!(policy.evict_one(), Some(3));
    assert_eq!(policy.evict_one(), None);
    assert_eq!(policy.occupancy(), 0);
    assert_eq!(policy.drain_faults().len(), 1);
}

#[test]
fn lfu_clear_resets_counts() {
    let mut policy = LfuPolicy::new(2);
    let _ = policy.access(&1);
    let _ = policy.access(&1);
    policy.clear();
    assert_eq!(policy.occupancy(), 0);
    assert_eq!(policy.frequency(&1), None);
}
