//! Admission/Retention Cascade Tests.
//!
//! Covers tier sizing, the promotion path from admission into retention, the
//! degenerate single-tier cascade, and the recovered consistency faults.

use cachesim_core::common::{ConfigError, ConsistencyFault};
use cachesim_core::config::{TierConfig, TierPolicy};
use cachesim_core::policy::{CascadePolicy, FifoQueue, RecencyQueue};
use cachesim_core::{Access, EvictionPolicy, Outcome};
use pretty_assertions::assert_eq;

use crate::common::harness::{CapturedLogs, init_tracing};

fn recency_tiers() -> TierConfig {
    TierConfig {
        admission: TierPolicy::Recency,
        retention: TierPolicy::Recency,
    }
}

#[test]
fn cascade_splits_capacity() {
    let policy = CascadePolicy::<u64>::new(10, 3, &TierConfig::default()).unwrap();
    assert_eq!(policy.admission_capacity(), 3);
    assert_eq!(policy.retention_capacity(), 7);
    assert_eq!(policy.capacity(), 10);
    assert_eq!(policy.admission().name(), "lru");
    assert_eq!(policy.retention().map(|r| r.name()), Some("lfu"));
}

#[test]
fn cascade_without_room_has_no_retention() {
    let policy = CascadePolicy::<u64>::new(4, 4, &TierConfig::default()).unwrap();
    assert!(policy.retention().is_none());
    assert_eq!(policy.retention_capacity(), 0);
    assert_eq!(policy.capacity(), 4);
}

#[test]
fn cascade_rejects_bad_admission() {
    let zero = CascadePolicy::<u64>::new(4, 0, &TierConfig::default()).unwrap_err();
    assert!(matches!(zero, ConfigError::ZeroAdmission));
    let too_big = CascadePolicy::<u64>::new(4, 5, &TierConfig::default()).unwrap_err();
    assert!(matches!(
        too_big,
        ConfigError::AdmissionExceedsCapacity {
            admission: 5,
            total: 4
        }
    ));
    let empty = CascadePolicy::<u64>::new(0, 0, &TierConfig::default()).unwrap_err();
    assert!(matches!(empty, ConfigError::ZeroCapacity));
}

/// Admission 1, retention 1, keys [A, B, A]: B pushes A into retention and the
/// third access hits there.
#[test]
fn cascade_promotes_admission_victim() {
    init_tracing();
    const A: u64 = 1;
    const B: u64 = 2;
    let mut policy = CascadePolicy::new(2, 1, &recency_tiers()).unwrap();

    assert_eq!(policy.access(&A), Access::miss(None));
    assert!(policy.admission().contains(&A));

    assert_eq!(policy.access(&B), Access::miss(None));
    assert!(policy.admission().contains(&B));
    assert!(!policy.admission().contains(&A));
    assert!(policy.retention().is_some_and(|r| r.contains(&A)));

    assert_eq!(policy.access(&A), Access::hit());
    assert!(policy.retention().is_some_and(|r| r.contains(&A)));
    assert_eq!(policy.occupancy(), 2);
}

#[test]
fn cascade_eviction_leaves_from_retention() {
    let mut policy = CascadePolicy::new(3, 1, &recency_tiers()).unwrap();
    // 1 -> admission; 2 demotes 1; 3 demotes 2; retention now [1, 2].
    for key in [1, 2, 3] {
        assert_eq!(policy.access(&key).evicted, None);
    }
    // 4 demotes 3 into a full retention, which drops its LRU key 1.
    assert_eq!(policy.access(&4), Access::miss(Some(1)));
    assert!(!policy.contains(&1));
    assert_eq!(policy.occupancy(), 3);
}

#[test]
fn cascade_degenerate_discards_admission_victim() {
    let mut policy = CascadePolicy::new(1, 1, &recency_tiers()).unwrap();
    assert_eq!(policy.access(&1), Access::miss(None));
    assert_eq!(policy.access(&2), Access::miss(Some(1)));
    assert_eq!(policy.access(&1), Access::miss(Some(2)));
}

#[test]
fn cascade_admission_hit_stays_in_admission() {
    let mut policy = CascadePolicy::new(4, 2, &recency_tiers()).unwrap();
    let _ = policy.access(&1);
    assert_eq!(policy.access(&1).outcome, Outcome::Hit);
    assert!(policy.admission().contains(&1));
    assert_eq!(policy.retention().map(|r| r.occupancy()), Some(0));
}

#[test]
fn cascade_evict_one_prefers_retention() {
    let mut policy = CascadePolicy::new(3, 1, &recency_tiers()).unwrap();
    for key in [1, 2, 3] {
        let _ = policy.access(&key);
    }
    // Retention holds [1, 2], admission holds 3.
    assert_eq!(policy.evict_one(), Some(1));
    assert_eq!(policy.evict_one(), Some(2));
    assert_eq!(policy.evict_one(), Some(3));
    assert_eq!(policy.evict_one(), None);
    assert_eq!(
        policy.drain_faults(),
        vec![ConsistencyFault::EvictFromEmpty { policy: "cascade" }]
    );
}

#[test]
fn cascade_clear_empties_both_tiers() {
    let mut policy = CascadePolicy::new(3, 1, &recency_tiers()).unwrap();
    for key in [1, 2, 3] {
        let _ = policy.access(&key);
    }
    policy.clear();
    assert_eq!(policy.occupancy(), 0);
    assert!(!policy.contains(&1));
}

/// Tiers wired by hand so that both hold the same key. The cascade reports the
/// duplication on the admission hit and again on the promotion, and keeps going.
#[test]
fn cascade_reports_duplicate_across_tiers() {
    init_tracing();
    let mut admission = FifoQueue::new(1);
    let _ = admission.access(&10);
    let mut retention = RecencyQueue::new(4);
    let _ = retention.access(&10);
    let mut policy = CascadePolicy::<u64>::from_tiers(Box::new(admission), Some(Box::new(retention)));

    assert_eq!(policy.access(&10).outcome, Outcome::Hit);
    // 11 demotes 10 into retention, which already holds it.
    assert_eq!(policy.access(&11), Access::miss(None));
    assert!(policy.contains(&10));
    assert!(policy.contains(&11));

    let faults = policy.drain_faults();
    assert_eq!(faults.len(), 2);
    assert!(faults.iter().all(|f| matches!(
        f,
        ConsistencyFault::DuplicateAcrossTiers { policy: "cascade", .. }
    )));
}

#[test]
fn cascade_evict_one_on_empty_single_tier() {
    let admission = RecencyQueue::<u64>::new(1);
    let mut policy = CascadePolicy::<u64>::from_tiers(Box::new(admission), None);
    assert_eq!(policy.evict_one(), None);
    assert_eq!(
        policy.drain_faults(),
        vec![ConsistencyFault::EvictFromEmpty { policy: "cascade" }]
    );
}

#[test]
fn cascade_with_fifo_admission_and_lfu_retention() {
    let tiers = TierConfig {
        admission: TierPolicy::Fifo,
        retention: TierPolicy::Lfu,
    };
    let mut policy = CascadePolicy::new(3, 1, &tiers).unwrap();
    // 1 and 2 go through admission into retention.
    for key in [1, 2, 3] {
        let _ = policy.access(&key);
    }
    // Make 1 popular in retention.
    for _ in 0..3 {
        assert_eq!(policy.access(&1).outcome, Outcome::Hit);
    }
    // 4 demotes 3; retention is full and drops its least frequent key 2.
    assert_eq!(policy.access(&4).evicted, Some(2));
    assert!(policy.contains(&1));
}

#[test]
fn cascade_forwards_tier_faults_without_relogging() {
    let logs = CapturedLogs::default();
    let faults = logs.capture(|| {
        let mut admission = RecencyQueue::<u64>::new(2);
        assert_eq!(admission.evict_one(), None);
        let mut cascade = CascadePolicy::<u64>::from_tiers(Box::new(admission), None);
        cascade.drain_faults()
    });

    assert_eq!(faults, vec![ConsistencyFault::EvictFromEmpty { policy: "lru" }]);
    assert_eq!(logs.contents().matches("consistency fault recovered").count(), 1);
}
