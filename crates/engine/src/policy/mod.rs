//! Cache Replacement Policies.
//!
//! Implements the eviction strategies replayed by the simulator. Every strategy
//! implements [`EvictionPolicy`] and holds unit-size items only; sized requests are
//! split into blocks before they reach a policy.
//!
//! # Policies
//!
//! - `RecencyQueue`: Least Recently Used (the baseline).
//! - `FifoQueue`: First-In, First-Out.
//! - `LfuPolicy`: Least Frequently Used, recency tie-break.
//! - `CascadePolicy`: Admission tier cascading into a retention tier.

/// Admission/retention cascade.
pub mod cascade;

/// First-In, First-Out policy.
pub mod fifo;

/// Least Frequently Used policy.
pub mod lfu;

/// Arena-indexed key list shared by the queue-based policies.
pub mod list;

/// Least Recently Used baseline policy.
pub mod lru;

pub use cascade::CascadePolicy;
pub use fifo::FifoQueue;
pub use lfu::LfuPolicy;
pub use lru::RecencyQueue;

use crate::common::{ConfigError, ConsistencyFault, SimKey};
use crate::config::{self, PolicyKind, TierConfig, TierPolicy};

/// Result of looking a key up on access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The key was resident.
    Hit,
    /// The key was absent and has been inserted.
    Miss,
}

impl Outcome {
    /// Returns true for [`Outcome::Hit`].
    #[inline]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// Everything an access changed: the outcome and the key that left the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access<K> {
    /// Hit or miss.
    pub outcome: Outcome,
    /// Key evicted to make room for the inserted key, if any.
    pub evicted: Option<K>,
}

impl<K> Access<K> {
    /// A hit never evicts.
    #[inline]
    pub const fn hit() -> Self {
        Self {
            outcome: Outcome::Hit,
            evicted: None,
        }
    }

    /// A miss, possibly evicting one key.
    #[inline]
    pub const fn miss(evicted: Option<K>) -> Self {
        Self {
            outcome: Outcome::Miss,
            evicted,
        }
    }
}

/// Contract every eviction strategy implements.
///
/// A policy owns its state exclusively. Capacity is fixed at construction and
/// counted in unit-size items.
pub trait EvictionPolicy<K: SimKey>: Send + std::fmt::Debug {
    /// Short label for logs and reports.
    fn name(&self) -> &'static str;

    /// Maximum number of resident items.
    fn capacity(&self) -> u64;

    /// Current number of resident items.
    fn occupancy(&self) -> u64;

    /// Membership test without side effects.
    fn contains(&self, key: &K) -> bool;

    /// Handles one request.
    ///
    /// On hit the policy updates its bookkeeping and returns [`Outcome::Hit`].
    /// On miss it inserts the key, evicting per policy if capacity would be
    /// exceeded, and reports the evicted key.
    fn access(&mut self, key: &K) -> Access<K>;

    /// Insert-only entry point used for trailing blocks of a sized request.
    ///
    /// Applies the same state change as [`access`](Self::access) without
    /// surfacing an outcome. Returns the evicted key, if any.
    fn insert(&mut self, key: &K) -> Option<K> {
        self.access(key).evicted
    }

    /// Removes and returns the item the policy would evict next, regardless
    /// of occupancy. Returns `None` (and records a fault) when empty.
    fn evict_one(&mut self) -> Option<K>;

    /// Drops all resident items.
    fn clear(&mut self);

    /// Takes the consistency faults recovered since the last call.
    fn drain_faults(&mut self) -> Vec<ConsistencyFault> {
        Vec::new()
    }
}

/// Builds a policy of the given kind.
///
/// # Arguments
///
/// * `kind` - Policy selection; cascades carry their admission tier size.
/// * `capacity` - Total capacity in items.
/// * `tiers` - Algorithms backing the cascade tiers (ignored otherwise).
///
/// # Errors
///
/// Returns a [`ConfigError`] for a zero capacity or an invalid admission tier.
pub fn new_policy<K: SimKey>(
    kind: PolicyKind,
    capacity: u64,
    tiers: &TierConfig,
) -> Result<Box<dyn EvictionPolicy<K>>, ConfigError> {
    if capacity == 0 {
        return Err(ConfigError::ZeroCapacity);
    }
    let policy: Box<dyn EvictionPolicy<K>> = match kind {
        PolicyKind::Baseline => Box::new(RecencyQueue::new(capacity)),
        PolicyKind::Fifo => Box::new(FifoQueue::new(capacity)),
        PolicyKind::Lfu => Box::new(LfuPolicy::new(capacity)),
        PolicyKind::Composite { admission_capacity } => {
            let admission =
                admission_capacity.unwrap_or_else(|| config::derived_admission(capacity));
            Box::new(CascadePolicy::new(capacity, admission, tiers)?)
        }
    };
    tracing::debug!(
        policy = policy.name(),
        capacity,
        "constructed eviction policy"
    );
    Ok(policy)
}

/// Builds a single-tier policy, used for the cascade's tiers.
pub(crate) fn new_tier<K: SimKey>(kind: TierPolicy, capacity: u64) -> Box<dyn EvictionPolicy<K>> {
    match kind {
        TierPolicy::Recency => Box::new(RecencyQueue::new(capacity)),
        TierPolicy::Fifo => Box::new(FifoQueue::new(capacity)),
        TierPolicy::Lfu => Box::new(LfuPolicy::new(capacity)),
    }
}
