//! Admission/Retention Cascade.
//!
//! A two-level cache: a small admission tier absorbs request churn and a larger
//! retention tier keeps the keys admission pushes out. Every miss is inserted into
//! admission; the key admission evicts to make room is promoted into retention,
//! and the key retention evicts in turn leaves the cache. A key is resident in at
//! most one tier at any time.
//!
//! With total capacity `C` and admission capacity `A`, retention holds `C - A`
//! items. When `C <= A` there is no retention tier and the cascade behaves like
//! its admission tier alone.

use super::{Access, EvictionPolicy, Outcome, new_tier};
use crate::common::{ConfigError, ConsistencyFault, FaultLog, SimKey};
use crate::config::{TierConfig, check_admission};

const NAME: &str = "cascade";

/// Two-tier policy composed of boxed [`EvictionPolicy`] instances.
pub struct CascadePolicy<K> {
    admission: Box<dyn EvictionPolicy<K>>,
    retention: Option<Box<dyn EvictionPolicy<K>>>,
    admission_capacity: u64,
    retention_capacity: u64,
    faults: FaultLog,
}

impl<K: SimKey> std::fmt::Debug for CascadePolicy<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CascadePolicy")
            .field("admission", &self.admission.name())
            .field("retention", &self.retention.as_ref().map(|r| r.name()))
            .field("admission_capacity", &self.admission_capacity)
            .field("retention_capacity", &self.retention_capacity)
            .finish_non_exhaustive()
    }
}

impl<K: SimKey> CascadePolicy<K> {
    /// Builds a cascade with the tier algorithms from `tiers`.
    ///
    /// # Errors
    ///
    /// Fails on a zero total or admission capacity, or an admission tier larger
    /// than the whole cache.
    pub fn new(capacity: u64, admission_capacity: u64, tiers: &TierConfig) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        check_admission(admission_capacity, capacity)?;
        let retention_capacity = capacity - admission_capacity;
        let retention = (retention_capacity > 0).then(|| new_tier(tiers.retention, retention_capacity));
        Ok(Self::from_tiers(
            new_tier(tiers.admission, admission_capacity),
            retention,
        ))
    }

    /// Wires two existing policies together. Tier capacities are taken from
    /// the policies themselves.
    pub fn from_tiers(
        admission: Box<dyn EvictionPolicy<K>>,
        retention: Option<Box<dyn EvictionPolicy<K>>>,
    ) -> Self {
        let admission_capacity = admission.capacity();
        let retention_capacity = retention.as_ref().map_or(0, |r| r.capacity());
        tracing::debug!(
            admission = admission.name(),
            admission_capacity,
            retention = retention.as_ref().map(|r| r.name()),
            retention_capacity,
            "cascade tiers wired"
        );
        Self {
            admission,
            retention,
            admission_capacity,
            retention_capacity,
            faults: FaultLog::new(),
        }
    }

    /// Capacity reserved for the admission tier.
    pub const fn admission_capacity(&self) -> u64 {
        self.admission_capacity
    }

    /// Capacity of the retention tier (0 when absent).
    pub const fn retention_capacity(&self) -> u64 {
        self.retention_capacity
    }

    /// The admission tier.
    pub fn admission(&self) -> &dyn EvictionPolicy<K> {
        self.admission.as_ref()
    }

    /// The retention tier, if the cache is larger than the admission tier.
    pub fn retention(&self) -> Option<&dyn EvictionPolicy<K>> {
        self.retention.as_deref()
    }

    fn retention_contains(&self, key: &K) -> bool {
        self.retention.as_ref().is_some_and(|r| r.contains(key))
    }

    // Hands a key evicted from admission to retention. Returns the key that
    // leaves the cascade.
    fn promote(&mut self, victim: K) -> Option<K> {
        let Some(retention) = self.retention.as_mut() else {
            return Some(victim);
        };
        let access = retention.access(&victim);
        if access.outcome == Outcome::Hit {
            self.faults.record(ConsistencyFault::DuplicateAcrossTiers {
                policy: NAME,
                key: format!("{victim:?}"),
            });
        }
        access.evicted
    }

    // Collects faults raised inside the tiers into the cascade's own log.
    fn absorb_tier_faults(&mut self) {
        self.faults.absorb(self.admission.drain_faults());
        if let Some(retention) = self.retention.as_mut() {
            self.faults.absorb(retention.drain_faults());
        }
    }
}

impl<K: SimKey> EvictionPolicy<K> for CascadePolicy<K> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn capacity(&self) -> u64 {
        self.admission_capacity + self.retention_capacity
    }

    fn occupancy(&self) -> u64 {
        self.admission.occupancy() + self.retention.as_ref().map_or(0, |r| r.occupancy())
    }

    fn contains(&self, key: &K) -> bool {
        self.admission.contains(key) || self.retention_contains(key)
    }

    fn access(&mut self, key: &K) -> Access<K> {
        if self.admission.contains(key) {
            if self.retention_contains(key) {
                self.faults.record(ConsistencyFault::DuplicateAcrossTiers {
                    policy: NAME,
                    key: format!("{key:?}"),
                });
            }
            let _ = self.admission.access(key);
            return Access::hit();
        }
        if let Some(retention) = self.retention.as_mut()
            && retention.contains(key)
        {
            let _ = retention.access(key);
            return Access::hit();
        }

        let demoted = self.admission.access(key).evicted;
        let occupancy = self.admission.occupancy();
        if demoted.is_none() && occupancy > self.admission_capacity {
            self.faults.record(ConsistencyFault::MissingVictim {
                policy: NAME,
                tier: "admission",
                occupancy,
                capacity: self.admission_capacity,
            });
        }
        let evicted = demoted.and_then(|victim| self.promote(victim));
        Access::miss(evicted)
    }

    /// Evicts from retention first, the tier whose victims leave the cache,
    /// then from admission.
    fn evict_one(&mut self) -> Option<K> {
        let from_retention = match self.retention.as_mut() {
            Some(retention) if retention.occupancy() > 0 => retention.evict_one(),
            _ => None,
        };
        let victim = match from_retention {
            Some(key) => Some(key),
            None if self.admission.occupancy() > 0 => self.admission.evict_one(),
            None => None,
        };
        if victim.is_none() {
            self.faults
                .record(ConsistencyFault::EvictFromEmpty { policy: NAME });
        }
        victim
    }

    fn clear(&mut self) {
        self.admission.clear();
        if let Some(retention) = self.retention.as_mut() {
            retention.clear();
        }
    }

    fn drain_faults(&mut self) -> Vec<ConsistencyFault> {
        self.absorb_tier_faults();
        self.faults.drain()
    }
}
