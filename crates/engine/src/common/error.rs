//! Error and fault definitions.
//!
//! The simulator distinguishes two classes of problems:
//! 1. **Configuration faults:** Invalid capacities, block sizes, key kinds or oracle
//!    breakpoints. They are fatal and reported before any request is replayed.
//! 2. **Consistency faults:** Bookkeeping anomalies detected inside a policy during
//!    replay. The operation degrades to a defined result, the fault is logged and
//!    recorded, and replay continues so accumulated statistics are never lost.

use serde::Serialize;
use thiserror::Error;

use super::key::KeyKind;

/// Fatal configuration error detected at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Total cache capacity was zero.
    #[error("cache capacity must be at least one item")]
    ZeroCapacity,

    /// Admission tier of a cascade was configured with zero capacity.
    #[error("admission tier capacity must be at least one item")]
    ZeroAdmission,

    /// Admission tier larger than the whole cache.
    #[error("admission capacity {admission} exceeds total capacity {total}")]
    AdmissionExceedsCapacity {
        /// Configured admission capacity.
        admission: u64,
        /// Configured total capacity.
        total: u64,
    },

    /// Block decomposition requested with a zero block size.
    #[error("block unit size must be non-zero")]
    ZeroBlockUnit,

    /// A request key does not match the run's key kind.
    #[error("request {index} has a {found} key but the run uses {expected} keys")]
    KeyKindMismatch {
        /// Position of the offending request.
        index: usize,
        /// Key kind configured (or established by the first request).
        expected: KeyKind,
        /// Key kind of the offending request.
        found: KeyKind,
    },

    /// Oracle breakpoints must never decrease.
    #[error("oracle breakpoint {index} is smaller than its predecessor")]
    BreakpointsNotMonotonic {
        /// Position of the first decreasing breakpoint.
        index: usize,
    },

    /// Configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable bookkeeping anomaly detected by a policy.
///
/// Keys are rendered with their `Debug` representation so faults stay
/// independent of the key type.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsistencyFault {
    /// A key was found resident in more than one tier of a cascade.
    #[error("{policy}: key {key} resident in both admission and retention tiers")]
    DuplicateAcrossTiers {
        /// Name of the reporting policy.
        policy: &'static str,
        /// The duplicated key.
        key: String,
    },

    /// A tier grew past its capacity without reporting a victim.
    #[error("{policy}: {tier} tier over capacity ({occupancy}/{capacity}) with no victim")]
    MissingVictim {
        /// Name of the reporting policy.
        policy: &'static str,
        /// Tier that overflowed.
        tier: &'static str,
        /// Occupancy observed after the insert.
        occupancy: u64,
        /// Tier capacity.
        capacity: u64,
    },

    /// `evict_one` was called on a policy holding no items.
    #[error("{policy}: eviction requested from an empty policy")]
    EvictFromEmpty {
        /// Name of the reporting policy.
        policy: &'static str,
    },
}

/// Accumulator for consistency faults raised by one policy instance.
#[derive(Debug, Default, Clone)]
pub struct FaultLog {
    faults: Vec<ConsistencyFault>,
}

impl FaultLog {
    /// Creates an empty log.
    pub const fn new() -> Self {
        Self { faults: Vec::new() }
    }

    /// Records a fault and emits it at `warn` level.
    pub fn record(&mut self, fault: ConsistencyFault) {
        tracing::warn!(%fault, "consistency fault recovered");
        self.faults.push(fault);
    }

    /// Number of faults recorded and not yet drained.
    pub const fn len(&self) -> usize {
        self.faults.len()
    }

    /// Returns true when no faults are pending.
    pub const fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    /// Appends faults already reported elsewhere, without logging them again.
    pub fn absorb(&mut self, faults: Vec<ConsistencyFault>) {
        self.faults.extend(faults);
    }

    /// Takes every pending fault, leaving the log empty.
    pub fn drain(&mut self) -> Vec<ConsistencyFault> {
        std::mem::take(&mut self.faults)
    }
}
