//! Simulator: owns the policy under test and replays request streams against it.
//!
//! A replay walks the requests in order. Each request is split into blocks when a
//! block size is configured; the first block goes through `access` and decides the
//! request's hit or miss, trailing blocks go through `insert`. Every eviction is
//! counted and, when an oracle is supplied, compared against it. Configuration
//! faults (including a request whose key kind differs from the run's) are
//! detected before the first request is replayed.

use crate::common::{ConfigError, ConsistencyFault, KeyKind, Request, SimKey};
use crate::config::SimConfig;
use crate::policy::{EvictionPolicy, new_policy};
use crate::stats::RunStatistics;

use super::decompose::BlockDecomposer;
use super::oracle::{OracleTrace, OracleValidator};

/// Top-level simulator: policy state plus replay settings.
pub struct Simulator<K> {
    policy: Box<dyn EvictionPolicy<K>>,
    decomposer: Option<BlockDecomposer>,
    key_kind: Option<KeyKind>,
    faults: Vec<ConsistencyFault>,
}

impl<K: SimKey> std::fmt::Debug for Simulator<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("policy", &self.policy.name())
            .field("decomposer", &self.decomposer)
            .field("key_kind", &self.key_kind)
            .field("faults", &self.faults)
            .finish()
    }
}

impl<K: SimKey> Simulator<K> {
    /// Creates a simulator around an already constructed policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroBlockUnit`] for `Some(0)`.
    pub fn new(
        policy: Box<dyn EvictionPolicy<K>>,
        block_unit_size: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let decomposer = block_unit_size.map(BlockDecomposer::new).transpose()?;
        Ok(Self {
            policy,
            decomposer,
            key_kind: None,
            faults: Vec::new(),
        })
    }

    /// Builds the policy and replay settings described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the first configuration fault found in `config`.
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = new_policy(config.policy, config.capacity, &config.tiers)?;
        let mut sim = Self::new(policy, config.block_unit_size)?;
        sim.key_kind = config.key_kind;
        Ok(sim)
    }

    /// Requires every replayed request to carry keys of `kind`.
    #[must_use]
    pub fn with_key_kind(mut self, kind: KeyKind) -> Self {
        self.key_kind = Some(kind);
        self
    }

    /// The policy under test.
    pub fn policy(&self) -> &dyn EvictionPolicy<K> {
        self.policy.as_ref()
    }

    /// Mutable access to the policy under test.
    pub fn policy_mut(&mut self) -> &mut dyn EvictionPolicy<K> {
        self.policy.as_mut()
    }

    /// Consistency faults recovered across all runs so far.
    pub fn faults(&self) -> &[ConsistencyFault] {
        &self.faults
    }

    /// Drops all resident items and recorded faults.
    pub fn reset(&mut self) {
        self.policy.clear();
        self.faults.clear();
    }

    /// Replays `requests` against the policy, continuing from its current state.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KeyKindMismatch`] before replaying anything if a
    /// request's key kind differs from the configured (or first) key kind.
    pub fn run(
        &mut self,
        requests: &[Request<K>],
        oracle: Option<&OracleTrace<K>>,
    ) -> Result<RunStatistics, ConfigError> {
        check_key_kinds(requests, self.key_kind)?;
        let mut stats = replay(self.policy.as_mut(), requests, self.decomposer, oracle);
        let faults = self.policy.drain_faults();
        stats.consistency_faults = faults.len() as u64;
        self.faults.extend(faults.iter().cloned());
        stats.faults = faults;
        log_summary(&stats);
        Ok(stats)
    }
}

/// Replays `requests` against `policy` and returns the run's statistics.
///
/// # Arguments
///
/// * `requests` - Decoded request stream, replayed in order.
/// * `policy` - Policy under test; its state carries over from earlier calls.
/// * `block_unit_size` - Block size for sized requests; `None` disables decomposition.
/// * `oracle` - Optimal eviction order to compare against.
///
/// Faults the policy recovered from are drained into the returned statistics.
///
/// # Errors
///
/// Returns a [`ConfigError`] for a zero block size or mixed key kinds. Nothing is
/// replayed in that case.
pub fn run<K: SimKey>(
    requests: &[Request<K>],
    policy: &mut dyn EvictionPolicy<K>,
    block_unit_size: Option<u64>,
    oracle: Option<&OracleTrace<K>>,
) -> Result<RunStatistics, ConfigError> {
    let decomposer = block_unit_size.map(BlockDecomposer::new).transpose()?;
    check_key_kinds(requests, None)?;
    let mut stats = replay(policy, requests, decomposer, oracle);
    stats.faults = policy.drain_faults();
    stats.consistency_faults = stats.faults.len() as u64;
    log_summary(&stats);
    Ok(stats)
}

/// Verifies that every request uses the same key kind.
fn check_key_kinds<K: SimKey>(
    requests: &[Request<K>],
    expected: Option<KeyKind>,
) -> Result<(), ConfigError> {
    let Some(expected) = expected.or_else(|| requests.first().map(|r| r.key.kind())) else {
        return Ok(());
    };
    match requests
        .iter()
        .position(|r| r.key.kind() != expected)
    {
        Some(index) => Err(ConfigError::KeyKindMismatch {
            index,
            expected,
            found: requests[index].key.kind(),
        }),
        None => Ok(()),
    }
}

// Eviction bookkeeping shared by the first-block and trailing-block paths.
struct EvictionSink<'a, K> {
    evictions: u64,
    validator: Option<OracleValidator<'a, K>>,
}

impl<K: SimKey> EvictionSink<'_, K> {
    fn note(&mut self, evicted: Option<K>) {
        let Some(key) = evicted else {
            return;
        };
        let t = self.evictions;
        self.evictions += 1;
        tracing::trace!(t, ?key, "evicted");
        if let Some(validator) = self.validator.as_mut() {
            let _ = validator.record(t, &key);
        }
    }
}

fn replay<K: SimKey>(
    policy: &mut dyn EvictionPolicy<K>,
    requests: &[Request<K>],
    decomposer: Option<BlockDecomposer>,
    oracle: Option<&OracleTrace<K>>,
) -> RunStatistics {
    tracing::debug!(
        policy = policy.name(),
        capacity = policy.capacity(),
        requests = requests.len(),
        block_unit_size = decomposer.map(|d| d.block_unit_size()),
        oracle = oracle.is_some(),
        "replay started"
    );

    let mut stats = RunStatistics {
        policy: policy.name(),
        ..RunStatistics::default()
    };
    let mut sink = EvictionSink {
        evictions: 0,
        validator: oracle.map(OracleValidator::new),
    };

    for request in requests {
        stats.total_requests += 1;
        let access = match decomposer {
            Some(decomposer) => {
                let mut blocks = decomposer.split(request);
                let first = blocks.next().unwrap_or_else(|| request.key.clone());
                let access = policy.access(&first);
                stats.block_accesses += 1;
                sink.note(access.evicted.clone());
                for block in blocks {
                    stats.block_accesses += 1;
                    sink.note(policy.insert(&block));
                }
                access
            }
            None => {
                let access = policy.access(&request.key);
                stats.block_accesses += 1;
                sink.note(access.evicted.clone());
                access
            }
        };
        if access.outcome.is_hit() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
    }

    stats.evictions = sink.evictions;
    stats.final_occupancy = policy.occupancy();
    if let Some(validator) = sink.validator {
        let report = validator.finish();
        stats.cumulative_error_count = Some(report.cumulative_error_count);
        stats.segment_error_rates = Some(report.segment_error_rates);
    }
    stats
}

fn log_summary(stats: &RunStatistics) {
    tracing::info!(
        policy = stats.policy,
        requests = stats.total_requests,
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        occupancy = stats.final_occupancy,
        oracle_errors = stats.cumulative_error_count,
        faults = stats.consistency_faults,
        "replay finished"
    );
}
