//! Trace-driven cache replacement simulator library.
//!
//! This crate replays a decoded request stream against a pluggable eviction policy:
//! 1. **Common:** Keys, requests, configuration faults and recoverable consistency faults.
//! 2. **Policies:** The `EvictionPolicy` contract, a recency queue baseline, FIFO and LFU
//!    tiers, and the admission/retention cascade built from two of them.
//! 3. **Simulation:** Block decomposition of sized requests, oracle comparison with
//!    segmented error rates, and the bulk replay loop.
//! 4. **Statistics:** Hit/miss counters and the end-of-run report.

/// Common types (keys, requests, errors and fault reporting).
pub mod common;
/// Simulator configuration (defaults, policy kinds, validation, JSON loading).
pub mod config;
/// Eviction policies and the policy factory.
pub mod policy;
/// Replay machinery (block decomposer, oracle validator, simulator).
pub mod sim;
/// Run statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `SimConfig::default()` or deserialize from JSON.
pub use crate::config::SimConfig;
/// Policy contract implemented by every eviction strategy.
pub use crate::policy::{Access, EvictionPolicy, Outcome, new_policy};
/// Bulk replay entry points.
pub use crate::sim::{OracleTrace, Simulator, run};
/// Aggregated results of one run.
pub use crate::stats::RunStatistics;
