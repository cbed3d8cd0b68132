//! Replay machinery.
//!
//! Provides the block decomposer, the oracle validator and the simulator that
//! drives a policy through a request stream.

/// Block decomposition of sized requests.
pub mod decompose;
/// Oracle trace and segmented accuracy measurement.
pub mod oracle;
/// Simulator and bulk replay entry point.
pub mod simulator;

pub use decompose::BlockDecomposer;
pub use oracle::{OracleTrace, OracleValidator, ValidationReport, Verdict};
pub use simulator::{Simulator, run};
