//! Common types shared by every part of the simulator.
//!
//! This module provides the building blocks the policies and the replay loop agree on:
//! 1. **Keys:** The `SimKey` abstraction over integer and text keys.
//! 2. **Requests:** The normalized access record fed to policies.
//! 3. **Errors:** Fatal configuration faults and recoverable consistency faults.

/// Key abstraction (integer, text and runtime-tagged keys).
pub mod key;

/// Access request record.
pub mod request;

/// Configuration errors and consistency fault reporting.
pub mod error;

pub use error::{ConfigError, ConsistencyFault, FaultLog};
pub use key::{KeyKind, KeyValue, SimKey};
pub use request::Request;
