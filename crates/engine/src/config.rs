//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize a run:
//! 1. **Defaults:** Baseline constants (capacity, admission tier sizing).
//! 2. **Enums:** Policy kinds and the algorithms usable as cascade tiers.
//! 3. **Structures:** `SimConfig` and the cascade `TierConfig`.
//!
//! Configuration is supplied as JSON (`SimConfig::from_json_str` / `from_json_file`)
//! or built in code starting from `SimConfig::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{ConfigError, KeyKind};

/// Default configuration constants for the simulator.
pub mod defaults {
    /// Default total capacity in items (unit-size blocks).
    pub const CAPACITY: u64 = 1024;

    /// Share of the total capacity reserved for the admission tier when a
    /// cascade does not configure it explicitly.
    pub const ADMISSION_FRACTION: f64 = 0.01;

    /// Smallest admission tier ever derived from `ADMISSION_FRACTION`.
    pub const ADMISSION_FLOOR: u64 = 1;
}

/// Eviction algorithms usable on their own or as a cascade tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TierPolicy {
    /// Recency queue (LRU).
    #[default]
    #[serde(alias = "LRU", alias = "Lru")]
    Recency,
    /// First in, first out. Hits do not reorder.
    #[serde(alias = "FIFO")]
    Fifo,
    /// Least frequently used, ties broken by recency.
    #[serde(alias = "LFU")]
    Lfu,
}

/// Top-level policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolicyKind {
    /// Single-tier recency queue.
    #[default]
    Baseline,
    /// Single-tier FIFO queue.
    Fifo,
    /// Single-tier LFU.
    Lfu,
    /// Admission/retention cascade.
    Composite {
        /// Items reserved for the admission tier. Derived from
        /// [`defaults::ADMISSION_FRACTION`] when absent.
        #[serde(default)]
        admission_capacity: Option<u64>,
    },
}

impl PolicyKind {
    /// Cascade with an explicit admission tier size.
    pub const fn composite(admission_capacity: u64) -> Self {
        Self::Composite {
            admission_capacity: Some(admission_capacity),
        }
    }
}

/// Algorithms backing the two tiers of a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Algorithm of the small, fast admission tier.
    #[serde(default)]
    pub admission: TierPolicy,
    /// Algorithm of the retention tier.
    #[serde(default = "TierConfig::default_retention")]
    pub retention: TierPolicy,
}

impl TierConfig {
    /// Retention tiers are frequency-biased unless configured otherwise.
    const fn default_retention() -> TierPolicy {
        TierPolicy::Lfu
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            admission: TierPolicy::Recency,
            retention: Self::default_retention(),
        }
    }
}

/// Root configuration of one simulation run.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{PolicyKind, SimConfig, TierPolicy};
///
/// let json = r#"{
///     "capacity": 64,
///     "policy": { "Composite": { "admission_capacity": 4 } },
///     "tiers": { "admission": "Fifo", "retention": "Lru" },
///     "block_unit_size": 4096,
///     "key_kind": "Int"
/// }"#;
///
/// let config = SimConfig::from_json_str(json).unwrap();
/// assert_eq!(config.capacity, 64);
/// assert_eq!(config.policy, PolicyKind::composite(4));
/// assert_eq!(config.tiers.retention, TierPolicy::Recency);
/// assert_eq!(config.block_unit_size, Some(4096));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Total capacity in unit-size items.
    #[serde(default = "SimConfig::default_capacity")]
    pub capacity: u64,
    /// Policy under test.
    #[serde(default)]
    pub policy: PolicyKind,
    /// Tier algorithms (only consulted by the cascade).
    #[serde(default)]
    pub tiers: TierConfig,
    /// Block size for decomposing sized requests; `None` replays one access per request.
    #[serde(default)]
    pub block_unit_size: Option<u64>,
    /// Expected key kind; `None` adopts the kind of the first request.
    #[serde(default)]
    pub key_kind: Option<KeyKind>,
}

impl SimConfig {
    /// Returns the default capacity.
    const fn default_capacity() -> u64 {
        defaults::CAPACITY
    }

    /// Parses a configuration from a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the first fault
    /// reported by [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks capacities and block sizing.
    ///
    /// # Errors
    ///
    /// Returns the first configuration fault found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.block_unit_size == Some(0) {
            return Err(ConfigError::ZeroBlockUnit);
        }
        if let PolicyKind::Composite { .. } = self.policy {
            let admission = self.admission_capacity().unwrap_or_default();
            check_admission(admission, self.capacity)?;
        }
        Ok(())
    }

    /// Admission tier size for a cascade, `None` for single-tier policies.
    pub fn admission_capacity(&self) -> Option<u64> {
        match self.policy {
            PolicyKind::Composite { admission_capacity } => {
                Some(admission_capacity.unwrap_or_else(|| derived_admission(self.capacity)))
            }
            _ => None,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::CAPACITY,
            policy: PolicyKind::default(),
            tiers: TierConfig::default(),
            block_unit_size: None,
            key_kind: None,
        }
    }
}

/// Admission tier size derived from the total capacity.
pub fn derived_admission(capacity: u64) -> u64 {
    ((capacity as f64 * defaults::ADMISSION_FRACTION).round() as u64).max(defaults::ADMISSION_FLOOR)
}

/// Validates an admission tier size against the total capacity.
pub(crate) const fn check_admission(admission: u64, total: u64) -> Result<(), ConfigError> {
    if admission == 0 {
        return Err(ConfigError::ZeroAdmission);
    }
    if admission > total {
        return Err(ConfigError::AdmissionExceedsCapacity { admission, total });
    }
    Ok(())
}
