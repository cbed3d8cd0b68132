//! Access request record.

use serde::{Deserialize, Serialize};

use super::key::SimKey;

/// A single decoded access from a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request<K> {
    /// Object or base block key.
    pub key: K,
    /// Object size in bytes. Only consulted by the block decomposer.
    #[serde(default)]
    pub size: u64,
    /// Position of the request in the source trace.
    #[serde(default)]
    pub sequence_index: u64,
}

impl<K: SimKey> Request<K> {
    /// Creates a request with sequence index 0.
    pub const fn new(key: K, size: u64) -> Self {
        Self {
            key,
            size,
            sequence_index: 0,
        }
    }

    /// Sets the request's position in the source trace.
    #[must_use]
    pub const fn at(mut self, sequence_index: u64) -> Self {
        self.sequence_index = sequence_index;
        self
    }

    /// Builds unit-size requests from a key sequence, numbering them in order.
    pub fn sequence<I>(keys: I) -> Vec<Self>
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter()
            .zip(0u64..)
            .map(|(key, i)| Self::new(key, 1).at(i))
            .collect()
    }
}
