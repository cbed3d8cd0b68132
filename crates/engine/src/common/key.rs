//! Cache key abstraction.
//!
//! Policies are generic over the key representation. A run uses a single key kind:
//! integer keys (object ids, block addresses) or text keys (URLs, object names).
//! `KeyValue` carries the kind at runtime for callers that decode heterogeneous
//! traces; the simulator checks that a run never mixes kinds.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// The representation family of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum KeyKind {
    /// Unsigned 64-bit integer keys. Supports block decomposition.
    #[serde(alias = "INT", alias = "int")]
    Int,
    /// Text keys. Requests pass through the block decomposer unmodified.
    #[serde(alias = "TEXT", alias = "text")]
    Text,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Trait implemented by every key type a policy can track.
pub trait SimKey: Clone + Eq + Hash + fmt::Debug + Send + 'static {
    /// Returns the kind of this key.
    fn kind(&self) -> KeyKind;

    /// Returns the key `n` blocks after this one, or `None` when the key
    /// kind cannot be decomposed into blocks.
    ///
    /// Integer offsets wrap at `u64::MAX`.
    fn offset(&self, n: u64) -> Option<Self>;
}

impl SimKey for u64 {
    #[inline]
    fn kind(&self) -> KeyKind {
        KeyKind::Int
    }

    #[inline]
    fn offset(&self, n: u64) -> Option<Self> {
        Some(self.wrapping_add(n))
    }
}

impl SimKey for String {
    #[inline]
    fn kind(&self) -> KeyKind {
        KeyKind::Text
    }

    #[inline]
    fn offset(&self, _n: u64) -> Option<Self> {
        None
    }
}

/// A key whose kind is only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyValue {
    /// Integer key.
    Int(u64),
    /// Text key.
    Text(String),
}

impl SimKey for KeyValue {
    #[inline]
    fn kind(&self) -> KeyKind {
        match self {
            Self::Int(_) => KeyKind::Int,
            Self::Text(_) => KeyKind::Text,
        }
    }

    fn offset(&self, n: u64) -> Option<Self> {
        match self {
            Self::Int(v) => Some(Self::Int(v.wrapping_add(n))),
            Self::Text(_) => None,
        }
    }
}

impl From<u64> for KeyValue {
    fn from(v: u64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for KeyValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for KeyValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}
