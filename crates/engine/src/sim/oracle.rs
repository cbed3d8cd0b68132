//! Oracle comparison.
//!
//! An [`OracleTrace`] holds the eviction order an offline-optimal policy would
//! produce for the same request stream, plus breakpoints that split the run into
//! segments. The [`OracleValidator`] compares every eviction of the policy under
//! test against the oracle and reports an error rate per segment.
//!
//! Timestamps are eviction ordinals: the first eviction of a run happens at
//! `t = 0`, the next at `t = 1`, and so on. Eviction `t` is compared against
//! `evictions[t]`. A breakpoint `b` closes the segment holding evictions
//! `t < b`; repeated breakpoint values produce zero-length segments with a rate of
//! `0.0`. Evictions past the end of the oracle are not compared, but they still
//! open a trailing segment, so a run that outlives its oracle always reports a
//! final partial rate.

use crate::common::{ConfigError, SimKey};

/// Precomputed optimal eviction order and segment breakpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleTrace<K> {
    evictions: Vec<K>,
    breakpoints: Vec<u64>,
}

impl<K: SimKey> OracleTrace<K> {
    /// Creates an oracle trace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BreakpointsNotMonotonic`] if a breakpoint is
    /// smaller than the one before it.
    pub fn new(evictions: Vec<K>, breakpoints: Vec<u64>) -> Result<Self, ConfigError> {
        if let Some(index) = breakpoints.windows(2).position(|w| w[1] < w[0]) {
            return Err(ConfigError::BreakpointsNotMonotonic { index: index + 1 });
        }
        Ok(Self {
            evictions,
            breakpoints,
        })
    }

    /// Oracle trace without breakpoints: the whole run is one segment.
    pub const fn unsegmented(evictions: Vec<K>) -> Self {
        Self {
            evictions,
            breakpoints: Vec::new(),
        }
    }

    /// Optimal eviction order.
    pub fn evictions(&self) -> &[K] {
        &self.evictions
    }

    /// Segment breakpoints, in eviction ordinals.
    pub fn breakpoints(&self) -> &[u64] {
        &self.breakpoints
    }

    /// Number of oracle evictions.
    pub fn len(&self) -> usize {
        self.evictions.len()
    }

    /// Returns true when the oracle holds no evictions.
    pub fn is_empty(&self) -> bool {
        self.evictions.is_empty()
    }
}

/// Result of comparing one eviction against the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The policy evicted the oracle's key.
    Match,
    /// The policy evicted a different key.
    Mismatch,
    /// The oracle is exhausted; nothing was compared.
    Unchecked,
}

/// Final accuracy figures of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Mismatches over the whole run.
    pub cumulative_error_count: u64,
    /// Error rate of every closed segment, in order.
    pub segment_error_rates: Vec<f64>,
}

/// Per-run comparison state. Borrows the oracle for the duration of the run.
#[derive(Debug)]
pub struct OracleValidator<'a, K> {
    oracle: &'a OracleTrace<K>,
    cumulative_error_count: u64,
    breakpoint_cursor: usize,
    segment_error_rates: Vec<f64>,
    segment_errors: u64,
    segment_length: u64,
    segment_evictions: u64,
}

impl<'a, K: SimKey> OracleValidator<'a, K> {
    /// Starts a fresh comparison against `oracle`.
    pub fn new(oracle: &'a OracleTrace<K>) -> Self {
        Self {
            oracle,
            cumulative_error_count: 0,
            breakpoint_cursor: 0,
            segment_error_rates: Vec::with_capacity(oracle.breakpoints.len() + 1),
            segment_errors: 0,
            segment_length: 0,
            segment_evictions: 0,
        }
    }

    /// Mismatches counted so far.
    pub const fn cumulative_error_count(&self) -> u64 {
        self.cumulative_error_count
    }

    /// Index of the next unconsumed breakpoint.
    pub const fn breakpoint_cursor(&self) -> usize {
        self.breakpoint_cursor
    }

    /// Rates of the segments closed so far.
    pub fn segment_error_rates(&self) -> &[f64] {
        &self.segment_error_rates
    }

    fn close_segment(&mut self) {
        let rate = if self.segment_length == 0 {
            0.0
        } else {
            self.segment_errors as f64 / self.segment_length as f64
        };
        self.segment_error_rates.push(rate);
        self.segment_errors = 0;
        self.segment_length = 0;
        self.segment_evictions = 0;
    }

    /// Compares the eviction at timestamp `t` against the oracle.
    pub fn record(&mut self, t: u64, evicted: &K) -> Verdict {
        let oracle = self.oracle;
        let breakpoints = &oracle.breakpoints;
        while self.breakpoint_cursor < breakpoints.len()
            && t >= breakpoints[self.breakpoint_cursor]
        {
            self.close_segment();
            self.breakpoint_cursor += 1;
        }
        self.segment_evictions += 1;

        let expected = usize::try_from(t)
            .ok()
            .and_then(|i| oracle.evictions.get(i));
        let Some(expected) = expected else {
            return Verdict::Unchecked;
        };
        self.segment_length += 1;
        if expected == evicted {
            Verdict::Match
        } else {
            self.segment_errors += 1;
            self.cumulative_error_count += 1;
            tracing::trace!(t, ?evicted, ?expected, "eviction differs from oracle");
            Verdict::Mismatch
        }
    }

    /// Closes the trailing segment and returns the run's figures.
    ///
    /// The trailing segment is emitted when any eviction landed in it, compared
    /// or not, or when no segment was closed during the run.
    pub fn finish(mut self) -> ValidationReport {
        if self.segment_evictions > 0 || self.segment_error_rates.is_empty() {
            self.close_segment();
        }
        ValidationReport {
            cumulative_error_count: self.cumulative_error_count,
            segment_error_rates: self.segment_error_rates,
        }
    }
}
