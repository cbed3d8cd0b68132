//! Run statistics collection and reporting.
//!
//! This module holds the figures produced by one replay:
//! 1. **Outcomes:** Hit and miss counts per logical request, and derived ratios.
//! 2. **Occupancy:** Evictions, block accesses and the final resident item count.
//! 3. **Oracle accuracy:** Cumulative mismatches and per-segment error rates.
//! 4. **Diagnostics:** Consistency faults the policy recovered from.

use serde::Serialize;

use crate::common::ConsistencyFault;

/// Aggregated statistics of one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStatistics {
    /// Name of the policy that produced these figures.
    pub policy: &'static str,
    /// Logical requests that hit (first block resident).
    pub hits: u64,
    /// Logical requests that missed.
    pub misses: u64,
    /// Logical requests replayed.
    pub total_requests: u64,
    /// Unit-size block accesses fed to the policy.
    pub block_accesses: u64,
    /// Items evicted during the run.
    pub evictions: u64,
    /// Items resident when the run ended.
    pub final_occupancy: u64,
    /// Consistency faults recovered during the run.
    pub consistency_faults: u64,
    /// Details of the recovered faults, in the order they were raised.
    pub faults: Vec<ConsistencyFault>,
    /// Per-segment oracle error rates, when an oracle was supplied.
    pub segment_error_rates: Option<Vec<f64>>,
    /// Total oracle mismatches, when an oracle was supplied.
    pub cumulative_error_count: Option<u64>,
}

/// Section names for selective report output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "blocks", "oracle", "diagnostics"];

impl RunStatistics {
    /// Fraction of requests that hit, 0 for an empty run.
    pub fn hit_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_requests as f64
        }
    }

    /// Fraction of requests that missed, 0 for an empty run.
    pub fn miss_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.misses as f64 / self.total_requests as f64
        }
    }

    /// Renders the requested report sections.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. An empty
    /// slice renders everything.
    pub fn render_sections(&self, sections: &[String]) -> String {
        use std::fmt::Write as _;

        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();

        let _ = writeln!(out, "==========================================================");
        let _ = writeln!(out, "CACHE SIMULATION STATISTICS ({})", self.policy);
        let _ = writeln!(out, "==========================================================");
        if want("summary") {
            let _ = writeln!(out, "requests                 {}", self.total_requests);
            let _ = writeln!(out, "hits                     {}", self.hits);
            let _ = writeln!(out, "misses                   {}", self.misses);
            let _ = writeln!(out, "hit_ratio                {:.4}", self.hit_ratio());
            let _ = writeln!(out, "miss_ratio               {:.4}", self.miss_ratio());
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("blocks") {
            let _ = writeln!(out, "BLOCKS");
            let _ = writeln!(out, "  block_accesses         {}", self.block_accesses);
            let _ = writeln!(out, "  evictions              {}", self.evictions);
            let _ = writeln!(out, "  final_occupancy        {}", self.final_occupancy);
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("oracle") {
            if let (Some(errors), Some(rates)) =
                (self.cumulative_error_count, self.segment_error_rates.as_ref())
            {
                let _ = writeln!(out, "ORACLE");
                let _ = writeln!(out, "  errors                 {errors}");
                for (i, rate) in rates.iter().enumerate() {
                    let _ = writeln!(out, "  segment[{i:>3}]           {:.2}%", rate * 100.0);
                }
                let _ = writeln!(out, "----------------------------------------------------------");
            }
        }
        if want("diagnostics") {
            let _ = writeln!(out, "DIAGNOSTICS");
            let _ = writeln!(out, "  consistency_faults     {}", self.consistency_faults);
            for fault in &self.faults {
                let _ = writeln!(out, "    - {fault}");
            }
        }
        let _ = writeln!(out, "==========================================================");
        out
    }

    /// Prints only the requested sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
