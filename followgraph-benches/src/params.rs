//! Benchmark parameter types.

use std::fmt;

/// Parameters for a full generation benchmark run.
#[derive(Clone, Debug)]
pub struct GenerateBenchParams {
    /// Number of personas in the roster.
    pub persona_count: usize,
    /// Whether the affinity modifiers are enabled.
    pub modifiers: bool,
}

impl fmt::Display for GenerateBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = if self.modifiers { "on" } else { "off" };
        write!(f, "n={},modifiers={modifiers}", self.persona_count)
    }
}

/// Parameters for a repair benchmark run.
#[derive(Clone, Debug)]
pub struct RepairBenchParams {
    /// Number of personas in the roster.
    pub persona_count: usize,
    /// Minimum in- and out-degree to enforce.
    pub degree_floor: u64,
}

impl fmt::Display for RepairBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},floor={}", self.persona_count, self.degree_floor)
    }
}
