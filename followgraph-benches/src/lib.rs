//! Benchmark support crate for followgraph.
//!
//! Provides seeded synthetic rosters and parameter types used by the
//! Criterion benchmarks for full generation runs and the repair engine.

pub mod error;
pub mod params;
pub mod roster;
