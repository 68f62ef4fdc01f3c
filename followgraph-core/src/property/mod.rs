//! Property-based tests for sampling and repair.
//!
//! Generates rosters with varied sizes, faction counts, hub tags and degree
//! targets, then checks the structural invariants every generated graph
//! must satisfy regardless of the random draws.

mod invariants;
mod strategies;
