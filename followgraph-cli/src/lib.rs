//! Support library for the followgraph CLI binary.
//!
//! Exposes the command pipeline and logging setup so doctests and
//! integration tests can drive generation without spawning a subprocess.

pub mod cli;
pub mod logging;
