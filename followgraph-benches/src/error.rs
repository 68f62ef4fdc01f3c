//! Benchmark setup error type.

use followgraph_core::GraphError;

use crate::roster::SyntheticRosterError;

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic roster generation failed.
    #[error("synthetic roster generation failed: {0}")]
    Roster(#[from] SyntheticRosterError),
    /// Generator configuration or registry construction failed.
    #[error("graph setup failed: {0}")]
    Graph(#[from] GraphError),
}
