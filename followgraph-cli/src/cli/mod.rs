//! Command-line interface for generating follow graphs.
//!
//! The `generate` command loads a roster from tab-separated text, an Excel
//! workbook or Parquet, runs the generator with the requested parameters and
//! renders the result as an edge list, a relationship matrix or a Graphviz DOT
//! graph.

mod commands;
mod render;

pub use commands::{
    AffinityArgs, Cli, CliError, Command, GenerateCommand, GenerationSummary, ModifierArgs,
    OutputFormat, RepairArgs, RosterArgs, RosterSource, run_cli,
};
pub use render::{render_dot, render_edges, render_matrix, render_summary, write_summary};
