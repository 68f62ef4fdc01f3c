//! Roster providers that turn tabular persona data into
//! [`followgraph_core::PersonaRecord`]s.
//!
//! Three formats are accepted: tab-separated text with a header row, the
//! first worksheet of an Excel workbook, and Parquet files with one string or
//! integer column per roster field.

mod errors;
mod ingest;
mod provider;

pub use errors::RosterProviderError;
pub use ingest::RosterColumn;
pub use provider::RosterProvider;

#[cfg(test)]
mod tests;
