use arrow_schema::{ArrowError, DataType};
use followgraph_core::{GraphError, GraphErrorCode};
use thiserror::Error;

/// Errors raised while reading a roster.
#[derive(Debug, Error)]
pub enum RosterProviderError {
    /// The input had no header row, or a workbook had no worksheet.
    #[error("roster `{name}` is empty")]
    EmptyInput { name: String },
    /// Required columns were absent from the header or schema.
    #[error("missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<&'static str> },
    /// A text row had a different number of fields than the header.
    #[error("line {line} has {actual} fields but the header has {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        actual: usize,
    },
    /// A count column held something other than a non-negative integer.
    #[error("row {row} column `{column}` holds invalid count `{value}`")]
    InvalidCount {
        row: usize,
        column: &'static str,
        value: String,
    },
    /// A name, handle, faction or count was null, or a text field was blank.
    #[error("row {row} column `{column}` is null")]
    NullValue { row: usize, column: &'static str },
    /// A Parquet column had an unsupported Arrow type.
    #[error("column `{column}` has unsupported type {actual:?}")]
    InvalidColumnType {
        column: &'static str,
        actual: DataType,
    },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),
    /// The records were rejected when building a registry.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl RosterProviderError {
    /// Returns the core error code when the roster was rejected by the
    /// registry.
    #[must_use]
    pub fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(err) => Some(err.code()),
            _ => None,
        }
    }
}
