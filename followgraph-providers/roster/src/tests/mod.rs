pub(crate) use super::{RosterColumn, RosterProvider, RosterProviderError};

mod parquet;
mod support;
