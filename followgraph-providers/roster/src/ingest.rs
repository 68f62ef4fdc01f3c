//! Column resolution and value conversion shared by the text, workbook and
//! Parquet readers.

use arrow_array::{
    Array, ArrayRef,
    cast::AsArray,
    types::{Int32Type, Int64Type, UInt32Type, UInt64Type},
};
use arrow_schema::DataType;

use followgraph_core::PersonaRecord;

use crate::errors::RosterProviderError;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Roster fields, in canonical header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterColumn {
    /// Display name.
    Name,
    /// Unique handle.
    Handle,
    /// Faction label.
    Faction,
    /// Space-delimited tag list.
    Tags,
    /// Optional external handle, passed through untouched.
    TwHandle,
    /// Desired follower count.
    TwFollowers,
    /// Desired following count.
    TwFollowing,
}

impl RosterColumn {
    /// Every column in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Handle,
        Self::Faction,
        Self::Tags,
        Self::TwHandle,
        Self::TwFollowers,
        Self::TwFollowing,
    ];

    /// Header spelling of the column.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Handle => "Handle",
            Self::Faction => "Faction",
            Self::Tags => "Tags",
            Self::TwHandle => "TwHandle",
            Self::TwFollowers => "TwFollowers",
            Self::TwFollowing => "TwFollowing",
        }
    }

    /// Whether a roster without this column is rejected.
    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::TwHandle)
    }

    fn matches(self, raw: &str) -> bool {
        raw.trim()
            .trim_start_matches(BYTE_ORDER_MARK)
            .trim()
            .eq_ignore_ascii_case(self.header())
    }
}

/// Positions of each roster column within a header or schema.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnMap {
    positions: [Option<usize>; RosterColumn::ALL.len()],
}

impl ColumnMap {
    /// Locates every known column in `headers`, rejecting the input when any
    /// required column is absent. All missing columns are reported at once.
    pub(crate) fn resolve<'a>(
        headers: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, RosterProviderError> {
        let headers: Vec<&str> = headers.into_iter().collect();
        let mut positions = [None; RosterColumn::ALL.len()];
        for (slot, column) in positions.iter_mut().zip(RosterColumn::ALL) {
            *slot = headers.iter().position(|header| column.matches(header));
        }

        let missing: Vec<&'static str> = RosterColumn::ALL
            .iter()
            .zip(positions)
            .filter(|(column, position)| column.is_required() && position.is_none())
            .map(|(column, _)| column.header())
            .collect();
        if !missing.is_empty() {
            return Err(RosterProviderError::MissingColumns { columns: missing });
        }
        Ok(Self { positions })
    }

    pub(crate) fn position(&self, column: RosterColumn) -> Option<usize> {
        RosterColumn::ALL
            .iter()
            .position(|&candidate| candidate == column)
            .and_then(|slot| self.positions[slot])
    }

    /// Positions of the columns that were found, in canonical order.
    pub(crate) fn present(&self) -> impl Iterator<Item = (RosterColumn, usize)> + '_ {
        RosterColumn::ALL
            .into_iter()
            .zip(self.positions)
            .filter_map(|(column, position)| position.map(|index| (column, index)))
    }
}

/// Trims a name, handle or faction cell, rejecting missing or blank values.
pub(crate) fn required_text(
    value: Option<&str>,
    row: usize,
    column: RosterColumn,
) -> Result<String, RosterProviderError> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
        .ok_or(RosterProviderError::NullValue {
            row,
            column: column.header(),
        })
}

/// Builds a record from one row of text cells laid out as in `columns`.
///
/// Used by every reader whose cells arrive as text: delimited files read them
/// directly and workbooks render each cell first.
pub(crate) fn text_record<S: AsRef<str>>(
    columns: &ColumnMap,
    fields: &[S],
    row: usize,
) -> Result<PersonaRecord, RosterProviderError> {
    let cell = |column: RosterColumn| {
        columns
            .position(column)
            .and_then(|index| fields.get(index))
            .map(AsRef::<str>::as_ref)
    };
    let optional = |column: RosterColumn| cell(column).map_or("", str::trim);

    let mut record = PersonaRecord::new(
        required_text(cell(RosterColumn::Name), row, RosterColumn::Name)?,
        required_text(cell(RosterColumn::Handle), row, RosterColumn::Handle)?,
        required_text(cell(RosterColumn::Faction), row, RosterColumn::Faction)?,
    )
    .with_tags(optional(RosterColumn::Tags))
    .with_desired(
        parse_count(optional(RosterColumn::TwFollowers), row, RosterColumn::TwFollowers)?,
        parse_count(optional(RosterColumn::TwFollowing), row, RosterColumn::TwFollowing)?,
    );
    let tw_handle = optional(RosterColumn::TwHandle);
    if !tw_handle.is_empty() {
        record = record.with_tw_handle(tw_handle);
    }
    Ok(record)
}

/// Parses a desired-count cell. Blank cells count as zero.
pub(crate) fn parse_count(
    raw: &str,
    row: usize,
    column: RosterColumn,
) -> Result<u64, RosterProviderError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| RosterProviderError::InvalidCount {
            row,
            column: column.header(),
            value: trimmed.to_owned(),
        })
}

/// Reads a `Utf8` or `LargeUtf8` column into owned optional strings.
pub(crate) fn string_values(
    array: &ArrayRef,
    column: RosterColumn,
) -> Result<Vec<Option<String>>, RosterProviderError> {
    match array.data_type() {
        DataType::Utf8 => Ok(owned(array.as_string::<i32>().iter())),
        DataType::LargeUtf8 => Ok(owned(array.as_string::<i64>().iter())),
        other => Err(RosterProviderError::InvalidColumnType {
            column: column.header(),
            actual: other.clone(),
        }),
    }
}

/// Reads an integer column into counts, rejecting nulls and negatives.
///
/// `start_row` is the absolute row of the first element, for error
/// reporting across batches.
pub(crate) fn count_values(
    array: &ArrayRef,
    column: RosterColumn,
    start_row: usize,
) -> Result<Vec<u64>, RosterProviderError> {
    let signed: Vec<Option<i64>> = match array.data_type() {
        DataType::Int32 => array
            .as_primitive::<Int32Type>()
            .iter()
            .map(|value| value.map(i64::from))
            .collect(),
        DataType::Int64 => array.as_primitive::<Int64Type>().iter().collect(),
        DataType::UInt32 => array
            .as_primitive::<UInt32Type>()
            .iter()
            .map(|value| value.map(i64::from))
            .collect(),
        DataType::UInt64 => {
            return unsigned_counts(array.as_primitive::<UInt64Type>().iter(), column, start_row);
        }
        other => {
            return Err(RosterProviderError::InvalidColumnType {
                column: column.header(),
                actual: other.clone(),
            });
        }
    };

    signed
        .into_iter()
        .enumerate()
        .map(|(offset, value)| {
            let row = start_row + offset;
            let value = value.ok_or(RosterProviderError::NullValue {
                row,
                column: column.header(),
            })?;
            u64::try_from(value).map_err(|_| RosterProviderError::InvalidCount {
                row,
                column: column.header(),
                value: value.to_string(),
            })
        })
        .collect()
}

fn owned<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<Option<String>> {
    values.map(|value| value.map(ToOwned::to_owned)).collect()
}

fn unsigned_counts(
    values: impl Iterator<Item = Option<u64>>,
    column: RosterColumn,
    start_row: usize,
) -> Result<Vec<u64>, RosterProviderError> {
    values
        .enumerate()
        .map(|(offset, value)| {
            value.ok_or(RosterProviderError::NullValue {
                row: start_row + offset,
                column: column.header(),
            })
        })
        .collect()
}
