//! Roster provider implementation for text, workbook and Parquet inputs.
use std::{
    fs::{self, File},
    io::{BufRead, BufReader, Cursor, Read, Seek},
    path::Path,
};

use arrow_array::RecordBatchReader;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use followgraph_core::{PersonaRecord, PersonaRegistry};
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;
use tracing::{debug, instrument};

use crate::errors::RosterProviderError;
use crate::ingest::{
    ColumnMap, RosterColumn, count_values, required_text, string_values, text_record,
};

/// Persona records loaded from a roster source.
///
/// # Examples
/// ```
/// use followgraph_providers_roster::RosterProvider;
///
/// let tsv = "Name\tHandle\tFaction\tTags\tTwFollowers\tTwFollowing\n\
///            Ada\tada\tblue\t#uk\t10\t3\n";
/// let provider = RosterProvider::try_from_reader("demo", tsv.as_bytes())?;
/// assert_eq!(provider.len(), 1);
/// assert_eq!(provider.records()[0].desired_in, 10);
/// # Ok::<(), followgraph_providers_roster::RosterProviderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RosterProvider {
    name: String,
    records: Vec<PersonaRecord>,
}

impl RosterProvider {
    /// Returns the roster name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of rows read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether no rows were read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the loaded records in input order.
    #[must_use]
    pub fn records(&self) -> &[PersonaRecord] {
        &self.records
    }

    /// Consumes the provider, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<PersonaRecord> {
        self.records
    }

    /// Normalises the records into a [`PersonaRegistry`] named after the
    /// roster.
    ///
    /// # Errors
    /// Returns [`RosterProviderError::Graph`] when the registry rejects the
    /// rows, for example on duplicate handles.
    pub fn into_registry(self) -> Result<PersonaRegistry, RosterProviderError> {
        Ok(PersonaRegistry::try_from_records(self.name, self.records)?)
    }

    /// Reads a tab-separated roster with a header row.
    ///
    /// Header names are matched case-insensitively after trimming and a
    /// leading byte-order mark is ignored. Blank lines are skipped and blank
    /// count cells read as zero.
    ///
    /// # Errors
    /// Returns [`RosterProviderError::EmptyInput`] without a header,
    /// [`RosterProviderError::MissingColumns`] when required columns are
    /// absent, [`RosterProviderError::RaggedRow`] when a row's field count
    /// differs from the header, [`RosterProviderError::NullValue`] for a blank
    /// name, handle or faction, and [`RosterProviderError::InvalidCount`] for
    /// non-numeric or negative counts.
    #[instrument(name = "roster.read_tsv", err, skip(name, reader))]
    pub fn try_from_reader<R>(name: impl Into<String>, reader: R) -> Result<Self, RosterProviderError>
    where
        R: BufRead,
    {
        let name = name.into();
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(index, line)| line.map(|text| (index + 1, text)));

        let header = loop {
            match lines.next().transpose()? {
                Some((_, text)) if text.trim().is_empty() => continue,
                Some((_, text)) => break text,
                None => return Err(RosterProviderError::EmptyInput { name }),
            }
        };
        let header_fields: Vec<&str> = header.split('\t').collect();
        let columns = ColumnMap::resolve(header_fields.iter().copied())?;

        let mut records = Vec::new();
        for entry in lines {
            let (line, text) = entry?;
            if text.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = text.split('\t').collect();
            if fields.len() != header_fields.len() {
                return Err(RosterProviderError::RaggedRow {
                    line,
                    expected: header_fields.len(),
                    actual: fields.len(),
                });
            }
            records.push(text_record(&columns, &fields, records.len())?);
        }

        debug!(roster = %name, rows = records.len(), "text roster loaded");
        Ok(Self { name, records })
    }

    /// Reads a tab-separated roster from `path`.
    ///
    /// # Errors
    /// Returns [`RosterProviderError::Io`] when the file cannot be opened,
    /// plus any error from [`Self::try_from_reader`].
    pub fn try_from_tsv_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, RosterProviderError> {
        let file = File::open(path)?;
        Self::try_from_reader(name, BufReader::new(file))
    }

    /// Reads a workbook roster from `path`.
    ///
    /// The whole file is buffered so the workbook flavour can be detected
    /// from its contents rather than its extension.
    ///
    /// # Errors
    /// Returns [`RosterProviderError::Io`] when the file cannot be read, plus
    /// any error from [`Self::try_from_xlsx_reader`].
    pub fn try_from_xlsx_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, RosterProviderError> {
        let bytes = fs::read(path)?;
        Self::try_from_xlsx_reader(name, Cursor::new(bytes))
    }

    /// Reads the first worksheet of an `.xlsx`, `.xls` or `.ods` workbook.
    ///
    /// The first non-empty row is the header and is matched the same way as a
    /// text header. Empty rows are skipped. Each cell is rendered as text and
    /// then validated like a text field, so whole-number cells are accepted as
    /// counts while fractional or negative ones are not.
    ///
    /// # Errors
    /// Returns [`RosterProviderError::Workbook`] when the bytes are not a
    /// readable workbook, [`RosterProviderError::EmptyInput`] when the first
    /// worksheet is missing or empty, and the same column and cell errors as
    /// [`Self::try_from_reader`].
    #[instrument(name = "roster.read_xlsx", err, skip(name, reader))]
    pub fn try_from_xlsx_reader<R>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, RosterProviderError>
    where
        R: Read + Seek + Clone,
    {
        let name = name.into();
        let mut workbook = open_workbook_auto_from_rs(reader)?;
        let Some(range) = workbook.worksheet_range_at(0) else {
            return Err(RosterProviderError::EmptyInput { name });
        };
        let range = range?;

        let mut rows = range
            .rows()
            .filter(|cells| !cells.iter().all(is_blank_cell));
        let Some(header) = rows.next() else {
            return Err(RosterProviderError::EmptyInput { name });
        };
        let header_fields: Vec<String> = header.iter().map(cell_text).collect();
        let columns = ColumnMap::resolve(header_fields.iter().map(String::as_str))?;

        let mut records = Vec::new();
        for cells in rows {
            let fields: Vec<String> = cells.iter().map(cell_text).collect();
            records.push(text_record(&columns, &fields, records.len())?);
        }

        debug!(roster = %name, rows = records.len(), "workbook roster loaded");
        Ok(Self { name, records })
    }

    /// Reads a Parquet roster from `path`.
    ///
    /// # Errors
    /// See [`Self::try_from_parquet_reader`].
    pub fn try_from_parquet_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, RosterProviderError> {
        let file = File::open(path)?;
        Self::try_from_parquet_reader(name, file)
    }

    /// Reads a Parquet roster with one column per field.
    ///
    /// String fields must be `Utf8` or `LargeUtf8`; count fields may be any of
    /// `Int32`, `Int64`, `UInt32` or `UInt64`. Null tags and external handles
    /// read as empty; null or blank names, handles and factions are rejected,
    /// as are null counts.
    ///
    /// # Errors
    /// Returns [`RosterProviderError::MissingColumns`],
    /// [`RosterProviderError::InvalidColumnType`],
    /// [`RosterProviderError::NullValue`] or
    /// [`RosterProviderError::InvalidCount`] for malformed data, and
    /// [`RosterProviderError::Parquet`] or [`RosterProviderError::Arrow`] when
    /// decoding fails.
    #[instrument(name = "roster.read_parquet", err, skip(name, reader))]
    pub fn try_from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, RosterProviderError>
    where
        R: ChunkReader + Send + 'static,
    {
        let name = name.into();
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let field_names: Vec<String> = builder
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect();
        let columns = ColumnMap::resolve(field_names.iter().map(String::as_str))?;
        let projected: Vec<&str> = columns
            .present()
            .filter_map(|(_, index)| field_names.get(index).map(String::as_str))
            .collect();
        let mask = ProjectionMask::columns(builder.parquet_schema(), projected);
        let reader = builder.with_projection(mask).build()?;

        let projected_names: Vec<String> = reader
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect();
        let columns = ColumnMap::resolve(projected_names.iter().map(String::as_str))?;

        let mut records = Vec::new();
        for batch in reader {
            let batch = batch?;
            let start_row = records.len();
            let column_of = |column: RosterColumn| {
                columns.position(column).map(|index| batch.column(index))
            };
            let strings = |column: RosterColumn| match column_of(column) {
                Some(array) => string_values(array, column),
                None => Ok(vec![None; batch.num_rows()]),
            };
            let counts = |column: RosterColumn| match column_of(column) {
                Some(array) => count_values(array, column, start_row),
                None => Ok(vec![0; batch.num_rows()]),
            };

            let names = strings(RosterColumn::Name)?;
            let handles = strings(RosterColumn::Handle)?;
            let factions = strings(RosterColumn::Faction)?;
            let tags = strings(RosterColumn::Tags)?;
            let tw_handles = strings(RosterColumn::TwHandle)?;
            let followers = counts(RosterColumn::TwFollowers)?;
            let following = counts(RosterColumn::TwFollowing)?;

            for offset in 0..batch.num_rows() {
                let row = start_row + offset;
                let required = |values: &[Option<String>], column: RosterColumn| {
                    required_text(
                        values.get(offset).and_then(Option::as_deref),
                        row,
                        column,
                    )
                };
                let optional =
                    |values: &[Option<String>]| values.get(offset).cloned().flatten();

                let mut record = PersonaRecord::new(
                    required(&names, RosterColumn::Name)?,
                    required(&handles, RosterColumn::Handle)?,
                    required(&factions, RosterColumn::Faction)?,
                )
                .with_tags(optional(&tags).unwrap_or_default())
                .with_desired(
                    followers.get(offset).copied().unwrap_or_default(),
                    following.get(offset).copied().unwrap_or_default(),
                );
                if let Some(tw) = optional(&tw_handles).filter(|tw| !tw.trim().is_empty()) {
                    record = record.with_tw_handle(tw);
                }
                records.push(record);
            }
        }

        debug!(roster = %name, rows = records.len(), "parquet roster loaded");
        Ok(Self { name, records })
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        // Whole floats render without a fractional part, so `12.0` reads as
        // the count `12`.
        other => other.to_string(),
    }
}

fn is_blank_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(text) => text.trim().is_empty(),
        _ => false,
    }
}
