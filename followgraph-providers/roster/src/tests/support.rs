use arrow_array::{ArrayRef, RecordBatch};
use arrow_schema::{Field, Schema};
use bytes::Bytes;
use parquet::arrow::arrow_writer::ArrowWriter;
use rust_xlsxwriter::Workbook;
use std::sync::Arc;

/// Writes `columns` into a single-batch Parquet buffer.
pub(crate) fn write_parquet(columns: Vec<(&str, ArrayRef, bool)>) -> Bytes {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array, nullable)| Field::new(*name, array.data_type().clone(), *nullable))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let arrays = columns.into_iter().map(|(_, array, _)| array).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("batch");
    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).expect("writer");
        writer.write(&batch).expect("write");
        writer.close().expect("close");
    }
    Bytes::from(buffer)
}

/// One worksheet cell for [`write_xlsx`].
#[derive(Debug, Clone, Copy)]
pub(crate) enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

/// Writes `rows` into the first worksheet of an in-memory `.xlsx` workbook.
pub(crate) fn write_xlsx(rows: &[Vec<Cell<'_>>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (row, cells) in rows.iter().enumerate() {
        let row = u32::try_from(row).expect("row index");
        for (column, cell) in cells.iter().enumerate() {
            let column = u16::try_from(column).expect("column index");
            match *cell {
                Cell::Text(text) => {
                    sheet.write_string(row, column, text).expect("write string");
                }
                Cell::Number(value) => {
                    sheet.write_number(row, column, value).expect("write number");
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save_to_buffer().expect("save workbook")
}
