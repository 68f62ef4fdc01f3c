use super::{RosterColumn, RosterProvider, RosterProviderError, support::write_parquet};
use arrow_array::{ArrayRef, Int32Array, Int64Array, LargeStringArray, StringArray, UInt64Array};
use arrow_schema::DataType;
use rstest::rstest;
use std::sync::Arc;

fn strings(values: &[Option<&str>]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

fn base_columns() -> Vec<(&'static str, ArrayRef, bool)> {
    vec![
        ("Name", strings(&[Some("Ada"), Some("Bo")]), false),
        ("Handle", strings(&[Some("ada"), Some("bo")]), false),
        ("Faction", strings(&[Some("blue"), Some("red")]), false),
        ("Tags", strings(&[Some("#hub"), None]), true),
        ("TwHandle", strings(&[None, Some("@bo")]), true),
        ("TwFollowers", Arc::new(Int64Array::from(vec![120, 4])), false),
        ("TwFollowing", Arc::new(Int32Array::from(vec![10, 2])), false),
    ]
}

fn replace(
    mut columns: Vec<(&'static str, ArrayRef, bool)>,
    name: &str,
    array: ArrayRef,
    nullable: bool,
) -> Vec<(&'static str, ArrayRef, bool)> {
    for column in &mut columns {
        if column.0 == name {
            column.1 = array.clone();
            column.2 = nullable;
        }
    }
    columns
}

#[rstest]
fn reads_parquet_roster() {
    let bytes = write_parquet(base_columns());
    let provider = RosterProvider::try_from_parquet_reader("pq", bytes).expect("parquet load");
    assert_eq!(provider.name(), "pq");
    assert_eq!(provider.len(), 2);

    let [ada, bo] = provider.records() else {
        panic!("expected two records");
    };
    assert_eq!((ada.handle.as_str(), ada.tags.as_str()), ("ada", "#hub"));
    assert_eq!(ada.tw_handle, None);
    assert_eq!((ada.desired_in, ada.desired_out), (120, 10));
    assert_eq!(bo.tags, "");
    assert_eq!(bo.tw_handle.as_deref(), Some("@bo"));
}

#[rstest]
fn accepts_large_strings_and_unsigned_counts() {
    let columns = replace(
        base_columns(),
        "Name",
        Arc::new(LargeStringArray::from(vec!["Ada", "Bo"])),
        false,
    );
    let columns = replace(
        columns,
        "TwFollowers",
        Arc::new(UInt64Array::from(vec![u64::from(u32::MAX) + 1, 0])),
        false,
    );
    let provider = RosterProvider::try_from_parquet_reader("pq", write_parquet(columns))
        .expect("parquet load");
    assert_eq!(provider.records()[0].name, "Ada");
    assert_eq!(provider.records()[0].desired_in, u64::from(u32::MAX) + 1);
}

#[rstest]
fn matches_lowercase_field_names() {
    let lowered = [
        "name",
        "handle",
        "faction",
        "tags",
        "twhandle",
        "twfollowers",
        "twfollowing",
    ];
    let columns = base_columns()
        .into_iter()
        .zip(lowered)
        .map(|((_, array, nullable), name)| (name, array, nullable))
        .collect();
    let provider = RosterProvider::try_from_parquet_reader("pq", write_parquet(columns))
        .expect("parquet load");
    assert_eq!(provider.len(), 2);
    assert_eq!(provider.records()[1].tw_handle.as_deref(), Some("@bo"));
}

#[rstest]
fn reports_missing_parquet_columns() {
    let columns = base_columns()
        .into_iter()
        .filter(|(name, _, _)| !matches!(*name, "Faction" | "TwFollowing"))
        .collect();
    let err = RosterProvider::try_from_parquet_reader("pq", write_parquet(columns))
        .expect_err("missing columns");
    assert!(matches!(
        err,
        RosterProviderError::MissingColumns { ref columns } if columns == &["Faction", "TwFollowing"]
    ));
}

#[rstest]
fn rejects_negative_counts() {
    let columns = replace(
        base_columns(),
        "TwFollowing",
        Arc::new(Int32Array::from(vec![1, -4])),
        false,
    );
    let err = RosterProvider::try_from_parquet_reader("pq", write_parquet(columns))
        .expect_err("negative count");
    assert!(matches!(
        err,
        RosterProviderError::InvalidCount { row: 1, column: "TwFollowing", ref value } if value == "-4"
    ));
}

#[rstest]
fn rejects_null_counts() {
    let columns = replace(
        base_columns(),
        "TwFollowers",
        Arc::new(Int64Array::from(vec![Some(3), None])),
        true,
    );
    let err = RosterProvider::try_from_parquet_reader("pq", write_parquet(columns))
        .expect_err("null count");
    assert!(matches!(
        err,
        RosterProviderError::NullValue { row: 1, column: "TwFollowers" }
    ));
}

#[rstest]
fn rejects_null_handles() {
    let columns = replace(base_columns(), "Handle", strings(&[Some("ada"), None]), true);
    let err = RosterProvider::try_from_parquet_reader("pq", write_parquet(columns))
        .expect_err("null handle");
    assert!(matches!(
        err,
        RosterProviderError::NullValue { row: 1, column } if column == RosterColumn::Handle.header()
    ));
}

#[rstest]
fn rejects_blank_factions() {
    let columns = replace(base_columns(), "Faction", strings(&[Some("blue"), Some("  ")]), false);
    let err = RosterProvider::try_from_parquet_reader("pq", write_parquet(columns))
        .expect_err("blank faction");
    assert!(matches!(
        err,
        RosterProviderError::NullValue { row: 1, column: "Faction" }
    ));
}

#[rstest]
fn rejects_float_counts() {
    let columns = replace(
        base_columns(),
        "TwFollowers",
        Arc::new(arrow_array::Float64Array::from(vec![1.0, 2.0])),
        false,
    );
    let err = RosterProvider::try_from_parquet_reader("pq", write_parquet(columns))
        .expect_err("float counts");
    assert!(matches!(
        err,
        RosterProviderError::InvalidColumnType { column: "TwFollowers", actual: DataType::Float64 }
    ));
}
