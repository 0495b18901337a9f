//! Concurrent decoding across many sheets.

use std::io::Cursor;

use crate::{numbered_rows, BookBuilder};
use pretty_assertions::assert_eq;
use sheetgrid_xlsx::{SheetReader, XlsxError};

fn many_sheets(count: usize) -> Vec<u8> {
    (1..=count)
        .fold(BookBuilder::new(), |book, i| {
            book.sheet(&format!("S{i}"), &numbered_rows(i * 3))
        })
        .build()
}

#[test]
fn test_order_is_independent_of_worker_count() {
    let bytes = many_sheets(8);
    let sequential = SheetReader::new(Cursor::new(&bytes))
        .unwrap()
        .with_workers(1)
        .read()
        .unwrap();

    for workers in [2, 4, 32] {
        let parallel = SheetReader::new(Cursor::new(&bytes))
            .unwrap()
            .with_workers(workers)
            .read()
            .unwrap();
        assert_eq!(parallel, sequential, "workers = {workers}");
    }

    let names: Vec<_> = sequential.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8"]);
    let rows: Vec<_> = sequential.iter().map(|s| s.rows).collect();
    assert_eq!(rows, vec![3, 6, 9, 12, 15, 18, 21, 24]);
}

#[test]
fn test_failing_sheet_fails_the_read() {
    let bad = r#"<row r="1"><c r="A1" t="s"><v>42</v></c></row>"#;
    let bytes = BookBuilder::new()
        .shared_strings(&["a"])
        .sheet("S1", &numbered_rows(5))
        .sheet("S2", &numbered_rows(5))
        .sheet("S3", bad)
        .sheet("S4", &numbered_rows(5))
        .sheet("S5", &numbered_rows(5))
        .build();

    for workers in [1, 3, 8] {
        let result = SheetReader::new(Cursor::new(&bytes))
            .unwrap()
            .with_workers(workers)
            .read();
        match result {
            Err(XlsxError::SharedStringIndex { sheet, .. }) => assert_eq!(sheet, "S3"),
            other => panic!("unexpected result with {workers} workers: {other:?}"),
        }
    }
}

#[test]
fn test_zero_workers_still_reads() {
    let bytes = many_sheets(2);
    let sheets = SheetReader::new(Cursor::new(&bytes))
        .unwrap()
        .with_workers(0)
        .read()
        .unwrap();
    assert_eq!(sheets.len(), 2);
}
