//! Merged regions and blank row/column bookkeeping.

use std::collections::BTreeSet;

use crate::BookBuilder;
use pretty_assertions::assert_eq;
use sheetgrid_xlsx::{read_sheet_contents, XlsxError};

#[test]
fn test_merge_extents_on_anchor() {
    let bytes = BookBuilder::new()
        .sheet_with_tail(
            "Merged",
            r#"<row r="1"><c r="A1"><v>title</v></c><c r="B1"/><c r="D1"><v>x</v></c></row>
               <row r="2"><c r="A2"/></row>
               <row r="3"><c r="A3"/></row>
               <row r="4"/>"#,
            r#"<mergeCells count="1"><mergeCell ref="A1:B3"/></mergeCells>"#,
        )
        .build();

    let sheets = read_sheet_contents(&bytes).unwrap();
    let sheet = &sheets[0];

    let anchor = sheet.cell(0, 0).unwrap();
    assert_eq!((anchor.h_merge, anchor.v_merge), (1, 2));
    assert!(anchor.is_merge_anchor());
    // covered cells are folded into the anchor
    assert!(sheet.cell(0, 1).is_none());
    assert!(sheet.cell(1, 0).is_none());
    assert_eq!(sheet.cell(0, 3).unwrap().value, "x");

    // rows 2 and 3 sit inside the merged block, row 4 is empty
    assert_eq!(sheet.blank_rows, BTreeSet::from([3]));
    // column C is never touched; B is covered by the merge
    assert_eq!(sheet.blank_cols, BTreeSet::from([2]));
    assert_eq!(sheet.max_col, 3);
    assert_eq!(sheet.rows, 4);
}

#[test]
fn test_column_reached_only_through_merge() {
    let bytes = BookBuilder::new()
        .sheet_with_tail(
            "Wide",
            r#"<row r="1"><c r="A1"><v>a</v></c><c r="C1"><v>c</v></c><c r="F1"><v>f</v></c></row>"#,
            r#"<mergeCells count="1"><mergeCell ref="C1:E1"/></mergeCells>"#,
        )
        .build();

    let sheets = read_sheet_contents(&bytes).unwrap();
    let sheet = &sheets[0];
    assert_eq!(sheet.max_col, 5);
    assert_eq!(sheet.blank_cols, BTreeSet::from([1]));
    assert_eq!(sheet.cols, 5);
}

#[test]
fn test_malformed_merge_fails_the_sheet() {
    let bytes = BookBuilder::new()
        .sheet_with_tail(
            "Broken",
            r#"<row r="1"><c r="A1"><v>1</v></c></row>"#,
            r#"<mergeCells count="1"><mergeCell ref="A1:??"/></mergeCells>"#,
        )
        .build();

    match read_sheet_contents(&bytes) {
        Err(XlsxError::InvalidMerge { sheet, reference }) => {
            assert_eq!(sheet, "Broken");
            assert_eq!(reference, "A1:??");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_empty_sheet() {
    let bytes = BookBuilder::new().sheet("Empty", "").build();
    let sheets = read_sheet_contents(&bytes).unwrap();
    let sheet = &sheets[0];
    assert_eq!(sheet.rows, 0);
    assert!(sheet.content.is_empty());
    assert!(sheet.blank_rows.is_empty());
    assert_eq!(sheet.blank_cols, BTreeSet::from([0]));
}
