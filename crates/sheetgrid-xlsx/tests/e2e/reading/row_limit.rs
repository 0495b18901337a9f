//! Row ceiling applied while reading.

use crate::{numbered_rows, BookBuilder};
use pretty_assertions::assert_eq;
use sheetgrid_xlsx::{read_sheet_contents, read_sheet_contents_with_limit, RowLimit};

fn book() -> Vec<u8> {
    BookBuilder::new()
        .sheet_with_tail(
            "Long",
            &numbered_rows(10),
            r#"<mergeCells count="1"><mergeCell ref="A8:B9"/></mergeCells>"#,
        )
        .sheet("Short", &numbered_rows(2))
        .build()
}

#[test]
fn test_limit_cuts_every_sheet() {
    let sheets = read_sheet_contents_with_limit(&book(), RowLimit::Rows(3)).unwrap();
    assert_eq!(sheets[0].rows, 3);
    assert_eq!(sheets[0].cell(2, 0).unwrap().value, "3");
    assert!(sheets[0].cell(3, 0).is_none());
    // merges past the cut are gone with the rest of the document
    assert!(sheets[0].cells().all(|(_, _, c)| c.h_merge == 0 && c.v_merge == 0));
    assert_eq!(sheets[1].rows, 2);
}

#[test]
fn test_zero_rows() {
    let sheets = read_sheet_contents_with_limit(&book(), RowLimit::Rows(0)).unwrap();
    assert_eq!(sheets.len(), 2);
    assert!(sheets.iter().all(|s| s.rows == 0 && s.content.is_empty()));
}

#[test]
fn test_limit_above_row_count_changes_nothing() {
    let unlimited = read_sheet_contents(&book()).unwrap();
    let limited = read_sheet_contents_with_limit(&book(), RowLimit::Rows(1000)).unwrap();
    assert_eq!(limited, unlimited);
    assert_eq!(unlimited[0].cell(7, 0).unwrap().v_merge, 1);
}

#[test]
fn test_limit_on_worksheet_with_byte_order_mark() {
    let bytes = BookBuilder::new()
        .byte_order_marks()
        .sheet("Marked", &numbered_rows(5))
        .build();

    let sheets = read_sheet_contents_with_limit(&bytes, RowLimit::Rows(2)).unwrap();
    assert_eq!(sheets[0].rows, 2);
    assert_eq!(sheets[0].cell(1, 0).unwrap().value, "2");
    assert_eq!(read_sheet_contents(&bytes).unwrap()[0].rows, 5);
}
