//! Archive structure: required parts, sheet resolution and ordering.

use std::io::Write;

use crate::BookBuilder;
use pretty_assertions::assert_eq;
use sheetgrid_xlsx::{read_file, read_sheet_contents, XlsxError};

fn names(bytes: &[u8]) -> Vec<String> {
    read_sheet_contents(bytes)
        .expect("read failed")
        .into_iter()
        .map(|s| s.name)
        .collect()
}

#[test]
fn test_sheets_come_back_in_declaration_order() {
    let bytes = BookBuilder::new()
        .sheet("Zeta", "")
        .sheet("Alpha", "")
        .sheet("Mu", "")
        .build();
    assert_eq!(names(&bytes), vec!["Zeta", "Alpha", "Mu"]);
}

#[test]
fn test_sheet_without_worksheet_part_is_excluded() {
    let bytes = BookBuilder::new()
        .sheet("Data", r#"<row r="1"><c r="A1"><v>1</v></c></row>"#)
        .declared_only("Chart1")
        .sheet("Summary", "")
        .build();
    assert_eq!(names(&bytes), vec!["Data", "Summary"]);
}

#[test]
fn test_missing_relationship_map() {
    let bytes = BookBuilder::new().sheet("Data", "").without_rels().build();
    match read_sheet_contents(&bytes) {
        Err(XlsxError::MissingPart(part)) => assert_eq!(part, "xl/_rels/workbook.xml.rels"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_missing_workbook() {
    let bytes = BookBuilder::new()
        .sheet("Data", "")
        .without_workbook()
        .build();
    match read_sheet_contents(&bytes) {
        Err(XlsxError::MissingPart(part)) => assert_eq!(part, "xl/workbook.xml"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_no_worksheets() {
    let bytes = BookBuilder::new().declared_only("Chart1").build();
    assert!(matches!(
        read_sheet_contents(&bytes),
        Err(XlsxError::NoWorksheets)
    ));
}

#[test]
fn test_missing_shared_strings_and_styles_are_fine() {
    let bytes = BookBuilder::new()
        .sheet("Data", r#"<row r="1"><c r="A1" s="3"><v>7</v></c></row>"#)
        .build();
    let sheets = read_sheet_contents(&bytes).unwrap();
    let cell = sheets[0].cell(0, 0).unwrap();
    assert_eq!(cell.value, "7");
    assert_eq!(cell.style_ref, Some(3));
    assert_eq!(cell.style, None);
}

#[test]
fn test_read_file() {
    let bytes = BookBuilder::new()
        .shared_strings(&["on disk"])
        .sheet("Data", r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#)
        .build();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let sheets = read_file(file.path()).unwrap();
    assert_eq!(sheets[0].cell(0, 0).unwrap().value, "on disk");
}
