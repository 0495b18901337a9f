//! Cell type dispatch, shared strings, dates and formulas.

use crate::BookBuilder;
use pretty_assertions::assert_eq;
use sheetgrid_core::CellType;
use sheetgrid_xlsx::{read_sheet_contents, XlsxError};

#[test]
fn test_type_codes() {
    let bytes = BookBuilder::new()
        .shared_strings(&["first", "second"])
        .sheet(
            "Types",
            r#"<row r="1">
                <c r="A1" t="s"><v>1</v></c>
                <c r="B1" t="b"><v>1</v></c>
                <c r="C1" t="e"><v>#N/A</v></c>
                <c r="D1" t="str"><f>UPPER("x")</f><v>X</v></c>
                <c r="E1" t="d"><v>2023-05-06</v></c>
                <c r="F1" t="inlineStr"><is><t>inline</t></is></c>
                <c r="G1"><v>12.5</v></c>
                <c r="H1" t="n"><v>-3</v></c>
                <c r="I1" t="mystery"><v>??</v></c>
            </row>"#,
        )
        .build();

    let sheets = read_sheet_contents(&bytes).unwrap();
    let sheet = &sheets[0];
    let got: Vec<(&str, CellType)> = (0..9)
        .map(|col| {
            let cell = sheet.cell(0, col).unwrap();
            (cell.value.as_str(), cell.cell_type)
        })
        .collect();

    assert_eq!(
        got,
        vec![
            ("second", CellType::String),
            ("1", CellType::Bool),
            ("#N/A", CellType::Error),
            ("X", CellType::StringFormula),
            ("2023-05-06", CellType::Date),
            ("inline", CellType::Inline),
            ("12.5", CellType::Numeric),
            ("-3", CellType::Numeric),
            ("??", CellType::General),
        ]
    );
    assert_eq!(
        sheet.cell(0, 3).unwrap().formula.as_deref(),
        Some("UPPER(\"x\")")
    );
}

#[test]
fn test_serial_dates_with_date_format() {
    let bytes = BookBuilder::new()
        .cell_formats(r#"<xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/>"#)
        .sheet(
            "Dates",
            r#"<row r="1"><c r="A1" s="1"><v>45292</v></c><c r="B1" s="1"><v>60</v></c><c r="C1" s="0"><v>45292</v></c></row>"#,
        )
        .build();

    let sheets = read_sheet_contents(&bytes).unwrap();
    let sheet = &sheets[0];
    assert_eq!(sheet.cell(0, 0).unwrap().value, "2024-01-01");
    assert_eq!(sheet.cell(0, 0).unwrap().cell_type, CellType::Date);
    assert_eq!(sheet.cell(0, 1).unwrap().value, "1900-02-29");
    assert_eq!(sheet.cell(0, 2).unwrap().value, "45292");
    assert_eq!(sheet.cell(0, 2).unwrap().cell_type, CellType::Numeric);
}

#[test]
fn test_1904_workbook() {
    let bytes = BookBuilder::new()
        .date1904()
        .cell_formats(r#"<xf numFmtId="0"/><xf numFmtId="14"/>"#)
        .sheet("Dates", r#"<row r="1"><c r="A1" s="1"><v>0</v></c></row>"#)
        .build();

    let sheets = read_sheet_contents(&bytes).unwrap();
    assert_eq!(sheets[0].cell(0, 0).unwrap().value, "1904-01-01");
}

#[test]
fn test_bad_shared_string_index_fails_the_read() {
    let bytes = BookBuilder::new()
        .shared_strings(&["only"])
        .sheet("Good", r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#)
        .sheet("Bad", r#"<row r="1"><c r="A1" t="s"><v>5</v></c></row>"#)
        .build();

    match read_sheet_contents(&bytes) {
        Err(XlsxError::SharedStringIndex { sheet, value }) => {
            assert_eq!(sheet, "Bad");
            assert_eq!(value, "5");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_shared_formula_group() {
    let bytes = BookBuilder::new()
        .sheet(
            "Calc",
            r#"<row r="1"><c r="C1"><f t="shared" ref="C1:C3" si="0">A1+B1*$D$1</f><v>0</v></c></row>
               <row r="2"><c r="C2"><f t="shared" si="0"/><v>0</v></c></row>
               <row r="3"><c r="C3"><f t="shared" si="0"/><v>0</v></c></row>"#,
        )
        .build();

    let sheets = read_sheet_contents(&bytes).unwrap();
    let formulas: Vec<_> = (0..3)
        .map(|row| sheets[0].cell(row, 2).unwrap().formula.clone())
        .collect();
    assert_eq!(
        formulas,
        vec![
            Some("A1+B1*$D$1".to_string()),
            Some("A2+B2*$D$1".to_string()),
            Some("A3+B3*$D$1".to_string()),
        ]
    );
}

#[test]
fn test_rows_are_positional() {
    let bytes = BookBuilder::new()
        .sheet(
            "Sparse",
            r#"<row r="3"><c r="A3"><v>a</v></c></row><row r="100"><c r="B100"><v>b</v></c></row>"#,
        )
        .build();

    let sheets = read_sheet_contents(&bytes).unwrap();
    let sheet = &sheets[0];
    assert_eq!(sheet.rows, 2);
    assert_eq!(sheet.max_row, 1);
    assert_eq!(sheet.cell(0, 0).unwrap().value, "a");
    assert_eq!(sheet.cell(1, 1).unwrap().value, "b");
}
