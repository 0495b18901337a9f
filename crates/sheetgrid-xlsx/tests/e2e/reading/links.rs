//! Hyperlink formulas and list validations.

use crate::BookBuilder;
use pretty_assertions::assert_eq;
use sheetgrid_core::{GridRange, ListBounds};
use sheetgrid_xlsx::read_sheet_contents;

#[test]
fn test_hyperlinks_from_formulas() {
    let bytes = BookBuilder::new()
        .sheet(
            "Index",
            r#"<row r="1">
                 <c r="A1" t="str"><f>HYPERLINK(&quot;#Data!B2:C4&quot;,&quot;Go to data&quot;)</f><v>Go to data</v></c>
                 <c r="B1"><f>SUM(C1:C2)</f><v>0</v></c>
               </row>
               <row r="2">
                 <c r="A2" t="str"><f>HYPERLINK(&quot;https://example.com&quot;,&quot;Site&quot;)</f><v>Site</v></c>
               </row>"#,
        )
        .build();

    let sheets = read_sheet_contents(&bytes).unwrap();
    let links = sheets[0].hyperlinks();
    assert_eq!(links.len(), 2);

    let internal = &links[0];
    assert!(internal.is_valid());
    assert_eq!((internal.row, internal.col), (0, 0));
    assert_eq!(internal.sheet_name(), Some("Data"));
    assert_eq!(internal.display(), Some("Go to data"));
    assert_eq!(internal.range(), Some(GridRange::new(1, 1, 3, 2)));

    let external = &links[1];
    assert!(!external.is_valid());
    assert_eq!((external.row, external.col), (1, 0));
}

#[test]
fn test_list_validations_are_decoded() {
    let bytes = BookBuilder::new()
        .sheet_with_tail(
            "Form",
            r#"<row r="1"><c r="A1"><v>1</v></c></row>"#,
            r#"<dataValidations count="3">
                 <dataValidation type="list" allowBlank="1" sqref="A1:A20"><formula1>$H$2:$H$9</formula1></dataValidation>
                 <dataValidation type="list" sqref="B1"><formula1>"yes,no"</formula1></dataValidation>
                 <dataValidation type="decimal" sqref="C1"><formula1>0</formula1><formula2>1</formula2></dataValidation>
               </dataValidations>"#,
        )
        .build();

    let sheets = read_sheet_contents(&bytes).unwrap();
    let validations = &sheets[0].data_validations;
    assert_eq!(validations.len(), 3);

    assert_eq!(validations[0].sqref, "A1:A20");
    assert_eq!(validations[0].allow_blank, "1");
    assert_eq!(
        validations[0].bounds,
        ListBounds::Parsed(GridRange::new(1, 7, 8, 7))
    );

    assert_eq!(validations[1].formula1, "\"yes,no\"");
    assert_eq!(validations[1].bounds, ListBounds::Unparsed);

    assert_eq!(validations[2].validation_type, "decimal");
    assert_eq!(validations[2].formula2, "1");
    assert_eq!(validations[2].bounds, ListBounds::Unparsed);
}
