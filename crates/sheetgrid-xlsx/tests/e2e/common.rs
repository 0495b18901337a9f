//! Common utilities for E2E tests.

use std::io::{Cursor, Write};

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

struct SheetPart {
    name: String,
    /// `None` declares the sheet in the workbook without any worksheet part
    xml: Option<String>,
}

/// Builds a minimal XLSX archive in memory.
///
/// # Example
///
/// ```rust,ignore
/// let bytes = BookBuilder::new()
///     .shared_strings(&["hello"])
///     .sheet("Data", r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#)
///     .build();
/// ```
#[derive(Default)]
pub struct BookBuilder {
    sheets: Vec<SheetPart>,
    shared_strings: Option<Vec<String>>,
    styles: Option<String>,
    date1904: bool,
    omit_rels: bool,
    omit_workbook: bool,
    bom: bool,
}

impl BookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet whose `<sheetData>` holds `rows`
    pub fn sheet(self, name: &str, rows: &str) -> Self {
        self.sheet_with_tail(name, rows, "")
    }

    /// Add a sheet with extra worksheet elements after `<sheetData>`
    pub fn sheet_with_tail(mut self, name: &str, rows: &str, tail: &str) -> Self {
        self.sheets.push(SheetPart {
            name: name.to_string(),
            xml: Some(worksheet_xml(rows, tail)),
        });
        self
    }

    /// Declare a sheet with no worksheet part (like a chart sheet)
    pub fn declared_only(mut self, name: &str) -> Self {
        self.sheets.push(SheetPart {
            name: name.to_string(),
            xml: None,
        });
        self
    }

    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = Some(strings.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Use the given `cellXfs` body as the style part
    pub fn cell_formats(mut self, xfs: &str) -> Self {
        self.styles = Some(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="{MAIN_NS}"><cellXfs>{xfs}</cellXfs></styleSheet>"#
        ));
        self
    }

    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    /// Start every worksheet part with a UTF-8 byte order mark
    pub fn byte_order_marks(mut self) -> Self {
        self.bom = true;
        self
    }

    pub fn without_rels(mut self) -> Self {
        self.omit_rels = true;
        self
    }

    pub fn without_workbook(mut self) -> Self {
        self.omit_workbook = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        let mut put = |name: &str, body: &str| {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };

        put("[Content_Types].xml", CONTENT_TYPES);

        let mut declared = String::new();
        let mut rels = String::new();
        let mut part = 0;
        for (idx, sheet) in self.sheets.iter().enumerate() {
            let id = idx + 1;
            declared.push_str(&format!(
                r#"<sheet name="{}" sheetId="{id}" r:id="rId{id}"/>"#,
                sheet.name
            ));
            if let Some(xml) = &sheet.xml {
                part += 1;
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{id}" Type="{WORKSHEET_REL}" Target="worksheets/sheet{part}.xml"/>"#
                ));
                let bom = if self.bom { "\u{FEFF}" } else { "" };
                put(&format!("xl/worksheets/sheet{part}.xml"), &format!("{bom}{xml}"));
            }
        }

        if !self.omit_workbook {
            let pr = if self.date1904 {
                r#"<workbookPr date1904="1"/>"#
            } else {
                ""
            };
            put(
                "xl/workbook.xml",
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">{pr}<sheets>{declared}</sheets></workbook>"#
                ),
            );
        }
        if !self.omit_rels {
            put(
                "xl/_rels/workbook.xml.rels",
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
                ),
            );
        }
        if let Some(strings) = &self.shared_strings {
            let items: String = strings
                .iter()
                .map(|s| format!("<si><t>{s}</t></si>"))
                .collect();
            put(
                "xl/sharedStrings.xml",
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="{MAIN_NS}" count="{n}" uniqueCount="{n}">{items}</sst>"#,
                    n = strings.len()
                ),
            );
        }
        if let Some(styles) = &self.styles {
            put("xl/styles.xml", styles);
        }

        zip.finish().unwrap().into_inner()
    }
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

pub fn worksheet_xml(rows: &str, tail: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheetData>{rows}</sheetData>{tail}</worksheet>"#
    )
}

/// `n` rows with a numeric value in column A
pub fn numbered_rows(n: usize) -> String {
    (1..=n)
        .map(|r| format!(r#"<row r="{r}"><c r="A{r}"><v>{r}</v></c></row>"#))
        .collect()
}
