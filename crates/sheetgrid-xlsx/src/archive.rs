//! Archive triage: classify package members by name

use std::collections::BTreeMap;

use crate::error::{XlsxError, XlsxResult};

pub const WORKBOOK: &str = "xl/workbook.xml";
pub const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
pub const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
pub const STYLES: &str = "xl/styles.xml";
pub const THEME: &str = "xl/theme/theme1.xml";

const WORKSHEET_DIR: &str = "xl/worksheets/";
const XML_EXT: &str = ".xml";

/// Member names of the parts a sheet read needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveParts {
    pub workbook: Option<String>,
    pub workbook_rels: Option<String>,
    pub shared_strings: Option<String>,
    pub styles: Option<String>,
    pub theme: Option<String>,
    /// Worksheet key (`sheet1`) -> member name (`xl/worksheets/sheet1.xml`)
    pub worksheets: BTreeMap<String, String>,
}

impl ArchiveParts {
    /// Classify every member name; unknown members are ignored.
    pub fn triage<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut parts = Self::default();
        for name in names {
            match name {
                WORKBOOK => parts.workbook = Some(name.to_string()),
                WORKBOOK_RELS => parts.workbook_rels = Some(name.to_string()),
                SHARED_STRINGS => parts.shared_strings = Some(name.to_string()),
                STYLES => parts.styles = Some(name.to_string()),
                THEME => parts.theme = Some(name.to_string()),
                _ => {
                    if let Some(key) = worksheet_key(name) {
                        parts.worksheets.insert(key.to_string(), name.to_string());
                    }
                }
            }
        }
        parts
    }

    /// The relationship map member, or an error when it is absent
    pub fn require_rels(&self) -> XlsxResult<&str> {
        self.workbook_rels
            .as_deref()
            .ok_or_else(|| XlsxError::MissingPart(WORKBOOK_RELS.into()))
    }

    /// The workbook definition member, or an error when it is absent
    pub fn require_workbook(&self) -> XlsxResult<&str> {
        self.workbook
            .as_deref()
            .ok_or_else(|| XlsxError::MissingPart(WORKBOOK.into()))
    }

    /// Fail when no worksheet member was found
    pub fn require_worksheets(&self) -> XlsxResult<()> {
        if self.worksheets.is_empty() {
            return Err(XlsxError::NoWorksheets);
        }
        Ok(())
    }

    /// Member name of the worksheet at `path`, if the archive holds it
    pub fn worksheet(&self, path: &str) -> Option<&str> {
        let key = worksheet_key(path)?;
        self.worksheets.get(key).map(String::as_str)
    }
}

/// `xl/worksheets/sheet1.xml` -> `sheet1`; nested directories do not count.
pub fn worksheet_key(name: &str) -> Option<&str> {
    let key = name.strip_prefix(WORKSHEET_DIR)?.strip_suffix(XML_EXT)?;
    if key.is_empty() || key.contains('/') {
        return None;
    }
    Some(key)
}
