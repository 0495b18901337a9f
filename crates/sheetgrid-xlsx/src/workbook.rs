//! Workbook definition and workbook relationships

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::XlsxResult;

/// Maps a workbook-declared sheet to the archive member holding its cells.
pub trait RelationshipResolver {
    /// Member path for the sheet's relationship id, if there is one
    fn worksheet_path_for(&self, rel_id: &str) -> Option<&str>;
}

/// Relationships parsed from `xl/_rels/workbook.xml.rels`.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Relationship id -> member path inside the archive
    targets: HashMap<String, String>,
}

impl Relationships {
    /// Read the relationship part
    pub fn read<R: Read>(reader: R) -> XlsxResult<Self> {
        let mut xml_reader = Reader::from_reader(BufReader::new(reader));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut targets = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                    let mut id = None;
                    let mut target = None;
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = Some(attr.unescape_value()?.to_string()),
                            b"Target" => target = Some(attr.unescape_value()?.to_string()),
                            b"TargetMode" => {
                                external = attr.unescape_value()?.eq_ignore_ascii_case("external")
                            }
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target), false) = (id, target, external) {
                        targets.insert(id, resolve_target(&target));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl RelationshipResolver for Relationships {
    fn worksheet_path_for(&self, rel_id: &str) -> Option<&str> {
        self.targets.get(rel_id).map(String::as_str)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Relationships {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self {
            targets: pairs
                .into_iter()
                .map(|(id, target)| (id.to_string(), resolve_target(target)))
                .collect(),
        }
    }
}

/// Resolve a relationship target against `xl/`.
///
/// Absolute targets (`/xl/worksheets/sheet1.xml`) drop the leading slash;
/// relative ones are joined to `xl/` with `.` and `..` segments folded.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments = vec!["xl"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// A `<sheet>` entry of the workbook, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub sheet_id: String,
    pub rel_id: String,
}

/// The parts of `xl/workbook.xml` the sheet reader needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookInfo {
    pub sheets: Vec<SheetEntry>,
    /// `workbookPr/@date1904`: serial dates count from 1904-01-01
    pub date1904: bool,
}

impl WorkbookInfo {
    /// Read the workbook definition part
    pub fn read<R: Read>(reader: R) -> XlsxResult<Self> {
        let mut xml_reader = Reader::from_reader(BufReader::new(reader));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut info = WorkbookInfo::default();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) => match e.local_name().as_ref() {
                    b"sheet" => {
                        let mut name = None;
                        let mut sheet_id = String::new();
                        let mut rel_id = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => name = Some(attr.unescape_value()?.to_string()),
                                b"sheetId" => sheet_id = attr.unescape_value()?.to_string(),
                                _ if attr.key.prefix().is_some()
                                    && attr.key.local_name().as_ref() == b"id" =>
                                {
                                    rel_id = Some(attr.unescape_value()?.to_string());
                                }
                                _ => {}
                            }
                        }

                        if let (Some(name), Some(rel_id)) = (name, rel_id) {
                            info.sheets.push(SheetEntry {
                                name,
                                sheet_id,
                                rel_id,
                            });
                        }
                    }
                    b"workbookPr" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"date1904" {
                                let value = attr.unescape_value()?;
                                info.date1904 = matches!(&*value, "1" | "true");
                            }
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(info)
    }
}
