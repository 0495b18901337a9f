//! Style catalog (`xl/styles.xml`): number formats and cell formats

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use sheetgrid_core::{CellStyle, NumberFormat, StyleResolver};

use crate::error::XlsxResult;

/// Get built-in format string by ID
fn builtin_format_code(id: u32) -> &'static str {
    match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0 ;(#,##0)",
        38 => "#,##0 ;[Red](#,##0)",
        39 => "#,##0.00;(#,##0.00)",
        40 => "#,##0.00;[Red](#,##0.00)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => "General",
    }
}

/// Whether a format renders a date and/or time.
///
/// Built-in ids 14-22 and 45-47 are date/time formats. For other codes, date
/// tokens are looked for outside quoted literals, escaped characters and
/// bracketed sections; `[h]`, `[mm]` and `[ss]` elapsed-time brackets count.
pub fn is_time_format(id: u32, code: &str) -> bool {
    if matches!(id, 14..=22 | 45..=47) {
        return true;
    }
    if code.eq_ignore_ascii_case("general") {
        return false;
    }

    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let mut inner = String::new();
                for b in chars.by_ref() {
                    if b == ']' {
                        break;
                    }
                    inner.push(b);
                }
                if !inner.is_empty()
                    && inner
                        .chars()
                        .all(|b| matches!(b.to_ascii_lowercase(), 'h' | 'm' | 's'))
                {
                    return true;
                }
            }
            c if matches!(c.to_ascii_lowercase(), 'y' | 'm' | 'd' | 'h' | 's') => return true,
            _ => {}
        }
    }
    false
}

/// Number formats and cell formats (`cellXfs`) of a workbook.
///
/// A style index from a cell's `s` attribute indexes `cellXfs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleCatalog {
    /// Custom number formats by numFmtId
    num_fmts: HashMap<u32, String>,
    cell_xfs: Vec<CellStyle>,
}

impl StyleCatalog {
    /// Read the style part
    pub fn read<R: Read>(reader: R) -> XlsxResult<Self> {
        let mut xml_reader = Reader::from_reader(BufReader::new(reader));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut catalog = StyleCatalog::default();
        let mut in_cell_xfs = false;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"cellXfs" => in_cell_xfs = true,
                    b"numFmt" => catalog.push_num_fmt(&e)?,
                    b"xf" if in_cell_xfs => catalog.cell_xfs.push(parse_xf(&e)?),
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"numFmt" => catalog.push_num_fmt(&e)?,
                    b"xf" if in_cell_xfs => catalog.cell_xfs.push(parse_xf(&e)?),
                    _ => {}
                },
                Event::End(e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = false,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        log::debug!(
            "read {} number formats and {} cell formats",
            catalog.num_fmts.len(),
            catalog.cell_xfs.len()
        );
        Ok(catalog)
    }

    fn push_num_fmt(&mut self, e: &BytesStart<'_>) -> XlsxResult<()> {
        let mut id = None;
        let mut code = None;
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"numFmtId" => id = attr.unescape_value()?.parse().ok(),
                b"formatCode" => code = Some(attr.unescape_value()?.to_string()),
                _ => {}
            }
        }
        if let (Some(id), Some(code)) = (id, code) {
            self.num_fmts.insert(id, code);
        }
        Ok(())
    }

    /// Number of cell formats
    pub fn len(&self) -> usize {
        self.cell_xfs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_xfs.is_empty()
    }

    /// Format code for a numFmtId: custom codes shadow built-in ones.
    pub fn format_code(&self, num_fmt_id: u32) -> &str {
        self.num_fmts
            .get(&num_fmt_id)
            .map(String::as_str)
            .unwrap_or_else(|| builtin_format_code(num_fmt_id))
    }
}

fn parse_xf(e: &BytesStart<'_>) -> XlsxResult<CellStyle> {
    let mut style = CellStyle::default();
    for attr in e.attributes().flatten() {
        let slot = match attr.key.as_ref() {
            b"numFmtId" => &mut style.num_fmt_id,
            b"fontId" => &mut style.font_id,
            b"fillId" => &mut style.fill_id,
            b"borderId" => &mut style.border_id,
            b"xfId" => &mut style.xf_id,
            _ => continue,
        };
        *slot = attr.unescape_value()?.parse().unwrap_or(0);
    }
    Ok(style)
}

impl StyleResolver for StyleCatalog {
    fn style_for(&self, index: u32) -> Option<CellStyle> {
        self.cell_xfs.get(index as usize).copied()
    }

    fn number_format_for(&self, index: u32) -> NumberFormat {
        let Some(style) = self.style_for(index) else {
            return NumberFormat::general();
        };
        let id = style.num_fmt_id;
        let code = self.format_code(id).to_string();
        let is_time = is_time_format(id, &code);
        NumberFormat { id, code, is_time }
    }
}
