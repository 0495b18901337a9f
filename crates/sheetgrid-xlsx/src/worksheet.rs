//! Worksheet decoder: one worksheet part into a raw structural tree

use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::XlsxResult;
use crate::shared_strings::decode_excel_escapes;

/// `<f>` element of a cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawFormula {
    pub text: String,
    /// `t` attribute (`shared`, `array`, `dataTable`); `None` for normal
    pub kind: Option<String>,
    /// `si` attribute of shared formulas
    pub shared_index: Option<u32>,
    /// `ref` attribute: the range a shared/array master covers
    pub reference: Option<String>,
}

impl RawFormula {
    pub fn is_shared(&self) -> bool {
        self.kind.as_deref() == Some("shared")
    }
}

/// `<c>` element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCell {
    /// `r` attribute (`B7`)
    pub reference: Option<String>,
    /// `t` attribute
    pub cell_type: Option<String>,
    /// `s` attribute
    pub style: Option<u32>,
    /// Text of `<v>`
    pub value: Option<String>,
    pub formula: Option<RawFormula>,
    /// Concatenated text runs of `<is>`
    pub inline: Option<String>,
}

/// `<row>` element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    /// `r` attribute, 1-based; informational only
    pub number: Option<u32>,
    pub cells: Vec<RawCell>,
}

/// `<col>` formatting hint
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawCol {
    pub min: u32,
    pub max: u32,
    pub width: Option<f64>,
    pub style: Option<u32>,
    pub hidden: bool,
}

/// `<dataValidation>` element with attribute text kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawDataValidation {
    pub validation_type: String,
    pub allow_blank: String,
    pub show_input_message: String,
    pub show_error_message: String,
    pub sqref: String,
    pub formula1: String,
    pub formula2: String,
}

/// Structural content of one worksheet, in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawWorksheet {
    /// `dimension/@ref`
    pub dimension: Option<String>,
    pub cols: Vec<RawCol>,
    pub rows: Vec<RawRow>,
    /// `mergeCell/@ref` ranges
    pub merge_cells: Vec<String>,
    pub data_validations: Vec<RawDataValidation>,
}

/// Where character data currently goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextSink {
    Discard,
    Value,
    Formula,
    Inline,
    Formula1,
    Formula2,
}

impl RawWorksheet {
    /// Parse a complete worksheet document.
    ///
    /// Whitespace is kept so inline strings and cell values come through as
    /// written; the grid builder trims values itself.
    pub fn parse<R: Read>(reader: R) -> XlsxResult<Self> {
        let mut xml_reader = Reader::from_reader(BufReader::new(reader));

        let mut buf = Vec::new();
        let mut sheet = RawWorksheet::default();

        let mut row: Option<RawRow> = None;
        let mut cell: Option<RawCell> = None;
        let mut validation: Option<RawDataValidation> = None;
        let mut in_inline = false;
        let mut phonetic_depth = 0usize;
        let mut sink = TextSink::Discard;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"row" => row = Some(parse_row(&e)?),
                    b"c" => cell = Some(parse_cell(&e)?),
                    b"v" if cell.is_some() => {
                        if let Some(c) = cell.as_mut() {
                            c.value.get_or_insert_with(String::new);
                        }
                        sink = TextSink::Value;
                    }
                    b"f" if cell.is_some() => {
                        if let Some(c) = cell.as_mut() {
                            c.formula = Some(parse_formula(&e)?);
                        }
                        sink = TextSink::Formula;
                    }
                    b"is" if cell.is_some() => {
                        in_inline = true;
                        if let Some(c) = cell.as_mut() {
                            c.inline.get_or_insert_with(String::new);
                        }
                    }
                    b"rPh" if in_inline => phonetic_depth += 1,
                    b"t" if in_inline && phonetic_depth == 0 => sink = TextSink::Inline,
                    b"dimension" => sheet.dimension = attr_value(&e, b"ref")?,
                    b"col" => sheet.cols.push(parse_col(&e)?),
                    b"mergeCell" => sheet.merge_cells.extend(attr_value(&e, b"ref")?),
                    b"dataValidation" => validation = Some(parse_data_validation(&e)?),
                    b"formula1" if validation.is_some() => sink = TextSink::Formula1,
                    b"formula2" if validation.is_some() => sink = TextSink::Formula2,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"row" => sheet.rows.push(parse_row(&e)?),
                    b"c" => {
                        let empty = parse_cell(&e)?;
                        if let Some(r) = row.as_mut() {
                            r.cells.push(empty);
                        }
                    }
                    b"v" => {
                        if let Some(c) = cell.as_mut() {
                            c.value.get_or_insert_with(String::new);
                        }
                    }
                    b"f" => {
                        let formula = parse_formula(&e)?;
                        if let Some(c) = cell.as_mut() {
                            c.formula = Some(formula);
                        }
                    }
                    b"dimension" => sheet.dimension = attr_value(&e, b"ref")?,
                    b"col" => sheet.cols.push(parse_col(&e)?),
                    b"mergeCell" => sheet.merge_cells.extend(attr_value(&e, b"ref")?),
                    b"dataValidation" => sheet
                        .data_validations
                        .push(parse_data_validation(&e)?),
                    _ => {}
                },
                Event::Text(e) if sink != TextSink::Discard => {
                    let text = e.unescape()?;
                    push_text(sink, &text, cell.as_mut(), validation.as_mut());
                }
                Event::CData(e) if sink != TextSink::Discard => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    push_text(sink, &text, cell.as_mut(), validation.as_mut());
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"row" => {
                        if let Some(r) = row.take() {
                            sheet.rows.push(r);
                        }
                    }
                    b"c" => {
                        if let (Some(c), Some(r)) = (cell.take(), row.as_mut()) {
                            r.cells.push(c);
                        }
                        in_inline = false;
                    }
                    b"v" | b"f" | b"t" | b"formula1" | b"formula2" => sink = TextSink::Discard,
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"is" => {
                        in_inline = false;
                        if let Some(text) = cell.as_mut().and_then(|c| c.inline.as_mut()) {
                            *text = decode_excel_escapes(text);
                        }
                    }
                    b"dataValidation" => {
                        if let Some(dv) = validation.take() {
                            sheet.data_validations.push(dv);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }
}

fn push_text(
    sink: TextSink,
    text: &str,
    cell: Option<&mut RawCell>,
    validation: Option<&mut RawDataValidation>,
) {
    let target = match sink {
        TextSink::Discard => None,
        TextSink::Value => cell.and_then(|c| c.value.as_mut()),
        TextSink::Formula => cell.and_then(|c| c.formula.as_mut()).map(|f| &mut f.text),
        TextSink::Inline => cell.and_then(|c| c.inline.as_mut()),
        TextSink::Formula1 => validation.map(|dv| &mut dv.formula1),
        TextSink::Formula2 => validation.map(|dv| &mut dv.formula2),
    };
    if let Some(target) = target {
        target.push_str(text);
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> XlsxResult<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

fn parse_row(e: &BytesStart<'_>) -> XlsxResult<RawRow> {
    Ok(RawRow {
        number: attr_value(e, b"r")?.and_then(|s| s.parse().ok()),
        cells: Vec::new(),
    })
}

fn parse_cell(e: &BytesStart<'_>) -> XlsxResult<RawCell> {
    let mut cell = RawCell::default();
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => cell.reference = Some(attr.unescape_value()?.to_string()),
            b"t" => cell.cell_type = Some(attr.unescape_value()?.to_string()),
            b"s" => cell.style = attr.unescape_value()?.parse().ok(),
            _ => {}
        }
    }
    Ok(cell)
}

fn parse_formula(e: &BytesStart<'_>) -> XlsxResult<RawFormula> {
    let mut formula = RawFormula::default();
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"t" => formula.kind = Some(attr.unescape_value()?.to_string()),
            b"si" => formula.shared_index = attr.unescape_value()?.parse().ok(),
            b"ref" => formula.reference = Some(attr.unescape_value()?.to_string()),
            _ => {}
        }
    }
    Ok(formula)
}

fn parse_col(e: &BytesStart<'_>) -> XlsxResult<RawCol> {
    let mut col = RawCol::default();
    for attr in e.attributes().flatten() {
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"min" => col.min = value.parse().unwrap_or(0),
            b"max" => col.max = value.parse().unwrap_or(0),
            b"width" => col.width = value.parse().ok(),
            b"style" => col.style = value.parse().ok(),
            b"hidden" => col.hidden = matches!(&*value, "1" | "true"),
            _ => {}
        }
    }
    Ok(col)
}

fn parse_data_validation(e: &BytesStart<'_>) -> XlsxResult<RawDataValidation> {
    let mut dv = RawDataValidation::default();
    for attr in e.attributes().flatten() {
        let slot = match attr.key.as_ref() {
            b"type" => &mut dv.validation_type,
            b"allowBlank" => &mut dv.allow_blank,
            b"showInputMessage" => &mut dv.show_input_message,
            b"showErrorMessage" => &mut dv.show_error_message,
            b"sqref" => &mut dv.sqref,
            _ => continue,
        };
        *slot = attr.unescape_value()?.to_string();
    }
    Ok(dv)
}
