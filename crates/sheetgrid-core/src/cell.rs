//! Decoded cell types

/// How a cell's value was derived from the worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellType {
    /// Shared string table entry (`t="s"`)
    String,
    /// Inline rich-text string (`t="inlineStr"`)
    Inline,
    /// Boolean, raw `0`/`1` text (`t="b"`)
    Bool,
    /// Error literal such as `#DIV/0!` (`t="e"`)
    Error,
    /// Cached string result of a formula (`t="str"`)
    StringFormula,
    /// ISO-8601 date text, either stored directly (`t="d"`) or converted from
    /// a serial number with a date/time number format
    Date,
    /// Number, raw text (`t="n"` or no type)
    Numeric,
    /// Unrecognised type code, raw text
    #[default]
    General,
}

impl CellType {
    /// Map a worksheet type code to its cell type.
    ///
    /// `None` and `"n"` both map to [`CellType::Numeric`]; the date-format
    /// promotion happens in the grid builder, which knows the cell's style.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("s") => CellType::String,
            Some("inlineStr") => CellType::Inline,
            Some("b") => CellType::Bool,
            Some("e") => CellType::Error,
            Some("str") => CellType::StringFormula,
            Some("d") => CellType::Date,
            None | Some("") | Some("n") => CellType::Numeric,
            Some(_) => CellType::General,
        }
    }
}

/// Number format attached to a cell through its style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumberFormat {
    /// numFmtId referenced by the cell format
    pub id: u32,
    /// Raw format code (`General`, `yyyy-mm-dd`, ...)
    pub code: String,
    /// Whether the code renders a date and/or time
    pub is_time: bool,
}

impl NumberFormat {
    /// The `General` format (id 0)
    pub fn general() -> Self {
        Self {
            id: 0,
            code: "General".to_string(),
            is_time: false,
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::general()
    }
}

/// Formatting descriptor resolved from a cell's style index (`s` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellStyle {
    pub num_fmt_id: u32,
    pub font_id: u32,
    pub fill_id: u32,
    pub border_id: u32,
    /// Index into the named cell style formats (`cellStyleXfs`)
    pub xf_id: u32,
}

/// A single decoded cell.
///
/// When `v_merge` or `h_merge` is non-zero the cell is the top-left anchor of
/// a merged block; the other cells of the block are never materialised.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub value: String,
    pub cell_type: CellType,
    /// Number of additional columns covered to the right
    pub h_merge: u16,
    /// Number of additional rows covered below
    pub v_merge: u32,
    pub formula: Option<String>,
    pub style_ref: Option<u32>,
    pub style: Option<CellStyle>,
    pub number_format: NumberFormat,
}

impl Cell {
    /// Whether the cell anchors a merged block
    pub fn is_merge_anchor(&self) -> bool {
        self.h_merge > 0 || self.v_merge > 0
    }

    /// Whether the cell carries a formula
    pub fn has_formula(&self) -> bool {
        self.formula.is_some()
    }
}
