//! In-workbook jump links written as `HYPERLINK(...)` formulas
//!
//! Only the shape `HYPERLINK(<#Sheet!Ref>,<display>)` is understood. A formula
//! that does not decode still yields a [`Hyperlink`], just without a target,
//! so callers check [`Hyperlink::is_valid`] before using the decoded fields.

use crate::coord::{letters_to_column, split_cell_ref, GridRange};

const PREFIX: &str = "HYPERLINK(";
const SUFFIX: char = ')';

/// Decoded destination of a jump link
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HyperlinkTarget {
    /// Text shown in the cell
    pub display: String,
    /// Destination sheet, without the leading `#`
    pub sheet_name: String,
    /// Destination cells, 0-based
    pub range: GridRange,
}

/// A `HYPERLINK` formula found in a cell
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hyperlink {
    /// Formula text as stored in the cell
    pub formula: String,
    /// Row of the cell holding the formula
    pub row: u32,
    /// Column of the cell holding the formula
    pub col: u16,
    /// `None` when the formula could not be decoded
    pub target: Option<HyperlinkTarget>,
}

impl Hyperlink {
    /// Decode `formula`, owned by the cell at `row`/`col`.
    ///
    /// ```
    /// use sheetgrid_core::{GridRange, Hyperlink};
    ///
    /// let link = Hyperlink::new("HYPERLINK(\"#Sheet2!B3:C4\",\"Details\")", 0, 0);
    /// assert!(link.is_valid());
    /// assert_eq!(link.sheet_name(), Some("Sheet2"));
    /// assert_eq!(link.range(), Some(GridRange::new(2, 1, 3, 2)));
    /// ```
    pub fn new(formula: impl Into<String>, row: u32, col: u16) -> Self {
        let formula = formula.into();
        let target = decode(&formula);
        Self {
            formula,
            row,
            col,
            target,
        }
    }

    /// Decode `formula` if it has the `HYPERLINK(...)` shape.
    ///
    /// Returns `None` for any other formula; a matching but malformed formula
    /// returns an invalid link.
    pub fn detect(formula: &str, row: u32, col: u16) -> Option<Self> {
        if formula.starts_with(PREFIX) && formula.ends_with(SUFFIX) {
            Some(Self::new(formula, row, col))
        } else {
            None
        }
    }

    /// Whether the formula decoded into a target
    pub fn is_valid(&self) -> bool {
        self.target.is_some()
    }

    pub fn display(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.display.as_str())
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.sheet_name.as_str())
    }

    pub fn range(&self) -> Option<GridRange> {
        self.target.as_ref().map(|t| t.range)
    }
}

fn decode(formula: &str) -> Option<HyperlinkTarget> {
    let body = formula.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;

    let args = split_args(body);
    let [reference, display] = args.as_slice() else {
        return None;
    };
    let display = display.trim().replace('"', "");
    let reference = reference.trim().replace('"', "").replace('！', "!");

    let (sheet, range) = match reference.split('!').collect::<Vec<_>>().as_slice() {
        [sheet, range] => (*sheet, *range),
        _ => return None,
    };
    if sheet.chars().count() <= 2 {
        return None;
    }
    let sheet_name = sheet.strip_prefix('#')?;

    let range = range.replace('：', ":");
    let anchors: Vec<&str> = range.split(':').collect();
    let (start, end) = match anchors.as_slice() {
        [single] => (*single, *single),
        [start, end] => (*start, *end),
        _ => return None,
    };
    let (start_row, start_col) = parse_anchor(start)?;
    let (end_row, end_col) = parse_anchor(end)?;

    Some(HyperlinkTarget {
        display,
        sheet_name: sheet_name.to_string(),
        range: GridRange::new(start_row, start_col, end_row, end_col),
    })
}

/// Split on commas outside double-quoted text.
fn split_args(body: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (idx, c) in body.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                args.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    args.push(&body[start..]);
    args
}

/// Letters give the column, digits the 1-based row.
fn parse_anchor(anchor: &str) -> Option<(u32, u16)> {
    let (letters, digits) = split_cell_ref(anchor)?;
    let col = letters_to_column(letters).ok()?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col))
}
