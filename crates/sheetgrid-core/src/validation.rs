//! Data validation
//!
//! List validations whose source is a cell range (`$A$1:$A$10`) carry
//! positional meaning: [`DataValidation::decode_formula`] turns `formula1`
//! into 0-based [`ListBounds`], callers adjust the bounds, and
//! [`DataValidation::encode_formula`] writes them back. The two directions are
//! never synchronised implicitly.
//!
//! ## Example
//!
//! ```rust
//! use sheetgrid_core::{DataValidation, GridRange, ListBounds};
//!
//! let mut dv = DataValidation::list("$B$2:$C$4");
//! dv.decode_formula();
//! assert_eq!(dv.bounds, ListBounds::Parsed(GridRange::new(1, 1, 3, 2)));
//!
//! dv.bounds = ListBounds::Parsed(GridRange::new(1, 1, 9, 2));
//! dv.sheet_name = Some("Lists".to_string());
//! dv.encode_formula();
//! assert_eq!(dv.formula1, "Lists!$B$2:$C$10");
//! ```

use crate::coord::{column_to_letters, letters_to_column, GridRange};

/// Validation type whose `formula1` is a cell range
pub const LIST_TYPE: &str = "list";

/// Decoded bounds of a list validation's source range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListBounds {
    /// Not decoded yet, not a list validation, or `formula1` is not a plain
    /// `$COL$ROW[:$COL$ROW]` range
    #[default]
    Unparsed,
    /// 0-based inclusive source range
    Parsed(GridRange),
}

impl ListBounds {
    /// The decoded range, if any
    pub fn range(&self) -> Option<GridRange> {
        match self {
            ListBounds::Parsed(range) => Some(*range),
            ListBounds::Unparsed => None,
        }
    }
}

/// Data validation rule as stored in a worksheet.
///
/// The flag attributes keep their original text (`"1"`, `"true"`, `""`) so a
/// caller can write them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataValidation {
    /// `type` attribute (`list`, `whole`, `decimal`, ...)
    pub validation_type: String,
    pub allow_blank: String,
    pub show_input_message: String,
    pub show_error_message: String,
    /// Space separated target ranges
    pub sqref: String,
    pub formula1: String,
    pub formula2: String,
    pub bounds: ListBounds,
    /// Sheet holding the list source, when it lives on another sheet
    pub sheet_name: Option<String>,
    /// 1-based row number of the anchor used by the layered list formula
    pub depend_row: u32,
    /// Column of the anchor used by the layered list formula
    pub depend_col: u16,
}

impl DataValidation {
    /// Create a validation of the given type with empty formulas
    pub fn new(validation_type: impl Into<String>) -> Self {
        Self {
            validation_type: validation_type.into(),
            ..Self::default()
        }
    }

    /// Create a list validation with the given `formula1`
    pub fn list(formula1: impl Into<String>) -> Self {
        Self {
            validation_type: LIST_TYPE.to_string(),
            formula1: formula1.into(),
            ..Self::default()
        }
    }

    /// Whether this is a list validation
    pub fn is_list(&self) -> bool {
        self.validation_type == LIST_TYPE
    }

    /// Decode `formula1` into [`ListBounds`].
    ///
    /// Only list validations are touched. Anything other than one or two
    /// `$COL$ROW` anchors separated by `:` leaves the bounds `Unparsed`.
    pub fn decode_formula(&mut self) {
        if !self.is_list() {
            return;
        }
        match parse_list_range(&self.formula1) {
            Some((sheet, range)) => {
                if sheet.is_some() {
                    self.sheet_name = sheet;
                }
                self.bounds = ListBounds::Parsed(range);
            }
            None => self.bounds = ListBounds::Unparsed,
        }
    }

    /// Rewrite `formula1` from the current bounds.
    ///
    /// Does nothing unless this is a list validation with parsed bounds.
    pub fn encode_formula(&mut self) {
        if !self.is_list() {
            return;
        }
        let ListBounds::Parsed(range) = self.bounds else {
            return;
        };

        let prefix = match self.sheet_name.as_deref() {
            Some(name) if !name.is_empty() => format!("{}!", name),
            _ => String::new(),
        };
        let start = absolute_anchor(range.start_row, range.start_col);
        self.formula1 = if range.is_single() {
            format!("{}{}", prefix, start)
        } else {
            let end = absolute_anchor(range.end_row, range.end_col);
            format!("{}{}:{}", prefix, start, end)
        };
    }

    /// Rewrite `formula1` as an `INDIRECT` over the dependent anchor.
    ///
    /// The emitted formula concatenates the value of the anchor cell
    /// (`depend_col`/`depend_row`) with the start column letters of the
    /// bounds, so the list range follows whatever the anchor cell holds.
    /// Does nothing unless this is a list validation with parsed bounds.
    pub fn encode_layered_formula(&mut self) {
        if !self.is_list() {
            return;
        }
        let ListBounds::Parsed(range) = self.bounds else {
            return;
        };
        self.formula1 = format!(
            "INDIRECT({}{}&\"{}\")",
            column_to_letters(self.depend_col),
            self.depend_row,
            column_to_letters(range.start_col)
        );
    }
}

fn absolute_anchor(row: u32, col: u16) -> String {
    format!("${}${}", column_to_letters(col), row + 1)
}

fn parse_list_range(formula: &str) -> Option<(Option<String>, GridRange)> {
    let groups: Vec<&str> = formula.split(':').collect();
    if groups.len() != 1 && groups.len() != 2 {
        return None;
    }

    let (sheet, start_row, start_col) = parse_anchor(groups[0], true)?;
    let (end_row, end_col) = match groups.get(1) {
        Some(group) => {
            let (_, row, col) = parse_anchor(group, false)?;
            (row, col)
        }
        None => (start_row, start_col),
    };

    Some((sheet, GridRange::new(start_row, start_col, end_row, end_col)))
}

/// `$COL$ROW`, optionally preceded by `Sheet!` on the first anchor.
fn parse_anchor(group: &str, allow_sheet: bool) -> Option<(Option<String>, u32, u16)> {
    let tokens: Vec<&str> = group.split('$').collect();
    if tokens.len() != 3 {
        return None;
    }

    let sheet = match tokens[0] {
        "" => None,
        prefix if allow_sheet => {
            let name = prefix.strip_suffix('!')?;
            let name = name
                .strip_prefix('\'')
                .and_then(|n| n.strip_suffix('\''))
                .unwrap_or(name);
            if name.is_empty() {
                return None;
            }
            Some(name.to_string())
        }
        _ => return None,
    };

    let col = letters_to_column(tokens[1]).ok()?;
    if tokens[2].is_empty() || !tokens[2].bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row: u32 = tokens[2].parse().ok()?;
    if row == 0 {
        return None;
    }

    Some((sheet, row - 1, col))
}
