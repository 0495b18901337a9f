//! Coordinate codec: column letters, A1 references and rectangular ranges
//!
//! Column letters use bijective base-26 (no zero digit): `A`=0, `Z`=25,
//! `AA`=26, `ZZ`=701, `AAA`=702. All indices exposed here are 0-based.

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Column index to letters: `0` is `A`, `25` is `Z`, `26` is `AA`
pub fn column_to_letters(col: u16) -> String {
    let mut digits = Vec::with_capacity(3);
    let mut n = u32::from(col) + 1;
    while n > 0 {
        n -= 1;
        digits.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    digits.iter().rev().map(|&b| char::from(b)).collect()
}

/// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
///
/// Letters are case insensitive.
pub fn letters_to_column(letters: &str) -> Result<u16> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress("empty column letters".into()));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(format!(
                "invalid column letter '{}'",
                c
            )));
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        if col > MAX_COLS as u32 {
            return Err(Error::ColumnOutOfBounds(col - 1, MAX_COLS - 1));
        }
    }

    Ok((col - 1) as u16)
}

/// Split a reference such as `AB12` at its first ASCII digit.
///
/// Returns the letter run and the digit run, or `None` when either side is
/// empty. No validation is applied to the two halves.
pub fn split_cell_ref(reference: &str) -> Option<(&str, &str)> {
    let idx = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(idx);
    if letters.is_empty() {
        return None;
    }
    Some((letters, digits))
}

/// Parse an A1-style reference into a 0-based `(column, row)` pair.
///
/// `$` markers are accepted and dropped.
///
/// ```
/// use sheetgrid_core::coord::parse_cell_ref;
///
/// assert_eq!(parse_cell_ref("AB12").unwrap(), (27, 11));
/// ```
pub fn parse_cell_ref(reference: &str) -> Result<(u16, u32)> {
    let addr = CellAddress::parse(reference)?;
    Ok((addr.col, addr.row))
}

/// 1-based row digits to a 0-based row index
fn row_index(digits: &str, reference: &str) -> Result<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAddress(format!(
            "invalid row number in '{}'",
            reference
        )));
    }
    match digits.parse::<u32>() {
        Ok(0) => Err(Error::InvalidAddress(format!(
            "row number must be >= 1 in '{}'",
            reference
        ))),
        Ok(row) if row <= MAX_ROWS => Ok(row - 1),
        Ok(row) => Err(Error::RowOutOfBounds(row - 1, MAX_ROWS - 1)),
        Err(_) => Err(Error::InvalidAddress(format!(
            "row number out of range in '{}'",
            reference
        ))),
    }
}

/// One cell reference such as `B7` or `$B$7`; indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    pub row: u32,
    pub col: u16,
    /// `$` before the row digits
    pub row_absolute: bool,
    /// `$` before the column letters
    pub col_absolute: bool,
}

impl CellAddress {
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// `$A$1` style address
    pub fn absolute(row: u32, col: u16) -> Self {
        Self {
            row_absolute: true,
            col_absolute: true,
            ..Self::new(row, col)
        }
    }

    /// Parse `A1`, `$A1`, `A$1` or `$A$1`.
    ///
    /// ```
    /// use sheetgrid_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("B$2").unwrap();
    /// assert_eq!((addr.row, addr.col), (1, 1));
    /// assert!(addr.row_absolute && !addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let reference = s.trim();
        let (col_absolute, rest) = match reference.strip_prefix('$') {
            Some(rest) => (true, rest),
            None => (false, reference),
        };
        let (letters, digits) = split_cell_ref(rest).ok_or_else(|| {
            Error::InvalidAddress(format!("'{}' is not a cell reference", reference))
        })?;
        let (letters, row_absolute) = match letters.strip_suffix('$') {
            Some(letters) => (letters, true),
            None => (letters, false),
        };

        Ok(Self {
            row: row_index(digits, reference)?,
            col: letters_to_column(letters)?,
            row_absolute,
            col_absolute,
        })
    }

    pub fn to_a1_string(&self) -> String {
        let marker = |absolute: bool| if absolute { "$" } else { "" };
        format!(
            "{}{}{}{}",
            marker(self.col_absolute),
            column_to_letters(self.col),
            marker(self.row_absolute),
            self.row + 1
        )
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangular block of cells, 0-based and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridRange {
    pub start_row: u32,
    pub start_col: u16,
    pub end_row: u32,
    pub end_col: u16,
}

impl GridRange {
    /// Create a range from its four bounds. No normalisation is applied.
    pub fn new(start_row: u32, start_col: u16, end_row: u32, end_col: u16) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Create a single-cell range
    pub fn single(row: u32, col: u16) -> Self {
        Self::new(row, col, row, col)
    }

    /// Parse `A1` or `A1:B10` notation.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((start, end)) => {
                let start = CellAddress::parse(start)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                let end = CellAddress::parse(end)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                Ok(Self::new(start.row, start.col, end.row, end.col))
            }
            None => {
                let addr = CellAddress::parse(s)?;
                Ok(Self::single(addr.row, addr.col))
            }
        }
    }

    /// Whether the range covers a single cell
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    /// Check if a cell is within this range
    pub fn contains(&self, row: u32, col: u16) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        let start = CellAddress::new(self.start_row, self.start_col);
        if self.is_single() {
            start.to_a1_string()
        } else {
            let end = CellAddress::new(self.end_row, self.end_col);
            format!("{}:{}", start, end)
        }
    }
}

impl fmt::Display for GridRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for GridRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
