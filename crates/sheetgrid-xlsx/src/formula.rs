//! Shared formula groups
//!
//! A shared formula is written once, on the master cell
//! (`<f t="shared" ref="C1:C9" si="0">A1+B1</f>`), and referenced by the
//! other cells of the group (`<f t="shared" si="0"/>`). Each follower gets the
//! master text with every relative reference moved by the follower's offset
//! from the master.

use std::collections::HashMap;

use sheetgrid_core::coord::{column_to_letters, letters_to_column};
use sheetgrid_core::{CellAddress, MAX_COLS, MAX_ROWS};

/// Text substituted for a reference shifted off the grid
const REF_ERROR: &str = "#REF!";

#[derive(Debug, Clone)]
struct Master {
    row: u32,
    col: u16,
    text: String,
}

/// Shared formula masters of one worksheet, keyed by `si`
#[derive(Debug, Clone, Default)]
pub struct SharedFormulas {
    groups: HashMap<u32, Master>,
}

impl SharedFormulas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the master of group `index` at `row`/`col`
    pub fn register(&mut self, index: u32, row: u32, col: u16, text: impl Into<String>) {
        self.groups.insert(
            index,
            Master {
                row,
                col,
                text: text.into(),
            },
        );
    }

    /// Formula text for a follower of group `index` at `row`/`col`
    pub fn derive(&self, index: u32, row: u32, col: u16) -> Option<String> {
        let master = self.groups.get(&index)?;
        let row_offset = i64::from(row) - i64::from(master.row);
        let col_offset = i64::from(col) - i64::from(master.col);
        Some(shift_references(&master.text, row_offset, col_offset))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.')
}

/// Move the relative parts of every cell reference in `formula`.
///
/// Text inside string literals and quoted sheet names is left alone, as are
/// function names and sheet names (tokens followed by `(` or `!`). Bare
/// letters or digits next to `:` are whole-column or whole-row bounds and
/// move too. A reference moved off the grid becomes `#REF!`.
pub fn shift_references(formula: &str, row_offset: i64, col_offset: i64) -> String {
    if row_offset == 0 && col_offset == 0 {
        return formula.to_string();
    }

    let mut out = String::with_capacity(formula.len());
    let mut chars = formula.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            '"' | '\'' => {
                out.push(c);
                for (_, q) in chars.by_ref() {
                    out.push(q);
                    if q == c {
                        break;
                    }
                }
            }
            c if is_token_char(c) => {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, next)) = chars.peek() {
                    if !is_token_char(next) {
                        break;
                    }
                    end = idx + next.len_utf8();
                    chars.next();
                }
                let token = &formula[start..end];
                let shifted = match chars.peek() {
                    Some(&(_, '(')) | Some(&(_, '!')) => None,
                    next => {
                        let in_range = out.ends_with(':') || matches!(next, Some(&(_, ':')));
                        shift_token(token, row_offset, col_offset).or_else(|| {
                            in_range
                                .then(|| shift_line(token, row_offset, col_offset))
                                .flatten()
                        })
                    }
                };
                out.push_str(shifted.as_deref().unwrap_or(token));
            }
            _ => out.push(c),
        }
    }

    out
}

/// Shift `token` if it is a cell reference (`A1`, `$A1`, `A$1`, `$A$1`)
fn shift_token(token: &str, row_offset: i64, col_offset: i64) -> Option<String> {
    let letters = token
        .trim_start_matches('$')
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .count();
    if !(1..=3).contains(&letters) {
        return None;
    }
    let mut address = CellAddress::parse(token).ok()?;

    if !address.col_absolute {
        let col = i64::from(address.col) + col_offset;
        if !(0..i64::from(MAX_COLS)).contains(&col) {
            return Some(REF_ERROR.to_string());
        }
        address.col = col as u16;
    }
    if !address.row_absolute {
        let row = i64::from(address.row) + row_offset;
        if !(0..i64::from(MAX_ROWS)).contains(&row) {
            return Some(REF_ERROR.to_string());
        }
        address.row = row as u32;
    }

    Some(address.to_a1_string())
}

/// Shift one side of a whole-column (`A:C`) or whole-row (`2:5`) range
fn shift_line(token: &str, row_offset: i64, col_offset: i64) -> Option<String> {
    let (marker, body) = match token.strip_prefix('$') {
        Some(body) => ("$", body),
        None => ("", token),
    };

    if (1..=3).contains(&body.len()) && body.bytes().all(|b| b.is_ascii_alphabetic()) {
        let col = letters_to_column(body).ok()?;
        if !marker.is_empty() {
            return Some(token.to_string());
        }
        let col = i64::from(col) + col_offset;
        if !(0..i64::from(MAX_COLS)).contains(&col) {
            return Some(REF_ERROR.to_string());
        }
        return Some(column_to_letters(col as u16));
    }

    if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) {
        let row: i64 = body.parse().ok()?;
        if row == 0 {
            return None;
        }
        if !marker.is_empty() {
            return Some(token.to_string());
        }
        let row = row + row_offset;
        if !(1..=i64::from(MAX_ROWS)).contains(&row) {
            return Some(REF_ERROR.to_string());
        }
        return Some(row.to_string());
    }

    None
}
