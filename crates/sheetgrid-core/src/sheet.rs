//! Decoded worksheet content

use std::collections::{BTreeMap, BTreeSet};

use crate::cell::Cell;
use crate::hyperlink::Hyperlink;
use crate::validation::DataValidation;

/// The grid decoded from one worksheet.
///
/// Built once by the workbook reader and not modified afterwards. Row keys are
/// positions in the worksheet's row sequence, not the row numbers declared in
/// the file, so sparse row numbering is compacted.
///
/// `max_col` only accounts for columns where a cell was directly observed,
/// while `cols` and `blank_cols` also account for columns covered by a
/// horizontal merge. A merge can therefore reach past `max_col`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetContent {
    pub name: String,
    /// row index -> column index -> cell; every decoded row has an entry
    pub content: BTreeMap<u32, BTreeMap<u16, Cell>>,
    /// Columns in `0..=max_col` that no cell or merge touches
    pub blank_cols: BTreeSet<u16>,
    /// Rows in `0..rows` without a non-empty value, after merge reconciliation
    pub blank_rows: BTreeSet<u32>,
    pub max_row: u32,
    pub max_col: u16,
    /// Number of decoded row entries
    pub rows: usize,
    /// Number of distinct columns touched directly or by a merge
    pub cols: usize,
    pub data_validations: Vec<DataValidation>,
}

impl SheetContent {
    /// Get a cell by 0-based row and column
    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.content.get(&row).and_then(|r| r.get(&col))
    }

    /// Get the cells of a row
    pub fn row(&self, row: u32) -> Option<&BTreeMap<u16, Cell>> {
        self.content.get(&row)
    }

    pub fn is_blank_row(&self, row: u32) -> bool {
        self.blank_rows.contains(&row)
    }

    pub fn is_blank_col(&self, col: u16) -> bool {
        self.blank_cols.contains(&col)
    }

    /// Iterate over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16, &Cell)> {
        self.content
            .iter()
            .flat_map(|(&row, cells)| cells.iter().map(move |(&col, cell)| (row, col, cell)))
    }

    /// Decode every `HYPERLINK(...)` cell formula, in row-major order.
    ///
    /// Malformed links are included; check [`Hyperlink::is_valid`].
    pub fn hyperlinks(&self) -> Vec<Hyperlink> {
        self.cells()
            .filter_map(|(row, col, cell)| {
                let formula = cell.formula.as_deref()?;
                Hyperlink::detect(formula, row, col)
            })
            .collect()
    }
}
