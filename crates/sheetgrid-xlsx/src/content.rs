//! Grid builder: raw worksheet rows into a [`SheetContent`]

use std::collections::{BTreeMap, BTreeSet, HashMap};

use sheetgrid_core::coord::parse_cell_ref;
use sheetgrid_core::{
    Cell, CellType, DataValidation, GridRange, NumberFormat, SharedStringTable, SheetContent,
    StyleResolver,
};

use crate::date::text_to_iso_date;
use crate::error::{XlsxError, XlsxResult};
use crate::formula::SharedFormulas;
use crate::worksheet::{RawCell, RawDataValidation, RawFormula, RawWorksheet};

const VALUE_TRIM: &[char] = &[' ', '\t', '\n', '\r'];

/// Merge extents keyed by the anchor's (row, col)
type MergeTable = HashMap<(u32, u16), (u16, u32)>;

/// Turns raw worksheets into grids.
///
/// Holds the workbook-wide lookups; one builder serves every sheet of a read
/// and may be shared across threads.
#[derive(Clone, Copy)]
pub struct GridBuilder<'a> {
    shared_strings: &'a (dyn SharedStringTable + Sync),
    styles: &'a (dyn StyleResolver + Sync),
    date1904: bool,
}

impl<'a> GridBuilder<'a> {
    pub fn new(
        shared_strings: &'a (dyn SharedStringTable + Sync),
        styles: &'a (dyn StyleResolver + Sync),
    ) -> Self {
        Self {
            shared_strings,
            styles,
            date1904: false,
        }
    }

    /// Use the 1904 serial date system
    pub fn with_date1904(mut self, date1904: bool) -> Self {
        self.date1904 = date1904;
        self
    }

    /// Build the grid of sheet `name`.
    ///
    /// Row indices are positions in `raw.rows`; declared row numbers only
    /// feed merge lookup and shared-formula offsets.
    pub fn build(&self, name: &str, raw: RawWorksheet) -> XlsxResult<SheetContent> {
        let merges = merge_table(name, &raw.merge_cells)?;
        let mut formulas = SharedFormulas::new();

        let mut content: BTreeMap<u32, BTreeMap<u16, Cell>> = BTreeMap::new();
        let mut touched: BTreeSet<u16> = BTreeSet::new();
        let mut has_value: BTreeSet<u32> = BTreeSet::new();
        let mut anchors: Vec<(u32, u32)> = Vec::new();
        let mut max_col: u16 = 0;
        let mut max_row: u32 = 0;

        let rows = raw.rows.len();
        for (position, raw_row) in raw.rows.into_iter().enumerate() {
            let row_idx = position as u32;
            let declared_row = raw_row
                .number
                .and_then(|n| n.checked_sub(1))
                .unwrap_or(row_idx);

            let mut cells = BTreeMap::new();
            let mut previous_col: Option<u16> = None;

            for raw_cell in raw_row.cells {
                let (col, cell_row) = match raw_cell.reference.as_deref() {
                    Some(reference) => {
                        parse_cell_ref(reference).map_err(|_| XlsxError::InvalidReference {
                            sheet: name.to_string(),
                            reference: reference.to_string(),
                        })?
                    }
                    None => (
                        previous_col.map_or(0, |c| c.saturating_add(1)),
                        declared_row,
                    ),
                };
                previous_col = Some(col);

                let (h_merge, v_merge) = merges
                    .get(&(cell_row, col))
                    .copied()
                    .unwrap_or((0, 0));
                let cell = self.build_cell(
                    name,
                    raw_cell,
                    cell_row,
                    col,
                    h_merge,
                    v_merge,
                    &mut formulas,
                )?;

                if col > max_col {
                    max_col = col;
                }
                touched.extend(col..=col.saturating_add(h_merge));
                if !cell.value.is_empty() {
                    has_value.insert(row_idx);
                }
                if v_merge > 0 {
                    anchors.push((row_idx, v_merge));
                }
                // only the anchor of a merged block is materialised
                if (h_merge, v_merge) == (0, 0) && is_covered(&merges, cell_row, col) {
                    continue;
                }
                cells.insert(col, cell);
            }

            content.insert(row_idx, cells);
            max_row = row_idx;
        }

        spread_merged_values(&anchors, &mut has_value);

        let blank_rows = (0..rows as u32)
            .filter(|r| !has_value.contains(r))
            .collect();
        let blank_cols = (0..=max_col).filter(|c| !touched.contains(c)).collect();

        let data_validations = raw
            .data_validations
            .into_iter()
            .map(convert_validation)
            .collect();

        log::debug!(
            "built sheet '{}': {} rows, {} columns, {} merges",
            name,
            rows,
            touched.len(),
            merges.len()
        );

        Ok(SheetContent {
            name: name.to_string(),
            content,
            blank_cols,
            blank_rows,
            max_row,
            max_col,
            rows,
            cols: touched.len(),
            data_validations,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_cell(
        &self,
        sheet: &str,
        raw: RawCell,
        row: u32,
        col: u16,
        h_merge: u16,
        v_merge: u32,
        formulas: &mut SharedFormulas,
    ) -> XlsxResult<Cell> {
        let style_index = raw.style.unwrap_or(0);
        let number_format = self.styles.number_format_for(style_index);
        let formula = raw
            .formula
            .as_ref()
            .and_then(|f| resolve_formula(f, row, col, formulas));

        let (value, cell_type) = self.dispatch(sheet, &raw, &number_format)?;

        Ok(Cell {
            value,
            cell_type,
            h_merge,
            v_merge,
            formula,
            style_ref: raw.style,
            style: self.styles.style_for(style_index),
            number_format,
        })
    }

    /// Derive value text and type from the cell's type code
    fn dispatch(
        &self,
        sheet: &str,
        raw: &RawCell,
        number_format: &NumberFormat,
    ) -> XlsxResult<(String, CellType)> {
        let value = raw.value.as_deref().unwrap_or("").trim_matches(VALUE_TRIM);
        let cell_type = CellType::from_code(raw.cell_type.as_deref());

        let value = match cell_type {
            CellType::String => self.shared_string(sheet, value)?,
            CellType::Inline => raw.inline.clone().unwrap_or_else(|| value.to_string()),
            CellType::Numeric if number_format.is_time => {
                if let Some(date) = text_to_iso_date(value, self.date1904) {
                    return Ok((date, CellType::Date));
                }
                value.to_string()
            }
            _ => value.to_string(),
        };

        Ok((value, cell_type))
    }

    fn shared_string(&self, sheet: &str, value: &str) -> XlsxResult<String> {
        if value.is_empty() {
            return Ok(String::new());
        }
        value
            .parse::<usize>()
            .ok()
            .and_then(|idx| self.shared_strings.resolve(idx))
            .map(str::to_string)
            .ok_or_else(|| XlsxError::SharedStringIndex {
                sheet: sheet.to_string(),
                value: value.to_string(),
            })
    }
}

fn merge_table(sheet: &str, merge_cells: &[String]) -> XlsxResult<MergeTable> {
    let mut table = MergeTable::with_capacity(merge_cells.len());
    for reference in merge_cells {
        let range = GridRange::parse(reference).map_err(|_| XlsxError::InvalidMerge {
            sheet: sheet.to_string(),
            reference: reference.clone(),
        })?;
        if range.is_single() {
            log::warn!(
                "ignoring single-cell merge '{}' in sheet '{}'",
                reference,
                sheet
            );
            continue;
        }
        let top = range.start_row.min(range.end_row);
        let left = range.start_col.min(range.end_col);
        let h = range.start_col.abs_diff(range.end_col);
        let v = range.start_row.abs_diff(range.end_row);
        table.insert((top, left), (h, v));
    }
    Ok(table)
}

/// Whether `(row, col)` lies inside a merged block other than at its anchor
fn is_covered(merges: &MergeTable, row: u32, col: u16) -> bool {
    merges.iter().any(|(&(top, left), &(h, v))| {
        (top..=top.saturating_add(v)).contains(&row)
            && (left..=left.saturating_add(h)).contains(&col)
            && (top, left) != (row, col)
    })
}

fn resolve_formula(
    formula: &RawFormula,
    row: u32,
    col: u16,
    shared: &mut SharedFormulas,
) -> Option<String> {
    match (formula.is_shared(), formula.shared_index) {
        (true, Some(index)) if formula.reference.is_some() => {
            shared.register(index, row, col, formula.text.clone());
            Some(formula.text.clone())
        }
        (true, Some(index)) => {
            let derived = shared.derive(index, row, col);
            if derived.is_none() {
                log::warn!("shared formula group {} has no master", index);
            }
            derived
        }
        _ if formula.text.is_empty() => None,
        _ => Some(formula.text.clone()),
    }
}

/// A vertically merged block carries a value on every row once any of its
/// rows does. Chained blocks can feed each other, so iterate to a fixed point.
fn spread_merged_values(anchors: &[(u32, u32)], has_value: &mut BTreeSet<u32>) {
    loop {
        let mut changed = false;
        for &(row, v_merge) in anchors {
            let block = row..=row.saturating_add(v_merge);
            if block.clone().any(|r| has_value.contains(&r)) {
                for r in block {
                    changed |= has_value.insert(r);
                }
            }
        }
        if !changed {
            break;
        }
    }
}

fn convert_validation(raw: RawDataValidation) -> DataValidation {
    let mut dv = DataValidation::new(raw.validation_type);
    dv.allow_blank = raw.allow_blank;
    dv.show_input_message = raw.show_input_message;
    dv.show_error_message = raw.show_error_message;
    dv.sqref = raw.sqref;
    dv.formula1 = raw.formula1;
    dv.formula2 = raw.formula2;
    dv.decode_formula();
    dv
}
