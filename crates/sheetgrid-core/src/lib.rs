//! # sheetgrid-core
//!
//! Core data structures for the sheetgrid spreadsheet decoder.
//!
//! This crate provides the types shared by the archive reader and by callers
//! that post-process decoded sheets:
//! - [`SheetContent`] and [`Cell`] - The sparse grid produced for each worksheet
//! - [`CellAddress`] and [`GridRange`] - A1-style coordinates (the coordinate codec)
//! - [`DataValidation`] - List-range validation formulas, decoded and re-encoded
//! - [`Hyperlink`] - In-workbook `HYPERLINK(...)` jump formulas
//! - [`SharedStringTable`] and [`StyleResolver`] - Lookups the grid builder depends on
//!
//! ## Example
//!
//! ```rust
//! use sheetgrid_core::{coord, DataValidation, GridRange, ListBounds};
//!
//! assert_eq!(coord::column_to_letters(27), "AB");
//! assert_eq!(coord::letters_to_column("AB").unwrap(), 27);
//!
//! let mut dv = DataValidation::list("$B$2:$C$4");
//! dv.decode_formula();
//! assert_eq!(dv.bounds, ListBounds::Parsed(GridRange::new(1, 1, 3, 2)));
//! ```

pub mod cell;
pub mod coord;
pub mod error;
pub mod hyperlink;
pub mod resolve;
pub mod sheet;
pub mod validation;

// Re-exports for convenience
pub use cell::{Cell, CellStyle, CellType, NumberFormat};
pub use coord::{CellAddress, GridRange};
pub use error::{Error, Result};
pub use hyperlink::{Hyperlink, HyperlinkTarget};
pub use resolve::{NoStyles, SharedStringTable, StyleResolver};
pub use sheet::SheetContent;
pub use validation::{DataValidation, ListBounds};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
