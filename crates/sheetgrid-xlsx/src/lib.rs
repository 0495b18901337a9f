//! # sheetgrid-xlsx
//!
//! XLSX (Office Open XML) worksheet decoder for sheetgrid.
//!
//! Every worksheet the workbook declares is decoded into a
//! [`SheetContent`](sheetgrid_core::SheetContent) grid, in declaration order.
//! Sheets are decoded concurrently; the first sheet that fails fails the read.

pub mod archive;
pub mod content;
pub mod date;
pub mod error;
pub mod formula;
pub mod pipeline;
pub mod reader;
pub mod shared_strings;
pub mod styles;
pub mod truncate;
pub mod workbook;
pub mod worksheet;

pub use content::GridBuilder;
pub use error::{XlsxError, XlsxResult};
pub use reader::{
    read_file, read_sheet_contents, read_sheet_contents_with_limit, ReadOptions, SheetReader,
};
pub use shared_strings::SharedStrings;
pub use styles::StyleCatalog;
pub use truncate::{RowLimit, NO_ROW_LIMIT};
pub use workbook::{RelationshipResolver, Relationships, WorkbookInfo};
pub use worksheet::RawWorksheet;
