//! End-to-end tests for sheetgrid-xlsx.
//!
//! Each test builds the exact archive it needs in memory with
//! [`common::BookBuilder`], reads it back and asserts on the decoded grids.

mod common;
mod reading;

// Re-export common utilities for submodules
pub use common::*;
