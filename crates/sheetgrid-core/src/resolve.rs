//! Lookup contracts the grid builder depends on
//!
//! The workbook reader supplies concrete implementations parsed from the
//! archive; tests and embedders can provide their own. Implementations are
//! shared read-only across the sheets of one read, so readers of multiple
//! sheets in parallel require them to be `Sync`.

use crate::cell::{CellStyle, NumberFormat};

/// Resolves a shared-string reference (`t="s"` cells) to its text.
pub trait SharedStringTable {
    /// Text at `index`, or `None` when the index is out of range
    fn resolve(&self, index: usize) -> Option<&str>;
}

impl SharedStringTable for [String] {
    fn resolve(&self, index: usize) -> Option<&str> {
        self.get(index).map(String::as_str)
    }
}

impl SharedStringTable for Vec<String> {
    fn resolve(&self, index: usize) -> Option<&str> {
        self.as_slice().resolve(index)
    }
}

/// Resolves a cell style index (`s` attribute) to formatting information.
pub trait StyleResolver {
    /// Formatting descriptor for the style index, if the index exists
    fn style_for(&self, index: u32) -> Option<CellStyle>;

    /// Number format for the style index; unknown indices yield `General`
    fn number_format_for(&self, index: u32) -> NumberFormat;
}

/// Style resolver for archives without a style part: everything is `General`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStyles;

impl StyleResolver for NoStyles {
    fn style_for(&self, _index: u32) -> Option<CellStyle> {
        None
    }

    fn number_format_for(&self, _index: u32) -> NumberFormat {
        NumberFormat::general()
    }
}
