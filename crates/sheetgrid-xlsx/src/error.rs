//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading sheet contents
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// The archive has no `xl/worksheets/*.xml` member
    #[error("Archive contains no worksheets")]
    NoWorksheets,

    /// A cell carries an `r` attribute that is not an A1 reference
    #[error("Invalid cell reference '{reference}' in sheet '{sheet}'")]
    InvalidReference { sheet: String, reference: String },

    /// A `mergeCell` range could not be parsed
    #[error("Invalid merge range '{reference}' in sheet '{sheet}'")]
    InvalidMerge { sheet: String, reference: String },

    /// A shared-string cell whose index is not a number or is out of range
    #[error("Unresolvable shared string index '{value}' in sheet '{sheet}'")]
    SharedStringIndex { sheet: String, value: String },

    /// Decoding a sheet panicked
    #[error("Decoding sheet '{sheet}' panicked: {message}")]
    SheetPanic { sheet: String, message: String },

    /// Sheet workers went away before every sheet was reported
    #[error("Sheet pipeline error: {0}")]
    Pipeline(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetgrid_core::Error),
}
