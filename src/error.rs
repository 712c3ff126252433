//! Error types for the sheetsum library.

use std::io;
use thiserror::Error;

/// Result type alias for sheetsum operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while ingesting a workbook.
///
/// These cover hard ingestion failures only. Data-quality conditions
/// (missing columns, unparsable dates, no month-year sheets) degrade into
/// [`Report`](crate::analysis::Report) warnings instead of erroring.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not an XLSX workbook.
    #[error("Not an XLSX workbook: {0}")]
    NotXlsx(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the workbook.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required workbook part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error during rendering.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotXlsx("missing workbook part".to_string());
        assert_eq!(err.to_string(), "Not an XLSX workbook: missing workbook part");

        let err = Error::MissingComponent("xl/workbook.xml".to_string());
        assert_eq!(err.to_string(), "Missing component: xl/workbook.xml");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
