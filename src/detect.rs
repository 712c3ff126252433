//! Format detection for XLSX workbooks.

use crate::container::XlsxContainer;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type for the XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Verify that a file is an XLSX workbook.
///
/// Reads the file, verifies it is a ZIP archive, and inspects
/// `[Content_Types].xml` for the spreadsheet workbook content type.
///
/// # Example
///
/// ```no_run
/// use sheetsum::detect::verify_xlsx_path;
///
/// verify_xlsx_path("incidents.xlsx")?;
/// # Ok::<(), sheetsum::Error>(())
/// ```
pub fn verify_xlsx_path(path: impl AsRef<Path>) -> Result<()> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    verify_xlsx_reader(reader)
}

/// Verify that a byte slice holds an XLSX workbook.
pub fn verify_xlsx_bytes(data: &[u8]) -> Result<()> {
    if data.len() < 4 || data[..4] != ZIP_MAGIC {
        return Err(Error::NotXlsx("not a ZIP archive".to_string()));
    }

    let container = XlsxContainer::from_bytes(data.to_vec())?;
    verify_container(&container)
}

/// Verify that a reader yields an XLSX workbook.
pub fn verify_xlsx_reader<R: Read + Seek>(mut reader: R) -> Result<()> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    verify_xlsx_bytes(&data)
}

fn verify_container(container: &XlsxContainer) -> Result<()> {
    if let Ok(content_types) = container.read_xml("[Content_Types].xml") {
        if content_types.contains(XLSX_CONTENT_TYPE) {
            return Ok(());
        }
    }

    // Some producers write [Content_Types].xml with Default extension
    // declarations only; fall back to the workbook part itself.
    if container.exists("xl/workbook.xml") {
        return Ok(());
    }

    Err(Error::NotXlsx("missing workbook part".to_string()))
}
