//! XLSX workbook parser.

use crate::container::XlsxContainer;
use crate::error::{Error, Result};
use crate::model::CellValue;
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::styles::Styles;
use super::{Sheet, Workbook};

/// Excel's column limit (XFD).
const MAX_COLUMNS: usize = 16_384;

/// Sheet info from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// Parser for XLSX workbooks.
///
/// Reads workbook structure, shared strings, and styles up front, then
/// parses each worksheet part into a typed [`Sheet`].
pub struct WorkbookParser {
    container: XlsxContainer,
    shared_strings: SharedStrings,
    styles: Styles,
    sheets: Vec<SheetInfo>,
    relationships: HashMap<String, String>,
}

impl WorkbookParser {
    /// Open an XLSX file for parsing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = XlsxContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = XlsxContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Create a parser from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let container = XlsxContainer::from_reader(reader)?;
        Self::from_container(container)
    }

    fn from_container(container: XlsxContainer) -> Result<Self> {
        let shared_strings = if let Ok(xml) = container.read_xml("xl/sharedStrings.xml") {
            SharedStrings::parse(&xml)?
        } else {
            SharedStrings::default()
        };

        let styles = if let Ok(xml) = container.read_xml("xl/styles.xml") {
            Styles::parse(&xml)
        } else {
            Styles::default()
        };

        let relationships = Self::parse_workbook_rels(&container)?;
        let sheets = Self::parse_workbook(&container)?;

        log::debug!(
            "workbook opened: {} sheets, {} shared strings",
            sheets.len(),
            shared_strings.len()
        );

        Ok(Self {
            container,
            shared_strings,
            styles,
            sheets,
            relationships,
        })
    }

    /// Parse workbook relationships (rel id -> worksheet part target).
    fn parse_workbook_rels(container: &XlsxContainer) -> Result<HashMap<String, String>> {
        let mut rels = HashMap::new();

        if let Ok(xml) = container.read_xml("xl/_rels/workbook.xml.rels") {
            let mut reader = quick_xml::Reader::from_str(&xml);
            reader.config_mut().trim_text(true);

            let mut buf = Vec::new();

            loop {
                match reader.read_event_into(&mut buf) {
                    Ok(quick_xml::events::Event::Empty(e))
                    | Ok(quick_xml::events::Event::Start(e)) => {
                        if e.name().as_ref() == b"Relationship" {
                            let mut id = String::new();
                            let mut target = String::new();

                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"Id" => {
                                        id = String::from_utf8_lossy(&attr.value).to_string();
                                    }
                                    b"Target" => {
                                        target = String::from_utf8_lossy(&attr.value).to_string();
                                    }
                                    _ => {}
                                }
                            }

                            if !id.is_empty() && !target.is_empty() {
                                rels.insert(id, target);
                            }
                        }
                    }
                    Ok(quick_xml::events::Event::Eof) => break,
                    Err(e) => return Err(Error::XmlParse(e.to_string())),
                    _ => {}
                }
                buf.clear();
            }
        }

        Ok(rels)
    }

    /// Parse workbook.xml for sheet names and relationship ids, in workbook
    /// order.
    fn parse_workbook(container: &XlsxContainer) -> Result<Vec<SheetInfo>> {
        let mut sheets = Vec::new();

        let xml = container
            .read_xml("xl/workbook.xml")
            .map_err(|_| Error::NotXlsx("missing xl/workbook.xml".to_string()))?;

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e))
                | Ok(quick_xml::events::Event::Start(e)) => {
                    if e.name().as_ref() == b"sheet" {
                        let mut name = String::new();
                        let mut rel_id = String::new();

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => {
                                    name = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                b"r:id" => {
                                    rel_id = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                _ => {}
                            }
                        }

                        if !name.is_empty() {
                            sheets.push(SheetInfo { name, rel_id });
                        }
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Sheet names, in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Parse every sheet and return the workbook model.
    pub fn parse(&mut self) -> Result<Workbook> {
        let mut workbook = Workbook::default();

        for info in self.sheets.clone() {
            // Worksheet part path via the workbook relationships; absent
            // targets yield an empty sheet rather than a hard failure.
            let sheet = if let Some(target) = self.relationships.get(&info.rel_id) {
                let sheet_path = if let Some(stripped) = target.strip_prefix('/') {
                    stripped.to_string()
                } else {
                    format!("xl/{}", target)
                };

                match self.container.read_xml(&sheet_path) {
                    Ok(xml) => self.parse_sheet(&info.name, &xml)?,
                    Err(_) => Sheet::empty(&info.name),
                }
            } else {
                Sheet::empty(&info.name)
            };

            workbook.sheets.push(sheet);
        }

        Ok(workbook)
    }

    /// Parse a worksheet XML part into a typed sheet.
    ///
    /// The first row with any cells is the header; later rows are data.
    /// Cell references (r="B2") position values so sparse rows stay
    /// column-aligned, gaps filled with the missing marker.
    fn parse_sheet(&self, name: &str, xml: &str) -> Result<Sheet> {
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut raw_rows: Vec<Vec<CellValue>> = Vec::new();

        let mut in_row = false;
        let mut in_cell = false;
        let mut in_value = false;
        let mut current_row: Vec<CellValue> = Vec::new();
        let mut row_has_cells = false;
        let mut cell_type: Option<String> = None;
        let mut cell_style: Option<usize> = None;
        let mut cell_col: Option<usize> = None;
        let mut cell_value = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e))
                | Ok(quick_xml::events::Event::Empty(ref e))
                    if e.name().as_ref() == b"row" =>
                {
                    in_row = true;
                    row_has_cells = false;
                    current_row = Vec::new();
                }
                Ok(quick_xml::events::Event::Start(ref e)) => match e.name().as_ref() {
                    b"c" if in_row => {
                        in_cell = true;
                        row_has_cells = true;
                        cell_type = None;
                        cell_style = None;
                        cell_col = None;
                        cell_value.clear();

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"t" => {
                                    cell_type =
                                        Some(String::from_utf8_lossy(&attr.value).to_string());
                                }
                                b"s" => {
                                    cell_style =
                                        String::from_utf8_lossy(&attr.value).parse().ok();
                                }
                                b"r" => {
                                    cell_col = column_ref_to_index(&String::from_utf8_lossy(
                                        &attr.value,
                                    ));
                                }
                                _ => {}
                            }
                        }
                    }
                    b"v" | b"t" if in_cell => {
                        in_value = true;
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Text(ref e)) => {
                    if in_value {
                        let text = e.unescape().unwrap_or_default();
                        cell_value.push_str(&text);
                    }
                }
                Ok(quick_xml::events::Event::End(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        if row_has_cells {
                            raw_rows.push(std::mem::take(&mut current_row));
                        }
                        in_row = false;
                    }
                    b"c" => {
                        let value = self.resolve_cell_value(
                            &cell_value,
                            cell_type.as_deref(),
                            cell_style,
                        );

                        let col = cell_col.unwrap_or(current_row.len());
                        if current_row.len() < col {
                            current_row.resize(col, CellValue::Empty);
                        }
                        if col < current_row.len() {
                            current_row[col] = value;
                        } else {
                            current_row.push(value);
                        }

                        in_cell = false;
                    }
                    b"v" | b"t" => {
                        in_value = false;
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(build_sheet(name, raw_rows))
    }

    /// Resolve a cell value based on its type and style.
    fn resolve_cell_value(
        &self,
        value: &str,
        cell_type: Option<&str>,
        style: Option<usize>,
    ) -> CellValue {
        match cell_type {
            Some("s") => {
                // Shared string index
                if let Ok(idx) = value.parse::<usize>() {
                    CellValue::Text(self.shared_strings.get(idx).unwrap_or("").to_string())
                } else {
                    CellValue::Text(value.to_string())
                }
            }
            Some("b") => CellValue::Bool(value == "1"),
            Some("str") | Some("inlineStr") => CellValue::Text(value.to_string()),
            // Error cells carry their literal text (e.g. "#DIV/0!")
            Some("e") => CellValue::Text(value.to_string()),
            _ => {
                if value.is_empty() {
                    return CellValue::Empty;
                }
                match value.parse::<f64>() {
                    Ok(n) => {
                        let is_date = style.map(|s| self.styles.is_date_style(s)).unwrap_or(false);
                        if is_date {
                            Styles::serial_to_datetime(n)
                                .map(CellValue::DateTime)
                                .unwrap_or(CellValue::Number(n))
                        } else {
                            CellValue::Number(n)
                        }
                    }
                    Err(_) => CellValue::Text(value.to_string()),
                }
            }
        }
    }
}

/// Convert a cell reference like "B2" to a zero-based column index.
///
/// A=0, B=1, ..., Z=25, AA=26. Returns `None` for malformed references,
/// including anything past Excel's XFD (16384 column) limit.
fn column_ref_to_index(cell_ref: &str) -> Option<usize> {
    let letters: String = cell_ref
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    // Excel column references are at most three letters (XFD).
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    let mut index = 0_usize;
    for ch in letters.chars() {
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize;
        index = index * 26 + digit + 1;
    }
    if index > MAX_COLUMNS {
        return None;
    }
    Some(index - 1)
}

/// Assemble a sheet from raw rows: first row is the header, the rest data.
///
/// Header gaps and data wider than the header get generated "Column N"
/// names; fully-empty data rows are dropped.
fn build_sheet(name: &str, mut raw_rows: Vec<Vec<CellValue>>) -> Sheet {
    if raw_rows.is_empty() {
        return Sheet::empty(name);
    }

    let header = raw_rows.remove(0);
    let width = raw_rows
        .iter()
        .map(|r| r.len())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let mut columns = Vec::with_capacity(width);
    for i in 0..width {
        let label = header.get(i).map(|v| v.display()).unwrap_or_default();
        if label.is_empty() {
            columns.push(format!("Column {}", i + 1));
        } else {
            columns.push(label);
        }
    }

    let mut rows = Vec::with_capacity(raw_rows.len());
    for mut row in raw_rows {
        if row.iter().all(|v| v.is_empty()) {
            continue;
        }
        row.resize(width, CellValue::Empty);
        rows.push(row);
    }

    Sheet {
        name: name.to_string(),
        columns,
        rows,
    }
}
