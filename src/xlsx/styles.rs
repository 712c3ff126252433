//! XLSX styles parsing for date number formats.
//!
//! Dates in XLSX are plain numbers; only the number format applied through
//! the cell's style says whether a numeric cell is a date. This module
//! resolves style index -> numFmtId -> "is this a date", and converts Excel
//! serial numbers to chrono date-times.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// Styles information parsed from xl/styles.xml.
#[derive(Debug, Default)]
pub struct Styles {
    /// Custom number formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    /// Cell style formats: style index -> numFmtId
    cell_xfs: Vec<u32>,
}

impl Styles {
    /// Parse styles from xl/styles.xml content.
    pub fn parse(xml: &str) -> Self {
        let mut styles = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e)) => match e.name().as_ref() {
                    b"numFmts" => in_num_fmts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"xf" if in_cell_xfs => {
                        styles.cell_xfs.push(num_fmt_id_attr(e));
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Empty(ref e)) => match e.name().as_ref() {
                    b"numFmt" if in_num_fmts => {
                        let mut num_fmt_id: Option<u32> = None;
                        let mut format_code = String::new();
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"numFmtId" => {
                                    num_fmt_id = String::from_utf8_lossy(&attr.value).parse().ok();
                                }
                                b"formatCode" => {
                                    format_code = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                _ => {}
                            }
                        }
                        if let Some(id) = num_fmt_id {
                            styles.num_fmts.insert(id, format_code);
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        styles.cell_xfs.push(num_fmt_id_attr(e));
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::End(ref e)) => match e.name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(_) => break,
                _ => {}
            }
            buf.clear();
        }

        styles
    }

    /// Get the numFmtId for a cell style index.
    pub fn num_fmt_id(&self, style_index: usize) -> Option<u32> {
        self.cell_xfs.get(style_index).copied()
    }

    /// Check whether a cell style index resolves to a date format.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        self.num_fmt_id(style_index)
            .map(|id| self.is_date_format(id))
            .unwrap_or(false)
    }

    /// Check if a numFmtId represents a date format.
    pub fn is_date_format(&self, num_fmt_id: u32) -> bool {
        // Built-in formats: 14-22 are dates, 45-47 are times
        if (14..=22).contains(&num_fmt_id) || (45..=47).contains(&num_fmt_id) {
            return true;
        }

        if let Some(format_code) = self.num_fmts.get(&num_fmt_id) {
            return Self::is_date_format_code(format_code);
        }

        false
    }

    /// Check if a format code string represents a date format.
    ///
    /// Date tokens (d, m, y) count only outside square brackets and quoted
    /// literals; 'm' alone is ambiguous with minutes and needs a day or year
    /// token nearby.
    fn is_date_format_code(format_code: &str) -> bool {
        let mut in_bracket = false;
        let mut in_quote = false;
        let mut prev_char = '\0';

        for c in format_code.chars() {
            match c {
                '[' if !in_quote => in_bracket = true,
                ']' if !in_quote => in_bracket = false,
                '"' => in_quote = !in_quote,
                _ if !in_bracket && !in_quote => match c.to_ascii_lowercase() {
                    'd' => return true,
                    'y' => return true,
                    'm' => {
                        let lower_prev = prev_char.to_ascii_lowercase();
                        if lower_prev == 'd' || lower_prev == 'y' {
                            return true;
                        }
                        let lower_format = format_code.to_lowercase();
                        if lower_format.contains('d') || lower_format.contains('y') {
                            return true;
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
            prev_char = c;
        }

        false
    }

    /// Convert an Excel serial date number to a date-time.
    ///
    /// Excel counts days from 1900-01-01 as serial 1, and for Lotus 1-2-3
    /// compatibility pretends 1900-02-29 existed as serial 60. The fraction
    /// carries the time of day.
    pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
        if serial < 1.0 {
            return None;
        }

        // Skip the phantom leap day for serials past it
        let adjusted = if serial > 60.0 { serial - 1.0 } else { serial };

        let base = NaiveDate::from_ymd_opt(1899, 12, 31)?;
        let date = base.checked_add_signed(Duration::days(adjusted.floor() as i64))?;

        let time_fraction = serial.fract();
        let total_seconds = (time_fraction * 86_400.0).round() as u32;
        if total_seconds >= 86_400 {
            // A fraction that rounds up to a full day is midnight of the next
            return date
                .checked_add_signed(Duration::days(1))?
                .and_hms_opt(0, 0, 0);
        }
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        date.and_hms_opt(hours, minutes, seconds)
    }
}

fn num_fmt_id_attr(e: &quick_xml::events::BytesStart<'_>) -> u32 {
    let mut num_fmt_id: u32 = 0;
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"numFmtId" {
            if let Ok(id) = String::from_utf8_lossy(&attr.value).parse() {
                num_fmt_id = id;
            }
        }
    }
    num_fmt_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_builtin_date_formats() {
        let styles = Styles::default();

        assert!(styles.is_date_format(14)); // m/d/yyyy
        assert!(styles.is_date_format(15)); // d-mmm-yy
        assert!(styles.is_date_format(22)); // m/d/yy h:mm

        assert!(!styles.is_date_format(0)); // General
        assert!(!styles.is_date_format(1)); // 0
        assert!(!styles.is_date_format(2)); // 0.00
    }

    #[test]
    fn test_custom_date_format_detection() {
        assert!(Styles::is_date_format_code("yyyy-mm-dd"));
        assert!(Styles::is_date_format_code("d/m/yy"));
        assert!(Styles::is_date_format_code("[$-409]mmmm\\ d\\,\\ yyyy;@"));

        assert!(!Styles::is_date_format_code("0.00"));
        assert!(!Styles::is_date_format_code("#,##0"));
        assert!(!Styles::is_date_format_code("\"$\"#,##0.00"));
    }

    #[test]
    fn test_parse_cell_xfs() {
        let xml = r#"<styleSheet>
            <numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy-mm-dd"/></numFmts>
            <cellXfs count="3">
                <xf numFmtId="0"/>
                <xf numFmtId="14"/>
                <xf numFmtId="164"/>
            </cellXfs>
        </styleSheet>"#;

        let styles = Styles::parse(xml);
        assert!(!styles.is_date_style(0));
        assert!(styles.is_date_style(1));
        assert!(styles.is_date_style(2));
        assert!(!styles.is_date_style(99));
    }

    #[test]
    fn test_serial_to_datetime() {
        assert_eq!(Styles::serial_to_datetime(1.0), Some(dt(1900, 1, 1)));
        assert_eq!(Styles::serial_to_datetime(59.0), Some(dt(1900, 2, 28)));
        // Serial 60 is the phantom Feb 29, 1900; 61 lands on Mar 1
        assert_eq!(Styles::serial_to_datetime(61.0), Some(dt(1900, 3, 1)));

        assert_eq!(Styles::serial_to_datetime(44197.0), Some(dt(2021, 1, 1)));
        assert_eq!(Styles::serial_to_datetime(45658.0), Some(dt(2025, 1, 1)));

        // Time component in the fraction
        assert_eq!(
            Styles::serial_to_datetime(44197.5),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(12, 0, 0)
        );

        assert_eq!(Styles::serial_to_datetime(0.5), None);
        assert_eq!(Styles::serial_to_datetime(-3.0), None);
    }

    #[test]
    fn test_serial_fraction_rounding_to_full_day_rolls_over() {
        // 45657.99999999 rounds to a full day of seconds: midnight of Jan 1,
        // not midnight of Dec 31
        assert_eq!(
            Styles::serial_to_datetime(45_657.999_999_99),
            Some(dt(2025, 1, 1))
        );
        // One second shy of midnight stays on the same day
        assert_eq!(
            Styles::serial_to_datetime(45_657.999_988_4),
            NaiveDate::from_ymd_opt(2024, 12, 31)
                .unwrap()
                .and_hms_opt(23, 59, 59)
        );
    }
}
