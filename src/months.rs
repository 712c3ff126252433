//! Month-year sheet name matching.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anchored, case-insensitive "Month YYYY" pattern. The whole name must be
/// a full English month name, whitespace, and a 4-digit year.
static MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}$",
    )
    .expect("month-year pattern is valid")
});

/// Check whether a sheet name is a month-year name like "March 2025".
///
/// Matching is case-insensitive and anchored at both ends; partial matches
/// ("Marchtober 2025", "March 2025 draft") are rejected.
pub fn is_month_year(name: &str) -> bool {
    MONTH_YEAR_RE.is_match(name)
}
