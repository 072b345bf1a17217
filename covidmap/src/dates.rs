//! Helpers for the date-valued column headers of the time-series dataset.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::{NoExpand, Regex};

/// Header format used upstream, e.g. `1/22/20`.
const SOURCE_DATE_FORMAT: &str = "%m/%d/%y";
/// Canonical header format, e.g. `01/22/2020`.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// First two-digit year that belongs to the 1900s. chrono only places `70`-`99` there.
const CENTURY_PIVOT: i32 = 69;

fn source_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{1,2}/\d{1,2}/\d{2}").expect("valid regex"))
}

fn date_column_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{2}/\d{2}/\d{4}").expect("valid regex"))
}

/// Rewrite a `M/D/YY` header as `MM/DD/YYYY`.
///
/// Headers that do not parse as a `M/D/YY` date (including already reformatted ones and
/// impossible dates such as `13/45/20`) are returned unchanged.
pub fn reformat_date(header: &str) -> String {
    match parse_source_date(header) {
        Some(date) => {
            let formatted = date.format(DATE_FORMAT).to_string();
            source_date_pattern()
                .replace(header, NoExpand(&formatted))
                .into_owned()
        }
        None => header.to_string(),
    }
}

/// Parse a `M/D/YY` header, reading `69`-`99` as 1969-1999 and `00`-`68` as 2000-2068.
fn parse_source_date(header: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(header, SOURCE_DATE_FORMAT).ok()?;
    if date.year() >= 2000 + CENTURY_PIVOT {
        date.with_year(date.year() - 100)
    } else {
        Some(date)
    }
}

/// Whether a (reformatted) header names a date column.
pub fn is_date_column(header: &str) -> bool {
    date_column_pattern().is_match(header)
}

/// The date columns among `headers`, in their original (chronological) order.
pub fn date_columns<'a, I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .filter(|header| is_date_column(header))
        .map(str::to_string)
        .collect()
}
