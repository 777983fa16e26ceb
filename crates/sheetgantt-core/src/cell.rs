//! Raw spreadsheet values and their best-effort conversions.
//!
//! Spreadsheet data is messy: a "date" column can hold a native date, a
//! serial day number, or free text in any of a dozen formats. Every
//! conversion here returns `None` instead of failing.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Spreadsheet epoch for serial day numbers (day 0).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest serial day number a spreadsheet will produce (9999-12-31).
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// Text values that mean "no value" in hand-maintained sheets.
const EMPTY_MARKERS: &[&str] = &["-", "--", "n/a", "na", "none", "null", "tbd", "undefined"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// A single cell handed over by the tabular reader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// True when the cell carries nothing worth reading.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => n.is_nan(),
            Cell::Bool(_) | Cell::Date(_) => false,
        }
    }

    /// Cell content as trimmed display text.
    ///
    /// Whole numbers print without a fractional part so that numeric IDs
    /// read from a sheet (`3.0`) match their textual references (`"3"`).
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.is_nan() => String::new(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Non-empty display text, or `None`.
    pub fn as_opt_text(&self) -> Option<String> {
        let text = self.as_text();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Integer content with leading-integer semantics (`"12 days"` reads as 12).
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            Cell::Text(s) => leading_int(s),
            _ => None,
        }
    }

    /// Calendar date content.
    ///
    /// Native dates pass through, numbers are read as spreadsheet serial days
    /// and text goes through [`parse_calendar_date`].
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Number(n) => from_serial_day(*n),
            Cell::Text(s) => parse_calendar_date(s),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Parse a free-text calendar date.
///
/// Tries ISO and the common regional formats, then full timestamps. Empty
/// strings and placeholder markers such as `"N/A"` resolve to `None`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() || EMPTY_MARKERS.contains(&s.to_lowercase().as_str()) {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

fn from_serial_day(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL_DAY {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_signed(Duration::days(serial.trunc() as i64))
}

fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn blank_cells() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::text("   ").is_blank());
        assert!(!Cell::text("x").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn whole_numbers_print_as_integers() {
        assert_eq!(Cell::Number(3.0).as_text(), "3");
        assert_eq!(Cell::Number(2.5).as_text(), "2.5");
        assert_eq!(Cell::text("  Design ").as_text(), "Design");
    }

    #[test]
    fn int_parsing_is_lenient() {
        assert_eq!(Cell::text("12").as_int(), Some(12));
        assert_eq!(Cell::text("-4").as_int(), Some(-4));
        assert_eq!(Cell::text("5 días").as_int(), Some(5));
        assert_eq!(Cell::Number(7.9).as_int(), Some(7));
        assert_eq!(Cell::text("abc").as_int(), None);
        assert_eq!(Cell::Empty.as_int(), None);
    }

    #[test]
    fn native_dates_pass_through() {
        assert_eq!(Cell::Date(date(2024, 3, 1)).as_date(), Some(date(2024, 3, 1)));
    }

    #[test]
    fn serial_days_convert() {
        // 45292 is 2024-01-01 in spreadsheet serial numbering
        assert_eq!(Cell::Number(45292.0).as_date(), Some(date(2024, 1, 1)));
        assert_eq!(Cell::Number(-3.0).as_date(), None);
    }

    #[test]
    fn text_dates_in_common_formats() {
        assert_eq!(parse_calendar_date("2024-01-10"), Some(date(2024, 1, 10)));
        assert_eq!(parse_calendar_date("2024/01/10"), Some(date(2024, 1, 10)));
        assert_eq!(parse_calendar_date("01/10/2024"), Some(date(2024, 1, 10)));
        assert_eq!(parse_calendar_date("25/12/2024"), Some(date(2024, 12, 25)));
        assert_eq!(parse_calendar_date("Jan 10, 2024"), Some(date(2024, 1, 10)));
        assert_eq!(parse_calendar_date("2024-01-10T08:30:00"), Some(date(2024, 1, 10)));
        assert_eq!(parse_calendar_date("2024-01-10T08:30:00Z"), Some(date(2024, 1, 10)));
    }

    #[test]
    fn unparseable_dates_are_none() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("N/A"), None);
        assert_eq!(parse_calendar_date("next week"), None);
        assert_eq!(Cell::Bool(true).as_date(), None);
    }
}
