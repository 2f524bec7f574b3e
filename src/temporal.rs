//! Timestamp parsing and calendar field derivation.
//!
//! Sign-in sheets arrive from form exports, spreadsheets and hand-typed
//! CSVs, so a single timestamp column can mix ISO, Brazilian day-first and
//! spreadsheet serial formats. Each value parses independently; a failure
//! only drops that row.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::record::Weekday;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DAY_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d-%m-%y %H:%M:%S",
    "%d-%m-%y %H:%M",
];

const MONTH_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const DAY_FIRST_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y", "%d-%m-%y", "%d.%m.%y",
];

const MONTH_FIRST_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y"];

/// chrono's `%Y` takes one to four digits, so `02/03/24` would read as year 24.
/// Anything earlier than this is a short year and falls through to `%y`.
const MIN_YEAR: i32 = 1900;

/// Spreadsheet serial day numbers accepted as dates (1954-10-03 ..= 2119-01-10).
const SERIAL_DAY_RANGE: std::ops::RangeInclusive<f64> = 20_000.0..=80_000.0;

/// Calendar fields derived from one parsed timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalFields {
    pub timestamp: NaiveDateTime,
    pub calendar_date: NaiveDate,
    pub month: String,
    pub weekday: Weekday,
    pub hour_of_day: u32,
}

impl TemporalFields {
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        TemporalFields {
            timestamp,
            calendar_date: timestamp.date(),
            month: timestamp.format("%Y-%m").to_string(),
            weekday: Weekday::from_chrono(timestamp.weekday()),
            hour_of_day: timestamp.hour(),
        }
    }
}

/// Parses free-text timestamp input. Date-only values land at midnight.
///
/// `day_first` decides how ambiguous numeric dates such as `01/02/2024` are read.
pub fn parse_timestamp(text: &str, day_first: bool) -> Option<NaiveDateTime> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    // The preferred reading goes first; the other still catches values
    // like 03/25/2024 that only make sense one way.
    let (datetime_orders, date_orders) = if day_first {
        (
            [DAY_FIRST_DATETIME_FORMATS, MONTH_FIRST_DATETIME_FORMATS],
            [DAY_FIRST_DATE_FORMATS, MONTH_FIRST_DATE_FORMATS],
        )
    } else {
        (
            [MONTH_FIRST_DATETIME_FORMATS, DAY_FIRST_DATETIME_FORMATS],
            [MONTH_FIRST_DATE_FORMATS, DAY_FIRST_DATE_FORMATS],
        )
    };

    for fmt in DATETIME_FORMATS.iter().chain(datetime_orders.iter().copied().flatten()) {
        match NaiveDateTime::parse_from_str(s, fmt) {
            Ok(dt) if dt.year() >= MIN_YEAR => return Some(dt),
            _ => {}
        }
    }

    for fmt in DATE_FORMATS.iter().chain(date_orders.iter().copied().flatten()) {
        match NaiveDate::parse_from_str(s, fmt) {
            Ok(d) if d.year() >= MIN_YEAR => return d.and_hms_opt(0, 0, 0),
            _ => {}
        }
    }

    parse_serial(s)
}

/// Spreadsheet serial dates (days since 1899-12-30, fraction = time of day).
fn parse_serial(s: &str) -> Option<NaiveDateTime> {
    let value: f64 = s.replace(',', ".").parse().ok()?;
    if !SERIAL_DAY_RANGE.contains(&value) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = value.trunc() as i64;
    let seconds = (value.fract() * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}

/// Parses and derives calendar fields in one step.
pub fn normalize(text: &str, day_first: bool) -> Option<TemporalFields> {
    parse_timestamp(text, day_first).map(TemporalFields::from_timestamp)
}
