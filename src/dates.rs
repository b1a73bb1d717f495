use chrono::{Duration, Local, NaiveDate};

/// Calendar-day key for the host's current local date, e.g. "2026-08-27".
/// Stable for the whole local day regardless of time of day.
pub fn today() -> String {
    day_key(today_date())
}

pub fn yesterday() -> String {
    day_key(today_date() - Duration::days(1))
}

pub fn today_date() -> NaiveDate {
    Local::now().date_naive()
}

pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}
