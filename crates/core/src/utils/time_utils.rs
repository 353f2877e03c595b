use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

use crate::constants::{MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};

/// Today's date in the server's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_supported_year(year: i32) -> bool {
    (MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&year)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month; 0 for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Builds a date, clamping `day` to the last day of the month.
/// `None` when the month is invalid or the year is beyond chrono's range.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month);
    if last == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

/// Adds calendar months, clamping to the end of the target month (Jan 31 + 1 month = Feb 28/29).
/// Saturates at chrono's date limits.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() as i64 * 12 + date.month0() as i64 + months as i64;
    let target = i32::try_from(total.div_euclid(12))
        .ok()
        .and_then(|year| clamped_date(year, total.rem_euclid(12) as u32 + 1, date.day()));
    match target {
        Some(moved) => moved,
        None if months < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = clamped_date(year, month, 1)?;
    let end = clamped_date(year, month, days_in_month(year, month))?;
    Some((start, end))
}

/// First and last day of a calendar year.
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((clamped_date(year, 1, 1)?, clamped_date(year, 12, 31)?))
}

/// Calendar month containing `date`.
pub fn month_bounds_of(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.day0() as i64);
    let end = start + Duration::days(days_in_month(date.year(), date.month()) as i64 - 1);
    (start, end)
}

/// Calendar year containing `date`.
pub fn year_bounds_of(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.ordinal0() as i64);
    let days = if is_leap_year(date.year()) { 366 } else { 365 };
    (start, start + Duration::days(days - 1))
}

/// Monday-start week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = date.weekday().num_days_from_monday() as i64;
    let start = date - Duration::days(offset);
    (start, start + Duration::days(6))
}

/// `YYYY-MM` key used for monthly grouping.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Parses a `YYYY-MM` key into (year, month). Years outside the supported range are rejected.
pub fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (y, m) = key.split_once('-')?;
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    if (1..=12).contains(&month) && is_supported_year(year) {
        Some((year, month))
    } else {
        None
    }
}

/// Number of whole months from `from` to `to` (partial months round up), minimum 1.
pub fn months_until(from: NaiveDate, to: NaiveDate) -> i64 {
    if to <= from {
        return 1;
    }
    let mut months =
        ((to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32) as i64;
    if to.day() > from.day() {
        months += 1;
    }
    months.max(1)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
