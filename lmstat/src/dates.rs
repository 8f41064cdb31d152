//! Date normalization for lmstat timestamps.
//!
//! lmstat prints two date shapes: expirations as `D-MMM-YYYY` and checkout
//! starts as `M/D H:MM` with no year. Both are rewritten into the sortable
//! canonical form `YYYY-MM-DD HH:MM`, start dates with a trailing weekday.
//! Unparsable input never fails; it maps to a fixed sentinel string.

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Canonical expiration of a license that never expires.
pub const NEVER_EXPIRES: &str = "9999-12-31 23:59";

/// Canonical expiration for input that could not be parsed.
pub const BAD_EXPIRATION: &str = "xxxx-xx-xx xx:xx";

/// Canonical start time for input that could not be parsed.
pub const BAD_START_DATE: &str = "xxxx-xx-xx xx:xx (BAD DATE)";

/// FlexLM spellings of a permanent license (epoch year zero).
const PERMANENT_EXPIRATIONS: &[&str] = &["1-jan-0", "01-jan-0000"];

const EXPIRATION_FORMAT: &str = "%d-%b-%Y";

/// Converts an lmstat expiration date into `YYYY-MM-DD 23:59`.
///
/// A license expires at the end of its last day. Permanent licenses map to
/// [`NEVER_EXPIRES`], anything unparsable to [`BAD_EXPIRATION`].
///
/// # Examples
///
/// ```
/// use lminfo_lmstat::dates::convert_expiration_date;
///
/// assert_eq!(convert_expiration_date("1-oct-2007"), "2007-10-01 23:59");
/// assert_eq!(convert_expiration_date("1-jan-0"), "9999-12-31 23:59");
/// assert_eq!(convert_expiration_date("not-a-date"), "xxxx-xx-xx xx:xx");
/// ```
pub fn convert_expiration_date(raw: &str) -> String {
    if PERMANENT_EXPIRATIONS
        .iter()
        .any(|sentinel| sentinel.eq_ignore_ascii_case(raw))
    {
        return NEVER_EXPIRES.to_string();
    }

    // `%Y` takes one to four digits; lmstat always prints all four.
    let four_digit_year = raw
        .rsplit('-')
        .next()
        .is_some_and(|year| is_number(year, 4..=4));
    if !four_digit_year {
        return BAD_EXPIRATION.to_string();
    }

    match NaiveDate::parse_from_str(raw, EXPIRATION_FORMAT) {
        Ok(date) => format!("{} 23:59", date.format("%Y-%m-%d")),
        _ => BAD_EXPIRATION.to_string(),
    }
}

/// Converts an lmstat checkout start (`M/D`, `H:MM`) into
/// `YYYY-MM-DD HH:MM (Weekday)`.
///
/// lmstat omits the year. The year of `today` is assumed unless the month
/// lies after the current month, in which case the checkout started last
/// year and is still active. Unparsable input maps to [`BAD_START_DATE`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use lminfo_lmstat::dates::convert_start_date;
///
/// let today = NaiveDate::from_ymd_opt(2027, 1, 5).unwrap();
/// assert_eq!(convert_start_date("12/30", "23:10", today), "2026-12-30 23:10 (Wednesday)");
/// assert_eq!(convert_start_date("1/1", "9:08", today), "2027-01-01 09:08 (Friday)");
/// ```
pub fn convert_start_date(date: &str, time: &str, today: NaiveDate) -> String {
    match parse_start(date, time, today) {
        Some(start) => start.format("%Y-%m-%d %H:%M (%A)").to_string(),
        None => BAD_START_DATE.to_string(),
    }
}

fn parse_start(date: &str, time: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    let (month, day) = date.split_once('/')?;
    let (hour, minute) = time.split_once(':')?;
    if !(is_number(month, 1..=2)
        && is_number(day, 1..=2)
        && is_number(hour, 1..=2)
        && is_number(minute, 2..=2))
    {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;

    let year = if month > today.month() {
        today.year() - 1
    } else {
        today.year()
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)?;
    Some(date.and_time(time))
}

/// Plain ASCII digits, no sign, with a length in `widths`.
fn is_number(field: &str, widths: RangeInclusive<usize>) -> bool {
    widths.contains(&field.len()) && field.bytes().all(|b| b.is_ascii_digit())
}
