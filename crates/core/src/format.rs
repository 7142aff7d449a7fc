//! Date and time formatting for display and form inputs.
//!
//! Every formatter comes in two flavours: `*_in(.., tz)` takes an explicit timezone and is
//! what the tests use, the plain variant formats in the machine's local timezone.

use crate::messages;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

/// Format of an HTML `datetime-local` input value, e.g. `2024-03-01T09:30`.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Parse an ISO-8601 timestamp into `tz`.
///
/// Accepts RFC 3339 with offset, a naive date-time (taken as wall-clock time in `tz`) and a
/// bare date (midnight in `tz`, so the calendar date never shifts).
pub fn parse_timestamp_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(tz));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", DATETIME_LOCAL_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive).earliest()
}

/// Parse the value of a `datetime-local` input.
pub fn parse_datetime_local(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), DATETIME_LOCAL_FORMAT).ok()
}

pub fn to_datetime_local_in<Tz: TimeZone>(dt: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.with_timezone(tz).format(DATETIME_LOCAL_FORMAT).to_string()
}

/// Render a timestamp as a `datetime-local` input value in local time.
pub fn to_datetime_local(dt: &DateTime<Utc>) -> String {
    to_datetime_local_in(dt, &Local)
}

/// The current local time as a `datetime-local` value, minute precision.
pub fn current_datetime_local() -> String {
    Local::now().format(DATETIME_LOCAL_FORMAT).to_string()
}

/// Convert an ISO string to a `datetime-local` value.
///
/// Returns an empty string (and logs) when the input cannot be parsed.
pub fn iso_to_datetime_local_in<Tz: TimeZone>(iso: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match parse_timestamp_in(iso, tz) {
        Some(dt) => dt.format(DATETIME_LOCAL_FORMAT).to_string(),
        None => {
            tracing::error!("invalid date provided for datetime-local input: {:?}", iso);
            String::new()
        }
    }
}

pub fn iso_to_datetime_local(iso: &str) -> String {
    iso_to_datetime_local_in(iso, &Local)
}

/// `YYYY-MM-DD` for a date input, or an empty string for empty/invalid input.
pub fn format_date_to_yyyy_mm_dd_in<Tz: TimeZone>(iso: &str, tz: &Tz) -> String {
    if iso.trim().is_empty() {
        return String::new();
    }
    match parse_timestamp_in(iso, tz) {
        Some(dt) => format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day()),
        None => {
            tracing::error!("failed to format date to YYYY-MM-DD: {:?}", iso);
            String::new()
        }
    }
}

pub fn format_date_to_yyyy_mm_dd(iso: &str) -> String {
    format_date_to_yyyy_mm_dd_in(iso, &Local)
}

/// Long Russian date, e.g. `5 января 2024 г.`.
///
/// Missing input renders as "Не указано", unparseable input as "Некорректная дата".
pub fn format_date_time_in<Tz: TimeZone>(iso: Option<&str>, tz: &Tz) -> String {
    let Some(iso) = iso.filter(|s| !s.trim().is_empty()) else {
        return messages::DATE_NOT_SET.to_owned();
    };
    match parse_timestamp_in(iso, tz) {
        Some(dt) => format!(
            "{} {} {} г.",
            dt.day(),
            MONTHS_GENITIVE[dt.month0() as usize],
            dt.year()
        ),
        None => messages::DATE_INVALID.to_owned(),
    }
}

pub fn format_date_time(iso: Option<&str>) -> String {
    format_date_time_in(iso, &Local)
}

/// Short numeric date, e.g. `05.01.2024`. Unparseable input is returned unchanged.
pub fn format_short_date_in<Tz: TimeZone>(iso: &str, tz: &Tz) -> String {
    match parse_timestamp_in(iso, tz) {
        Some(dt) => format!("{:02}.{:02}.{:04}", dt.day(), dt.month(), dt.year()),
        None => iso.to_owned(),
    }
}

pub fn format_short_date(iso: &str) -> String {
    format_short_date_in(iso, &Local)
}

/// Visit timestamp for tables, e.g. `05.01.2024 14:30`.
pub fn format_visit_date_in<Tz: TimeZone>(dt: &DateTime<Utc>, tz: &Tz) -> String {
    let local = dt.with_timezone(tz);
    format!(
        "{:02}.{:02}.{:04} {:02}:{:02}",
        local.day(),
        local.month(),
        local.year(),
        local.hour(),
        local.minute()
    )
}

pub fn format_visit_date(dt: &DateTime<Utc>) -> String {
    format_visit_date_in(dt, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn moscow() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    #[test]
    fn long_date_uses_genitive_month() {
        assert_eq!(
            format_date_time_in(Some("2024-01-05T10:00:00.000Z"), &Utc),
            "5 января 2024 г."
        );
        assert_eq!(
            format_date_time_in(Some("1990-05-31"), &moscow()),
            "31 мая 1990 г."
        );
    }

    #[test]
    fn long_date_handles_missing_and_invalid() {
        assert_eq!(format_date_time_in(None, &Utc), "Не указано");
        assert_eq!(format_date_time_in(Some(""), &Utc), "Не указано");
        assert_eq!(format_date_time_in(Some("yesterday"), &Utc), "Некорректная дата");
    }

    #[test]
    fn yyyy_mm_dd_follows_timezone() {
        // 22:30 UTC is already the next day in Moscow.
        assert_eq!(
            format_date_to_yyyy_mm_dd_in("2024-02-28T22:30:00Z", &moscow()),
            "2024-02-29"
        );
        assert_eq!(format_date_to_yyyy_mm_dd_in("2024-02-28", &Utc), "2024-02-28");
        assert_eq!(format_date_to_yyyy_mm_dd_in("", &Utc), "");
        assert_eq!(format_date_to_yyyy_mm_dd_in("garbage", &Utc), "");
    }

    #[test]
    fn bare_dates_keep_their_calendar_day() {
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(format_date_to_yyyy_mm_dd_in("2000-01-01", &west), "2000-01-01");
    }

    #[test]
    fn datetime_local_round_trip_through_timezone() {
        let dt: DateTime<Utc> = "2024-03-01T06:30:00Z".parse().unwrap();
        assert_eq!(to_datetime_local_in(&dt, &moscow()), "2024-03-01T09:30");
        assert_eq!(
            iso_to_datetime_local_in("2024-03-01T06:30:00.000Z", &moscow()),
            "2024-03-01T09:30"
        );
        assert_eq!(iso_to_datetime_local_in("not a date", &moscow()), "");
    }

    #[test]
    fn visit_and_short_dates_are_zero_padded() {
        let dt: DateTime<Utc> = "2024-01-05T07:05:00Z".parse().unwrap();
        assert_eq!(format_visit_date_in(&dt, &Utc), "05.01.2024 07:05");
        assert_eq!(format_short_date_in("2024-01-05T07:05:00Z", &Utc), "05.01.2024");
        assert_eq!(format_short_date_in("n/a", &Utc), "n/a");
    }

    #[test]
    fn datetime_local_input_parses_minutes_only() {
        assert!(parse_datetime_local("2024-03-01T09:30").is_some());
        assert!(parse_datetime_local("2024-03-01 09:30").is_none());
        assert!(parse_datetime_local("").is_none());
    }

    #[test]
    fn current_datetime_local_has_input_shape() {
        let now = current_datetime_local();
        assert!(parse_datetime_local(&now).is_some(), "{now}");
    }
}
