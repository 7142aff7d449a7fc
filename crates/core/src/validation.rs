//! Input validation utilities.
//!
//! Client-side guards that run before anything is sent. They are advisory: the backend is
//! the authority on what it accepts.

use crate::error::FormError;
use crate::format::parse_datetime_local;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use clinic_types::{EmailAddress, NonEmptyText, TextError};

/// Drop seconds and sub-seconds. Visit times are entered with minute precision.
pub fn minute_floor(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Current wall-clock time in the local timezone.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Reject a visit time strictly earlier than `now`.
///
/// `now` is compared at minute precision, so a visit in the current minute is accepted.
pub fn check_visit_time(selected: NaiveDateTime, now: NaiveDateTime) -> Result<(), FormError> {
    if selected < minute_floor(now) {
        return Err(FormError::VisitInPast);
    }
    Ok(())
}

/// Parse a `datetime-local` input value and apply [`check_visit_time`].
pub fn check_visit_time_input(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime, FormError> {
    let selected =
        parse_datetime_local(input).ok_or_else(|| FormError::InvalidDateTime(input.to_owned()))?;
    check_visit_time(selected, now)?;
    Ok(selected)
}

/// Interpret a wall-clock time in `tz` and convert it to UTC.
///
/// Times that do not exist in `tz` (skipped by a DST jump) are rejected.
pub fn wall_clock_to_utc<Tz: TimeZone>(
    naive: NaiveDateTime,
    tz: &Tz,
) -> Result<DateTime<Utc>, FormError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| FormError::InvalidDateTime(naive.to_string()))
}

/// A required text field, trimmed.
pub fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    NonEmptyText::new(value)
        .map(NonEmptyText::into_string)
        .map_err(|_| FormError::Required { field })
}

/// A required email field, trimmed.
pub fn required_email(field: &'static str, value: &str) -> Result<String, FormError> {
    match EmailAddress::parse(value) {
        Ok(email) => Ok(email.into_string()),
        Err(TextError::Empty) => Err(FormError::Required { field }),
        Err(_) => Err(FormError::InvalidEmail),
    }
}

/// Whether `page` can be requested given the last known page count.
pub fn page_in_range(page: u32, total_pages: u32) -> bool {
    page >= 1 && page <= total_pages
}
