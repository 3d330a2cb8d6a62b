// SPDX-License-Identifier: MIT

//! Shared helpers for date/time handling.

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone, Timelike, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Drop subsecond precision.
///
/// Stored timestamps are whole seconds so Firestore string ordering is
/// consistent with instant ordering.
pub fn truncate_to_second(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Local midnight of the day containing `now`, as a UTC instant.
///
/// `offset_minutes` is the client's UTC offset (e.g. -480 for PST, 330 for IST).
/// Returns `None` for offsets outside the valid ±24h range.
pub fn start_of_local_day(now: DateTime<Utc>, offset_minutes: i32) -> Option<DateTime<Utc>> {
    let offset = FixedOffset::east_opt(offset_minutes.checked_mul(60)?)?;
    let local_midnight = now.with_timezone(&offset).date_naive().and_hms_opt(0, 0, 0)?;
    let instant = offset.from_local_datetime(&local_midnight).single()?;
    Some(instant.with_timezone(&Utc))
}
