//! Locale formatting for report cells.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// `dd.mm.yyyy HH:MM:SS` in the reporting offset.
pub fn local_datetime(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant
        .with_timezone(&offset)
        .format("%d.%m.%Y %H:%M:%S")
        .to_string()
}

/// `dd.mm.yyyy`.
pub fn local_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
