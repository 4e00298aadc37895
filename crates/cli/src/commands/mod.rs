//! Chat commands. Each command lives in its own module and implements
//! [`crate::command::Command`].

pub mod focus;
pub mod todo;

use chrono::{DateTime, Local, Utc};

/// `Dec 15, 2024`
pub(crate) fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

/// `Dec 15`
pub(crate) fn format_short_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%b %-d").to_string()
}

/// `Dec 15, 09:30 AM`
pub(crate) fn format_date_time(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%b %-d, %I:%M %p").to_string()
}

/// `09:30 AM`
pub(crate) fn format_time(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%I:%M %p").to_string()
}

/// Serializes a record for the response `data` field.
pub(crate) fn to_data<T: serde::Serialize>(value: &T) -> crate::error::Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}
