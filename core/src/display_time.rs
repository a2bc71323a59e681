use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Day, month name, two-digit year, 24-hour time: `05 March 24 14:07`.
pub const DISPLAY_FORMAT: &str = "%d %B %y %H:%M";

pub const DEFAULT_DISPLAY_TIMEZONE: Tz = chrono_tz::Europe::London;

pub fn from_epoch_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}

pub fn format_for_display(instant: DateTime<Utc>, timezone: Tz) -> String {
    instant.with_timezone(&timezone).format(DISPLAY_FORMAT).to_string()
}
