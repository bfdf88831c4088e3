//! String formatting utilities.

use chrono::{DateTime, Utc};

/// Format a timestamp with minute precision.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}
