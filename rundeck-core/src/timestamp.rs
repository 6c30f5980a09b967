//! Wire timestamp format
//!
//! The server exchanges dates as `YYYY-MM-DDThh:mm:ssZ`: UTC, second precision,
//! no fractional part.

use chrono::{DateTime, NaiveDateTime, ParseError, Utc};

/// `strftime` pattern of the wire format
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a wire timestamp
pub fn parse(value: &str) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), WIRE_FORMAT).map(|naive| naive.and_utc())
}

/// Render a timestamp in the wire format, truncating sub-second precision
pub fn format(value: &DateTime<Utc>) -> String {
    value.format(WIRE_FORMAT).to_string()
}
