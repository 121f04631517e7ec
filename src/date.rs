use chrono::DateTime;

use crate::error::{AppcastError, Result};

const RFC822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Converts an ISO-8601 timestamp into the RFC-822 form used by `<pubDate>`.
///
/// The offset of the input is kept, so `2024-01-15T10:00:00Z` becomes
/// `Mon, 15 Jan 2024 10:00:00 +0000`.
pub fn format_rfc822_date(iso_date: &str) -> Result<String> {
    let normalized = match iso_date.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => iso_date.to_string(),
    };

    let parsed = DateTime::parse_from_rfc3339(&normalized).map_err(|source| {
        AppcastError::InvalidTimestamp {
            value: iso_date.to_string(),
            source,
        }
    })?;

    Ok(parsed.format(RFC822_FORMAT).to_string())
}
