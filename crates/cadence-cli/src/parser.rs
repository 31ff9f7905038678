use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use chrono_english::{parse_date_string, Dialect};

/// Parses a point in time given on the command line: RFC 3339 first, then
/// natural language relative to `now` ("tomorrow 9am", "next friday").
pub fn parse_when(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Ok(at.with_timezone(&Utc));
    }
    parse_date_string(input, now, Dialect::Us)
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

pub fn parse_optional(input: Option<&str>, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
    input.map(|s| parse_when(s, now)).transpose()
}
