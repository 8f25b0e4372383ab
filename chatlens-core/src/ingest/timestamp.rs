//! Fixed-format timestamp parsing.
//!
//! Exports store local wall-clock time without an offset, so instants are
//! kept as [`NaiveDateTime`].

use crate::error::{Error, Result};
use chrono::NaiveDateTime;

/// The only accepted timestamp layout.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a `YYYY-MM-DDTHH:MM:SS` string.
///
/// The input must reformat back to exactly itself, so unpadded fields,
/// fractional seconds or trailing text are rejected instead of being
/// read as a nearby date.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let instant = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|_| Error::InvalidTimestamp(raw.to_string()))?;

    if format_timestamp(&instant) != raw {
        return Err(Error::InvalidTimestamp(raw.to_string()));
    }

    Ok(instant)
}

/// Format an instant back into the export layout.
pub fn format_timestamp(instant: &NaiveDateTime) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}
