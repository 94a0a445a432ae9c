//! Event records and date coercion.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use super::{EventId, UserId};
use crate::error::ApiError;

/// A persisted event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Storage identifier.
    pub id: EventId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Ticket price.
    pub price: f64,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// User who created the event.
    pub creator: UserId,
}

impl EventRecord {
    /// Returns the event date formatted for the wire.
    #[must_use]
    pub fn date_iso(&self) -> String {
        format_event_date(&self.date)
    }
}

/// An event ready to be written; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Ticket price.
    pub price: f64,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// User who created the event.
    pub creator: UserId,
}

/// Raw event input as received from the client.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInput {
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Ticket price.
    pub price: f64,
    /// Date string; see [`parse_event_date`] for accepted shapes.
    pub date: String,
}

/// Coerces a client-supplied date string into a UTC timestamp.
///
/// Accepts RFC 3339 (`2024-01-01T10:00:00+02:00`), a naive timestamp
/// interpreted as UTC (`2024-01-01T10:00:00` with optional fraction), and a
/// bare calendar date (`2024-01-01`, midnight UTC).
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] when none of the shapes match.
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    Err(ApiError::InvalidInput(format!("unparseable date: {raw:?}")))
}

/// Formats a timestamp as ISO-8601 with millisecond precision and a `Z`
/// suffix, e.g. `2024-01-01T00:00:00.000Z`.
#[must_use]
pub fn format_event_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> DateTime<Utc> {
        let Ok(dt) = parse_event_date(raw) else {
            panic!("expected {raw:?} to parse");
        };
        dt
    }

    #[test]
    fn bare_date_is_midnight_utc() {
        assert_eq!(format_event_date(&parse("2024-01-01")), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn rfc3339_offset_is_normalised() {
        assert_eq!(
            format_event_date(&parse("2024-03-10T12:30:00+02:00")),
            "2024-03-10T10:30:00.000Z"
        );
    }

    #[test]
    fn naive_timestamp_with_millis() {
        assert_eq!(
            format_event_date(&parse("2024-03-10T12:30:00.250")),
            "2024-03-10T12:30:00.250Z"
        );
    }

    #[test]
    fn formatted_output_parses_back_to_same_instant() {
        let original = parse("2021-12-21T15:04:05.123Z");
        let text = format_event_date(&original);
        assert_eq!(parse(&text), original);
    }

    #[test]
    fn garbage_is_rejected() {
        let Err(ApiError::InvalidInput(_)) = parse_event_date("next tuesday") else {
            panic!("expected invalid input");
        };
    }
}
