//! Serializing a unified event back into the textual calendar format.

use chrono::{DateTime, Utc};

use crate::error::TimelineError;
use crate::timeline::event::UnifiedEvent;

use super::text::{escape_text, fold_line};
use super::values::{format_date, format_utc};

const PRODID: &str = "-//Almanac//Timeline//EN";

/// Render one event as a complete `VCALENDAR` document for download.
///
/// All-day events use bare dates with a `VALUE=DATE` parameter; timed events
/// are re-emitted in UTC. `DTEND` is omitted when the event has no end, and
/// `URL` is emitted verbatim. Lines are folded at 75 octets and joined with
/// CRLF. An end before the start is a caller bug and is reported, not
/// coerced.
pub fn export_event(
    event: &UnifiedEvent,
    now: DateTime<Utc>,
) -> Result<String, TimelineError> {
    if let Some(end) = event.end_date {
        if end < event.start_date {
            return Err(TimelineError::InvalidTimeRange(format!(
                "event {} ends before it starts",
                event.id
            )));
        }
    }

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@almanac", event.id),
        format!("DTSTAMP:{}", format_utc(now)),
    ];

    if event.is_all_day {
        lines.push(format!("DTSTART;VALUE=DATE:{}", format_date(event.start_date)));
        if let Some(end) = event.end_date {
            lines.push(format!("DTEND;VALUE=DATE:{}", format_date(end)));
        }
    } else {
        lines.push(format!("DTSTART:{}", format_utc(event.start_date)));
        if let Some(end) = event.end_date {
            lines.push(format!("DTEND:{}", format_utc(end)));
        }
    }

    lines.push(format!("SUMMARY:{}", escape_text(&event.title)));
    if let Some(ref description) = event.description {
        lines.push(format!("DESCRIPTION:{}", escape_text(description)));
    }
    if let Some(ref location) = event.location {
        lines.push(format!("LOCATION:{}", escape_text(location)));
    }
    if let Some(ref url) = event.source_url {
        lines.push(format!("URL:{url}"));
    }

    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());

    let folded: Vec<String> = lines.iter().map(|line| fold_line(line)).collect();
    Ok(folded.join("\r\n"))
}
