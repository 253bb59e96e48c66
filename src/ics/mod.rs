//! Parser for the textual calendar format (RFC 5545 subset).
//!
//! Parsing is deliberately lenient: structurally invalid input degrades to
//! fewer extracted events, never a raised failure. A property line without a
//! colon is dropped, a block missing `UID` or a decodable `DTSTART` is
//! dropped, an unterminated block is dropped. Every silent drop is counted
//! in [`ParseStats`] for callers that want to observe them.

pub mod components;
pub mod export;
pub mod text;
pub mod values;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use text::ContentLine;

/// Title used when a block carries no `SUMMARY`.
pub const UNTITLED_EVENT: &str = "Untitled Event";

/// One decoded `VEVENT` block, before source adaptation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub url: Option<String>,
    /// Raw recurrence rule, verbatim.
    pub rrule: Option<String>,
    pub is_all_day: bool,
}

/// Counters for input the parser silently dropped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub lines_without_colon: usize,
    pub unterminated_blocks: usize,
    pub blocks_missing_uid: usize,
    pub blocks_missing_start: usize,
}

/// Parse a calendar document into raw events, discarding diagnostics.
pub fn parse_events(content: &str) -> Vec<RawEvent> {
    parse_events_with_stats(content).0
}

/// Parse a calendar document, also reporting what was dropped.
pub fn parse_events_with_stats(content: &str) -> (Vec<RawEvent>, ParseStats) {
    let mut stats = ParseStats::default();
    let unfolded = text::unfold_lines(content);
    let blocks = components::extract_components_counted(&unfolded, "VEVENT", &mut stats);
    let events = blocks
        .iter()
        .filter_map(|block| parse_event_block(block, &mut stats))
        .collect();
    (events, stats)
}

fn parse_event_block(block: &str, stats: &mut ParseStats) -> Option<RawEvent> {
    let mut properties: HashMap<String, ContentLine> = HashMap::new();
    for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let parsed = ContentLine::parse(line);
        if parsed.name.is_empty() {
            stats.lines_without_colon += 1;
            continue;
        }
        // Repeated property names: last occurrence wins.
        properties.insert(parsed.name.clone(), parsed);
    }

    let Some(uid) = non_empty(&properties, "UID") else {
        tracing::debug!("event block without UID dropped");
        stats.blocks_missing_uid += 1;
        return None;
    };

    let Some((start, is_all_day)) = properties
        .get("DTSTART")
        .and_then(|p| values::decode_date(&p.value, &p.params))
    else {
        tracing::debug!(%uid, "event block without usable DTSTART dropped");
        stats.blocks_missing_start += 1;
        return None;
    };

    // DTEND wins over DURATION when both are present.
    let end = match properties.get("DTEND") {
        Some(p) => values::decode_date(&p.value, &p.params).map(|(dt, _)| dt),
        None => properties
            .get("DURATION")
            .map(|p| values::decode_duration(start, &p.value)),
    };

    let summary = non_empty(&properties, "SUMMARY")
        .map(|s| text::unescape_text(&s))
        .unwrap_or_else(|| UNTITLED_EVENT.to_string());

    Some(RawEvent {
        uid,
        summary,
        description: non_empty(&properties, "DESCRIPTION").map(|s| text::unescape_text(&s)),
        start,
        end,
        location: non_empty(&properties, "LOCATION").map(|s| text::unescape_text(&s)),
        url: non_empty(&properties, "URL"),
        rrule: non_empty(&properties, "RRULE"),
        is_all_day,
    })
}

fn non_empty(properties: &HashMap<String, ContentLine>, name: &str) -> Option<String> {
    properties
        .get(name)
        .map(|p| p.value.clone())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use pretty_assertions::assert_eq;

    fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn parses_simple_event() {
        let content = "BEGIN:VCALENDAR\r\n\
            VERSION:2.0\r\n\
            PRODID:-//Test//Test//EN\r\n\
            BEGIN:VEVENT\r\n\
            UID:event-123@example.com\r\n\
            DTSTART:20240115T100000Z\r\n\
            DTEND:20240115T110000Z\r\n\
            SUMMARY:Test Event\r\n\
            DESCRIPTION:This is a test event\r\n\
            LOCATION:Conference Room A\r\n\
            END:VEVENT\r\n\
            END:VCALENDAR\r\n";

        let events = parse_events(content);
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.uid, "event-123@example.com");
        assert_eq!(event.summary, "Test Event");
        assert_eq!(event.description.as_deref(), Some("This is a test event"));
        assert_eq!(event.location.as_deref(), Some("Conference Room A"));
        assert!(!event.is_all_day);
        assert_eq!(event.start.hour(), 10);
        assert_eq!(event.end.unwrap().hour(), 11);
    }

    #[test]
    fn parses_all_day_event() {
        let content = "BEGIN:VCALENDAR\n\
            BEGIN:VEVENT\n\
            UID:allday-123\n\
            DTSTART;VALUE=DATE:20240115\n\
            DTEND;VALUE=DATE:20240116\n\
            SUMMARY:All Day Event\n\
            END:VEVENT\n\
            END:VCALENDAR";

        let events = parse_events(content);
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert!(event.is_all_day);
        assert_eq!(event.summary, "All Day Event");
        assert_eq!(event.start, utc(2024, 1, 15, 0));
        assert_eq!(event.end, Some(utc(2024, 1, 16, 0)));
    }

    #[test]
    fn keeps_rrule_verbatim() {
        let content = "BEGIN:VCALENDAR\n\
            BEGIN:VEVENT\n\
            UID:recurring-123\n\
            DTSTART:20240115T100000Z\n\
            DTEND:20240115T110000Z\n\
            SUMMARY:Weekly Meeting\n\
            RRULE:FREQ=WEEKLY;BYDAY=MO;COUNT=10\n\
            END:VEVENT\n\
            END:VCALENDAR";

        let events = parse_events(content);
        assert_eq!(events[0].rrule.as_deref(), Some("FREQ=WEEKLY;BYDAY=MO;COUNT=10"));
    }

    #[test]
    fn unescapes_text_properties() {
        let content = "BEGIN:VCALENDAR\n\
            BEGIN:VEVENT\n\
            UID:escaped-123\n\
            DTSTART:20240115T100000Z\n\
            SUMMARY:Event with special chars\n\
            DESCRIPTION:Line 1\\nLine 2\\, with comma\\; and semicolon\n\
            END:VEVENT\n\
            END:VCALENDAR";

        let events = parse_events(content);
        assert_eq!(
            events[0].description.as_deref(),
            Some("Line 1\nLine 2, with comma; and semicolon")
        );
    }

    #[test]
    fn unfolds_before_splitting_properties() {
        let content = "BEGIN:VCALENDAR\r\n\
            BEGIN:VEVENT\r\n\
            UID:folded-123\r\n\
            DTSTART:20240115T100000Z\r\n\
            SUMMARY:A summary that was\r\n folded across two lines\r\n\
            END:VEVENT\r\n\
            END:VCALENDAR";

        let events = parse_events(content);
        assert_eq!(events[0].summary, "A summary that wasfolded across two lines");
    }

    #[test]
    fn parses_url_property() {
        let content = "BEGIN:VCALENDAR\n\
            BEGIN:VEVENT\n\
            UID:url-123\n\
            DTSTART:20240115T100000Z\n\
            SUMMARY:Event with URL\n\
            URL:https://example.com/event\n\
            END:VEVENT\n\
            END:VCALENDAR";

        let events = parse_events(content);
        assert_eq!(events[0].url.as_deref(), Some("https://example.com/event"));
    }

    #[test]
    fn parses_multiple_events() {
        let content = "BEGIN:VCALENDAR\n\
            BEGIN:VEVENT\nUID:event-1\nDTSTART:20240115T100000Z\nSUMMARY:Event 1\nEND:VEVENT\n\
            BEGIN:VEVENT\nUID:event-2\nDTSTART:20240116T100000Z\nSUMMARY:Event 2\nEND:VEVENT\n\
            BEGIN:VEVENT\nUID:event-3\nDTSTART:20240117T100000Z\nSUMMARY:Event 3\nEND:VEVENT\n\
            END:VCALENDAR";

        let events = parse_events(content);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].uid, "event-1");
        assert_eq!(events[1].uid, "event-2");
        assert_eq!(events[2].uid, "event-3");
    }

    #[test]
    fn drops_block_without_uid() {
        let content = "BEGIN:VCALENDAR\n\
            BEGIN:VEVENT\nDTSTART:20240115T100000Z\nSUMMARY:No UID\nEND:VEVENT\n\
            BEGIN:VEVENT\nUID:valid-event\nDTSTART:20240116T100000Z\nSUMMARY:Valid\nEND:VEVENT\n\
            END:VCALENDAR";

        let (events, stats) = parse_events_with_stats(content);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid, "valid-event");
        assert_eq!(stats.blocks_missing_uid, 1);
    }

    #[test]
    fn drops_block_without_usable_dtstart() {
        let content = "BEGIN:VCALENDAR\n\
            BEGIN:VEVENT\nUID:no-start\nSUMMARY:Missing\nEND:VEVENT\n\
            BEGIN:VEVENT\nUID:bad-start\nDTSTART:whenever\nSUMMARY:Garbage\nEND:VEVENT\n\
            END:VCALENDAR";

        let (events, stats) = parse_events_with_stats(content);
        assert!(events.is_empty());
        assert_eq!(stats.blocks_missing_start, 2);
    }

    #[test]
    fn missing_summary_gets_placeholder() {
        let content = "BEGIN:VEVENT\nUID:untitled\nDTSTART:20240115T100000Z\nEND:VEVENT";
        let events = parse_events(content);
        assert_eq!(events[0].summary, UNTITLED_EVENT);
    }

    #[test]
    fn repeated_property_last_wins() {
        let content = "BEGIN:VEVENT\n\
            UID:repeat\n\
            DTSTART:20240115T100000Z\n\
            SUMMARY:First\n\
            SUMMARY:Second\n\
            END:VEVENT";
        let events = parse_events(content);
        assert_eq!(events[0].summary, "Second");
    }

    #[test]
    fn dtend_preferred_over_duration() {
        let content = "BEGIN:VEVENT\n\
            UID:both\n\
            DTSTART:20240115T100000Z\n\
            DTEND:20240115T120000Z\n\
            DURATION:PT1H\n\
            END:VEVENT";
        let events = parse_events(content);
        assert_eq!(events[0].end, Some(utc(2024, 1, 15, 12)));
    }

    #[test]
    fn duration_substitutes_for_missing_dtend() {
        let content = "BEGIN:VEVENT\n\
            UID:duration\n\
            DTSTART:20240115T100000Z\n\
            DURATION:PT1H30M\n\
            END:VEVENT";
        let events = parse_events(content);
        assert_eq!(events[0].end.unwrap().hour(), 11);
        assert_eq!(events[0].end.unwrap().minute(), 30);
    }

    #[test]
    fn malformed_duration_yields_zero_length_event() {
        let content = "BEGIN:VEVENT\n\
            UID:zero\n\
            DTSTART:20240115T100000Z\n\
            DURATION:about an hour\n\
            END:VEVENT";
        let events = parse_events(content);
        assert_eq!(events[0].end, Some(events[0].start));
    }

    #[test]
    fn counts_lines_without_colon() {
        let content = "BEGIN:VEVENT\n\
            UID:diag\n\
            DTSTART:20240115T100000Z\n\
            this line has no separator\n\
            END:VEVENT";
        let (events, stats) = parse_events_with_stats(content);
        assert_eq!(events.len(), 1);
        assert_eq!(stats.lines_without_colon, 1);
    }

    #[test]
    fn empty_input_is_fine() {
        let (events, stats) = parse_events_with_stats("");
        assert!(events.is_empty());
        assert_eq!(stats, ParseStats::default());
    }
}
