//! Adapter for events decoded from a calendar feed.

use crate::config::SourceConfig;
use crate::ics::RawEvent;
use crate::timeline::event::{EventMetadata, SourceKind, UnifiedEvent};

/// Map one parsed feed event into the unified shape.
///
/// The raw recurrence rule is copied into metadata for the expander; the
/// event itself stays a single template until expansion runs.
pub fn unify_raw_event(raw: &RawEvent, source: &SourceConfig) -> UnifiedEvent {
    let id = format!("{}-{}", source.id, raw.uid);
    let is_recurring = raw.rrule.is_some();

    UnifiedEvent {
        id: id.clone(),
        source_id: source.id.clone(),
        title: raw.summary.clone(),
        description: raw.description.clone(),
        start_date: raw.start,
        end_date: raw.end,
        is_all_day: raw.is_all_day,
        source_kind: SourceKind::CalendarFeed,
        source_name: source.name.clone(),
        source_url: raw.url.clone(),
        location: raw.location.clone(),
        is_recurring,
        recurrence_anchor_id: is_recurring.then(|| id.clone()),
        metadata: EventMetadata::CalendarFeed {
            original_uid: raw.uid.clone(),
            rrule: raw.rrule.clone(),
            instance_index: None,
        },
    }
}

pub fn unify_raw_events(raw_events: &[RawEvent], source: &SourceConfig) -> Vec<UnifiedEvent> {
    raw_events.iter().map(|raw| unify_raw_event(raw, source)).collect()
}
