//! The aggregation pipeline: merge, dedupe, filter, sort, and group.
//!
//! Every stage is a pure transformation over a list of events. "now" is read
//! once by the caller and threaded through explicitly so a single pass is
//! internally consistent.

pub mod event;
pub mod time_utils;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use event::UnifiedEvent;
use time_utils::{date_label, is_past, is_same_day, start_of_day};

/// Query over the merged timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineFilters {
    /// Source ids to keep; empty keeps everything.
    pub source_ids: Vec<String>,
    /// Inclusive bounds on event start.
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Keep events that started before today.
    pub include_past: bool,
}

/// One display row: every event starting on the same calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGroup {
    /// The day, normalized to midnight.
    pub date: DateTime<Utc>,
    /// "Today", "Tomorrow", or a full date string.
    pub label: String,
    /// Ascending by start time.
    pub events: Vec<UnifiedEvent>,
}

/// Flatten per-source lists into one. Source order defines the tie-break
/// order for equal timestamps downstream.
pub fn merge_events(per_source: Vec<Vec<UnifiedEvent>>) -> Vec<UnifiedEvent> {
    per_source.into_iter().flatten().collect()
}

/// Keep the first occurrence of each id. Stable and idempotent.
pub fn dedupe_events(events: Vec<UnifiedEvent>) -> Vec<UnifiedEvent> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|event| seen.insert(event.id.clone()))
        .collect()
}

/// Apply source, date-range, and past-event filters.
pub fn apply_filters(
    events: Vec<UnifiedEvent>,
    filters: &TimelineFilters,
    now: DateTime<Utc>,
) -> Vec<UnifiedEvent> {
    events
        .into_iter()
        .filter(|event| {
            filters.source_ids.is_empty() || filters.source_ids.contains(&event.source_id)
        })
        .filter(|event| filters.start_date.is_none_or(|start| event.start_date >= start))
        .filter(|event| filters.end_date.is_none_or(|end| event.start_date <= end))
        .filter(|event| filters.include_past || !is_past(event.start_date, now))
        .collect()
}

/// Stable ascending sort by start; equal starts keep their input order.
pub fn sort_events(mut events: Vec<UnifiedEvent>) -> Vec<UnifiedEvent> {
    events.sort_by_key(|event| event.start_date);
    events
}

/// Bucket sorted events by calendar day, labelling each group.
pub fn group_by_day(events: Vec<UnifiedEvent>, now: DateTime<Utc>) -> Vec<EventGroup> {
    let sorted = sort_events(events);
    let mut groups: Vec<EventGroup> = Vec::new();
    for event in sorted {
        let day = start_of_day(event.start_date);
        match groups.last_mut() {
            Some(group) if is_same_day(group.date, day) => group.events.push(event),
            _ => groups.push(EventGroup {
                date: day,
                label: date_label(day, now),
                events: vec![event],
            }),
        }
    }
    groups
}

/// Full pipeline over an already-merged list: dedupe, filter, sort, group.
pub fn process_events(
    events: Vec<UnifiedEvent>,
    filters: &TimelineFilters,
    now: DateTime<Utc>,
) -> Vec<EventGroup> {
    let deduped = dedupe_events(events);
    let filtered = apply_filters(deduped, filters, now);
    tracing::debug!(count = filtered.len(), "events after filtering");
    group_by_day(filtered, now)
}
