use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Origin class of a unified event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SourceKind {
    CalendarFeed,
    ProposalTimeline,
    AiDerived,
}

/// Confidence the extraction service attached to an AI-derived date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DateConfidence {
    High,
    Medium,
    Low,
}

/// Category assigned to an AI-derived event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AiEventType {
    Milestone,
    Deadline,
    Launch,
    Meeting,
    Other,
}

/// Source-specific extras, tagged by origin so each adapter's fields stay
/// strongly typed instead of living in an open map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EventMetadata {
    #[serde(rename_all = "camelCase")]
    CalendarFeed {
        original_uid: String,
        /// Raw recurrence rule string as it appeared in the feed.
        rrule: Option<String>,
        /// Set by the expander on generated instances.
        instance_index: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    ProposalTimeline {
        state: String,
        /// Unix seconds the proposal was created.
        created: i64,
        space_id: String,
    },
    #[serde(rename_all = "camelCase")]
    AiDerived {
        source_proposal_id: String,
        source_proposal_title: String,
        excerpt: String,
        confidence: DateConfidence,
        event_type: AiEventType,
    },
}

/// Canonical representation of one calendar occurrence, regardless of origin.
///
/// `end_date`, when present, is never before `start_date`. A recurring event
/// is a template: the expander replaces it with concrete instances before
/// anything is displayed, and instances are never merged back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedEvent {
    pub id: String,
    pub source_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    pub source_kind: SourceKind,
    pub source_name: String,
    pub source_url: Option<String>,
    pub location: Option<String>,
    pub is_recurring: bool,
    /// Shared by all instances of one recurring series.
    pub recurrence_anchor_id: Option<String>,
    pub metadata: EventMetadata,
}

/// Transport form of [`UnifiedEvent`] with fixed-format date strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedEvent {
    pub id: String,
    pub source_id: String,
    pub title: String,
    pub description: Option<String>,
    /// RFC 3339 with milliseconds, always UTC.
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_all_day: bool,
    pub source_kind: SourceKind,
    pub source_name: String,
    pub source_url: Option<String>,
    pub location: Option<String>,
    pub is_recurring: bool,
    pub recurrence_anchor_id: Option<String>,
    pub metadata: EventMetadata,
}

impl SerializedEvent {
    pub fn from_event(event: &UnifiedEvent) -> Self {
        Self {
            id: event.id.clone(),
            source_id: event.source_id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            start_date: format_instant(event.start_date),
            end_date: event.end_date.map(format_instant),
            is_all_day: event.is_all_day,
            source_kind: event.source_kind,
            source_name: event.source_name.clone(),
            source_url: event.source_url.clone(),
            location: event.location.clone(),
            is_recurring: event.is_recurring,
            recurrence_anchor_id: event.recurrence_anchor_id.clone(),
            metadata: event.metadata.clone(),
        }
    }

    /// Inverse of [`from_event`](Self::from_event). Returns `None` when a
    /// date string does not decode.
    pub fn into_event(self) -> Option<UnifiedEvent> {
        let start_date = parse_instant(&self.start_date)?;
        let end_date = match self.end_date {
            Some(ref s) => Some(parse_instant(s)?),
            None => None,
        };
        Some(UnifiedEvent {
            id: self.id,
            source_id: self.source_id,
            title: self.title,
            description: self.description,
            start_date,
            end_date,
            is_all_day: self.is_all_day,
            source_kind: self.source_kind,
            source_name: self.source_name,
            source_url: self.source_url,
            location: self.location,
            is_recurring: self.is_recurring,
            recurrence_anchor_id: self.recurrence_anchor_id,
            metadata: self.metadata,
        })
    }
}

fn format_instant(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Serialize a batch for transport to the rendering layer.
pub fn serialize_events(events: &[UnifiedEvent]) -> Vec<SerializedEvent> {
    events.iter().map(SerializedEvent::from_event).collect()
}
