//! Adapter for events extracted from proposal prose by the AI collaborator.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::SourceConfig;
use crate::timeline::event::{
    AiEventType, DateConfidence, EventMetadata, SourceKind, UnifiedEvent,
};

/// One extracted event, as delivered by the extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiEventRecord {
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub date_confidence: DateConfidence,
    pub description: String,
    pub excerpt: String,
    pub event_type: AiEventType,
    pub source_proposal_id: String,
    pub source_proposal_title: String,
    pub source_proposal_url: String,
}

/// Map one extracted record onto the timeline as an all-day marker.
///
/// `index` is the record's position within its extraction batch and keeps
/// ids unique across several events mined from one proposal. Records whose
/// date does not decode are dropped.
pub fn unify_ai_event(
    record: &AiEventRecord,
    source: &SourceConfig,
    index: usize,
) -> Option<UnifiedEvent> {
    let Ok(date) = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d") else {
        tracing::debug!(date = %record.date, "extracted record with undecodable date dropped");
        return None;
    };

    Some(UnifiedEvent {
        id: format!("{}-{}-{}", source.id, record.source_proposal_id, index),
        source_id: source.id.clone(),
        title: record.title.clone(),
        description: Some(record.description.clone()).filter(|d| !d.is_empty()),
        start_date: date.and_hms_opt(0, 0, 0)?.and_utc(),
        end_date: None,
        is_all_day: true,
        source_kind: SourceKind::AiDerived,
        source_name: source.name.clone(),
        source_url: Some(record.source_proposal_url.clone()).filter(|u| !u.is_empty()),
        location: None,
        is_recurring: false,
        recurrence_anchor_id: None,
        metadata: EventMetadata::AiDerived {
            source_proposal_id: record.source_proposal_id.clone(),
            source_proposal_title: record.source_proposal_title.clone(),
            excerpt: record.excerpt.clone(),
            confidence: record.date_confidence,
            event_type: record.event_type,
        },
    })
}

pub fn unify_ai_events(records: &[AiEventRecord], source: &SourceConfig) -> Vec<UnifiedEvent> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| unify_ai_event(record, source, index))
        .collect()
}
