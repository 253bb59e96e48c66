//! Adapter for governance proposal timelines.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::{EngineConfig, SourceConfig};
use crate::timeline::event::{EventMetadata, SourceKind, UnifiedEvent};

use super::truncate_description;

/// One proposal as returned by the voting platform's API. Timestamps are
/// unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProposalRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub created: i64,
    pub start: i64,
    pub end: i64,
    pub state: String,
    #[serde(default)]
    pub link: String,
}

/// Map one proposal's voting window onto the timeline.
///
/// The source's configured `url` holds the governance space id, which also
/// feeds the fallback link when the record carries none.
pub fn unify_proposal(
    proposal: &ProposalRecord,
    source: &SourceConfig,
    config: &EngineConfig,
) -> UnifiedEvent {
    let space_id = source.url.clone();
    let source_url = if proposal.link.is_empty() {
        format!("https://snapshot.org/#/{}/proposal/{}", space_id, proposal.id)
    } else {
        proposal.link.clone()
    };

    let start_date = timestamp(proposal.start);
    let end_date = Some(timestamp(proposal.end)).filter(|end| *end >= start_date);

    UnifiedEvent {
        id: format!("{}-{}", source.id, proposal.id),
        source_id: source.id.clone(),
        title: proposal.title.clone(),
        description: truncate_description(&proposal.body, config.description_limit),
        start_date,
        end_date,
        is_all_day: false,
        source_kind: SourceKind::ProposalTimeline,
        source_name: source.name.clone(),
        source_url: Some(source_url),
        location: None,
        is_recurring: false,
        recurrence_anchor_id: None,
        metadata: EventMetadata::ProposalTimeline {
            state: proposal.state.clone(),
            created: proposal.created,
            space_id,
        },
    }
}

pub fn unify_proposals(
    proposals: &[ProposalRecord],
    source: &SourceConfig,
    config: &EngineConfig,
) -> Vec<UnifiedEvent> {
    proposals
        .iter()
        .map(|proposal| unify_proposal(proposal, source, config))
        .collect()
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}
