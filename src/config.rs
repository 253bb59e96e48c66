use serde::Deserialize;

use crate::error::TimelineError;
use crate::timeline::event::SourceKind;

/// Default window for recurrence expansion, in months after "now".
pub const DEFAULT_EXPANSION_MONTHS: u32 = 6;

/// Hard cap on accepted recurrence instances per event.
pub const MAX_RECURRENCE_INSTANCES: u32 = 100;

/// Longest description (in characters) an adapter carries before truncating.
pub const DESCRIPTION_LIMIT: usize = 500;

/// Immutable engine configuration, threaded through the pipeline entry
/// points. Nothing in the engine reads ambient process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub expansion_months: u32,
    pub max_instances: u32,
    pub description_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expansion_months: DEFAULT_EXPANSION_MONTHS,
            max_instances: MAX_RECURRENCE_INSTANCES,
            description_limit: DESCRIPTION_LIMIT,
        }
    }
}

/// One configured event source.
///
/// `url` is the feed location for calendar sources and the governance space
/// id for proposal sources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub name: String,
    pub enabled: bool,
    pub url: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Decode a JSON array of source configurations, keeping enabled entries.
/// The caller owns reading the JSON from wherever it lives (environment,
/// file); undecodable input is a configuration error, not a parse-leniency
/// case.
pub fn sources_from_json(json: &str) -> Result<Vec<SourceConfig>, TimelineError> {
    let sources: Vec<SourceConfig> = serde_json::from_str(json)?;
    Ok(sources.into_iter().filter(|s| s.enabled).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_matches_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.expansion_months, DEFAULT_EXPANSION_MONTHS);
        assert_eq!(config.max_instances, MAX_RECURRENCE_INSTANCES);
        assert_eq!(config.description_limit, DESCRIPTION_LIMIT);
    }

    #[test]
    fn decodes_sources_and_keeps_enabled() {
        let json = r#"[
            {"id": "main-calendar", "type": "calendar-feed", "name": "Community Calendar", "enabled": true, "url": "https://example.com/feed.ics", "color": "primary"},
            {"id": "gov", "type": "proposal-timeline", "name": "Governance", "enabled": false, "url": "mainnet.example.eth"}
        ]"#;

        let sources = sources_from_json(json).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, "main-calendar");
        assert_eq!(sources[0].kind, SourceKind::CalendarFeed);
        assert_eq!(sources[0].color.as_deref(), Some("primary"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(sources_from_json("not json").is_err());
        assert!(sources_from_json(r#"[{"id": "x"}]"#).is_err());
    }
}
