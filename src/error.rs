use thiserror::Error;

/// Failures the engine reports to callers.
///
/// Parsing never produces one of these — malformed feed input degrades to
/// fewer events. Only programmer-error-class conditions surface here.
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Invalid source configuration: {0}")]
    InvalidSourceConfig(#[from] serde_json::Error),
}
