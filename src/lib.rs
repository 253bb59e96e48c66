//! Calendar event unification and expansion engine.
//!
//! Aggregates heterogeneous calendar-like data — iCalendar feeds, governance
//! proposal timelines, AI-extracted milestones — into one chronologically
//! ordered view. The pieces:
//!
//! - [`ics`]: a lenient parser for the textual calendar format and an
//!   exporter back to it,
//! - [`recurrence`]: bounded expansion of recurring events into concrete
//!   instances,
//! - [`sources`]: adapters from origin-specific records to the unified shape,
//! - [`timeline`]: the pure merge/dedupe/filter/sort/group pipeline.
//!
//! Everything is synchronous and side-effect free. Fetching feed text or API
//! records is the caller's concern, and "now" is passed explicitly into
//! every entry point that needs it so one pipeline run is internally
//! consistent.

pub mod config;
pub mod error;
pub mod ics;
pub mod recurrence;
pub mod sources;
pub mod timeline;

pub use config::{EngineConfig, SourceConfig};
pub use error::TimelineError;
pub use recurrence::{Frequency, RecurrenceRule};
pub use timeline::event::{
    EventMetadata, SerializedEvent, SourceKind, UnifiedEvent,
};
pub use timeline::{EventGroup, TimelineFilters};
