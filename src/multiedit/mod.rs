//! Multi-edit engine: match a span, claim its occurrences, edit them together

pub mod error;
pub mod history;
pub mod occurrences;
pub mod pattern;
pub mod region;
pub mod scope;
pub mod session;
pub mod sync;

pub use error::MultiEditError;
pub use history::HistoryStore;
pub use occurrences::{Direction, OccurrenceIndex, Toggled};
pub use pattern::{derive, DeriveOptions, Pattern, Seed, SeedKind};
pub use region::{BoundaryClaim, Region, RegionId, Span, Tracked};
pub use scope::{resolve, Scope, ScopeSpec};
pub use session::{InsertEntry, Outcome, Session, SessionState};
pub use sync::RegionEdit;
