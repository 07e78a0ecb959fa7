//! Calendar feed lookups and the embeds built from them.

mod actor;
pub mod embeds;
pub mod feed;
mod handle;
pub mod models;
pub mod selection;
pub mod time;

pub use handle::{FeedHandle, PlanningSource};
pub use models::{EmbedField, EmbedPayload, PlanningEvent};
pub use selection::{ReactionEvent, SelectionOutcome, SelectionSession};
