//! Context graph model and encoders
//!
//! The [`ContextGraph`] holds the resources and relations discovered in a
//! cluster and can be dumped as DOT, as a full `context_graph` document or as
//! a `resources` document.

mod format;
mod label;
mod render;
mod store;

pub use format::OutputFormat;
pub use label::{ALTERNATE_LABEL_KEY, LABEL_KEY, Labeled, UNKNOWN_LABEL, best_label};
pub use render::{ContextGraphDocument, RenderOptions, Rendered};
pub use store::{CREATED_BY_KEY, ContextGraph, Relation, RelationAnnotations, Resource};

/// Current time as an ISO-8601 string
pub fn iso_timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
