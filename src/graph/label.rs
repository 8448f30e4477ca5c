//! Human-readable label selection
//!
//! Raw identifiers reported by Docker and Kubernetes are frequently hexadecimal
//! hashes. When both a `label` and an `alternateLabel` are available we prefer
//! whichever one reads like a name.

use serde_json::{Map, Value};

/// Annotation key holding the display label
pub const LABEL_KEY: &str = "label";
/// Annotation key holding the secondary display label
pub const ALTERNATE_LABEL_KEY: &str = "alternateLabel";

/// Label returned when an entity carries no usable label at all
pub const UNKNOWN_LABEL: &str = "<unknown>";

/// An entity whose annotations may carry `label` and `alternateLabel`
pub trait Labeled {
    /// The `label` annotation, if present and a string
    fn label(&self) -> Option<&str>;

    /// The `alternateLabel` annotation, if present and a string
    fn alternate_label(&self) -> Option<&str> {
        None
    }
}

impl Labeled for Map<String, Value> {
    fn label(&self) -> Option<&str> {
        self.get(LABEL_KEY).and_then(Value::as_str)
    }

    fn alternate_label(&self) -> Option<&str> {
        self.get(ALTERNATE_LABEL_KEY).and_then(Value::as_str)
    }
}

/// Returns the best human-readable label of the given entity
///
/// Priority order, first match wins:
/// 1. `alternateLabel` if it is not purely hexadecimal
/// 2. `label` if it is not purely hexadecimal
/// 3. `alternateLabel`
/// 4. `label`
/// 5. [`UNKNOWN_LABEL`]
///
/// Empty strings never qualify.
pub fn best_label<T: Labeled + ?Sized>(entity: &T) -> String {
    let alternate = entity.alternate_label().filter(|s| !s.is_empty());
    let label = entity.label().filter(|s| !s.is_empty());

    [
        alternate.filter(|s| has_non_hex(s)),
        label.filter(|s| has_non_hex(s)),
        alternate,
        label,
    ]
    .into_iter()
    .flatten()
    .next()
    .unwrap_or(UNKNOWN_LABEL)
    .to_string()
}

fn has_non_hex(s: &str) -> bool {
    s.chars().any(|c| !c.is_ascii_hexdigit())
}
