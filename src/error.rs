//! Error types for graph assembly and rendering

use crate::graph::iso_timestamp_now;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Errors raised while building or rendering a context graph
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A resource or relation was added with a missing or empty required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// The collected metadata violates a structural expectation
    #[error("Topology error: {0}")]
    Topology(String),

    /// The requested output format is not recognized
    #[error("invalid dump() output_format: {0}")]
    InvalidFormat(String),

    /// A metadata source call failed
    #[error("Metadata source error: {0:#}")]
    Source(#[from] anyhow::Error),

    /// The graph could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            GraphError::Validation(_) => "ValidationError",
            GraphError::Topology(_) => "TopologyError",
            GraphError::InvalidFormat(_) => "InvalidFormatError",
            GraphError::Source(_) => "SourceError",
            GraphError::Serialization(_) => "SerializationError",
        }
    }
}

/// Error response in the context graph format
///
/// Its keys are underscore-prefixed so a consumer can tell it apart from a
/// success document by shape alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "_success")]
    pub success: bool,
    #[serde(rename = "_timestamp")]
    pub timestamp: String,
    #[serde(rename = "_error_message")]
    pub error_message: String,
}

impl ErrorEnvelope {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            timestamp: iso_timestamp_now(),
            error_message: error_message.into(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "_success": self.success,
            "_timestamp": self.timestamp,
            "_error_message": self.error_message,
        })
    }

    /// Pretty printed JSON
    pub fn to_output_string(&self) -> String {
        format!("{:#}", self.to_json())
    }
}

impl From<&GraphError> for ErrorEnvelope {
    fn from(err: &GraphError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<GraphError> for ErrorEnvelope {
    fn from(err: GraphError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = GraphError::InvalidFormat("xml".to_string());
        assert_eq!(err.to_string(), "invalid dump() output_format: xml");
        assert_eq!(err.kind(), "InvalidFormatError");

        let err = GraphError::Topology("no host".to_string());
        assert_eq!(err.to_string(), "Topology error: no host");
    }

    #[test]
    fn test_source_error_from_anyhow() {
        let err: GraphError = anyhow::anyhow!("connection refused").into();
        assert_eq!(err.kind(), "SourceError");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_envelope_shape() {
        let envelope = ErrorEnvelope::new("boom");
        let value = envelope.to_json();
        assert_eq!(value["_success"], false);
        assert_eq!(value["_error_message"], "boom");
        assert!(value["_timestamp"].is_string());
        assert!(value.get("success").is_none());

        let round_trip: ErrorEnvelope = serde_json::from_value(value).unwrap();
        assert_eq!(round_trip, envelope);
    }

    #[test]
    fn test_envelope_from_error() {
        let envelope = ErrorEnvelope::from(GraphError::Topology("no host".to_string()));
        assert!(!envelope.success);
        assert_eq!(envelope.error_message, "Topology error: no host");
    }
}
