use serde::Serialize;
use utoipa::ToSchema;

/// A write into the declarative store was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot set attribute '{attribute}': {message}")]
pub struct StoreError {
    pub attribute: String,
    pub message: String,
}

impl StoreError {
    pub fn new(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

/// Everything that can go wrong while expanding or flattening a channel.
/// Nothing in the core retries or swallows these; they go straight back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// `expand` was handed a resource without a `config` block.
    #[error("alert channel requires a config")]
    MissingRequiredBlock,

    /// A `*_string` attribute did not hold a JSON object, or a map could not be re-encoded.
    #[error("malformed JSON in '{field}': {source}")]
    MalformedEncodedField {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// Cross-field rule violated on the assembled configuration.
    #[error("{0}")]
    ValidationFailure(String),

    #[error(transparent)]
    AccessorWrite(#[from] StoreError),

    /// An attribute held a value of the wrong JSON type.
    #[error("attribute '{attribute}' must be {expected}")]
    AttributeType {
        attribute: String,
        expected: &'static str,
    },

    #[error("unknown channel type '{0}'")]
    UnknownChannelType(String),
}

/// Structured error report: one JSON object per failure with a stable code, meant to be
/// read by tooling rather than parsed out of a message string.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorReport {
    /// Machine-readable error code (see [`codes`])
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Which attribute caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The value that was received (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
    /// Hint about what the correct input looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used in [`ErrorReport`]
pub mod codes {
    pub const MISSING_REQUIRED_BLOCK: &str = "missing_required_block";
    pub const MALFORMED_ENCODED_FIELD: &str = "malformed_encoded_field";
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const ACCESSOR_WRITE_FAILED: &str = "accessor_write_failed";
    pub const ATTRIBUTE_TYPE: &str = "attribute_type";
    pub const UNKNOWN_CHANNEL_TYPE: &str = "unknown_channel_type";
}

impl From<&ChannelError> for ErrorReport {
    fn from(err: &ChannelError) -> Self {
        let message = err.to_string();
        let (error, field, received, docs_hint) = match err {
            ChannelError::MissingRequiredBlock => (
                codes::MISSING_REQUIRED_BLOCK,
                Some("config".to_string()),
                None,
                Some("Add a single `config` block with the settings for this channel type"),
            ),
            ChannelError::MalformedEncodedField { field, .. } => (
                codes::MALFORMED_ENCODED_FIELD,
                Some(format!("config.0.{field}")),
                None,
                Some("The value must be a JSON object, e.g. {\"key\": \"value\"}"),
            ),
            ChannelError::ValidationFailure(_) => (
                codes::VALIDATION_FAILED,
                Some("config.0.payload_type".to_string()),
                None,
                Some("Set payload_type (e.g. \"application/json\") whenever payload is set"),
            ),
            ChannelError::AccessorWrite(store) => (
                codes::ACCESSOR_WRITE_FAILED,
                Some(store.attribute.clone()),
                None,
                None,
            ),
            ChannelError::AttributeType { attribute, .. } => (
                codes::ATTRIBUTE_TYPE,
                Some(attribute.clone()),
                None,
                None,
            ),
            ChannelError::UnknownChannelType(received) => (
                codes::UNKNOWN_CHANNEL_TYPE,
                Some("type".to_string()),
                Some(serde_json::Value::String(received.clone())),
                Some("One of: email, opsgenie, pagerduty, slack, user, victorops, webhook"),
            ),
        };

        Self {
            error: error.to_string(),
            message,
            field,
            received,
            docs_hint: docs_hint.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_carries_code_and_field() {
        let report = ErrorReport::from(&ChannelError::MissingRequiredBlock);
        assert_eq!(report.error, codes::MISSING_REQUIRED_BLOCK);
        assert_eq!(report.field.as_deref(), Some("config"));
        assert_eq!(report.message, "alert channel requires a config");
    }

    #[test]
    fn report_echoes_unknown_channel_type() {
        let report = ErrorReport::from(&ChannelError::UnknownChannelType("fax".to_string()));
        assert_eq!(report.error, codes::UNKNOWN_CHANNEL_TYPE);
        assert_eq!(report.received, Some(serde_json::json!("fax")));
    }

    #[test]
    fn store_error_converts_transparently() {
        let err: ChannelError = StoreError::new("name", "read-only").into();
        assert_eq!(err.to_string(), "cannot set attribute 'name': read-only");

        let report = ErrorReport::from(&err);
        assert_eq!(report.error, codes::ACCESSOR_WRITE_FAILED);
        assert_eq!(report.field.as_deref(), Some("name"));
    }

    #[test]
    fn report_omits_empty_optionals_when_serialized() {
        let err = ChannelError::AttributeType {
            attribute: "config.0.tags".to_string(),
            expected: "a string",
        };
        let value = serde_json::to_value(ErrorReport::from(&err)).unwrap();
        assert!(value.get("received").is_none());
        assert!(value.get("docs_hint").is_none());
        assert_eq!(value["field"], "config.0.tags");
    }
}
