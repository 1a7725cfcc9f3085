use crate::channel::ChannelConfiguration;
use crate::error::ChannelError;

/// Rejects a configuration that carries a payload without saying what type it is.
/// Per-channel-type requirements are left to the backend.
pub fn validate_configuration(configuration: &ChannelConfiguration) -> Result<(), ChannelError> {
    if !configuration.payload.is_empty() && configuration.payload_type.is_empty() {
        return Err(ChannelError::ValidationFailure(
            "payload_type is required when using payload".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn with_payload(payload_type: &str) -> ChannelConfiguration {
        let mut configuration = ChannelConfiguration {
            payload_type: payload_type.to_string(),
            ..Default::default()
        };
        configuration
            .payload
            .insert("account".to_string(), json!("$ACCOUNT_ID"));
        configuration
    }

    #[test]
    fn payload_without_type_is_rejected() {
        let err = validate_configuration(&with_payload("")).unwrap_err();
        assert!(matches!(err, ChannelError::ValidationFailure(_)));
        assert_eq!(err.to_string(), "payload_type is required when using payload");
    }

    #[test]
    fn payload_with_type_is_accepted() {
        assert!(validate_configuration(&with_payload("application/json")).is_ok());
    }

    #[test]
    fn type_without_payload_is_accepted() {
        let configuration = ChannelConfiguration {
            payload_type: "application/json".to_string(),
            ..Default::default()
        };
        assert!(validate_configuration(&configuration).is_ok());
        assert!(validate_configuration(&ChannelConfiguration::default()).is_ok());
    }
}
