use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::ChannelError;

/// A notification channel as the alerting backend stores it.
/// Sensitive configuration values are never echoed back on read; see [`SENSITIVE_FIELDS`].
///
/// [`SENSITIVE_FIELDS`]: crate::reconcile::SENSITIVE_FIELDS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Channel {
    /// Backend identifier (0 until the channel has been created)
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    #[serde(default)]
    pub configuration: ChannelConfiguration,
    #[serde(default)]
    pub links: ChannelLinks,
}

/// Delivery mechanism of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Email,
    OpsGenie,
    PagerDuty,
    Slack,
    User,
    VictorOps,
    Webhook,
}

impl ChannelType {
    pub const ALL: [ChannelType; 7] = [
        ChannelType::Email,
        ChannelType::OpsGenie,
        ChannelType::PagerDuty,
        ChannelType::Slack,
        ChannelType::User,
        ChannelType::VictorOps,
        ChannelType::Webhook,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChannelType::Email => "email",
            ChannelType::OpsGenie => "opsgenie",
            ChannelType::PagerDuty => "pagerduty",
            ChannelType::Slack => "slack",
            ChannelType::User => "user",
            ChannelType::VictorOps => "victorops",
            ChannelType::Webhook => "webhook",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ChannelError::UnknownChannelType(s.to_string()))
    }
}

/// Per-type settings of a channel. Every field is optional on the wire; an
/// empty string means "not set". `headers` and `payload` are always native
/// JSON objects here, whatever encoding the user chose declaratively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ChannelConfiguration {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub auth_password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub auth_username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    #[schema(value_type = Object)]
    pub headers: Map<String, Value>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub include_json_attachment: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    #[schema(value_type = Object)]
    pub payload: Map<String, Value>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payload_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub recipients: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub route_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub teams: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_id: String,
}

/// Alert policies a channel is attached to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChannelLinks {
    #[serde(default)]
    pub policy_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn channel_type_parses_every_known_name() {
        for t in ChannelType::ALL {
            assert_eq!(t.as_str().parse::<ChannelType>().unwrap(), t);
        }
    }

    #[test]
    fn channel_type_rejects_unknown_name() {
        let err = "carrier_pigeon".parse::<ChannelType>().unwrap_err();
        assert!(matches!(err, ChannelError::UnknownChannelType(ref s) if s == "carrier_pigeon"));
    }

    #[test]
    fn channel_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ChannelType::PagerDuty).unwrap(), json!("pagerduty"));
        assert_eq!(ChannelType::OpsGenie.to_string(), "opsgenie");
    }

    #[test]
    fn backend_read_deserializes_with_redacted_fields_missing() {
        let channel: Channel = serde_json::from_value(json!({
            "id": 42,
            "name": "ops-webhook",
            "type": "webhook",
            "configuration": {
                "base_url": "https://hooks.example.com",
                "headers": {"x-team": "ops"}
            },
            "links": {"policy_ids": [7, 9]}
        }))
        .unwrap();

        assert_eq!(channel.id, 42);
        assert_eq!(channel.channel_type, ChannelType::Webhook);
        assert_eq!(channel.configuration.base_url, "https://hooks.example.com");
        assert_eq!(channel.configuration.headers["x-team"], json!("ops"));
        assert!(channel.configuration.api_key.is_empty());
        assert_eq!(channel.links.policy_ids, vec![7, 9]);
    }

    #[test]
    fn empty_configuration_fields_are_not_serialized() {
        let config = ChannelConfiguration {
            recipients: "ops@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"recipients": "ops@example.com"})
        );
    }
}
