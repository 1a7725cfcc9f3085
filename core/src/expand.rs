use serde_json::{Map, Value};

use crate::channel::{Channel, ChannelConfiguration, ChannelLinks, ChannelType};
use crate::encoding::{EncodedField, HEADERS, PAYLOAD};
use crate::error::ChannelError;
use crate::resource::ResourceData;
use crate::validate::validate_configuration;

/// Builds the channel to submit to the backend from the declarative resource.
///
/// Fails before anything is submitted when the `config` block is missing, an
/// encoded field is not valid JSON, or the assembled configuration does not
/// validate.
pub fn expand_channel(store: &impl ResourceData) -> Result<Channel, ChannelError> {
    let block = config_block(store)?;
    let configuration = expand_configuration(&block)?;
    validate_configuration(&configuration)?;

    let name = string_attribute("name", &store.get("name"))?;
    let channel_type: ChannelType = string_attribute("type", &store.get("type"))?.parse()?;

    tracing::debug!(%name, %channel_type, "expanded alert channel");

    Ok(Channel {
        id: 0,
        name,
        channel_type,
        configuration,
        links: ChannelLinks::default(),
    })
}

/// The single `config` block; `[null]` is an empty block.
fn config_block(store: &impl ResourceData) -> Result<Map<String, Value>, ChannelError> {
    let Some(config) = store.get_ok("config") else {
        return Err(ChannelError::MissingRequiredBlock);
    };
    match config {
        Value::Array(mut blocks) => match blocks.swap_remove(0) {
            Value::Object(block) => Ok(block),
            Value::Null => Ok(Map::new()),
            _ => Err(ChannelError::AttributeType {
                attribute: "config.0".to_string(),
                expected: "a map",
            }),
        },
        _ => Err(ChannelError::AttributeType {
            attribute: "config".to_string(),
            expected: "a list with one block",
        }),
    }
}

/// Translates one `config` block. Missing scalars stay empty.
pub fn expand_configuration(
    block: &Map<String, Value>,
) -> Result<ChannelConfiguration, ChannelError> {
    let scalar = |attribute: &str| match block.get(attribute) {
        Some(value) => string_attribute(attribute, value),
        None => Ok(String::new()),
    };

    Ok(ChannelConfiguration {
        api_key: scalar("api_key")?,
        auth_password: scalar("auth_password")?,
        auth_username: scalar("auth_username")?,
        base_url: scalar("base_url")?,
        channel: scalar("channel")?,
        key: scalar("key")?,
        headers: EncodedField::from_attributes(HEADERS, block)?.into_map(HEADERS)?,
        include_json_attachment: scalar("include_json_attachment")?,
        payload: EncodedField::from_attributes(PAYLOAD, block)?.into_map(PAYLOAD)?,
        payload_type: scalar("payload_type")?,
        recipients: scalar("recipients")?,
        region: scalar("region")?,
        route_key: scalar("route_key")?,
        service_key: scalar("service_key")?,
        tags: scalar("tags")?,
        teams: scalar("teams")?,
        url: scalar("url")?,
        user_id: scalar("user_id")?,
    })
}

/// Narrows raw identifier values (e.g. `policy_ids`) to integers.
pub fn expand_channel_ids(values: &[Value]) -> Result<Vec<i64>, ChannelError> {
    values
        .iter()
        .map(|value| {
            value.as_i64().ok_or_else(|| ChannelError::AttributeType {
                attribute: "policy_ids".to_string(),
                expected: "a list of integers",
            })
        })
        .collect()
}

fn string_attribute(attribute: &str, value: &Value) -> Result<String, ChannelError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ChannelError::AttributeType {
            attribute: attribute.to_string(),
            expected: "a string",
        }),
    }
}
