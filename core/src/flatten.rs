use serde_json::{Map, Value};

use crate::channel::{Channel, ChannelConfiguration};
use crate::encoding::{Authored, DualField, Encoding, HEADERS, PAYLOAD, encode_map, select_encoding};
use crate::error::ChannelError;
use crate::reconcile::reconcile_sensitive;
use crate::resource::{ImportState, ResourceData};

/// Read path that also owns the identifier: writes the channel and the
/// attached policy ids, then sets the resource id. The config block is
/// computed and every attribute write accepted before the id changes, so a
/// failed call leaves the id as it was.
pub fn flatten_channel_data_source(
    channel: &Channel,
    store: &mut impl ResourceData,
    import_state: ImportState,
) -> Result<(), ChannelError> {
    let config = flatten_configuration(&channel.configuration, &*store, import_state)?;

    store.set("policy_ids", Value::from(channel.links.policy_ids.clone()))?;
    write_channel(channel, store, config)?;
    store.set_id(channel.id.to_string());

    Ok(())
}

/// Writes `name`, `type` and `config` from a backend channel into the store.
pub fn flatten_channel(
    channel: &Channel,
    store: &mut impl ResourceData,
    import_state: ImportState,
) -> Result<(), ChannelError> {
    let config = flatten_configuration(&channel.configuration, &*store, import_state)?;
    write_channel(channel, store, config)
}

fn write_channel(
    channel: &Channel,
    store: &mut impl ResourceData,
    config: Vec<Value>,
) -> Result<(), ChannelError> {
    store.set("name", Value::String(channel.name.clone()))?;
    store.set("type", Value::String(channel.channel_type.to_string()))?;
    store.set("config", Value::Array(config))?;
    Ok(())
}

/// Rebuilds the declarative `config` block from a backend configuration.
///
/// Redacted secrets are taken from what the user authored, and each
/// dual-encoded field is written back in the encoding the user chose (the
/// native map on import, unless a string form is already authored). The
/// block is returned as a one-element list, the shape `config` has in the
/// store.
pub fn flatten_configuration(
    configuration: &ChannelConfiguration,
    store: &impl ResourceData,
    import_state: ImportState,
) -> Result<Vec<Value>, ChannelError> {
    let mut result = Map::new();
    reconcile_sensitive(&mut result, configuration, store);

    let scalars = [
        ("auth_username", &configuration.auth_username),
        ("base_url", &configuration.base_url),
        ("channel", &configuration.channel),
        ("include_json_attachment", &configuration.include_json_attachment),
        ("payload_type", &configuration.payload_type),
        ("recipients", &configuration.recipients),
        ("region", &configuration.region),
        ("route_key", &configuration.route_key),
        ("tags", &configuration.tags),
        ("teams", &configuration.teams),
        ("user_id", &configuration.user_id),
    ];
    for (attribute, value) in scalars {
        result.insert(attribute.to_string(), Value::String(value.clone()));
    }

    write_dual_field(&mut result, HEADERS, &configuration.headers, store, import_state)?;
    write_dual_field(&mut result, PAYLOAD, &configuration.payload, store, import_state)?;

    Ok(vec![Value::Object(result)])
}

fn write_dual_field(
    result: &mut Map<String, Value>,
    field: DualField,
    map: &Map<String, Value>,
    store: &impl ResourceData,
    import_state: ImportState,
) -> Result<(), ChannelError> {
    let authored = Authored::probe(store, field);
    let encoding = select_encoding(authored, import_state);

    tracing::debug!(
        field = field.native,
        native_authored = authored.native,
        encoded_authored = authored.encoded,
        import = import_state.is_import(),
        ?encoding,
        "selected encoding"
    );

    match encoding {
        Some(Encoding::Native) => {
            result.insert(field.native.to_string(), Value::Object(map.clone()));
        }
        Some(Encoding::Encoded) => {
            let encoded = encode_map(field.encoded, map)?;
            result.insert(field.encoded.to_string(), Value::String(encoded));
        }
        None => {}
    }
    Ok(())
}
