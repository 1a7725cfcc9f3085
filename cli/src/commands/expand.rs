use alertchan_core::{MemoryResource, expand_channel};

use crate::util::{channel_error, exit_error, print_json, read_json_from_file};

/// Reads a declarative resource (`{"name", "type", "config": [{...}]}`, or the
/// full `{"attributes": ...}` document) and prints the channel to submit.
pub fn run(file: &str, compact: bool) -> i32 {
    let raw: serde_json::Value = match read_json_from_file(file) {
        Ok(v) => v,
        Err(e) => {
            return exit_error(
                &e,
                Some("Pass the resource as JSON, e.g. {\"name\": ..., \"type\": ..., \"config\": [{...}]}"),
            );
        }
    };
    let resource = match load_resource(raw) {
        Ok(r) => r,
        Err(e) => return exit_error(&e, None),
    };

    match expand_channel(&resource) {
        Ok(channel) => {
            tracing::info!(name = %channel.name, channel_type = %channel.channel_type, "expanded channel");
            print_json(&channel, compact)
        }
        Err(e) => channel_error(&e),
    }
}

/// Accepts either the bare attribute object or a serialized [`MemoryResource`].
/// A document with an `attributes` key must be a valid [`MemoryResource`].
pub fn load_resource(raw: serde_json::Value) -> Result<MemoryResource, String> {
    if raw.get("attributes").is_some() {
        return serde_json::from_value::<MemoryResource>(raw)
            .map_err(|e| format!("Invalid resource document: {e}"));
    }
    Ok(MemoryResource::from_attributes(raw))
}

#[cfg(test)]
mod tests {
    use alertchan_core::ResourceData;
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_attributes_are_wrapped() {
        let resource = load_resource(json!({"name": "ops", "config": [{}]})).unwrap();
        assert_eq!(resource.get("name"), json!("ops"));
        assert!(resource.state.is_empty());
    }

    #[test]
    fn full_document_keeps_state() {
        let resource = load_resource(json!({
            "id": "7",
            "attributes": {"name": "ops"},
            "state": {"config": "1"}
        }))
        .unwrap();
        assert_eq!(resource.id.as_deref(), Some("7"));
        assert_eq!(resource.get("name"), json!("ops"));
        assert_eq!(resource.state.get("config").map(String::as_str), Some("1"));
    }

    #[test]
    fn malformed_document_is_rejected_not_treated_as_attributes() {
        let err = load_resource(json!({
            "attributes": {"config": [{"headers_string": "{\"a\":\"b\"}"}]},
            "state": {"config": 1}
        }))
        .unwrap_err();
        assert!(err.starts_with("Invalid resource document"));
    }
}
