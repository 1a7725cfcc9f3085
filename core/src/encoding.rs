//! Fields that can be authored either as a native map or as a JSON string.
//!
//! `headers` may be given as `headers` (a map) or `headers_string` (the same
//! map JSON-encoded); `payload` likewise. The backend only knows the map form,
//! so expansion decodes the string and flattening decides which of the two
//! declarative attributes to write back.

use serde_json::{Map, Value};

use crate::error::ChannelError;
use crate::resource::{ImportState, ResourceData, is_zero};

/// One dual-encoded field: its native attribute and its JSON-string attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualField {
    pub native: &'static str,
    pub encoded: &'static str,
}

pub const HEADERS: DualField = DualField {
    native: "headers",
    encoded: "headers_string",
};

pub const PAYLOAD: DualField = DualField {
    native: "payload",
    encoded: "payload_string",
};

/// The value of a dual-encoded field as the user authored it.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedField {
    Unset,
    Native(Map<String, Value>),
    Encoded(String),
}

impl EncodedField {
    /// Reads both attributes of `field` out of a config block. Empty values
    /// count as unset; when both are given the native map wins.
    pub fn from_attributes(
        field: DualField,
        config: &Map<String, Value>,
    ) -> Result<Self, ChannelError> {
        let native = match config.get(field.native) {
            None => None,
            Some(v) if is_zero(v) => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => {
                return Err(ChannelError::AttributeType {
                    attribute: field.native.to_string(),
                    expected: "a map",
                });
            }
        };
        let encoded = match config.get(field.encoded) {
            None => None,
            Some(v) if is_zero(v) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(ChannelError::AttributeType {
                    attribute: field.encoded.to_string(),
                    expected: "a JSON-encoded string",
                });
            }
        };

        Ok(match (native, encoded) {
            (Some(map), Some(_)) => {
                tracing::warn!(
                    field = field.native,
                    "both {} and {} are set; using {}",
                    field.native,
                    field.encoded,
                    field.native
                );
                EncodedField::Native(map)
            }
            (Some(map), None) => EncodedField::Native(map),
            (None, Some(raw)) => EncodedField::Encoded(raw),
            (None, None) => EncodedField::Unset,
        })
    }

    /// The map this field stands for; `Unset` is the empty map.
    pub fn into_map(self, field: DualField) -> Result<Map<String, Value>, ChannelError> {
        match self {
            EncodedField::Unset => Ok(Map::new()),
            EncodedField::Native(map) => Ok(map),
            EncodedField::Encoded(raw) => decode_map(field.encoded, &raw),
        }
    }
}

/// Parses a JSON-encoded object. Anything that is not a JSON object is malformed.
pub fn decode_map(attribute: &str, raw: &str) -> Result<Map<String, Value>, ChannelError> {
    serde_json::from_str::<Map<String, Value>>(raw).map_err(|source| {
        ChannelError::MalformedEncodedField {
            field: attribute.to_string(),
            source,
        }
    })
}

/// JSON string form of a map, keys sorted.
pub fn encode_map(attribute: &str, map: &Map<String, Value>) -> Result<String, ChannelError> {
    serde_json::to_string(map).map_err(|source| ChannelError::MalformedEncodedField {
        field: attribute.to_string(),
        source,
    })
}

/// Which declarative attribute a flatten writes for a dual-encoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Native,
    Encoded,
}

/// Which of the two attributes currently hold a value in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Authored {
    pub native: bool,
    pub encoded: bool,
}

impl Authored {
    pub fn probe(store: &impl ResourceData, field: DualField) -> Self {
        Self {
            native: store.get_ok(&format!("config.0.{}", field.native)).is_some(),
            encoded: store.get_ok(&format!("config.0.{}", field.encoded)).is_some(),
        }
    }
}

/// The native map is written back when the user authored it, or on import when
/// there is no string form to preserve. The string form is written back only
/// when the user authored it. `None` means neither attribute is touched.
///
/// Also forcing the string form on import would change nothing: on import the
/// second branch is only reached when the string form is authored.
pub fn select_encoding(authored: Authored, import_state: ImportState) -> Option<Encoding> {
    if authored.native || (import_state.is_import() && !authored.encoded) {
        Some(Encoding::Native)
    } else if authored.encoded {
        Some(Encoding::Encoded)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn block(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test block must be an object"),
        }
    }

    #[test]
    fn native_map_is_taken_as_is() {
        let cfg = block(json!({"headers": {"x-team": "ops"}}));
        let field = EncodedField::from_attributes(HEADERS, &cfg).unwrap();
        assert_eq!(field, EncodedField::Native(block(json!({"x-team": "ops"}))));
    }

    #[test]
    fn empty_native_falls_through_to_string() {
        let cfg = block(json!({"headers": {}, "headers_string": "{\"a\":1}"}));
        let map = EncodedField::from_attributes(HEADERS, &cfg)
            .unwrap()
            .into_map(HEADERS)
            .unwrap();
        assert_eq!(map, block(json!({"a": 1})));
    }

    #[test]
    fn native_wins_when_both_are_set() {
        let cfg = block(json!({"payload": {"a": 1}, "payload_string": "{\"b\":2}"}));
        let field = EncodedField::from_attributes(PAYLOAD, &cfg).unwrap();
        assert_eq!(field, EncodedField::Native(block(json!({"a": 1}))));
    }

    #[test]
    fn nothing_set_is_unset_and_decodes_to_empty_map() {
        let cfg = block(json!({"payload_string": ""}));
        let field = EncodedField::from_attributes(PAYLOAD, &cfg).unwrap();
        assert_eq!(field, EncodedField::Unset);
        assert!(field.into_map(PAYLOAD).unwrap().is_empty());
    }

    #[test]
    fn malformed_string_is_rejected() {
        let err = EncodedField::Encoded("{not json".to_string())
            .into_map(HEADERS)
            .unwrap_err();
        assert!(
            matches!(err, ChannelError::MalformedEncodedField { ref field, .. } if field == "headers_string")
        );
    }

    #[test]
    fn json_that_is_not_an_object_is_rejected() {
        assert!(decode_map("payload_string", "[1, 2]").is_err());
        assert!(decode_map("payload_string", "\"text\"").is_err());
    }

    #[test]
    fn wrong_attribute_types_are_rejected() {
        let cfg = block(json!({"headers": "x-team: ops"}));
        let err = EncodedField::from_attributes(HEADERS, &cfg).unwrap_err();
        assert!(matches!(err, ChannelError::AttributeType { ref attribute, .. } if attribute == "headers"));

        let cfg = block(json!({"payload_string": {"a": 1}}));
        assert!(EncodedField::from_attributes(PAYLOAD, &cfg).is_err());
    }

    #[test]
    fn encoded_form_sorts_keys_and_keeps_nested_values() {
        let map = block(json!({"z": [1, {"n": null}], "a": {"deep": true}}));
        let raw = encode_map("payload_string", &map).unwrap();
        assert_eq!(raw, r#"{"a":{"deep":true},"z":[1,{"n":null}]}"#);
        assert_eq!(decode_map("payload_string", &raw).unwrap(), map);
    }

    #[test]
    fn selection_truth_table() {
        use Encoding::*;
        use ImportState::*;

        let cases = [
            // (native, encoded, import, expected)
            (false, false, Refreshing, None),
            (false, true, Refreshing, Some(Encoded)),
            (true, false, Refreshing, Some(Native)),
            (true, true, Refreshing, Some(Native)),
            (false, false, Importing, Some(Native)),
            (false, true, Importing, Some(Encoded)),
            (true, false, Importing, Some(Native)),
            (true, true, Importing, Some(Native)),
        ];

        for (native, encoded, import_state, expected) in cases {
            let authored = Authored { native, encoded };
            assert_eq!(
                select_encoding(authored, import_state),
                expected,
                "native={native} encoded={encoded} import={import_state:?}"
            );
        }
    }

    #[test]
    fn forced_string_on_import_never_changes_the_outcome() {
        // Same rule with an extra "or import" on the string branch.
        fn payload_rule(a: Authored, import: bool) -> Option<Encoding> {
            if a.native || (import && !a.encoded) {
                Some(Encoding::Native)
            } else if a.encoded || import {
                Some(Encoding::Encoded)
            } else {
                None
            }
        }

        for native in [false, true] {
            for encoded in [false, true] {
                for import_state in [ImportState::Importing, ImportState::Refreshing] {
                    let a = Authored { native, encoded };
                    assert_eq!(
                        select_encoding(a, import_state),
                        payload_rule(a, import_state.is_import())
                    );
                }
            }
        }
    }
}
