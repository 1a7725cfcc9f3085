use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Access to the declarative attributes of one channel resource.
///
/// Paths are dotted; numeric segments index into lists, so the first (and
/// only) `config` block is addressed as `config.0.<attribute>`.
pub trait ResourceData {
    /// Plain read. `Value::Null` when the path does not resolve.
    fn get(&self, path: &str) -> Value;

    /// Read that distinguishes "absent" from "set": `None` when the path does
    /// not resolve or holds a zero value (see [`is_zero`]).
    fn get_ok(&self, path: &str) -> Option<Value> {
        let value = self.get(path);
        (!is_zero(&value)).then_some(value)
    }

    fn set(&mut self, attribute: &str, value: Value) -> Result<(), StoreError>;

    fn set_id(&mut self, id: String);

    /// Snapshot of what was persisted after the last apply, keyed by attribute.
    fn persisted_state(&self) -> &BTreeMap<String, String>;
}

/// Zero value of a dynamic attribute: null, `""`, `false`, `0`, `{}` or `[]`.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Resolve a dotted path against a JSON object.
pub fn lookup<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Whether a flatten is reconstructing state for a resource being imported
/// (nothing persisted for `config` yet) or refreshing one that was applied before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Importing,
    Refreshing,
}

impl ImportState {
    pub fn from_persisted(state: &BTreeMap<String, String>) -> Self {
        match state.get("config") {
            Some(raw) if !raw.is_empty() => ImportState::Refreshing,
            _ => ImportState::Importing,
        }
    }

    pub fn detect(store: &impl ResourceData) -> Self {
        Self::from_persisted(store.persisted_state())
    }

    pub fn is_import(self) -> bool {
        self == ImportState::Importing
    }
}

/// JSON-backed resource store.
///
/// Serialized shape: `{"id": "...", "attributes": {...}, "state": {...}}`.
/// `read_only` attributes reject writes, which lets callers exercise the
/// accessor failure path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub state: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub read_only: BTreeSet<String>,
}

impl MemoryResource {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    /// Builds a resource from a JSON object of attributes; anything else yields an empty resource.
    pub fn from_attributes(attributes: Value) -> Self {
        match attributes {
            Value::Object(map) => Self::new(map),
            _ => Self::default(),
        }
    }

    pub fn with_state(mut self, key: &str, value: &str) -> Self {
        self.state.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_read_only(mut self, attribute: &str) -> Self {
        self.read_only.insert(attribute.to_string());
        self
    }
}

impl ResourceData for MemoryResource {
    fn get(&self, path: &str) -> Value {
        lookup(&self.attributes, path).cloned().unwrap_or(Value::Null)
    }

    fn set(&mut self, attribute: &str, value: Value) -> Result<(), StoreError> {
        if self.read_only.contains(attribute) {
            return Err(StoreError::new(attribute, "attribute is read-only"));
        }
        self.attributes.insert(attribute.to_string(), value);
        Ok(())
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn persisted_state(&self) -> &BTreeMap<String, String> {
        &self.state
    }
}
