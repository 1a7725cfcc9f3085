use serde_json::{Map, Value};

use crate::channel::ChannelConfiguration;
use crate::resource::ResourceData;

/// Reads the backend value of one sensitive attribute, `""` when redacted.
pub type BackendValue = fn(&ChannelConfiguration) -> &str;

/// Configuration attributes the backend redacts on read, each paired with the
/// field it is read from.
pub const SENSITIVE_FIELDS: [(&str, BackendValue); 5] = [
    ("auth_password", |c| c.auth_password.as_str()),
    ("api_key", |c| c.api_key.as_str()),
    ("url", |c| c.url.as_str()),
    ("key", |c| c.key.as_str()),
    ("service_key", |c| c.service_key.as_str()),
];

/// Two-source merge: the authoritative value when it is non-empty, otherwise
/// the cached one.
pub fn prefer_authoritative(authoritative: &str, cached: Option<Value>) -> Option<Value> {
    if authoritative.is_empty() {
        cached
    } else {
        Some(Value::String(authoritative.to_string()))
    }
}

/// Seeds `result` with every sensitive attribute that has a value: what the
/// backend returned, or else what the user authored last time. Without the
/// fallback every read would report the redacted secrets as removed.
pub fn reconcile_sensitive(
    result: &mut Map<String, Value>,
    configuration: &ChannelConfiguration,
    store: &impl ResourceData,
) {
    for (field, backend_value) in SENSITIVE_FIELDS {
        let backend = backend_value(configuration);
        let authored = store.get_ok(&format!("config.0.{field}"));
        if backend.is_empty() && authored.is_some() {
            tracing::debug!(field, "backend redacted value; keeping authored one");
        }
        if let Some(value) = prefer_authoritative(backend, authored) {
            result.insert(field.to_string(), value);
        }
    }
}
