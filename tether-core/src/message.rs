//! Wire-level message unit exchanged with the native side.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A payload carried by an event: a string, structured object, list, or any
/// other JSON value.
pub type Payload = Value;

/// The `{type, data}` unit sent to and received from the native host.
///
/// `data` defaults to an empty object when omitted, both on construction via
/// [`Envelope::new`] and when decoding.
///
/// # Example
///
/// ```rust
/// use tether_core::Envelope;
///
/// let envelope = Envelope::from_json(r#"{"type":"ready"}"#).unwrap();
/// assert_eq!(envelope.event_type, "ready");
/// assert!(envelope.data.as_object().unwrap().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event type name.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload.
    #[serde(default = "empty_object")]
    pub data: Payload,
}

impl Envelope {
    /// Create an envelope, defaulting `data` to `{}`.
    pub fn new(event_type: impl Into<String>, data: Option<Payload>) -> Self {
        Self {
            event_type: event_type.into(),
            data: data.unwrap_or_else(empty_object),
        }
    }

    /// Decode an envelope from its JSON text form.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode the envelope as JSON text.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// An empty JSON object, the default `data` of an envelope.
pub fn empty_object() -> Payload {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_defaults_data() {
        let envelope = Envelope::new("ping", None);
        assert_eq!(envelope.data, json!({}));
    }

    #[test]
    fn test_wire_field_names() {
        let envelope = Envelope::new("ping", Some(json!("hello")));
        let value: Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"type": "ping", "data": "hello"}));
    }

    #[test]
    fn test_missing_type_is_rejected() {
        assert!(Envelope::from_json(r#"{"data": {}}"#).is_err());
    }
}
