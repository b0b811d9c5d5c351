use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

/// Content-type hint attached to a transport result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Xml,
    /// Plain text that is expected to hold JSON.
    Text,
}

impl ContentType {
    /// Guess from an HTTP `Content-Type` header value.
    pub fn from_header(value: &str) -> Self {
        let value = value.to_ascii_lowercase();
        if value.contains("json") {
            ContentType::Json
        } else if value.contains("xml") {
            ContentType::Xml
        } else {
            ContentType::Text
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub body: Bytes,
    pub content_type: ContentType,
}

impl RawResponse {
    pub fn new(body: impl Into<Bytes>, content_type: ContentType) -> Self {
        Self {
            body: body.into(),
            content_type,
        }
    }

    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::new(body, ContentType::Json)
    }
}

/// A decoded gateway body: a string-keyed JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DecodedResponse(Map<String, Value>);

impl DecodedResponse {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The textual form of a scalar field. Numbers are rendered without
    /// loss; nulls, arrays and objects yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        scalar_text(self.0.get(key)?)
    }

    /// The object held under `key`, e.g. the `data` envelope.
    pub fn envelope(&self, key: &str) -> Option<DecodedResponse> {
        match self.0.get(key)? {
            Value::Object(inner) => Some(DecodedResponse(inner.clone())),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for DecodedResponse {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decoded(v: Value) -> DecodedResponse {
        DecodedResponse::new(v.as_object().unwrap().clone())
    }

    #[test]
    fn test_content_type_from_header() {
        assert_eq!(ContentType::from_header("application/json;charset=UTF-8"), ContentType::Json);
        assert_eq!(ContentType::from_header("text/xml"), ContentType::Xml);
        assert_eq!(ContentType::from_header("text/html"), ContentType::Text);
    }

    #[test]
    fn test_text_reads_strings_and_numbers() {
        let d = decoded(json!({"s": "10000", "n": 0.01, "i": 3, "o": {}}));
        assert_eq!(d.text("s").as_deref(), Some("10000"));
        assert_eq!(d.text("n").as_deref(), Some("0.01"));
        assert_eq!(d.text("i").as_deref(), Some("3"));
        assert_eq!(d.text("o"), None);
        assert_eq!(d.text("missing"), None);
    }

    #[test]
    fn test_envelope() {
        let d = decoded(json!({"ret": "0", "data": {"status": "11"}}));
        let inner = d.envelope("data").unwrap();
        assert_eq!(inner.text("status").as_deref(), Some("11"));
        assert!(d.envelope("ret").is_none());
    }
}
