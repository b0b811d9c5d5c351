use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::VipsptError;
use crate::model::response::{ContentType, DecodedResponse, RawResponse};

/// Root element stripped from XML bodies.
const XML_ENVELOPE: &str = "xml";

/// Decode a transport result into a [`DecodedResponse`].
///
/// JSON and text bodies must hold a JSON object. XML bodies are turned into
/// the same tree shape, with the `<xml>` root unwrapped.
pub fn decode(raw: &RawResponse) -> Result<DecodedResponse, VipsptError> {
    let map = match raw.content_type {
        ContentType::Json | ContentType::Text => decode_json(&raw.body)?,
        ContentType::Xml => decode_xml(&raw.body)?,
    };
    debug!(fields = map.len(), "decoded gateway response");
    Ok(DecodedResponse::new(map))
}

fn decode_json(body: &[u8]) -> Result<Map<String, Value>, VipsptError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(VipsptError::decode("response is not a JSON object", body)),
        Err(e) => Err(VipsptError::decode(format!("invalid JSON: {e}"), body)),
    }
}

fn decode_xml(body: &[u8]) -> Result<Map<String, Value>, VipsptError> {
    let mut tree = parse_xml(body).map_err(|e| VipsptError::decode(e, body))?;
    match tree.remove(XML_ENVELOPE) {
        Some(Value::Object(inner)) => Ok(inner),
        Some(Value::String(text)) if text.is_empty() => Ok(Map::new()),
        Some(_) => Err(VipsptError::decode("xml root holds text instead of fields", body)),
        None => Ok(tree),
    }
}

/// One open element while walking the document.
struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Map::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> Value {
        if self.children.is_empty() {
            Value::String(self.text)
        } else {
            Value::Object(self.children)
        }
    }
}

fn parse_xml(body: &[u8]) -> Result<Map<String, Value>, String> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut stack = vec![Frame::new(String::new())];
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(|e| format!("invalid XML: {e}"))? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push(Frame::new(name));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let parent = stack.last_mut().ok_or("unbalanced XML")?;
                insert_child(&mut parent.children, name, Value::String(String::new()));
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| format!("invalid XML text: {e}"))?;
                let current = stack.last_mut().ok_or("unbalanced XML")?;
                current.text.push_str(&text);
            }
            Event::CData(e) => {
                let text = String::from_utf8(e.into_inner().into_owned())
                    .map_err(|e| format!("invalid CDATA: {e}"))?;
                let current = stack.last_mut().ok_or("unbalanced XML")?;
                current.text.push_str(&text);
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or("unbalanced XML")?;
                let parent = stack.last_mut().ok_or("unbalanced XML")?;
                let name = frame.name.clone();
                insert_child(&mut parent.children, name, frame.into_value());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err("unclosed XML element".into());
    }
    let root = stack.pop().map(|f| f.children).unwrap_or_default();
    if root.is_empty() {
        return Err("XML document has no root element".into());
    }
    Ok(root)
}

/// Repeated sibling elements collapse into an array.
fn insert_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}
