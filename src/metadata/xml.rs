//! XML to JSON conversion for retrieved metadata files and SOAP results.
//!
//! Metadata files (`*.object`, `*.workflow`) and SOAP responses are turned into
//! `serde_json::Value` trees so the exports can treat them like REST payloads:
//!
//! - an element with children becomes an object keyed by child tag name
//! - repeated children with the same tag become an array
//! - a leaf element becomes its text, or `null` when empty
//! - attributes become `@name` keys; text next to children becomes `#text`

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::AppError;

// ─────────────────────────────────────────────────────────────────────────────
// Tree conversion
// ─────────────────────────────────────────────────────────────────────────────

/// An element that is still open while the document is being read.
struct OpenElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Map<String, Value>,
    text: String,
}

impl OpenElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, AppError> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| AppError::XmlInvalid(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Map::new(),
            text: String::new(),
        })
    }

    fn into_value(self) -> Value {
        let text = self.text.trim();

        if self.attributes.is_empty() && self.children.is_empty() {
            return if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            };
        }

        let mut object = Map::new();
        for (key, value) in self.attributes {
            object.insert(format!("@{}", key), Value::String(value));
        }
        for (key, value) in self.children {
            object.insert(key, value);
        }
        if !text.is_empty() {
            object.insert("#text".into(), Value::String(text.to_string()));
        }
        Value::Object(object)
    }
}

/// Adds `value` under `name`, turning repeated tags into an array.
fn attach(children: &mut Map<String, Value>, name: String, value: Value) {
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

/// Converts an XML document into a JSON value rooted at its document element.
///
/// `<Workflow><rules>..</rules><rules>..</rules></Workflow>` becomes
/// `{"Workflow": {"rules": [.., ..]}}`.
///
/// # Errors
///
/// Returns `AppError::XmlInvalid` for malformed XML or a document without a
/// root element.
pub fn xml_to_value(xml: &str) -> Result<Value, AppError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root = Map::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(OpenElement::from_start(&start)?),
            Event::Empty(start) => {
                let element = OpenElement::from_start(&start)?;
                let name = element.name.clone();
                let value = element.into_value();
                match stack.last_mut() {
                    Some(parent) => attach(&mut parent.children, name, value),
                    None => attach(&mut root, name, value),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| AppError::XmlInvalid("unexpected closing tag".into()))?;
                let name = element.name.clone();
                let value = element.into_value();
                match stack.last_mut() {
                    Some(parent) => attach(&mut parent.children, name, value),
                    None => attach(&mut root, name, value),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(AppError::XmlInvalid(format!(
            "element <{}> is never closed",
            open.name
        )));
    }
    if root.is_empty() {
        return Err(AppError::XmlInvalid("document has no root element".into()));
    }

    Ok(Value::Object(root))
}

// ─────────────────────────────────────────────────────────────────────────────
// Single element lookup
// ─────────────────────────────────────────────────────────────────────────────

fn tag_matches(start: &BytesStart<'_>, element_name: &str) -> bool {
    start.name().as_ref() == element_name.as_bytes()
        || start.local_name().as_ref() == element_name.as_bytes()
}

/// Returns the inner markup of the first `element_name` element in `xml`.
///
/// Nested markup is returned verbatim, so
/// `unique_element_value("<a><foo><b>x</b></foo></a>", "foo")` yields
/// `Some("<b>x</b>")`. Namespaced tags match on either their qualified or
/// local name. Returns `Ok(None)` when the element does not occur.
pub fn unique_element_value(xml: &str, element_name: &str) -> Result<Option<String>, AppError> {
    // The reader skips a leading BOM without counting it in its positions.
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Start(start) if tag_matches(&start, element_name) => {
                let content_start = reader.buffer_position() as usize;
                let mut depth = 0usize;
                loop {
                    let before = reader.buffer_position() as usize;
                    match reader.read_event()? {
                        Event::Start(_) => depth += 1,
                        Event::End(_) if depth == 0 => {
                            return Ok(Some(xml[content_start..before].to_string()));
                        }
                        Event::End(_) => depth -= 1,
                        Event::Eof => {
                            return Err(AppError::XmlInvalid(format!(
                                "element <{}> is never closed",
                                element_name
                            )));
                        }
                        _ => {}
                    }
                }
            }
            Event::Empty(start) if tag_matches(&start, element_name) => {
                return Ok(Some(String::new()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}
