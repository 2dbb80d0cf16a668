//! Document text format: JSON, compact or pretty-printed.
//!
//! Text goes through `serde_json::Value` as the intermediate representation.
//! The workspace enables serde_json's `preserve_order` feature, so object keys
//! come out in the order the [`Document`] holds them and parsed objects keep
//! the order of the input text.

use crate::document::{Document, Object};
use crate::error::{MapError, Result};
use serde_json::{Map, Number, Value};

/// Render a document as JSON text.
///
/// Fails with [`MapError::Conversion`] when the tree holds a NaN or infinite
/// float, which JSON cannot represent.
pub fn to_string(document: &Document, pretty: bool) -> Result<String> {
    let value = Value::try_from(document)?;
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// Parse JSON text into a document.
///
/// ```
/// use docmap_core::{text, Document};
///
/// let doc = text::from_str(r#"{"hobbies":["Mangas","Sports"]}"#).unwrap();
/// assert_eq!(doc.lookup("/hobbies/1"), Some(&Document::from("Sports")));
/// ```
pub fn from_str(text: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(text)?;
    Ok(Document::from(value))
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Bool(b),
            Value::Number(n) => number_to_document(&n),
            Value::String(s) => Document::String(s),
            Value::Array(items) => Document::Array(items.into_iter().map(Document::from).collect()),
            Value::Object(map) => Document::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Document::from(value)))
                    .collect::<Object>(),
            ),
        }
    }
}

/// Integers that fit i64 stay integers; larger unsigned values and all
/// fractional numbers become floats.
fn number_to_document(n: &Number) -> Document {
    match (n.as_i64(), n.as_f64()) {
        (Some(i), _) => Document::Integer(i),
        (None, Some(f)) => Document::Float(f),
        (None, None) => Document::Null,
    }
}

impl TryFrom<&Document> for Value {
    type Error = MapError;

    fn try_from(document: &Document) -> Result<Self> {
        let value = match document {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(*b),
            Document::Integer(i) => Value::Number(Number::from(*i)),
            Document::Float(f) => Value::Number(
                Number::from_f64(*f)
                    .ok_or_else(|| MapError::conversion(format!("non-finite float {f}")))?,
            ),
            Document::String(s) => Value::String(s.clone()),
            Document::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Value::try_from(item).map_err(|e| e.at(&i.to_string())))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Document::Object(object) => {
                let mut map = Map::with_capacity(object.len());
                for (key, item) in object.iter() {
                    map.insert(key.to_owned(), Value::try_from(item).map_err(|e| e.at(key))?);
                }
                Value::Object(map)
            }
        };
        Ok(value)
    }
}
