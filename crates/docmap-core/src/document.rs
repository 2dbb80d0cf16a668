//! The document tree: a JSON-like value with insertion-ordered objects.
//!
//! [`Document`] is the interchange representation every conversion goes
//! through. It mirrors JSON but keeps integers and floats apart, so an
//! integral field written as `45000` reads back as an integer rather than
//! `45000.0`. [`Object`] is an `IndexMap`, so it keeps insertion order with
//! hashed key access, and [`Object::insert`] replaces an existing entry in
//! place.
//!
//! Path lookups ([`Document::lookup`] and friends) are total: a missing key,
//! an out-of-range index or a malformed path yields `None` or the caller's
//! default, never an error.

use indexmap::IndexMap;

/// A JSON-like document value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Document {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Document>),
    Object(Object),
}

impl Document {
    /// Create an empty object node.
    pub fn object() -> Self {
        Document::Object(Object::new())
    }

    /// Create an empty array node.
    pub fn array() -> Self {
        Document::Array(Vec::new())
    }

    /// Short name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "boolean",
            Document::Integer(_) => "integer",
            Document::Float(_) => "float",
            Document::String(_) => "string",
            Document::Array(_) => "array",
            Document::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    /// True for the values a skip-when-empty field omits: null, blank strings,
    /// empty arrays and empty objects.
    pub fn is_empty_value(&self) -> bool {
        match self {
            Document::Null => true,
            Document::String(s) => s.trim().is_empty(),
            Document::Array(items) => items.is_empty(),
            Document::Object(object) => object.is_empty(),
            Document::Bool(_) | Document::Integer(_) | Document::Float(_) => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Document::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Document::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of an integer or float node.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Document::Integer(i) => Some(*i as f64),
            Document::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Document]> {
        match self {
            Document::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Document::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Document::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Single-step object access. Returns `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_object().and_then(|object| object.get(key))
    }

    /// Append to an array node. Returns `false` (and drops `value`) when this
    /// node is not an array.
    pub fn push(&mut self, value: impl Into<Document>) -> bool {
        match self {
            Document::Array(items) => {
                items.push(value.into());
                true
            }
            _ => false,
        }
    }

    /// Walk a slash-delimited path of object keys and array indices.
    ///
    /// Segments use JSON-pointer escaping (`~1` for `/`, `~0` for `~`). The
    /// leading slash is optional and the empty path addresses this node.
    ///
    /// ```
    /// use docmap_core::text;
    ///
    /// let doc = text::from_str(r#"{"profession":{"title":"CEO","salary":120000}}"#).unwrap();
    /// assert_eq!(doc.lookup("/profession/salary").and_then(|d| d.as_i64()), Some(120000));
    /// assert!(doc.lookup("/profession/bonus").is_none());
    /// ```
    pub fn lookup(&self, path: &str) -> Option<&Document> {
        let rest = match path.strip_prefix('/') {
            Some(rest) => rest,
            None if path.is_empty() => return Some(self),
            None => path,
        };
        rest.split('/').try_fold(self, |node, raw| {
            let segment = unescape_segment(raw);
            match node {
                Document::Object(object) => object.get(&segment),
                Document::Array(items) => parse_index(&segment).and_then(|i| items.get(i)),
                _ => None,
            }
        })
    }

    /// [`lookup`](Self::lookup), falling back to `default` on a miss.
    pub fn lookup_or<'a>(&'a self, path: &str, default: &'a Document) -> &'a Document {
        self.lookup(path).unwrap_or(default)
    }

    /// Integer view of this node, or `default`.
    ///
    /// Integral floats within the `i64` range and strings holding an integer
    /// are accepted; anything else (null, fractional or out-of-range numbers,
    /// containers) yields `default`.
    pub fn as_i64_or(&self, default: i64) -> i64 {
        match self {
            Document::Integer(i) => *i,
            Document::Float(f) if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f) => {
                *f as i64
            }
            Document::String(s) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Text view of a scalar node, or `default` for null and containers.
    pub fn as_text_or(&self, default: &str) -> String {
        match self {
            Document::String(s) => s.clone(),
            Document::Bool(b) => b.to_string(),
            Document::Integer(i) => i.to_string(),
            Document::Float(f) => f.to_string(),
            Document::Null | Document::Array(_) | Document::Object(_) => default.to_owned(),
        }
    }
}

fn unescape_segment(raw: &str) -> String {
    raw.replace("~1", "/").replace("~0", "~")
}

fn parse_index(segment: &str) -> Option<usize> {
    // "01" and "+1" are keys, not indices.
    let canonical = segment == "0" || !segment.starts_with('0');
    if canonical && !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        segment.parse().ok()
    } else {
        None
    }
}

/// An insertion-ordered object with unique keys.
///
/// Equality ignores key order, as JSON object equality does.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    entries: IndexMap<String, Document>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Document> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace. A replaced entry keeps its original position and
    /// the previous value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Document>) -> Option<Document> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Document> {
        self.entries.shift_remove(key)
    }

    /// Overlay `other` onto this object: shared keys are replaced in place,
    /// new keys are appended in `other`'s order.
    pub fn merge(&mut self, other: Object) {
        self.entries.extend(other.entries);
    }

    /// Move the listed keys to the front, in list order. Listed keys that are
    /// absent are skipped; unlisted keys keep their relative order.
    pub fn reorder<S: AsRef<str>>(&mut self, order: &[S]) {
        if order.is_empty() {
            return;
        }
        let mut rest = std::mem::take(&mut self.entries);
        self.entries.reserve(rest.len());
        for key in order {
            if let Some((key, value)) = rest.shift_remove_entry(key.as_ref()) {
                self.entries.insert(key, value);
            }
        }
        self.entries.extend(rest);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for Object {
    type Item = (String, Document);
    type IntoIter = indexmap::map::IntoIter<String, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Document>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut object = Object::with_capacity(iter.size_hint().0);
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Document::Bool(value)
    }
}

impl From<i32> for Document {
    fn from(value: i32) -> Self {
        Document::Integer(i64::from(value))
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Document::Integer(value)
    }
}

impl From<u32> for Document {
    fn from(value: u32) -> Self {
        Document::Integer(i64::from(value))
    }
}

impl From<f64> for Document {
    fn from(value: f64) -> Self {
        Document::Float(value)
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::String(value.to_owned())
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Document::String(value)
    }
}

impl From<Vec<Document>> for Document {
    fn from(value: Vec<Document>) -> Self {
        Document::Array(value)
    }
}

impl From<Object> for Document {
    fn from(value: Object) -> Self {
        Document::Object(value)
    }
}

impl<T: Into<Document>> From<Option<T>> for Document {
    fn from(value: Option<T>) -> Self {
        value.map_or(Document::Null, Into::into)
    }
}
