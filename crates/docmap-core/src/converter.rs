//! Pluggable per-field converters.
//!
//! A [`Converter<V>`] replaces a field's default [`Convert`] behaviour with two
//! operations, value → document and document → value. Converters are stored
//! in the field's descriptor and shared across threads, hence `Send + Sync`.
//!
//! - [`Standard`] -- delegate to the type's [`Convert`] impl
//! - [`DateFormat`] -- dates and zoned timestamps as text in a custom pattern
//! - [`Optional`] -- lift any converter over `Option<V>`, with `None` as null
//! - [`RawJson`] -- a string holding JSON text, embedded as a sub-document

use crate::config::MapperConfig;
use crate::convert::Convert;
use crate::document::Document;
use crate::error::{MapError, Result};
use crate::text;
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::fmt::Write;

pub trait Converter<V>: Send + Sync {
    fn to_document(&self, value: &V, config: &MapperConfig) -> Result<Document>;

    fn from_document(&self, document: &Document, config: &MapperConfig) -> Result<V>;
}

/// The default converter: whatever [`Convert`] does for `V`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standard;

impl<V: Convert> Converter<V> for Standard {
    fn to_document(&self, value: &V, config: &MapperConfig) -> Result<Document> {
        value.to_document(config)
    }

    fn from_document(&self, document: &Document, config: &MapperConfig) -> Result<V> {
        V::from_document(document, config)
    }
}

/// Format dates with a chrono `strftime` pattern.
///
/// Works for [`NaiveDate`] and for [`DateTime<FixedOffset>`]; a pattern for
/// the latter must include an offset (`%z`, `%:z`) to be readable back.
///
/// ```
/// use chrono::NaiveDate;
/// use docmap_core::{Converter, DateFormat, Document, MapperConfig};
///
/// let format = DateFormat::new("%d/%m/%Y");
/// let date = NaiveDate::from_ymd_opt(1996, 9, 9).unwrap();
/// let doc = format.to_document(&date, &MapperConfig::default()).unwrap();
/// assert_eq!(doc, Document::from("09/09/1996"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
}

impl DateFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render through `fmt::Write` so a pattern chrono cannot apply surfaces
    /// as an error instead of a panic in `to_string`.
    fn render(&self, formatted: impl std::fmt::Display) -> Result<Document> {
        let mut out = String::new();
        write!(out, "{formatted}").map_err(|_| {
            MapError::conversion(format!("date pattern {:?} cannot format this value", self.pattern))
        })?;
        Ok(Document::String(out))
    }

    fn text<'a>(&self, document: &'a Document) -> Result<&'a str> {
        document
            .as_str()
            .ok_or_else(|| MapError::type_mismatch(self.expected(), document.kind()))
    }

    fn expected(&self) -> String {
        format!("date matching {:?}", self.pattern)
    }
}

impl Converter<NaiveDate> for DateFormat {
    fn to_document(&self, value: &NaiveDate, _config: &MapperConfig) -> Result<Document> {
        self.render(value.format(&self.pattern))
    }

    fn from_document(&self, document: &Document, _config: &MapperConfig) -> Result<NaiveDate> {
        let text = self.text(document)?;
        NaiveDate::parse_from_str(text, &self.pattern)
            .map_err(|e| MapError::type_mismatch(self.expected(), format!("{text:?} ({e})")))
    }
}

impl Converter<DateTime<FixedOffset>> for DateFormat {
    fn to_document(&self, value: &DateTime<FixedOffset>, _config: &MapperConfig) -> Result<Document> {
        self.render(value.format(&self.pattern))
    }

    fn from_document(
        &self,
        document: &Document,
        _config: &MapperConfig,
    ) -> Result<DateTime<FixedOffset>> {
        let text = self.text(document)?;
        DateTime::parse_from_str(text, &self.pattern)
            .map_err(|e| MapError::type_mismatch(self.expected(), format!("{text:?} ({e})")))
    }
}

/// Lift a converter over `Option<V>`: `None` is written as null and null reads
/// back as `None`.
#[derive(Debug, Clone, Default)]
pub struct Optional<C>(pub C);

impl<V, C: Converter<V>> Converter<Option<V>> for Optional<C> {
    fn to_document(&self, value: &Option<V>, config: &MapperConfig) -> Result<Document> {
        match value {
            Some(inner) => self.0.to_document(inner, config),
            None => Ok(Document::Null),
        }
    }

    fn from_document(&self, document: &Document, config: &MapperConfig) -> Result<Option<V>> {
        match document {
            Document::Null => Ok(None),
            other => self.0.from_document(other, config).map(Some),
        }
    }
}

/// A `String` field that already holds JSON text. It is written as the parsed
/// sub-document rather than as a quoted string, and read back as compact text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawJson;

impl Converter<String> for RawJson {
    fn to_document(&self, value: &String, _config: &MapperConfig) -> Result<Document> {
        text::from_str(value).map_err(|e| MapError::conversion(format!("raw JSON field: {e}")))
    }

    fn from_document(&self, document: &Document, _config: &MapperConfig) -> Result<String> {
        text::to_string(document, false)
    }
}
