//! Default converters: how each Rust type maps to a [`Document`] when a field
//! declares no custom [`Converter`](crate::Converter).
//!
//! Primitives, text, sequences, string-keyed maps and dates are covered here.
//! Records and labeled enums opt in through [`convert_mapped!`] and
//! [`convert_labeled!`], which implement [`Convert`] on top of their
//! descriptor or label table.

use crate::config::MapperConfig;
use crate::document::{Document, Object};
use crate::error::{MapError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::collections::{BTreeMap, HashMap};

const ISO_DATE: &str = "%Y-%m-%d";

/// A type with a default document form.
pub trait Convert: Sized {
    fn to_document(&self, config: &MapperConfig) -> Result<Document>;

    fn from_document(document: &Document, config: &MapperConfig) -> Result<Self>;

    /// Key used when the mapper wraps this value as a document root. Only
    /// mapped records have one.
    fn root_name() -> Option<&'static str> {
        None
    }
}

/// An enumeration whose document form is a configured label per variant,
/// independent of the Rust variant name.
pub trait Labeled: Copy + PartialEq + 'static {
    /// Every variant, in declaration order. The index of a variant in this
    /// slice is its number when `enums_from_numbers` is enabled.
    fn variants() -> &'static [Self];

    fn label(self) -> &'static str;
}

/// Read a labeled enum from a document string.
pub fn labeled_from_document<E: Labeled>(document: &Document, config: &MapperConfig) -> Result<E> {
    let labels = || E::variants().iter().map(|v| v.label()).collect::<Vec<_>>();
    match document {
        Document::String(s) => E::variants()
            .iter()
            .copied()
            .find(|v| v.label() == s)
            .ok_or_else(|| MapError::invalid_enum_value(format!("{s:?}"), labels())),
        Document::Integer(i) if config.enums_from_numbers => usize::try_from(*i)
            .ok()
            .and_then(|index| E::variants().get(index).copied())
            .ok_or_else(|| MapError::invalid_enum_value(i.to_string(), labels())),
        Document::Integer(i) => Err(MapError::invalid_enum_value(i.to_string(), labels())),
        Document::Float(f) => Err(MapError::invalid_enum_value(f.to_string(), labels())),
        other => Err(MapError::type_mismatch("enum label", other.kind())),
    }
}

/// Implement [`Convert`] for types that implement [`Mapped`](crate::Mapped),
/// converting through their descriptor.
#[macro_export]
macro_rules! convert_mapped {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Convert for $ty {
            fn to_document(
                &self,
                config: &$crate::MapperConfig,
            ) -> $crate::error::Result<$crate::Document> {
                $crate::mapper::write_record(self, <$ty as $crate::Mapped>::descriptor(), config)
                    .map($crate::Document::Object)
            }

            fn from_document(
                document: &$crate::Document,
                config: &$crate::MapperConfig,
            ) -> $crate::error::Result<Self> {
                $crate::mapper::read_record(document, <$ty as $crate::Mapped>::descriptor(), config)
            }

            fn root_name() -> ::std::option::Option<&'static str> {
                ::std::option::Option::Some(<$ty as $crate::Mapped>::descriptor().root_name())
            }
        }
    )+};
}

/// Implement [`Convert`] for types that implement [`Labeled`].
#[macro_export]
macro_rules! convert_labeled {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Convert for $ty {
            fn to_document(
                &self,
                _config: &$crate::MapperConfig,
            ) -> $crate::error::Result<$crate::Document> {
                Ok($crate::Document::from($crate::Labeled::label(*self)))
            }

            fn from_document(
                document: &$crate::Document,
                config: &$crate::MapperConfig,
            ) -> $crate::error::Result<Self> {
                $crate::convert::labeled_from_document(document, config)
            }
        }
    )+};
}

impl Convert for Document {
    fn to_document(&self, _config: &MapperConfig) -> Result<Document> {
        Ok(self.clone())
    }

    fn from_document(document: &Document, _config: &MapperConfig) -> Result<Self> {
        Ok(document.clone())
    }
}

impl Convert for bool {
    fn to_document(&self, _config: &MapperConfig) -> Result<Document> {
        Ok(Document::Bool(*self))
    }

    fn from_document(document: &Document, _config: &MapperConfig) -> Result<Self> {
        document
            .as_bool()
            .ok_or_else(|| MapError::type_mismatch("boolean", document.kind()))
    }
}

impl Convert for String {
    fn to_document(&self, _config: &MapperConfig) -> Result<Document> {
        Ok(Document::String(self.clone()))
    }

    fn from_document(document: &Document, _config: &MapperConfig) -> Result<Self> {
        document
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| MapError::type_mismatch("string", document.kind()))
    }
}

/// Integer view of a node: integers, and floats without a fractional part.
fn integer(document: &Document, expected: &str) -> Result<i64> {
    match document {
        Document::Integer(i) => Ok(*i),
        Document::Float(f) if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f) => {
            Ok(*f as i64)
        }
        Document::Float(f) => Err(MapError::type_mismatch(expected, format!("float {f}"))),
        other => Err(MapError::type_mismatch(expected, other.kind())),
    }
}

macro_rules! convert_integer {
    ($($ty:ty),+) => {$(
        impl Convert for $ty {
            fn to_document(&self, _config: &MapperConfig) -> Result<Document> {
                i64::try_from(*self)
                    .map(Document::Integer)
                    .map_err(|_| MapError::conversion(format!("{} exceeds the integer range", self)))
            }

            fn from_document(document: &Document, _config: &MapperConfig) -> Result<Self> {
                let expected = stringify!($ty);
                let i = integer(document, expected)?;
                <$ty>::try_from(i)
                    .map_err(|_| MapError::type_mismatch(expected, format!("out-of-range integer {i}")))
            }
        }
    )+};
}

convert_integer!(i32, i64, u32, u64);

impl Convert for f64 {
    fn to_document(&self, _config: &MapperConfig) -> Result<Document> {
        if self.is_finite() {
            Ok(Document::Float(*self))
        } else {
            Err(MapError::conversion(format!("non-finite float {self}")))
        }
    }

    fn from_document(document: &Document, _config: &MapperConfig) -> Result<Self> {
        document
            .as_f64()
            .ok_or_else(|| MapError::type_mismatch("number", document.kind()))
    }
}

impl Convert for NaiveDate {
    fn to_document(&self, _config: &MapperConfig) -> Result<Document> {
        Ok(Document::String(self.format(ISO_DATE).to_string()))
    }

    fn from_document(document: &Document, _config: &MapperConfig) -> Result<Self> {
        let text = document
            .as_str()
            .ok_or_else(|| MapError::type_mismatch("ISO date string", document.kind()))?;
        NaiveDate::parse_from_str(text, ISO_DATE)
            .map_err(|e| MapError::type_mismatch("ISO date string", format!("{text:?} ({e})")))
    }
}

impl Convert for DateTime<FixedOffset> {
    fn to_document(&self, _config: &MapperConfig) -> Result<Document> {
        Ok(Document::String(self.to_rfc3339()))
    }

    fn from_document(document: &Document, _config: &MapperConfig) -> Result<Self> {
        let text = document
            .as_str()
            .ok_or_else(|| MapError::type_mismatch("RFC 3339 timestamp", document.kind()))?;
        DateTime::parse_from_rfc3339(text)
            .map_err(|e| MapError::type_mismatch("RFC 3339 timestamp", format!("{text:?} ({e})")))
    }
}

impl<V: Convert> Convert for Option<V> {
    fn to_document(&self, config: &MapperConfig) -> Result<Document> {
        match self {
            Some(value) => value.to_document(config),
            None => Ok(Document::Null),
        }
    }

    fn from_document(document: &Document, config: &MapperConfig) -> Result<Self> {
        match document {
            Document::Null => Ok(None),
            other => V::from_document(other, config).map(Some),
        }
    }
}

impl<V: Convert> Convert for Vec<V> {
    fn to_document(&self, config: &MapperConfig) -> Result<Document> {
        self.iter()
            .enumerate()
            .map(|(i, item)| item.to_document(config).map_err(|e| e.at(&i.to_string())))
            .collect::<Result<Vec<_>>>()
            .map(Document::Array)
    }

    fn from_document(document: &Document, config: &MapperConfig) -> Result<Self> {
        let items = document
            .as_array()
            .ok_or_else(|| MapError::type_mismatch("array", document.kind()))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| V::from_document(item, config).map_err(|e| e.at(&i.to_string())))
            .collect()
    }
}

fn entries_to_document<'a, V: Convert + 'a>(
    entries: impl Iterator<Item = (&'a String, &'a V)>,
    config: &MapperConfig,
) -> Result<Document> {
    let mut object = Object::new();
    for (key, value) in entries {
        object.insert(key.as_str(), value.to_document(config).map_err(|e| e.at(key))?);
    }
    Ok(Document::Object(object))
}

fn entries_from_document<V: Convert, M: FromIterator<(String, V)>>(
    document: &Document,
    config: &MapperConfig,
) -> Result<M> {
    let object = document
        .as_object()
        .ok_or_else(|| MapError::type_mismatch("object", document.kind()))?;
    object
        .iter()
        .map(|(key, value)| {
            V::from_document(value, config)
                .map(|v| (key.to_owned(), v))
                .map_err(|e| e.at(key))
        })
        .collect()
}

impl<V: Convert> Convert for BTreeMap<String, V> {
    fn to_document(&self, config: &MapperConfig) -> Result<Document> {
        entries_to_document(self.iter(), config)
    }

    fn from_document(document: &Document, config: &MapperConfig) -> Result<Self> {
        entries_from_document(document, config)
    }
}

/// Written in key order so output does not depend on hash seeds.
impl<V: Convert> Convert for HashMap<String, V> {
    fn to_document(&self, config: &MapperConfig) -> Result<Document> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries_to_document(entries.into_iter(), config)
    }

    fn from_document(document: &Document, config: &MapperConfig) -> Result<Self> {
        entries_from_document(document, config)
    }
}
