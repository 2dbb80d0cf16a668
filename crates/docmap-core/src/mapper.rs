//! The mapper: descriptor-driven conversion between values and documents.
//!
//! [`write_record`] and [`read_record`] are the two directions for one record
//! and its descriptor; [`Mapper`] adds what applies to a whole document (root
//! wrapping, text input and output) on top of them.
//!
//! # Key design decisions
//!
//! - **Declaration order**: fields are written in descriptor order, then
//!   catch-all entries, then the descriptor's explicit key order is applied
//!   to the finished object.
//! - **Fail-fast collisions**: an unwrapped or catch-all key that lands on a
//!   key already written, or on a key the descriptor claims for another
//!   field, is a [`MapError::KeyCollision`], never a silent overwrite.
//! - **Claimed keys**: reading tracks which input keys some field consumed.
//!   Unwrapped records claim into their parent's set, catch-all fields take
//!   whatever is left, and only then are leftovers unknown.
//! - **No partial results**: a failed read drops the half-built value.

use crate::config::MapperConfig;
use crate::convert::Convert;
use crate::descriptor::{Binding, Include, TypeDescriptor};
use crate::document::{Document, Object};
use crate::error::{MapError, Result};
use crate::text;
use log::{debug, trace};
use std::collections::HashSet;

/// Converts values to documents and back under one [`MapperConfig`].
///
/// A mapper holds no state besides its configuration; share one across
/// threads freely.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    config: MapperConfig,
}

impl Mapper {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Convert a record with an explicit descriptor. The result is an object,
    /// wrapped under the descriptor's root name when `wrap_root` is set.
    pub fn to_document<T>(&self, value: &T, descriptor: &TypeDescriptor<T>) -> Result<Document> {
        let object = write_record(value, descriptor, &self.config)?;
        Ok(self.wrap_root(Some(descriptor.root_name()), Document::Object(object)))
    }

    /// Convert an object back into a record with an explicit descriptor. The
    /// root wrapper is expected only when `unwrap_root` is set.
    pub fn from_document<T: Default>(
        &self,
        document: &Document,
        descriptor: &TypeDescriptor<T>,
    ) -> Result<T> {
        let inner = self.unwrap_root(Some(descriptor.root_name()), document)?;
        read_record(inner, descriptor, &self.config)
    }

    /// Convert any [`Convert`] value: records, collections, scalars.
    pub fn value_to_document<V: Convert>(&self, value: &V) -> Result<Document> {
        let document = value.to_document(&self.config)?;
        Ok(self.wrap_root(V::root_name(), document))
    }

    pub fn document_to_value<V: Convert>(&self, document: &Document) -> Result<V> {
        let inner = self.unwrap_root(V::root_name(), document)?;
        V::from_document(inner, &self.config)
    }

    /// Convert a value to JSON text, pretty-printed when configured.
    pub fn write_string<V: Convert>(&self, value: &V) -> Result<String> {
        self.write_tree(&self.value_to_document(value)?)
    }

    /// Parse JSON text and convert it to a value.
    pub fn read_str<V: Convert>(&self, text: &str) -> Result<V> {
        self.document_to_value(&self.read_tree(text)?)
    }

    /// Parse JSON text into a document tree without binding it to a type.
    pub fn read_tree(&self, text: &str) -> Result<Document> {
        text::from_str(text)
    }

    pub fn write_tree(&self, document: &Document) -> Result<String> {
        text::to_string(document, self.config.pretty)
    }

    /// Overlay a value's document form onto `object` under `key`, replacing
    /// any existing entry in place. Root wrapping does not apply.
    pub fn put_value<V: Convert>(
        &self,
        object: &mut Object,
        key: impl Into<String>,
        value: &V,
    ) -> Result<()> {
        let key = key.into();
        let document = value.to_document(&self.config).map_err(|e| e.at(&key))?;
        object.insert(key, document);
        Ok(())
    }

    fn wrap_root(&self, root_name: Option<&str>, document: Document) -> Document {
        match root_name {
            Some(root) if self.config.wrap_root => {
                debug!("wrapping document under root key {root:?}");
                let mut wrapper = Object::new();
                wrapper.insert(root, document);
                Document::Object(wrapper)
            }
            _ => document,
        }
    }

    fn unwrap_root<'a>(&self, root_name: Option<&str>, document: &'a Document) -> Result<&'a Document> {
        let root = match root_name {
            Some(root) if self.config.unwrap_root => root,
            _ => return Ok(document),
        };
        let wrapper = document
            .as_object()
            .ok_or_else(|| MapError::type_mismatch(format!("object wrapping {root:?}"), document.kind()))?;
        if self.config.strict_unknown_keys {
            if let Some(extra) = wrapper.keys().find(|key| *key != root) {
                return Err(MapError::unknown_field(extra));
            }
        }
        debug!("unwrapping document from root key {root:?}");
        wrapper.get(root).ok_or_else(|| MapError::missing_field(root))
    }
}

/// Convert an object to one record with its descriptor. Keys no field
/// claims are ignored, or rejected in strict mode.
pub fn read_record<T: Default>(
    document: &Document,
    descriptor: &TypeDescriptor<T>,
    config: &MapperConfig,
) -> Result<T> {
    let object = document.as_object().ok_or_else(|| {
        MapError::type_mismatch(format!("{} object", descriptor.type_name()), document.kind())
    })?;

    let mut target = T::default();
    let mut claimed = HashSet::new();
    read_fields(&mut target, object, descriptor, config, &mut claimed)?;

    for key in object.keys().filter(|key| !claimed.contains(*key)) {
        if config.strict_unknown_keys {
            return Err(MapError::unknown_field(key));
        }
        debug!("{}: ignoring unknown key {key:?}", descriptor.type_name());
    }
    Ok(target)
}

/// Convert one record to an object with its descriptor.
///
/// Unwrapped and catch-all keys may not land on a key the descriptor claims
/// for another field, even one skipped as empty: reading would hand that key
/// to the wrong field.
pub fn write_record<T>(
    value: &T,
    descriptor: &TypeDescriptor<T>,
    config: &MapperConfig,
) -> Result<Object> {
    let mut object = Object::new();
    let mut trailing = Vec::new();

    for (index, field) in descriptor.fields().iter().enumerate() {
        let include = field
            .include()
            .or(descriptor.default_include())
            .unwrap_or(config.default_include);

        match &field.binding {
            Binding::Value { write, .. } => {
                if descriptor.is_ignored_key(field.key()) {
                    continue;
                }
                let document = write(value, config).map_err(|e| e.at(field.key()))?;
                if include == Include::SkipWhenEmpty && document.is_empty_value() {
                    trace!("{}.{}: empty, skipped", descriptor.type_name(), field.name());
                    continue;
                }
                insert_new(&mut object, field.key(), document)?;
            }
            Binding::Unwrapped { write, .. } => {
                let reserved = descriptor.reserved_keys(Some(index));
                for (key, document) in write(value, config)? {
                    insert_unclaimed(&mut object, &reserved, &key, document)?;
                }
            }
            Binding::CatchAll { write, .. } => trailing.push((include, write(value, config)?)),
            Binding::BackReference { .. } | Binding::Ignored => {}
        }
    }

    if !trailing.is_empty() {
        let reserved = descriptor.claimed_keys();
        for (include, entries) in trailing {
            for (key, document) in entries {
                if include == Include::SkipWhenEmpty && document.is_empty_value() {
                    continue;
                }
                insert_unclaimed(&mut object, &reserved, &key, document)?;
            }
        }
    }

    object.reorder(descriptor.order());
    Ok(object)
}

/// Fill `target` from `object`, recording every consumed key in `claimed`.
///
/// Three passes: own keys first, then unwrapped records (which claim into
/// the same set), then catch-all fields over whatever is still unclaimed.
pub(crate) fn read_fields<T>(
    target: &mut T,
    object: &Object,
    descriptor: &TypeDescriptor<T>,
    config: &MapperConfig,
    claimed: &mut HashSet<String>,
) -> Result<()> {
    claimed.extend(descriptor.ignored_keys().iter().cloned());

    for field in descriptor.fields() {
        match &field.binding {
            Binding::Value { read, .. } => {
                claimed.insert(field.key().to_owned());
                if descriptor.is_ignored_key(field.key()) {
                    continue;
                }
                match object.get(field.key()) {
                    Some(document) => {
                        trace!("{}.{}: reading", descriptor.type_name(), field.name());
                        read(target, document, config).map_err(|e| e.at(field.key()))?;
                    }
                    None if field.is_required() => return Err(MapError::missing_field(field.key())),
                    None => {}
                }
            }
            Binding::BackReference { .. } | Binding::Ignored => {
                claimed.insert(field.key().to_owned());
            }
            Binding::Unwrapped { .. } | Binding::CatchAll { .. } => {}
        }
    }

    for field in descriptor.fields() {
        if let Binding::Unwrapped { read, .. } = &field.binding {
            read(target, object, config, claimed)?;
        }
    }

    for field in descriptor.fields() {
        if let Binding::CatchAll { read, .. } = &field.binding {
            let rest: Object = object
                .iter()
                .filter(|(key, _)| !claimed.contains(*key))
                .map(|(key, document)| (key.to_owned(), document.clone()))
                .collect();
            claimed.extend(rest.keys().map(str::to_owned));
            read(target, rest, config)?;
        }
    }

    Ok(())
}

fn insert_unclaimed(
    object: &mut Object,
    reserved: &HashSet<String>,
    key: &str,
    document: Document,
) -> Result<()> {
    if reserved.contains(key) {
        return Err(MapError::key_collision(key));
    }
    insert_new(object, key, document)
}

fn insert_new(object: &mut Object, key: &str, document: Document) -> Result<()> {
    if object.contains_key(key) {
        return Err(MapError::key_collision(key));
    }
    object.insert(key, document);
    Ok(())
}
