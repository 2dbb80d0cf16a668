//! Type descriptors: the static table that tells the mapper how a Rust type's
//! fields map to document keys.
//!
//! Descriptors replace runtime annotation scanning. Each mapped type builds
//! its descriptor once, usually inside [`Mapped::descriptor`] behind a
//! `OnceLock`, and every conversion afterwards reads it without locking.
//!
//! ```
//! use std::sync::OnceLock;
//! use docmap_core::{convert_mapped, Mapped, Mapper, TypeDescriptor};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Profession {
//!     title: String,
//!     salary: i32,
//! }
//!
//! impl Mapped for Profession {
//!     fn descriptor() -> &'static TypeDescriptor<Self> {
//!         static DESCRIPTOR: OnceLock<TypeDescriptor<Profession>> = OnceLock::new();
//!         DESCRIPTOR.get_or_init(|| {
//!             TypeDescriptor::<Profession>::builder("Profession")
//!                 .field("title", |p| &p.title, |p, v| p.title = v)
//!                 .field("salary", |p| &p.salary, |p, v| p.salary = v)
//!                 .build()
//!         })
//!     }
//! }
//!
//! convert_mapped!(Profession);
//!
//! let mapper = Mapper::default();
//! let profession: Profession = mapper
//!     .read_str(r#"{"title":"Software Engineer","salary":45000}"#)
//!     .unwrap();
//! assert_eq!(profession.salary, 45000);
//! assert_eq!(
//!     mapper.write_string(&profession).unwrap(),
//!     r#"{"title":"Software Engineer","salary":45000}"#
//! );
//! ```

use crate::config::MapperConfig;
use crate::convert::Convert;
use crate::converter::{Converter, Standard};
use crate::document::{Document, Object};
use crate::error::Result;
use crate::mapper;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A type with a statically registered descriptor.
pub trait Mapped: Default + 'static {
    fn descriptor() -> &'static TypeDescriptor<Self>;
}

/// When a field is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Include {
    #[default]
    Always,
    /// Omit the key when the value is null, a blank string, or an empty
    /// array or object.
    SkipWhenEmpty,
}

/// How a field takes part in conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Written and read under its own key.
    Value,
    /// A nested record whose keys are merged into the parent object.
    Unwrapped,
    /// A string-keyed map written as sibling keys; collects unclaimed keys
    /// on read.
    CatchAll,
    /// The child side of a reference relation: never written, re-linked
    /// after reading.
    BackReference,
    /// Never written, and tolerated but not read.
    Ignored,
}

type WriteFn<T> = Box<dyn Fn(&T, &MapperConfig) -> Result<Document> + Send + Sync>;
type ReadFn<T> = Box<dyn Fn(&mut T, &Document, &MapperConfig) -> Result<()> + Send + Sync>;
type WriteMergedFn<T> = Box<dyn Fn(&T, &MapperConfig) -> Result<Object> + Send + Sync>;
type ReadMergedFn<T> =
    Box<dyn Fn(&mut T, &Object, &MapperConfig, &mut HashSet<String>) -> Result<()> + Send + Sync>;
type ReadRestFn<T> = Box<dyn Fn(&mut T, Object, &MapperConfig) -> Result<()> + Send + Sync>;
type KeysFn = fn() -> HashSet<String>;

/// Type-erased accessors binding a field to its slot on `T`.
pub(crate) enum Binding<T> {
    Value { write: WriteFn<T>, read: ReadFn<T> },
    Unwrapped {
        write: WriteMergedFn<T>,
        read: ReadMergedFn<T>,
        keys: KeysFn,
    },
    CatchAll { write: WriteMergedFn<T>, read: ReadRestFn<T> },
    BackReference { relation: &'static str },
    Ignored,
}

/// One field of a [`TypeDescriptor`].
pub struct Field<T> {
    name: &'static str,
    key: String,
    include: Option<Include>,
    required: bool,
    managed: Option<&'static str>,
    pub(crate) binding: Binding<T>,
}

impl<T> Field<T> {
    /// The Rust field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The document key, after renaming.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The field's own inclusion policy, if it sets one.
    pub fn include(&self) -> Option<Include> {
        self.include
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn role(&self) -> FieldRole {
        match self.binding {
            Binding::Value { .. } => FieldRole::Value,
            Binding::Unwrapped { .. } => FieldRole::Unwrapped,
            Binding::CatchAll { .. } => FieldRole::CatchAll,
            Binding::BackReference { .. } => FieldRole::BackReference,
            Binding::Ignored => FieldRole::Ignored,
        }
    }

    /// The reference relation this field belongs to: the forward side when
    /// marked `managed`, the back side when declared as a back-reference.
    pub fn relation(&self) -> Option<&'static str> {
        match self.binding {
            Binding::BackReference { relation } => Some(relation),
            _ => self.managed,
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("role", &self.role())
            .field("include", &self.include)
            .field("required", &self.required)
            .field("relation", &self.relation())
            .finish_non_exhaustive()
    }
}

/// Static mapping metadata for `T`.
pub struct TypeDescriptor<T> {
    type_name: &'static str,
    root_name: &'static str,
    fields: Vec<Field<T>>,
    order: Vec<String>,
    include: Option<Include>,
    ignored_keys: Vec<String>,
}

impl<T> TypeDescriptor<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Key used when the mapper wraps this type as a document root. Defaults
    /// to the type name.
    pub fn root_name(&self) -> &'static str {
        self.root_name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Look up a field by its Rust name.
    pub fn field(&self, name: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Keys written first, in this order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Descriptor-wide inclusion policy, if set.
    pub fn default_include(&self) -> Option<Include> {
        self.include
    }

    /// Keys neither written nor read, nor reported as unknown.
    pub fn ignored_keys(&self) -> &[String] {
        &self.ignored_keys
    }

    pub fn is_ignored_key(&self, key: &str) -> bool {
        self.ignored_keys.iter().any(|k| k == key)
    }

    /// Every document key this descriptor reads or deliberately skips: own
    /// field keys of all roles, ignored keys, and the keys of unwrapped
    /// records. A catch-all entry may not use any of them.
    pub fn claimed_keys(&self) -> HashSet<String> {
        self.reserved_keys(None)
    }

    /// [`claimed_keys`](Self::claimed_keys), leaving out the keys of the
    /// unwrapped field at `except`.
    pub(crate) fn reserved_keys(&self, except: Option<usize>) -> HashSet<String> {
        let mut keys: HashSet<String> = self.ignored_keys.iter().cloned().collect();
        for (index, field) in self.fields.iter().enumerate() {
            match &field.binding {
                Binding::Unwrapped { keys: nested, .. } if Some(index) != except => {
                    keys.extend(nested());
                }
                Binding::Unwrapped { .. } | Binding::CatchAll { .. } => {}
                Binding::Value { .. } | Binding::BackReference { .. } | Binding::Ignored => {
                    keys.insert(field.key.clone());
                }
            }
        }
        keys
    }

    /// `(field name, relation name)` for each field taking part in a
    /// reference relation.
    pub fn relations(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.fields
            .iter()
            .filter_map(|f| f.relation().map(|relation| (f.name, relation)))
    }
}

impl<T: 'static> TypeDescriptor<T> {
    pub fn builder(type_name: &'static str) -> DescriptorBuilder<T> {
        DescriptorBuilder {
            descriptor: TypeDescriptor {
                type_name,
                root_name: type_name,
                fields: Vec::new(),
                order: Vec::new(),
                include: None,
                ignored_keys: Vec::new(),
            },
        }
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("root_name", &self.root_name)
            .field("fields", &self.fields)
            .field("order", &self.order)
            .field("include", &self.include)
            .field("ignored_keys", &self.ignored_keys)
            .finish()
    }
}

/// Builds a [`TypeDescriptor`].
///
/// Fields are declared in the order they are written. The field modifiers
/// ([`rename`](Self::rename), [`include`](Self::include),
/// [`required`](Self::required), [`managed`](Self::managed)) apply to the
/// most recently declared field.
#[must_use]
pub struct DescriptorBuilder<T> {
    descriptor: TypeDescriptor<T>,
}

impl<T: 'static> DescriptorBuilder<T> {
    /// Wrap key used by `wrap_root` and `unwrap_root`, in place of the type
    /// name.
    pub fn root_name(mut self, root_name: &'static str) -> Self {
        self.descriptor.root_name = root_name;
        self
    }

    /// Keys to write first, in this order. Unlisted keys follow in
    /// declaration order.
    pub fn order<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.descriptor.order = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Inclusion policy for every field that sets none.
    pub fn default_include(mut self, include: Include) -> Self {
        self.descriptor.include = Some(include);
        self
    }

    /// Document keys to neither write nor read. Matching fields are skipped
    /// and matching input keys are never unknown.
    pub fn ignore_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.descriptor
            .ignored_keys
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// Declare a field converted by its type's [`Convert`] impl.
    pub fn field<V, G, S>(self, name: &'static str, get: G, set: S) -> Self
    where
        V: Convert + 'static,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.field_with(name, Standard, get, set)
    }

    /// Declare a field converted by a custom [`Converter`].
    pub fn field_with<V, C, G, S>(self, name: &'static str, converter: C, get: G, set: S) -> Self
    where
        V: 'static,
        C: Converter<V> + 'static,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let writer = Arc::new(converter);
        let reader = Arc::clone(&writer);
        self.push(
            name,
            Binding::Value {
                write: Box::new(move |value: &T, config: &MapperConfig| {
                    writer.to_document(get(value), config)
                }),
                read: Box::new(move |target: &mut T, document: &Document, config: &MapperConfig| {
                    set(target, reader.from_document(document, config)?);
                    Ok(())
                }),
            },
        )
    }

    /// Declare a nested record whose keys are merged into this object.
    pub fn unwrapped<V, G, S>(self, name: &'static str, get: G, set: S) -> Self
    where
        V: Mapped,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.push(
            name,
            Binding::Unwrapped {
                write: Box::new(move |value: &T, config: &MapperConfig| {
                    mapper::write_record(get(value), V::descriptor(), config)
                }),
                read: Box::new(
                    move |target: &mut T,
                          object: &Object,
                          config: &MapperConfig,
                          claimed: &mut HashSet<String>| {
                        let mut inner = V::default();
                        mapper::read_fields(&mut inner, object, V::descriptor(), config, claimed)?;
                        set(target, inner);
                        Ok(())
                    },
                ),
                keys: claimed_keys_of::<V>,
            },
        )
    }

    /// Declare a catch-all map: its entries are written as keys of this
    /// object after the declared fields, and every key no other field claims
    /// is read into it.
    pub fn catch_all<V, G, S>(self, name: &'static str, get: G, set: S) -> Self
    where
        V: Convert + 'static,
        G: Fn(&T) -> &BTreeMap<String, V> + Send + Sync + 'static,
        S: Fn(&mut T, BTreeMap<String, V>) + Send + Sync + 'static,
    {
        self.push(
            name,
            Binding::CatchAll {
                write: Box::new(move |value: &T, config: &MapperConfig| {
                    let mut object = Object::new();
                    for (key, entry) in get(value) {
                        object.insert(key.as_str(), entry.to_document(config).map_err(|e| e.at(key))?);
                    }
                    Ok(object)
                }),
                read: Box::new(move |target: &mut T, rest: Object, config: &MapperConfig| {
                    let mut entries = BTreeMap::new();
                    for (key, document) in rest {
                        let entry = V::from_document(&document, config).map_err(|e| e.at(&key))?;
                        entries.insert(key, entry);
                    }
                    set(target, entries);
                    Ok(())
                }),
            },
        )
    }

    /// Declare the child side of a reference relation. The field is never
    /// written and is left unset on read; see
    /// [`ReferenceRelation`](crate::ReferenceRelation).
    pub fn back_reference(self, name: &'static str, relation: &'static str) -> Self {
        self.push(name, Binding::BackReference { relation })
    }

    /// Declare a field that is never written. Its key is tolerated on read.
    pub fn ignored(self, name: &'static str) -> Self {
        self.push(name, Binding::Ignored)
    }

    /// Write and read the last field under `key` instead of its name.
    pub fn rename(mut self, key: impl Into<String>) -> Self {
        if let Some(field) = self.descriptor.fields.last_mut() {
            field.key = key.into();
        }
        self
    }

    pub fn include(mut self, include: Include) -> Self {
        if let Some(field) = self.descriptor.fields.last_mut() {
            field.include = Some(include);
        }
        self
    }

    pub fn skip_when_empty(self) -> Self {
        self.include(Include::SkipWhenEmpty)
    }

    /// Fail with `MissingField` when the last field's key is absent.
    pub fn required(mut self) -> Self {
        if let Some(field) = self.descriptor.fields.last_mut() {
            field.required = true;
        }
        self
    }

    /// Mark the last field as the forward (written) side of `relation`.
    pub fn managed(mut self, relation: &'static str) -> Self {
        if let Some(field) = self.descriptor.fields.last_mut() {
            field.managed = Some(relation);
        }
        self
    }

    pub fn build(self) -> TypeDescriptor<T> {
        self.descriptor
    }

    fn push(mut self, name: &'static str, binding: Binding<T>) -> Self {
        self.descriptor.fields.push(Field {
            name,
            key: name.to_owned(),
            include: None,
            required: false,
            managed: None,
            binding,
        });
        self
    }
}

fn claimed_keys_of<V: Mapped>() -> HashSet<String> {
    V::descriptor().claimed_keys()
}
