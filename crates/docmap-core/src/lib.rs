//! # docmap-core
//!
//! Descriptor-driven mapping between typed Rust values and JSON document
//! trees.
//!
//! Each mapped type registers a static [`TypeDescriptor`] listing its fields,
//! their document keys, converters and inclusion rules. The [`Mapper`] walks
//! that table in both directions: value → [`Document`] → JSON text, and back.
//! Renamed keys, skip-when-empty fields, explicit key order, unwrapped
//! sub-records, catch-all maps, custom date formats, labeled enums and
//! parent/child back-references are all configured on the descriptor rather
//! than discovered at runtime.
//!
//! ## Quick start
//!
//! ```rust
//! use docmap_core::{Document, Mapper, Object};
//!
//! let mapper = Mapper::default();
//! let tree = mapper
//!     .read_tree(r#"{"profession":{"title":"Software Engineer","salary":45000}}"#)
//!     .unwrap();
//!
//! let salary = tree.lookup_or("/profession/salary", &Document::Null).as_i64_or(0);
//! let title = tree.lookup_or("/profession/title", &Document::Null).as_text_or("default");
//! assert_eq!((salary, title.as_str()), (45000, "Software Engineer"));
//!
//! let mut node = Object::new();
//! node.insert("fullName", "Billel");
//! node.insert("hobbies", vec![Document::from("Mangas"), Document::from("Sports")]);
//! mapper.put_value(&mut node, "salary", &45000i32).unwrap();
//! assert_eq!(
//!     mapper.write_tree(&node.into()).unwrap(),
//!     r#"{"fullName":"Billel","hobbies":["Mangas","Sports"],"salary":45000}"#
//! );
//! ```
//!
//! ## Modules
//!
//! - [`document`] -- `Document` tree, object builder, path lookup
//! - [`text`] -- JSON text in and out, compact or pretty
//! - [`convert`] -- default converters (`Convert`, `Labeled`, registration macros)
//! - [`converter`] -- pluggable per-field converters (`DateFormat`, `Optional`, `RawJson`)
//! - [`descriptor`] -- `TypeDescriptor`, field roles, inclusion policy, `Mapped`
//! - [`mapper`] -- `Mapper`, record read/write
//! - [`reference`] -- `BackLink` and `ReferenceRelation` for parent/child graphs
//! - [`config`] -- `MapperConfig`
//! - [`error`] -- `MapError` and the `Result` alias

pub mod config;
pub mod convert;
pub mod converter;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod mapper;
pub mod reference;
pub mod text;

pub use config::MapperConfig;
pub use convert::{Convert, Labeled};
pub use converter::{Converter, DateFormat, Optional, RawJson, Standard};
pub use descriptor::{DescriptorBuilder, Field, FieldRole, Include, Mapped, TypeDescriptor};
pub use document::{Document, Object};
pub use error::{MapError, Result};
pub use mapper::Mapper;
pub use reference::{BackLink, ReferenceRelation};
