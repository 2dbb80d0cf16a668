//! Mapper-wide options.

use crate::descriptor::Include;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Options shared by every conversion a [`Mapper`](crate::Mapper) runs.
///
/// Per-type and per-field settings (renames, order, date patterns) live on the
/// [`TypeDescriptor`](crate::TypeDescriptor); this struct only holds the
/// switches that apply across types. Missing keys take their defaults when
/// loaded from JSON:
///
/// ```
/// use docmap_core::MapperConfig;
///
/// let config = MapperConfig::from_json(r#"{"pretty": true, "wrap_root": true}"#).unwrap();
/// assert!(config.pretty);
/// assert!(!config.unwrap_root);
/// assert!(!config.strict_unknown_keys);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Indent text output.
    pub pretty: bool,
    /// Wrap top-level records under a key named after their root name when
    /// writing.
    pub wrap_root: bool,
    /// Expect that wrapper when reading. Independent of `wrap_root`, so a
    /// mapper can write wrapped documents and still read plain ones.
    pub unwrap_root: bool,
    /// Reject document keys no field claims instead of ignoring them.
    pub strict_unknown_keys: bool,
    /// Accept a variant index for labeled enums. Off by default: numbers
    /// fail with `InvalidEnumValue`.
    pub enums_from_numbers: bool,
    /// Inclusion policy for fields and descriptors that set none.
    pub default_include: Include,
}

impl MapperConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
