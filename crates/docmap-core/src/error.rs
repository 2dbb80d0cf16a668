//! Error types for mapping and text operations.
//!
//! Every mapping variant carries a JSON-pointer `path` to the failing
//! location. Leaf converters create errors with an empty path and each
//! enclosing object or array prepends its key with [`MapError::at`], so the
//! caller sees `/cars/1/year` rather than a bare "expected integer".

use thiserror::Error;

/// Errors that can occur while converting between values and documents.
#[derive(Error, Debug)]
pub enum MapError {
    /// A value could not be represented as a document (value → document).
    #[error("cannot convert {} to a document: {message}", shown(.path))]
    Conversion { path: String, message: String },

    /// A required key was absent from the document.
    #[error("missing required field {}", shown(.path))]
    MissingField { path: String },

    /// The document held a key the descriptor does not declare (strict mode).
    #[error("unknown field {}", shown(.path))]
    UnknownField { path: String },

    /// A document node had the wrong kind for its target (document → value).
    #[error("type mismatch at {}: expected {expected}, found {found}", shown(.path))]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// No enumeration variant carries the given label.
    #[error(
        "invalid enum value {value} at {}: expected one of [{}]",
        shown(.path),
        .expected.join(", ")
    )]
    InvalidEnumValue {
        path: String,
        value: String,
        expected: Vec<&'static str>,
    },

    /// An unwrapped or catch-all key landed on a key already written.
    #[error("duplicate key {} while writing document", shown(.path))]
    KeyCollision { path: String },

    /// The input text was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MapError {
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            path: String::new(),
            message: message.into(),
        }
    }

    pub fn missing_field(key: &str) -> Self {
        Self::MissingField {
            path: pointer_segment(key),
        }
    }

    pub fn unknown_field(key: &str) -> Self {
        Self::UnknownField {
            path: pointer_segment(key),
        }
    }

    pub fn key_collision(key: &str) -> Self {
        Self::KeyCollision {
            path: pointer_segment(key),
        }
    }

    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            path: String::new(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn invalid_enum_value(value: impl Into<String>, expected: Vec<&'static str>) -> Self {
        Self::InvalidEnumValue {
            path: String::new(),
            value: value.into(),
            expected,
        }
    }

    /// Prefix the error's path with one more segment (an object key or an
    /// array index). Parse errors have no path and pass through unchanged.
    #[must_use]
    pub fn at(mut self, segment: &str) -> Self {
        if let Some(path) = self.path_mut() {
            path.insert_str(0, &pointer_segment(segment));
        }
        self
    }

    /// The JSON-pointer path of the failing location, if the error has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Conversion { path, .. }
            | Self::MissingField { path }
            | Self::UnknownField { path }
            | Self::TypeMismatch { path, .. }
            | Self::InvalidEnumValue { path, .. }
            | Self::KeyCollision { path } => Some(path),
            Self::Json(_) => None,
        }
    }

    fn path_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Conversion { path, .. }
            | Self::MissingField { path }
            | Self::UnknownField { path }
            | Self::TypeMismatch { path, .. }
            | Self::InvalidEnumValue { path, .. }
            | Self::KeyCollision { path } => Some(path),
            Self::Json(_) => None,
        }
    }
}

/// Escape one key as a JSON-pointer segment (RFC 6901), including the slash.
fn pointer_segment(key: &str) -> String {
    format!("/{}", key.replace('~', "~0").replace('/', "~1"))
}

fn shown(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

/// Convenience alias used throughout docmap-core.
pub type Result<T> = std::result::Result<T, MapError>;
