//! Error types for derivation and decoding

use crate::path::{Path, PathSegment};
use serde_json::Value;
use thiserror::Error;

/// Result of applying a reader to a tree
pub type ReadResult<T> = Result<T, ReadErrors>;

/// Derivation-time failure
///
/// These abort a derivation before any codec is produced. They describe a
/// structural problem with the product type, so they are programming errors
/// rather than data errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeriveError {
    /// Neither a plain nor a variadic deconstructor exists
    #[error("{type_name} has no deconstructor")]
    NoDeconstructor { type_name: String },

    /// No constructor exists
    #[error("{type_name} has no constructor")]
    NoConstructor { type_name: String },

    /// No constructor overload accepts the deconstructed fields
    #[error("no constructor of {type_name} accepts ({})", fields.join(", "))]
    NoMatchingConstructor {
        type_name: String,
        fields: Vec<String>,
    },

    /// The product has zero fields
    #[error("{type_name} has no fields")]
    EmptyProduct { type_name: String },

    /// The getter-only path found no getters
    #[error("{type_name} exposes no accessors")]
    NoAccessors { type_name: String },

    /// One or more field types have no codec; all of them are listed
    #[error("no codec available for {} in {type_name}", types.join(", "))]
    MissingCodecs {
        type_name: String,
        types: Vec<String>,
    },
}

impl DeriveError {
    /// Name of the product type the derivation was attempted for
    pub fn type_name(&self) -> &str {
        match self {
            DeriveError::NoDeconstructor { type_name }
            | DeriveError::NoConstructor { type_name }
            | DeriveError::NoMatchingConstructor { type_name, .. }
            | DeriveError::EmptyProduct { type_name }
            | DeriveError::NoAccessors { type_name }
            | DeriveError::MissingCodecs { type_name, .. } => type_name,
        }
    }
}

/// Reason a single node could not be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Required member is absent
    #[error("missing path")]
    MissingPath,

    /// Node has the wrong kind
    #[error("expected {expected}, found {found}")]
    InvalidType { expected: String, found: String },

    /// Elementary codec rejected the node
    #[error("{0}")]
    Invalid(String),

    /// Recursive codec used before its derivation completed
    #[error("recursive codec for {0} is not bound")]
    Unresolved(String),

    /// A decoded value did not have the type its consumer declared
    #[error("decoded value is not a {0}")]
    ArgumentMismatch(String),
}

impl ReadError {
    /// Wrong-kind error describing what was actually found
    pub fn invalid_type(expected: &str, found: &Value) -> Self {
        ReadError::InvalidType {
            expected: expected.to_string(),
            found: value_kind(found).to_string(),
        }
    }
}

impl From<serde_json::Error> for ReadError {
    fn from(err: serde_json::Error) -> Self {
        ReadError::Invalid(err.to_string())
    }
}

/// Name of a tree node's kind, as used in error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Every failure produced while reading one tree, each tagged with its path
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", render(.entries))]
pub struct ReadErrors {
    entries: Vec<(Path, ReadError)>,
}

fn render(entries: &[(Path, ReadError)]) -> String {
    entries
        .iter()
        .map(|(path, err)| format!("{path}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ReadErrors {
    /// A single failure at `path`
    pub fn new(path: Path, error: ReadError) -> Self {
        Self {
            entries: vec![(path, error)],
        }
    }

    /// A single failure at the node being read
    pub fn at_root(error: ReadError) -> Self {
        Self::new(Path::root(), error)
    }

    pub fn entries(&self) -> &[(Path, ReadError)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(Path, ReadError)> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths of all failures, in the order they were recorded
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|(path, _)| path)
    }

    /// Errors recorded at exactly `path`
    pub fn at(&self, path: &Path) -> Vec<&ReadError> {
        self.entries
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, err)| err)
            .collect()
    }

    /// Accumulate the failures of `other` after these
    pub fn merge(mut self, other: ReadErrors) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Re-anchor every failure under `segment`
    pub fn prefixed(self, segment: impl Into<PathSegment>) -> Self {
        let segment = segment.into();
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(path, err)| (path.prepend(segment.clone()), err))
                .collect(),
        }
    }
}

/// Applicative product of two read results
///
/// Unlike `?`, both sides are inspected: when both fail, the failures of
/// `a` and `b` are accumulated in that order.
pub fn zip<A, B>(a: ReadResult<A>, b: ReadResult<B>) -> ReadResult<(A, B)> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
        (Err(a), Err(b)) => Err(a.merge(b)),
    }
}


#[cfg(test)]
#[path = "error/error_parameterized_tests.rs"]
mod error_parameterized_tests;
