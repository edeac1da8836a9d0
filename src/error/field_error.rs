//! Field validation failure types.
//!
//! This module provides [`FieldError`] for single rule failures and
//! [`FieldErrors`] for the ordered list of failures of one validation call.

use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::prelude::*;

use crate::path::FieldPath;

/// What part of the validated value a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A field rule failed on a field, sequence element or map value.
    Field,
    /// A key rule (between `keys` and `endkeys`) failed on a map key.
    Key,
    /// A struct-level validator reported the failure.
    StructLevel,
}

/// A single rule failure with full context.
///
/// `FieldError` captures all relevant information about a failed rule:
/// - **path**: Where in the value the failure occurred
/// - **tag**: The failing rule name, or the whole OR group (`email|numeric`)
/// - **param**: The rule parameter (`5` for `min=5`), empty when absent
/// - **kind**: Whether a field, a map key or a struct-level validator failed
/// - **value**: The offending value, when known
/// - **message**: Human-readable description
///
/// # Example
///
/// ```rust
/// use tagcheck::{FailureKind, FieldError, FieldPath};
///
/// let error = FieldError::new(FieldPath::from_field("Password"), "min")
///     .with_param("5")
///     .with_value("ki");
///
/// assert_eq!(error.tag, "min");
/// assert_eq!(error.kind, FailureKind::Field);
/// assert_eq!(
///     error.to_string(),
///     "Key: 'Password' Error:Field validation for 'Password' failed on the 'min' tag"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// The path to the value that failed validation.
    pub path: FieldPath,
    /// The failing rule name or rendered OR group.
    pub tag: String,
    /// The rule parameter, empty when the rule has none.
    pub param: String,
    /// The kind of failure.
    pub kind: FailureKind,
    /// The value that failed, when it is known.
    pub value: Option<Value>,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Creates a field failure for `tag` at `path`.
    ///
    /// The message is derived from the path and tag; use `with_message` to
    /// override it.
    pub fn new(path: FieldPath, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let message = default_message(&path, &tag, FailureKind::Field);
        Self {
            path,
            tag,
            param: String::new(),
            kind: FailureKind::Field,
            value: None,
            message,
        }
    }

    /// Sets the rule parameter and returns self for chaining.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    /// Sets the failure kind and returns self for chaining.
    ///
    /// A message set through `with_message` is kept.
    pub fn with_kind(mut self, kind: FailureKind) -> Self {
        if self.message == default_message(&self.path, &self.tag, self.kind) {
            self.message = default_message(&self.path, &self.tag, kind);
        }
        self.kind = kind;
        self
    }

    /// Sets the offending value and returns self for chaining.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets a custom message and returns self for chaining.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns the name of the innermost record field this failure refers to.
    pub fn field(&self) -> &str {
        self.path.field_name().unwrap_or("")
    }
}

fn default_message(path: &FieldPath, tag: &str, kind: FailureKind) -> String {
    let field = path.field_name().unwrap_or("");
    match kind {
        FailureKind::Field => format!(
            "Key: '{}' Error:Field validation for '{}' failed on the '{}' tag",
            path, field, tag
        ),
        FailureKind::Key => format!(
            "Key: '{}' Error:Key validation for '{}' failed on the '{}' tag",
            path, field, tag
        ),
        FailureKind::StructLevel => format!(
            "Key: '{}' Error:Struct validation for '{}' failed on the '{}' tag",
            path, field, tag
        ),
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FieldError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<FieldError>();
    assert_sync::<FieldError>();
};

/// A non-empty, ordered collection of field failures.
///
/// `FieldErrors` wraps a `NonEmptyVec<FieldError>` so a failed
/// `Validation<(), FieldErrors>` always carries at least one failure.
/// Failures appear in traversal order with struct-level failures last.
///
/// # Combining Errors
///
/// ```rust
/// use tagcheck::{FieldError, FieldErrors, FieldPath};
/// use stillwater::prelude::*;
///
/// let first = FieldErrors::single(FieldError::new(FieldPath::from_field("Id"), "required"));
/// let second = FieldErrors::single(FieldError::new(FieldPath::from_field("Name"), "required"));
///
/// let combined = first.combine(second);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldErrors(NonEmptyVec<FieldError>);

impl FieldErrors {
    /// Creates a `FieldErrors` containing a single failure.
    pub fn single(error: FieldError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `FieldErrors` from a vec, or `None` if the vec is empty.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Returns the number of failures in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained failures.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Returns all failures at the specified path.
    pub fn at_path(&self, path: &FieldPath) -> Vec<&FieldError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all failures with the specified tag.
    pub fn with_tag(&self, tag: &str) -> Vec<&FieldError> {
        self.0.iter().filter(|e| e.tag == tag).collect()
    }

    /// Returns all failures of the specified kind.
    pub fn of_kind(&self, kind: FailureKind) -> Vec<&FieldError> {
        self.0.iter().filter(|e| e.kind == kind).collect()
    }

    /// Returns the first failure in the collection.
    pub fn first(&self) -> &FieldError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<FieldError>`.
    pub fn into_vec(self) -> Vec<FieldError> {
        self.0.into_vec()
    }
}

impl Semigroup for FieldErrors {
    fn combine(self, other: Self) -> Self {
        FieldErrors(self.0.combine(other.0))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = Box<dyn Iterator<Item = &'a FieldError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}
