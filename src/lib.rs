//! # Tagcheck
//!
//! A declarative validation engine driven by compact rule strings such as
//! `"required,min=5"` or `"dive,keys,required,endkeys,gt=500"`.
//!
//! ## Overview
//!
//! Rules are attached to the fields of a [`StructSchema`] or applied to a
//! single value. Validation walks nested records, sequences and maps and
//! reports every failing field with its path, the failing tag and its
//! parameter. Results use stillwater's `Validation` type, so a failure
//! always carries a non-empty [`FieldErrors`] list.
//!
//! Misconfiguration (unknown rules, alias cycles, cross-field rules naming a
//! missing field, `dive` on a scalar) is a [`ValidatorError`], never a
//! validation failure.
//!
//! ## Core Types
//!
//! - [`Validator`]: Entry point that runs validations
//! - [`RuleRegistry`]: Named predicates, aliases and struct-level validators
//! - [`StructSchema`]: Per-type field rules and nested-record shapes
//! - [`FieldError`]: A single failure with path, tag, parameter and value
//! - [`FieldPath`]: Paths such as `Addresses[0].City` or `Wallets[BCA]`
//!
//! ## Example
//!
//! ```rust
//! use tagcheck::{StructSchema, Validator};
//! use serde_json::json;
//!
//! let validator = Validator::new();
//!
//! let address = StructSchema::new("Address")
//!     .field("City", "required")
//!     .field("Country", "required");
//! let user = StructSchema::new("User")
//!     .field("Id", "required")
//!     .list("Addresses", "required,dive", address)
//!     .field("Hobbies", "dive,required,min=3");
//!
//! let result = validator
//!     .validate_struct(
//!         &user,
//!         &json!({
//!             "Id": "1",
//!             "Addresses": [{"City": "Jakarta", "Country": ""}],
//!             "Hobbies": ["Gaming", "X"]
//!         }),
//!     )
//!     .unwrap();
//!
//! let errors = result.into_result().unwrap_err();
//! let paths: Vec<_> = errors.iter().map(|e| e.path.to_string()).collect();
//! assert_eq!(paths, vec!["Addresses[0].Country", "Hobbies[1]"]);
//! ```

pub mod error;
mod evaluator;
pub mod path;
pub mod registry;
pub mod rule;
pub mod schema;
pub mod struct_level;
pub mod validator;
mod walker;

pub use error::{FailureKind, FieldError, FieldErrors, ParseError, RegistryError, ValidatorError};
pub use path::{FieldPath, PathSegment};
pub use registry::{RuleRegistry, StructLevelFn, DEFAULT_MAX_ALIAS_DEPTH};
pub use rule::{Dive, FieldRules, ParamKind, PredicateKind, PredicateRule, RuleExpr};
pub use schema::{FieldDef, Shape, StructSchema};
pub use struct_level::StructLevel;
pub use validator::Validator;

/// Type alias for validation results using FieldErrors
pub type ValidationResult = stillwater::Validation<(), FieldErrors>;
