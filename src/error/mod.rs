//! Error types for validation failures and misconfiguration.
//!
//! Validation failures are data: [`FieldError`] and [`FieldErrors`] describe
//! which value broke which rule. Misconfiguration (bad rule strings, unknown
//! sibling fields, invalid registrations) is reported through
//! [`ValidatorError`] and aborts the validation call.

mod field_error;
mod validator_error;

pub use field_error::{FailureKind, FieldError, FieldErrors};
pub use validator_error::{ParseError, RegistryError, ValidatorError};
