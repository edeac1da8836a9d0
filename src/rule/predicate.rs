//! Predicate rules and their parameter contracts.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ParseError;

/// Signature of a predicate that only looks at the value and its parameter.
pub type SimpleFn = Arc<dyn Fn(&Value, &str) -> bool + Send + Sync>;

/// Signature of a predicate that also compares against another field's value.
pub type CrossFieldFn = Arc<dyn Fn(&Value, &Value, &str) -> bool + Send + Sync>;

/// What a predicate accepts as its `=param`.
///
/// Parameters are checked when the rule string is parsed, so a predicate
/// body never sees a parameter it cannot interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamKind {
    /// Any parameter, including none.
    #[default]
    Any,
    /// A non-empty parameter.
    Required,
    /// An integer parameter (e.g. `pin=4`).
    Integer,
    /// A numeric parameter (e.g. `min=5`, `gt=0.5`).
    Number,
}

impl ParamKind {
    pub(crate) fn check(self, rule: &str, param: &str) -> Result<(), ParseError> {
        let reason = match self {
            ParamKind::Any => return Ok(()),
            ParamKind::Required if param.is_empty() => "a parameter is required",
            ParamKind::Integer if param.parse::<i64>().is_err() => "expected an integer",
            ParamKind::Number if param.parse::<f64>().is_err() => "expected a number",
            _ => return Ok(()),
        };
        Err(ParseError::InvalidParam {
            rule: rule.to_string(),
            param: param.to_string(),
            reason: reason.to_string(),
        })
    }
}

/// How a predicate is invoked.
#[derive(Clone)]
pub enum PredicateKind {
    /// `(value, param) -> bool`
    Simple(SimpleFn),
    /// `(value, other, param) -> bool`; `other` is the sibling field named by
    /// the parameter, or the second value of a two-value validation.
    CrossField(CrossFieldFn),
}

/// A named check that can be referenced from rule strings.
///
/// # Example
///
/// ```rust
/// use tagcheck::{ParamKind, PredicateRule};
///
/// // pin=4 accepts exactly four digits
/// let pin = PredicateRule::simple(|value, param| {
///     let len: usize = param.parse().unwrap_or(0);
///     value
///         .as_str()
///         .map_or(false, |s| s.len() == len && s.bytes().all(|b| b.is_ascii_digit()))
/// })
/// .with_param(ParamKind::Integer);
///
/// assert!(!pin.is_cross_field());
/// ```
#[derive(Clone)]
pub struct PredicateRule {
    kind: PredicateKind,
    param: ParamKind,
}

impl PredicateRule {
    /// Creates a predicate over the value and its parameter.
    pub fn simple<F>(check: F) -> Self
    where
        F: Fn(&Value, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            kind: PredicateKind::Simple(Arc::new(check)),
            param: ParamKind::Any,
        }
    }

    /// Creates a cross-field predicate.
    pub fn cross_field<F>(check: F) -> Self
    where
        F: Fn(&Value, &Value, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            kind: PredicateKind::CrossField(Arc::new(check)),
            param: ParamKind::Any,
        }
    }

    /// Sets the parameter contract and returns self for chaining.
    pub fn with_param(mut self, param: ParamKind) -> Self {
        self.param = param;
        self
    }

    /// Returns the parameter contract.
    pub fn param_kind(&self) -> ParamKind {
        self.param
    }

    /// Returns how the predicate is invoked.
    pub fn kind(&self) -> &PredicateKind {
        &self.kind
    }

    /// Returns true for cross-field predicates.
    pub fn is_cross_field(&self) -> bool {
        matches!(self.kind, PredicateKind::CrossField(_))
    }
}

impl fmt::Debug for PredicateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRule")
            .field("cross_field", &self.is_cross_field())
            .field("param", &self.param)
            .finish()
    }
}
