//! Configuration errors.
//!
//! These errors mean a rule string, a schema or a registration is wrong, not
//! that the validated data is bad. They abort the validation call.

/// Errors produced while parsing a rule string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The rule string references a predicate that is not registered.
    #[error("undefined validation rule '{0}'")]
    UnknownRule(String),

    /// Alias expansion revisited an alias or exceeded the maximum depth.
    #[error("alias cycle detected: {}", .0.join(" -> "))]
    AliasCycle(Vec<String>),

    /// A rule parameter does not fit what the predicate expects.
    #[error("invalid parameter '{param}' for rule '{rule}': {reason}")]
    InvalidParam {
        rule: String,
        param: String,
        reason: String,
    },

    /// A comma or pipe separated term is empty.
    #[error("empty rule term in '{0}'")]
    EmptyTerm(String),

    /// `dive`, `keys` or `endkeys` appears where it is not allowed.
    #[error("misplaced '{marker}' in '{rules}'")]
    MisplacedMarker { marker: String, rules: String },

    /// A `keys` block has no matching `endkeys`.
    #[error("'keys' without matching 'endkeys' in '{0}'")]
    UnclosedKeys(String),
}

/// Errors produced by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a rule, alias or struct-level validator without a name.
    #[error("registration name must not be empty")]
    EmptyName,

    /// Attempted to register one of the structural markers as a rule or alias.
    #[error("'{0}' is a reserved rule name")]
    ReservedName(String),

    /// The name contains a rule-string separator.
    #[error("'{0}' contains a reserved character (',', '|' or '=')")]
    InvalidName(String),

    /// The alias expansion does not parse.
    #[error("alias '{alias}' has an invalid expansion: {source}")]
    InvalidAlias {
        alias: String,
        #[source]
        source: ParseError,
    },
}

/// Fatal errors that abort a validation call.
///
/// A `ValidatorError` never carries a partial validation result: it signals
/// a misconfigured rule string or schema, distinct from invalid input data.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// A rule string failed to parse.
    #[error("rule '{rules}' on '{field}': {source}")]
    Parse {
        field: String,
        rules: String,
        #[source]
        source: ParseError,
    },

    /// A cross-field rule references a sibling field the record does not have.
    #[error("rule '{rule}' on '{field}' references unknown field '{sibling}'")]
    UnknownField {
        field: String,
        rule: String,
        sibling: String,
    },

    /// `dive` was applied to a value that is neither a sequence nor a map.
    #[error("cannot dive into '{field}': expected a sequence or map, got {got}")]
    InvalidDive { field: String, got: &'static str },

    /// A value described by a record schema is not a map of fields.
    #[error("'{field}' must be a '{schema}' record, got {got}")]
    NotARecord {
        schema: String,
        field: String,
        got: &'static str,
    },

    /// The input could not be converted to a validatable value.
    #[error("failed to serialize value for validation: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_cycle_display() {
        let err = ParseError::AliasCycle(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(err.to_string(), "alias cycle detected: a -> b -> a");
    }

    #[test]
    fn test_parse_error_wrapped_with_field() {
        let err = ValidatorError::Parse {
            field: "Pin".into(),
            rules: "pin=x".into(),
            source: ParseError::InvalidParam {
                rule: "pin".into(),
                param: "x".into(),
                reason: "expected an integer".into(),
            },
        };
        let display = err.to_string();
        assert!(display.contains("Pin"));
        assert!(display.contains("expected an integer"));
    }
}
