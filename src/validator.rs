//! The validation entry point.
//!
//! [`Validator`] ties the pieces together: it parses rule strings, walks the
//! value, evaluates each step, runs struct-level validators and aggregates
//! the failures into a [`ValidationResult`].

use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use stillwater::Validation;

use crate::error::{FieldError, FieldErrors, RegistryError, ValidatorError};
use crate::evaluator::{Evaluator, Siblings};
use crate::path::FieldPath;
use crate::registry::RuleRegistry;
use crate::rule::{FieldRules, PredicateRule};
use crate::schema::{Shape, StructSchema};
use crate::struct_level::StructLevel;
use crate::walker::{check_record_dive, Step, Walker};
use crate::ValidationResult;

static GLOBAL: OnceLock<Validator> = OnceLock::new();
static NO_RULES: FieldRules = FieldRules {
    expr: None,
    dive: None,
};

/// Validates values against rule strings and struct schemas.
///
/// Clones share one [`RuleRegistry`]. Register custom rules, aliases and
/// struct-level validators first, then validate from any number of threads.
///
/// Every validation call returns `Err` for misconfiguration (unknown rule,
/// alias cycle, unknown sibling field, impossible `dive`) and otherwise
/// `Ok` with a `Validation` that is a success or carries every failure.
///
/// # Example
///
/// ```rust
/// use tagcheck::{StructSchema, Validator};
/// use serde_json::json;
///
/// let validator = Validator::new();
///
/// let result = validator.validate_var(&json!(""), "required").unwrap();
/// assert!(result.is_failure());
///
/// let login = StructSchema::new("LoginRequest")
///     .field("Username", "required,email")
///     .field("Password", "required,min=5");
///
/// let result = validator
///     .validate_struct(&login, &json!({"Username": "dicki", "Password": "ki"}))
///     .unwrap();
/// let errors = result.into_result().unwrap_err();
/// let tags: Vec<_> = errors.iter().map(|e| (e.field(), e.tag.as_str())).collect();
/// assert_eq!(tags, vec![("Username", "email"), ("Password", "min")]);
/// ```
#[derive(Clone, Default)]
pub struct Validator {
    registry: RuleRegistry,
}

impl Validator {
    /// Creates a validator with its own registry of built-in rules.
    pub fn new() -> Self {
        Self {
            registry: RuleRegistry::new(),
        }
    }

    /// Creates a validator over an existing registry.
    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    /// Returns the process-wide validator.
    ///
    /// Perform all registrations on it during start-up, before validating
    /// concurrently.
    pub fn global() -> &'static Validator {
        GLOBAL.get_or_init(Validator::new)
    }

    /// Sets the maximum nesting of alias expansion.
    pub fn with_max_alias_depth(mut self, depth: usize) -> Self {
        self.registry = self.registry.with_max_alias_depth(depth);
        self
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Registers a custom predicate; see [`RuleRegistry::register_predicate`].
    pub fn register_validation(
        &self,
        name: impl Into<String>,
        rule: PredicateRule,
    ) -> Result<(), RegistryError> {
        self.registry.register_predicate(name, rule)
    }

    /// Registers an alias; see [`RuleRegistry::register_alias`].
    pub fn register_alias(
        &self,
        alias: impl Into<String>,
        expansion: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.registry.register_alias(alias, expansion)
    }

    /// Registers a struct-level validator; see [`RuleRegistry::register_struct_level`].
    pub fn register_struct_validation<F>(
        &self,
        type_name: impl Into<String>,
        validator: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&mut StructLevel<'_>) + Send + Sync + 'static,
    {
        self.registry.register_struct_level(type_name, validator)
    }

    /// Validates a single value against a rule string.
    ///
    /// `dive` works on sequence and map values. Cross-field rules have no
    /// siblings here and fail with [`ValidatorError::UnknownField`].
    pub fn validate_var(&self, value: &Value, rules: &str) -> Result<ValidationResult, ValidatorError> {
        self.run_var(value, rules, None)
    }

    /// Validates `value` against a rule string, with `other` as the
    /// comparison value of every cross-field rule.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagcheck::Validator;
    /// use serde_json::json;
    ///
    /// let validator = Validator::new();
    /// let result = validator
    ///     .validate_var_with_value(&json!(""), &json!("beda"), "eqfield")
    ///     .unwrap();
    /// assert!(result.is_failure());
    /// ```
    pub fn validate_var_with_value(
        &self,
        value: &Value,
        other: &Value,
        rules: &str,
    ) -> Result<ValidationResult, ValidatorError> {
        self.run_var(value, rules, Some(other))
    }

    /// Validates a record against its schema, including nested records and
    /// struct-level validators.
    pub fn validate_struct(
        &self,
        schema: &StructSchema,
        value: &Value,
    ) -> Result<ValidationResult, ValidatorError> {
        let steps = Walker::new(&self.registry).walk_struct(schema, value)?;
        self.run(steps, None)
    }

    /// Serializes `input` and validates it against `schema`.
    pub fn validate<T>(&self, schema: &StructSchema, input: &T) -> Result<ValidationResult, ValidatorError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(input)?;
        self.validate_struct(schema, &value)
    }

    /// Parses every rule string of `schema` and its nested schemas.
    ///
    /// Call it during set-up to surface rule-string mistakes before the
    /// first validation, including rules after `dive` on a nested record.
    pub fn check_schema(&self, schema: &StructSchema) -> Result<(), ValidatorError> {
        for (name, def) in schema.fields() {
            let field = FieldPath::from_field(format!("{}.{}", schema.name(), name));
            let parsed = self
                .registry
                .parse(def.rules())
                .map_err(|source| ValidatorError::Parse {
                    field: field.to_string(),
                    rules: def.rules().to_string(),
                    source,
                })?;

            let mut rules = &parsed;
            let mut shape = def.shape();
            loop {
                match shape {
                    Shape::Value => break,
                    Shape::Record(nested) => {
                        check_record_dive(&field, rules)?;
                        self.check_schema(nested)?;
                        break;
                    }
                    Shape::List(inner) | Shape::Map(inner) => {
                        rules = rules.dive.as_deref().map_or(&NO_RULES, |dive| &dive.elements);
                        shape = inner.as_ref();
                    }
                }
            }
        }
        Ok(())
    }

    fn run_var(
        &self,
        value: &Value,
        rules: &str,
        other: Option<&Value>,
    ) -> Result<ValidationResult, ValidatorError> {
        let parsed = self
            .registry
            .parse(rules)
            .map_err(|source| ValidatorError::Parse {
                field: String::new(),
                rules: rules.to_string(),
                source,
            })?;
        let steps = Walker::new(&self.registry).walk_var(value, &parsed)?;
        self.run(steps, other)
    }

    fn run(&self, steps: Vec<Step<'_>>, other: Option<&Value>) -> Result<ValidationResult, ValidatorError> {
        let evaluator = Evaluator::new(&self.registry);
        let step_count = steps.len();
        let mut errors = Vec::new();
        let mut records = Vec::new();

        for step in steps {
            match step {
                Step::Field {
                    path,
                    value,
                    expr,
                    kind,
                    parent,
                } => {
                    let siblings = match (other, parent) {
                        (Some(other), _) => Siblings::Value(other),
                        (None, Some(parent)) => Siblings::Record(parent),
                        (None, None) => Siblings::None,
                    };
                    if let Some(failure) = evaluator.evaluate(&expr, &value, siblings, &path)? {
                        tracing::trace!(path = %path, tag = %failure.tag, "rule failed");
                        errors.push(
                            FieldError::new(path, failure.tag)
                                .with_param(failure.param)
                                .with_kind(kind)
                                .with_value(value.into_owned()),
                        );
                    }
                }
                Step::Record {
                    path,
                    schema,
                    value,
                } => {
                    if let Some(hook) = self.registry.struct_level(schema.name()) {
                        records.push((hook, value, path));
                    }
                }
            }
        }

        for (hook, record, path) in records {
            errors.extend(run_struct_level(&*hook, record, path));
        }
        tracing::debug!(steps = step_count, failures = errors.len(), "validation finished");

        Ok(match FieldErrors::from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(()),
        })
    }
}

fn run_struct_level(
    hook: &(dyn Fn(&mut StructLevel<'_>) + Send + Sync),
    record: &Value,
    path: FieldPath,
) -> Vec<FieldError> {
    let mut level = StructLevel::new(record, path);
    hook(&mut level);
    tracing::trace!(path = %level.path(), reported = level.reported(), "struct-level validator ran");
    level.into_errors()
}
