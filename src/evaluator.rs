//! Evaluates rule expressions against single values.

use serde_json::Value;

use crate::error::{ParseError, ValidatorError};
use crate::path::FieldPath;
use crate::registry::RuleRegistry;
use crate::rule::{PredicateKind, RuleExpr};
use crate::schema::{FieldDef, Shape, StructSchema};
use crate::walker::Parent;

static NULL: Value = Value::Null;

/// Where cross-field predicates find the value they compare against.
#[derive(Clone, Copy)]
pub(crate) enum Siblings<'a> {
    /// No comparison value is available.
    None,
    /// Siblings are fields of the enclosing record.
    Record(Parent<'a>),
    /// Every cross-field predicate compares against this value.
    Value(&'a Value),
}

impl<'a> Siblings<'a> {
    /// Resolves a sibling by field name; dotted names reach into nested records.
    ///
    /// A field the schema declares but the input lacks resolves to null.
    fn resolve(self, name: &str) -> Option<&'a Value> {
        match self {
            Siblings::None => None,
            Siblings::Value(value) => Some(value),
            Siblings::Record(parent) => {
                let mut parts = name.split('.');
                let first = parts.next()?;
                let (mut current, mut shape) =
                    lookup(parent.record.get(first), Some(parent.schema), first)?;
                for part in parts {
                    let nested = match shape {
                        Some(Shape::Record(schema)) => Some(schema.as_ref()),
                        _ => None,
                    };
                    (current, shape) = lookup(current.get(part), nested, part)?;
                }
                Some(current)
            }
        }
    }
}

fn lookup<'a>(
    found: Option<&'a Value>,
    schema: Option<&'a StructSchema>,
    name: &str,
) -> Option<(&'a Value, Option<&'a Shape>)> {
    let shape = schema.and_then(|s| s.get(name)).map(FieldDef::shape);
    match (found, shape) {
        (Some(value), _) => Some((value, shape)),
        (None, Some(_)) => Some((&NULL, shape)),
        (None, None) => None,
    }
}

/// A failed expression: the tag to report and its parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Failure {
    pub(crate) tag: String,
    pub(crate) param: String,
}

pub(crate) struct Evaluator<'r> {
    registry: &'r RuleRegistry,
}

impl<'r> Evaluator<'r> {
    pub(crate) fn new(registry: &'r RuleRegistry) -> Self {
        Self { registry }
    }

    /// Evaluates `expr`, returning the first failure.
    ///
    /// `And` stops at its first failing child. `Or` stops at its first
    /// passing child and, when none pass, fails as a whole group.
    pub(crate) fn evaluate(
        &self,
        expr: &RuleExpr,
        value: &Value,
        siblings: Siblings<'_>,
        path: &FieldPath,
    ) -> Result<Option<Failure>, ValidatorError> {
        match expr {
            RuleExpr::Predicate { name, param } => {
                if self.check(name, param, value, siblings, path)? {
                    Ok(None)
                } else {
                    Ok(Some(Failure {
                        tag: name.clone(),
                        param: param.clone(),
                    }))
                }
            }
            RuleExpr::And(children) => {
                for child in children {
                    if let Some(failure) = self.evaluate(child, value, siblings, path)? {
                        return Ok(Some(failure));
                    }
                }
                Ok(None)
            }
            RuleExpr::Or(children) => {
                for child in children {
                    if self.evaluate(child, value, siblings, path)?.is_none() {
                        return Ok(None);
                    }
                }
                Ok(Some(Failure {
                    tag: expr.to_string(),
                    param: String::new(),
                }))
            }
        }
    }

    fn check(
        &self,
        name: &str,
        param: &str,
        value: &Value,
        siblings: Siblings<'_>,
        path: &FieldPath,
    ) -> Result<bool, ValidatorError> {
        let rule = self
            .registry
            .predicate(name)
            .ok_or_else(|| ValidatorError::Parse {
                field: path.to_string(),
                rules: name.to_string(),
                source: ParseError::UnknownRule(name.to_string()),
            })?;

        match rule.kind() {
            PredicateKind::Simple(check) => Ok(check(value, param)),
            PredicateKind::CrossField(check) => {
                let other = siblings
                    .resolve(param)
                    .ok_or_else(|| ValidatorError::UnknownField {
                        field: path.to_string(),
                        rule: name.to_string(),
                        sibling: param.to_string(),
                    })?;
                Ok(check(value, other, param))
            }
        }
    }
}
