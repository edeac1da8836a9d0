//! Flattens a value and its rules into evaluation steps.
//!
//! The walker descends into sequence elements, map entries and nested
//! records as the parsed rules and the schema shapes direct, producing field
//! steps in traversal order and a record step after each record's fields.

use std::borrow::Cow;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{FailureKind, ValidatorError};
use crate::path::FieldPath;
use crate::registry::RuleRegistry;
use crate::rule::{FieldRules, RuleExpr};
use crate::schema::{Shape, StructSchema};

static NULL: Value = Value::Null;
static PLAIN: Shape = Shape::Value;

/// The record a field belongs to, with the schema that declares its fields.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Parent<'a> {
    pub(crate) record: &'a Map<String, Value>,
    pub(crate) schema: &'a StructSchema,
}

/// One unit of work for the evaluator.
#[derive(Debug)]
pub(crate) enum Step<'a> {
    /// Evaluate `expr` against `value`.
    Field {
        path: FieldPath,
        value: Cow<'a, Value>,
        expr: RuleExpr,
        kind: FailureKind,
        /// The enclosing record, used to resolve sibling fields.
        parent: Option<Parent<'a>>,
    },
    /// All fields of this record have been emitted.
    Record {
        path: FieldPath,
        schema: &'a StructSchema,
        value: &'a Value,
    },
}

pub(crate) struct Walker<'r> {
    registry: &'r RuleRegistry,
    /// Parsed field rules per schema, keyed by schema address.
    parsed: HashMap<usize, Rc<[FieldRules]>>,
}

impl<'r> Walker<'r> {
    pub(crate) fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            parsed: HashMap::new(),
        }
    }

    /// Walks a root record against its schema.
    pub(crate) fn walk_struct<'a>(
        &mut self,
        schema: &'a StructSchema,
        value: &'a Value,
    ) -> Result<Vec<Step<'a>>, ValidatorError> {
        let mut steps = Vec::new();
        self.walk_record(schema, value, FieldPath::root(), &mut steps)?;
        Ok(steps)
    }

    /// Walks a standalone value against already parsed rules.
    pub(crate) fn walk_var<'a>(
        &mut self,
        value: &'a Value,
        rules: &FieldRules,
    ) -> Result<Vec<Step<'a>>, ValidatorError> {
        let mut steps = Vec::new();
        self.walk_level(value, FieldPath::root(), rules, &PLAIN, None, &mut steps)?;
        Ok(steps)
    }

    /// Parses the rules of every field of `schema` once per walk.
    fn field_rules(
        &mut self,
        schema: &StructSchema,
        path: &FieldPath,
    ) -> Result<Rc<[FieldRules]>, ValidatorError> {
        let key = schema as *const StructSchema as usize;
        if let Some(rules) = self.parsed.get(&key) {
            return Ok(Rc::clone(rules));
        }

        let rules = schema
            .fields()
            .map(|(name, def)| {
                self.registry
                    .parse(def.rules())
                    .map_err(|source| ValidatorError::Parse {
                        field: path.push_field(name).to_string(),
                        rules: def.rules().to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let rules: Rc<[FieldRules]> = rules.into();
        self.parsed.insert(key, Rc::clone(&rules));
        Ok(rules)
    }

    fn walk_record<'a>(
        &mut self,
        schema: &'a StructSchema,
        value: &'a Value,
        path: FieldPath,
        steps: &mut Vec<Step<'a>>,
    ) -> Result<(), ValidatorError> {
        let record = value.as_object().ok_or_else(|| ValidatorError::NotARecord {
            schema: schema.name().to_string(),
            field: path.to_string(),
            got: kind_name(value),
        })?;
        let parent = Parent { record, schema };
        let rules = self.field_rules(schema, &path)?;

        for ((name, def), rules) in schema.fields().zip(rules.iter()) {
            let field_value = record.get(name).unwrap_or(&NULL);
            self.walk_level(
                field_value,
                path.push_field(name),
                rules,
                def.shape(),
                Some(parent),
                steps,
            )?;
        }

        steps.push(Step::Record {
            path,
            schema,
            value,
        });
        Ok(())
    }

    fn walk_level<'a>(
        &mut self,
        value: &'a Value,
        path: FieldPath,
        rules: &FieldRules,
        shape: &'a Shape,
        parent: Option<Parent<'a>>,
        steps: &mut Vec<Step<'a>>,
    ) -> Result<(), ValidatorError> {
        if let Some(expr) = &rules.expr {
            steps.push(Step::Field {
                path: path.clone(),
                value: Cow::Borrowed(value),
                expr: expr.clone(),
                kind: FailureKind::Field,
                parent,
            });
        }

        if let Shape::Record(schema) = shape {
            check_record_dive(&path, rules)?;
            return match value {
                Value::Null => Ok(()),
                _ => self.walk_record(schema, value, path, steps),
            };
        }

        let Some(dive) = rules.dive.as_deref() else {
            return Ok(());
        };

        match value {
            Value::Null => Ok(()),
            Value::Array(items) => {
                if dive.keys.is_some() {
                    return Err(ValidatorError::InvalidDive {
                        field: path.to_string(),
                        got: "sequence (keys require a map)",
                    });
                }
                for (i, item) in items.iter().enumerate() {
                    self.walk_level(
                        item,
                        path.push_index(i),
                        &dive.elements,
                        shape.element(),
                        parent,
                        steps,
                    )?;
                }
                Ok(())
            }
            Value::Object(entries) => {
                for (key, item) in entries {
                    let entry_path = path.push_key(key.as_str());
                    if let Some(keys) = &dive.keys {
                        self.walk_key(key, &entry_path, keys, parent, steps)?;
                    }
                    self.walk_level(
                        item,
                        entry_path,
                        &dive.elements,
                        shape.element(),
                        parent,
                        steps,
                    )?;
                }
                Ok(())
            }
            other => Err(ValidatorError::InvalidDive {
                field: path.to_string(),
                got: kind_name(other),
            }),
        }
    }

    fn walk_key<'a>(
        &self,
        key: &str,
        path: &FieldPath,
        rules: &FieldRules,
        parent: Option<Parent<'a>>,
        steps: &mut Vec<Step<'a>>,
    ) -> Result<(), ValidatorError> {
        if rules.dive.is_some() {
            return Err(ValidatorError::InvalidDive {
                field: path.to_string(),
                got: "map key",
            });
        }
        if let Some(expr) = &rules.expr {
            steps.push(Step::Field {
                path: path.clone(),
                value: Cow::Owned(Value::String(key.to_string())),
                expr: expr.clone(),
                kind: FailureKind::Key,
                parent,
            });
        }
        Ok(())
    }
}

/// Rejects rules below `dive` on a record-shaped level.
///
/// A record is always descended into, so a bare trailing `dive` is absorbed;
/// anything after it would never be evaluated.
pub(crate) fn check_record_dive(path: &FieldPath, rules: &FieldRules) -> Result<(), ValidatorError> {
    match rules.dive.as_deref() {
        Some(dive) if dive.keys.is_some() || !dive.elements.is_empty() => {
            Err(ValidatorError::InvalidDive {
                field: path.to_string(),
                got: "record (rules after 'dive' on a nested record)",
            })
        }
        _ => Ok(()),
    }
}

/// Returns the JSON kind name for a value.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}
