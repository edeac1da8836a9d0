//! Built-in predicates loaded into every registry.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::predicate::{ParamKind, PredicateRule};

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .unwrap()
    })
}

fn numeric_regex() -> &'static Regex {
    NUMERIC_REGEX.get_or_init(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").unwrap())
}

fn number_regex() -> &'static Regex {
    NUMBER_REGEX.get_or_init(|| Regex::new(r"^[0-9]+$").unwrap())
}

/// Returns every built-in predicate with its registered name.
pub(crate) fn builtins() -> Vec<(&'static str, PredicateRule)> {
    vec![
        ("required", PredicateRule::simple(|v, _| has_value(v))),
        ("numeric", PredicateRule::simple(|v, _| matches_number(v, numeric_regex()))),
        ("number", PredicateRule::simple(|v, _| matches_number(v, number_regex()))),
        ("email", PredicateRule::simple(|v, _| v.as_str().is_some_and(|s| email_regex().is_match(s)))),
        ("min", bound(|size, limit| size >= limit)),
        ("max", bound(|size, limit| size <= limit)),
        ("len", bound(|size, limit| size == limit)),
        ("gt", bound(|size, limit| size > limit)),
        ("gte", bound(|size, limit| size >= limit)),
        ("lt", bound(|size, limit| size < limit)),
        ("lte", bound(|size, limit| size <= limit)),
        ("eqfield", PredicateRule::cross_field(|v, other, _| v == other)),
        ("nefield", PredicateRule::cross_field(|v, other, _| v != other)),
    ]
}

/// True unless the value is the zero value of its kind.
fn has_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn matches_number(value: &Value, pattern: &Regex) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => pattern.is_match(s),
        _ => false,
    }
}

/// The quantity a bound rule compares: the number itself, or a length.
fn size_of(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(_) => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
    }
}

fn bound(cmp: fn(f64, f64) -> bool) -> PredicateRule {
    PredicateRule::simple(move |value, param| {
        match (size_of(value), param.parse::<f64>()) {
            (Some(size), Ok(limit)) => cmp(size, limit),
            _ => false,
        }
    })
    .with_param(ParamKind::Number)
}
