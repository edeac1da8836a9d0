//! Rule strings and the predicates they name.
//!
//! A rule string such as `"required,email|numeric"` or
//! `"dive,keys,required,endkeys,gt=500"` is parsed into [`FieldRules`]: an
//! evaluable [`RuleExpr`] for the value itself plus the recorded `dive`
//! structure the walker uses to reach elements, map keys and map values.

mod builtin;
mod expr;
mod parser;
mod predicate;

pub(crate) use builtin::builtins;
pub use expr::{Dive, FieldRules, RuleExpr};
pub(crate) use parser::{parse, RuleLookup};
pub use predicate::{ParamKind, PredicateKind, PredicateRule};
