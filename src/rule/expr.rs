//! Parsed rule expressions.

use std::fmt::{self, Display};

/// An evaluable rule expression.
///
/// Comma-separated terms form an [`RuleExpr::And`], pipe-separated terms an
/// [`RuleExpr::Or`]. Rendering an expression gives back rule-string syntax,
/// which is what a failed OR group reports as its tag.
///
/// # Example
///
/// ```rust
/// use tagcheck::RuleExpr;
///
/// let expr = RuleExpr::Or(vec![
///     RuleExpr::predicate("email", ""),
///     RuleExpr::predicate("numeric", ""),
/// ]);
/// assert_eq!(expr.to_string(), "email|numeric");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleExpr {
    /// A single named predicate with its (possibly empty) parameter.
    Predicate { name: String, param: String },
    /// Every child must hold.
    And(Vec<RuleExpr>),
    /// At least one child must hold.
    Or(Vec<RuleExpr>),
}

impl RuleExpr {
    /// Creates a predicate node.
    pub fn predicate(name: impl Into<String>, param: impl Into<String>) -> Self {
        RuleExpr::Predicate {
            name: name.into(),
            param: param.into(),
        }
    }

    /// Wraps several expressions in an `And`, collapsing the single-child case.
    pub(crate) fn all(mut children: Vec<RuleExpr>) -> Option<Self> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(RuleExpr::And(children)),
        }
    }
}

impl Display for RuleExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleExpr::Predicate { name, param } if param.is_empty() => write!(f, "{}", name),
            RuleExpr::Predicate { name, param } => write!(f, "{}={}", name, param),
            RuleExpr::And(children) => write_joined(f, children, ","),
            RuleExpr::Or(children) => write_joined(f, children, "|"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[RuleExpr], sep: &str) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", child)?;
    }
    Ok(())
}

/// The parsed rules of one field.
///
/// `expr` applies to the value itself. When the rule string contains `dive`,
/// `dive` describes what applies to each element (or map entry).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldRules {
    /// Rules before the first `dive`; `None` when there are none.
    pub expr: Option<RuleExpr>,
    /// The rules after `dive`, if any.
    pub dive: Option<Box<Dive>>,
}

impl FieldRules {
    /// Returns true when the field carries no rules at all.
    pub fn is_empty(&self) -> bool {
        self.expr.is_none() && self.dive.is_none()
    }
}

/// The rules applied below a `dive` marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dive {
    /// Rules between `keys` and `endkeys`, applied to map keys.
    pub keys: Option<FieldRules>,
    /// Rules applied to each sequence element or map value.
    pub elements: FieldRules,
}
