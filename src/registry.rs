//! Rule registry for predicates, aliases and struct-level validators.
//!
//! This module provides the [`RuleRegistry`] type that stores everything a
//! rule string or a schema can reference by name.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ParseError, RegistryError};
use crate::rule::{self, FieldRules, ParamKind, PredicateRule, RuleLookup};
use crate::struct_level::StructLevel;

/// Signature of a struct-level validator.
pub type StructLevelFn = Arc<dyn Fn(&mut StructLevel<'_>) + Send + Sync>;

/// Default limit on nested alias expansion.
pub const DEFAULT_MAX_ALIAS_DEPTH: usize = 32;

#[derive(Default)]
struct Rules {
    predicates: HashMap<String, PredicateRule>,
    aliases: HashMap<String, String>,
    struct_level: HashMap<String, StructLevelFn>,
}

/// A thread-safe registry of named rules.
///
/// A new registry already contains the built-in predicates (`required`,
/// `numeric`, `number`, `email`, `min`, `max`, `len`, `gt`, `gte`, `lt`,
/// `lte`, `eqfield`, `nefield`). Registering a name that already exists
/// replaces the previous entry.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>`; clones share the same rules.
/// Register everything during setup, then validate from as many threads as
/// needed: validation only takes read locks.
///
/// # Example
///
/// ```rust
/// use tagcheck::{PredicateRule, RuleRegistry};
///
/// let registry = RuleRegistry::new();
/// registry
///     .register_predicate("uppercase", PredicateRule::simple(|v, _| {
///         v.as_str().map_or(true, |s| s == s.to_uppercase())
///     }))
///     .unwrap();
/// registry.register_alias("varchar", "required,max=255").unwrap();
///
/// assert!(registry.predicate("uppercase").is_some());
/// assert_eq!(registry.alias("varchar").as_deref(), Some("required,max=255"));
/// ```
pub struct RuleRegistry {
    rules: Arc<RwLock<Rules>>,
    max_alias_depth: usize,
}

impl RuleRegistry {
    /// Creates a registry holding the built-in predicates.
    pub fn new() -> Self {
        let mut rules = Rules::default();
        for (name, rule) in rule::builtins() {
            rules.predicates.insert(name.to_string(), rule);
        }
        Self {
            rules: Arc::new(RwLock::new(rules)),
            max_alias_depth: DEFAULT_MAX_ALIAS_DEPTH,
        }
    }

    /// Sets the maximum nesting of alias expansion.
    ///
    /// Expansion deeper than this is reported as an alias cycle.
    pub fn with_max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = depth;
        self
    }

    /// Returns the maximum nesting of alias expansion.
    pub fn max_alias_depth(&self) -> usize {
        self.max_alias_depth
    }

    /// Registers a predicate under `name`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, is one of `dive`, `keys`,
    /// `endkeys`, or contains `,`, `|` or `=`.
    pub fn register_predicate(
        &self,
        name: impl Into<String>,
        rule: PredicateRule,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        check_name(&name)?;
        tracing::debug!(rule = %name, cross_field = rule.is_cross_field(), "registered predicate");
        self.rules.write().predicates.insert(name, rule);
        Ok(())
    }

    /// Registers an alias that expands to `expansion` wherever it is used.
    ///
    /// The expansion is parsed immediately, so everything it references must
    /// already be registered.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid name or an expansion that does not
    /// parse (unknown rule, bad parameter, alias cycle).
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagcheck::RuleRegistry;
    ///
    /// let registry = RuleRegistry::new();
    /// assert!(registry.register_alias("varchar", "required,max=255").is_ok());
    /// assert!(registry.register_alias("broken", "required,nope").is_err());
    /// ```
    pub fn register_alias(
        &self,
        alias: impl Into<String>,
        expansion: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let alias = alias.into();
        let expansion = expansion.into();
        check_name(&alias)?;

        let shadowed = Shadowed {
            inner: self,
            alias: &alias,
            expansion: &expansion,
        };
        rule::parse(&alias, &shadowed, self.max_alias_depth).map_err(|source| {
            RegistryError::InvalidAlias {
                alias: alias.clone(),
                source,
            }
        })?;

        tracing::debug!(alias = %alias, expansion = %expansion, "registered alias");
        self.rules.write().aliases.insert(alias, expansion);
        Ok(())
    }

    /// Registers a struct-level validator for records of schema `type_name`.
    ///
    /// The validator runs once per record of that type, after all of the
    /// record's field rules were evaluated.
    pub fn register_struct_level<F>(
        &self,
        type_name: impl Into<String>,
        validator: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&mut StructLevel<'_>) + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        if type_name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        tracing::debug!(type_name = %type_name, "registered struct-level validator");
        self.rules
            .write()
            .struct_level
            .insert(type_name, Arc::new(validator));
        Ok(())
    }

    /// Retrieves a predicate by name.
    pub fn predicate(&self, name: &str) -> Option<PredicateRule> {
        self.rules.read().predicates.get(name).cloned()
    }

    /// Retrieves an alias expansion by name.
    pub fn alias(&self, name: &str) -> Option<String> {
        self.rules.read().aliases.get(name).cloned()
    }

    /// Retrieves the struct-level validator registered for a schema name.
    pub fn struct_level(&self, type_name: &str) -> Option<StructLevelFn> {
        self.rules.read().struct_level.get(type_name).cloned()
    }

    /// Parses a rule string against the registered names.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagcheck::RuleRegistry;
    ///
    /// let registry = RuleRegistry::new();
    /// let rules = registry.parse("dive,required,min=3").unwrap();
    /// assert!(rules.expr.is_none());
    /// assert!(rules.dive.is_some());
    /// ```
    pub fn parse(&self, rules: &str) -> Result<FieldRules, ParseError> {
        rule::parse(rules, self, self.max_alias_depth)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RuleRegistry {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
            max_alias_depth: self.max_alias_depth,
        }
    }
}

impl RuleLookup for RuleRegistry {
    fn alias(&self, name: &str) -> Option<String> {
        RuleRegistry::alias(self, name)
    }

    fn param_kind(&self, name: &str) -> Option<ParamKind> {
        self.rules
            .read()
            .predicates
            .get(name)
            .map(PredicateRule::param_kind)
    }
}

/// Lookup that sees a pending alias before it is stored.
struct Shadowed<'a> {
    inner: &'a RuleRegistry,
    alias: &'a str,
    expansion: &'a str,
}

impl RuleLookup for Shadowed<'_> {
    fn alias(&self, name: &str) -> Option<String> {
        if name == self.alias {
            Some(self.expansion.to_string())
        } else {
            self.inner.alias(name)
        }
    }

    fn param_kind(&self, name: &str) -> Option<ParamKind> {
        RuleLookup::param_kind(self.inner, name)
    }
}

fn check_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() {
        return Err(RegistryError::EmptyName);
    }
    if matches!(name, "dive" | "keys" | "endkeys") {
        return Err(RegistryError::ReservedName(name.to_string()));
    }
    if name.contains([',', '|', '=']) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_loaded() {
        let registry = RuleRegistry::new();
        for name in ["required", "numeric", "min", "max", "gt", "email", "eqfield"] {
            assert!(registry.predicate(name).is_some(), "{} missing", name);
        }
        assert!(registry.predicate("eqfield").unwrap().is_cross_field());
    }

    #[test]
    fn test_reregistration_overwrites() {
        let registry = RuleRegistry::new();
        registry
            .register_predicate("required", PredicateRule::cross_field(|_, _, _| true))
            .unwrap();
        assert!(registry.predicate("required").unwrap().is_cross_field());
    }

    #[test]
    fn test_reserved_and_invalid_names() {
        let registry = RuleRegistry::new();
        let rule = || PredicateRule::simple(|_, _| true);
        assert!(matches!(
            registry.register_predicate("", rule()),
            Err(RegistryError::EmptyName)
        ));
        assert!(matches!(
            registry.register_predicate("dive", rule()),
            Err(RegistryError::ReservedName(_))
        ));
        assert!(matches!(
            registry.register_alias("keys", "required"),
            Err(RegistryError::ReservedName(_))
        ));
        assert!(matches!(
            registry.register_predicate("a|b", rule()),
            Err(RegistryError::InvalidName(_))
        ));
        assert!(matches!(
            registry.register_struct_level("", |_| {}),
            Err(RegistryError::EmptyName)
        ));
    }

    #[test]
    fn test_self_referencing_alias_rejected() {
        let registry = RuleRegistry::new();
        let err = registry.register_alias("loop", "required,loop").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidAlias {
                source: ParseError::AliasCycle(_),
                ..
            }
        ));
        assert!(registry.alias("loop").is_none());
    }

    #[test]
    fn test_overwrite_creating_cycle_rejected() {
        let registry = RuleRegistry::new();
        registry.register_alias("a", "required").unwrap();
        registry.register_alias("b", "a").unwrap();
        assert!(registry.register_alias("a", "b").is_err());
        assert_eq!(registry.alias("a").as_deref(), Some("required"));
    }

    #[test]
    fn test_clones_share_rules() {
        let registry = RuleRegistry::new();
        let clone = registry.clone();
        clone.register_alias("varchar", "required,max=255").unwrap();
        assert!(registry.alias("varchar").is_some());
    }

    #[test]
    fn test_struct_level_lookup() {
        let registry = RuleRegistry::new();
        registry
            .register_struct_level("RegisterRequest", |_| {})
            .unwrap();
        assert!(registry.struct_level("RegisterRequest").is_some());
        assert!(registry.struct_level("Other").is_none());
    }
}
