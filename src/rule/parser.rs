//! Rule string parser.
//!
//! Grammar: comma-separated terms are ANDed, pipe-separated alternatives
//! inside a term are ORed, and `name=param` attaches a parameter. `dive`,
//! `keys` and `endkeys` are structural markers recorded in [`FieldRules`]
//! rather than evaluated. Aliases are expanded in place, recursively.

use crate::error::ParseError;

use super::expr::{Dive, FieldRules, RuleExpr};
use super::predicate::ParamKind;

const DIVE: &str = "dive";
const KEYS: &str = "keys";
const END_KEYS: &str = "endkeys";

/// Read access to the names a rule string may reference.
pub(crate) trait RuleLookup {
    /// Returns the expansion of an alias.
    fn alias(&self, name: &str) -> Option<String>;

    /// Returns the parameter contract of a registered predicate.
    fn param_kind(&self, name: &str) -> Option<ParamKind>;
}

#[derive(Debug)]
enum Token {
    Dive,
    Keys,
    EndKeys,
    Expr(RuleExpr),
}

/// Parses a rule string into field rules.
///
/// An empty (or all-whitespace) rule string yields empty rules.
pub(crate) fn parse(
    rules: &str,
    lookup: &dyn RuleLookup,
    max_alias_depth: usize,
) -> Result<FieldRules, ParseError> {
    let mut parser = Parser {
        lookup,
        max_alias_depth,
        expanding: Vec::new(),
    };
    let tokens = parser.tokenize(rules)?;
    build(&tokens, rules)
}

struct Parser<'a> {
    lookup: &'a dyn RuleLookup,
    max_alias_depth: usize,
    expanding: Vec<String>,
}

impl Parser<'_> {
    fn tokenize(&mut self, rules: &str) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        if rules.trim().is_empty() {
            return Ok(tokens);
        }

        for term in rules.split(',').map(str::trim) {
            match term {
                "" => return Err(ParseError::EmptyTerm(rules.to_string())),
                DIVE => tokens.push(Token::Dive),
                KEYS => tokens.push(Token::Keys),
                END_KEYS => tokens.push(Token::EndKeys),
                _ if term.contains('|') => tokens.push(Token::Expr(self.alternatives(term)?)),
                _ => tokens.extend(self.atom(term)?),
            }
        }
        Ok(tokens)
    }

    fn alternatives(&mut self, term: &str) -> Result<RuleExpr, ParseError> {
        let mut children = Vec::new();
        for alt in term.split('|').map(str::trim) {
            if alt.is_empty() {
                return Err(ParseError::EmptyTerm(term.to_string()));
            }
            let mut exprs = Vec::new();
            for token in self.atom(alt)? {
                match token {
                    Token::Expr(expr) => exprs.push(expr),
                    other => {
                        return Err(ParseError::MisplacedMarker {
                            marker: marker_name(&other).to_string(),
                            rules: term.to_string(),
                        })
                    }
                }
            }
            match RuleExpr::all(exprs) {
                Some(expr) => children.push(expr),
                None => return Err(ParseError::EmptyTerm(term.to_string())),
            }
        }
        Ok(RuleExpr::Or(children))
    }

    fn atom(&mut self, term: &str) -> Result<Vec<Token>, ParseError> {
        let (name, param) = term.split_once('=').unwrap_or((term, ""));
        let name = name.trim();

        if matches!(name, DIVE | KEYS | END_KEYS) {
            return Err(ParseError::MisplacedMarker {
                marker: name.to_string(),
                rules: term.to_string(),
            });
        }

        if let Some(expansion) = self.lookup.alias(name) {
            if !param.is_empty() {
                return Err(ParseError::InvalidParam {
                    rule: name.to_string(),
                    param: param.to_string(),
                    reason: "aliases take no parameter".to_string(),
                });
            }
            return self.expand(name, &expansion);
        }

        let kind = self
            .lookup
            .param_kind(name)
            .ok_or_else(|| ParseError::UnknownRule(name.to_string()))?;
        kind.check(name, param)?;
        Ok(vec![Token::Expr(RuleExpr::predicate(name, param))])
    }

    fn expand(&mut self, alias: &str, expansion: &str) -> Result<Vec<Token>, ParseError> {
        if self.expanding.iter().any(|a| a == alias) || self.expanding.len() >= self.max_alias_depth
        {
            let mut chain = self.expanding.clone();
            chain.push(alias.to_string());
            return Err(ParseError::AliasCycle(chain));
        }

        self.expanding.push(alias.to_string());
        let tokens = self.tokenize(expansion);
        self.expanding.pop();
        tokens
    }
}

fn marker_name(token: &Token) -> &'static str {
    match token {
        Token::Dive => DIVE,
        Token::Keys => KEYS,
        Token::EndKeys => END_KEYS,
        Token::Expr(_) => "expression",
    }
}

fn build(tokens: &[Token], rules: &str) -> Result<FieldRules, ParseError> {
    let mut exprs = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Expr(expr) => exprs.push(expr.clone()),
            Token::Dive => {
                return Ok(FieldRules {
                    expr: RuleExpr::all(exprs),
                    dive: Some(Box::new(build_dive(&tokens[i + 1..], rules)?)),
                });
            }
            Token::Keys | Token::EndKeys => {
                return Err(ParseError::MisplacedMarker {
                    marker: marker_name(token).to_string(),
                    rules: rules.to_string(),
                })
            }
        }
    }

    Ok(FieldRules {
        expr: RuleExpr::all(exprs),
        dive: None,
    })
}

fn build_dive(tokens: &[Token], rules: &str) -> Result<Dive, ParseError> {
    if !matches!(tokens.first(), Some(Token::Keys)) {
        return Ok(Dive {
            keys: None,
            elements: build(tokens, rules)?,
        });
    }

    let mut depth = 0usize;
    let mut end = None;
    for (i, token) in tokens.iter().enumerate().skip(1) {
        match token {
            Token::Keys => depth += 1,
            Token::EndKeys if depth == 0 => {
                end = Some(i);
                break;
            }
            Token::EndKeys => depth -= 1,
            _ => {}
        }
    }
    let end = end.ok_or_else(|| ParseError::UnclosedKeys(rules.to_string()))?;

    Ok(Dive {
        keys: Some(build(&tokens[1..end], rules)?),
        elements: build(&tokens[end + 1..], rules)?,
    })
}
