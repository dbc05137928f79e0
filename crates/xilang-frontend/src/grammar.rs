//! # Grammar
//!
//! The xilang grammar lives in `grammar.pest` and is compiled into
//! [`XiParser`] by `pest_derive`. The same text is embedded as [`GRAMMAR`] so
//! that [`analyze`] can check it with pest's own validator at run time.

use std::collections::{BTreeMap, BTreeSet};

use pest_derive::Parser;
use pest_meta::optimizer::OptimizedExpr;

#[derive(Parser)]
#[grammar = "../grammar.pest"]
pub struct XiParser;

/// Source text of the grammar.
pub const GRAMMAR: &str = include_str!("../grammar.pest");

/// Entry rule of a translation unit.
pub const START_RULE: &str = "file";

/// Rules pest invokes implicitly between tokens.
const IMPLICIT_RULES: &[&str] = &["WHITESPACE", "COMMENT"];

/// One finding of [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarProblem {
    /// The offending rule, when the problem is attached to one.
    pub rule: Option<String>,
    pub message: String,
}

/// Statically checks the grammar.
///
/// Reports everything pest's validator rejects (left recursion, undefined
/// rules, repetitions of expressions that cannot fail...) and every rule that
/// cannot be reached from [`START_RULE`].
pub fn analyze() -> Vec<GrammarProblem> {
    let rules = match pest_meta::parse_and_optimize(GRAMMAR) {
        Ok((_, rules)) => rules,
        Err(errors) => {
            return errors
                .into_iter()
                .map(|e| GrammarProblem {
                    rule: None,
                    message: e.to_string(),
                })
                .collect();
        }
    };

    let graph: BTreeMap<&str, BTreeSet<String>> = rules
        .iter()
        .map(|rule| {
            let callees = rule
                .expr
                .iter_top_down()
                .filter_map(|expr| match expr {
                    OptimizedExpr::Ident(name) => Some(name.to_string()),
                    _ => None,
                })
                .collect();
            (rule.name.as_str(), callees)
        })
        .collect();

    let mut reached: BTreeSet<&str> = BTreeSet::new();
    let mut pending: Vec<&str> = IMPLICIT_RULES
        .iter()
        .copied()
        .chain(std::iter::once(START_RULE))
        .filter(|name| graph.contains_key(name))
        .collect();
    if !graph.contains_key(START_RULE) {
        return vec![GrammarProblem {
            rule: Some(START_RULE.to_string()),
            message: "start rule is not defined".to_string(),
        }];
    }
    while let Some(name) = pending.pop() {
        if !reached.insert(name) {
            continue;
        }
        if let Some(callees) = graph.get(name) {
            // built-ins such as ANY or ASCII_DIGIT are not in the graph
            pending.extend(
                callees
                    .iter()
                    .filter_map(|callee| graph.get_key_value(callee.as_str()))
                    .map(|(key, _)| *key),
            );
        }
    }

    graph
        .keys()
        .filter(|name| !reached.contains(*name))
        .map(|name| GrammarProblem {
            rule: Some(name.to_string()),
            message: format!("rule is unreachable from '{}'", START_RULE),
        })
        .collect()
}
