//! Pure per-field evaluation
//!
//! Given the parsed sets and the current values, decide which message key (if
//! any) a field resolves to. No DOM access happens here.

use crate::filter::{Filter, FilterSet};
use crate::registry::Registry;
use crate::rule::{Rule, RuleSet};
use serde::{Serialize, Serializer};
use std::fmt;

/// Identifier used to look up the failure message of a field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Required,
    Equals,
    /// Name of the first failing rule
    Rule(String),
}

impl MessageKey {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKey::Required => "required",
            MessageKey::Equals => "equals",
            MessageKey::Rule(name) => name,
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MessageKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Run every filter in order. Unregistered custom filters are skipped.
pub fn apply_filters(filters: &FilterSet, value: &str, registry: &Registry) -> String {
    filters
        .items
        .iter()
        .fold(value.to_string(), |current, filter| {
            match filter.apply(&current) {
                Some(next) => next,
                None => apply_custom_filter(filter, current, registry),
            }
        })
}

fn apply_custom_filter(filter: &Filter, current: String, registry: &Registry) -> String {
    let Filter::Custom { name, args } = filter else {
        return current;
    };
    match registry.filter(name) {
        Some(custom) => custom(current.as_str(), args.as_slice()),
        None => {
            tracing::trace!("Skipping unknown filter `{}`", name);
            current
        }
    }
}

fn check_rule(rule: &Rule, value: &str, registry: &Registry) -> Option<bool> {
    rule.check(value).or_else(|| match rule {
        Rule::Custom { name, args } => match registry.rule(name) {
            Some(custom) => Some(custom(value, args.as_slice())),
            None => {
                tracing::trace!("Skipping unknown rule `{}`", name);
                None
            }
        },
        _ => None,
    })
}

/// Resolve the message key for a field.
///
/// `value` is the field's filtered value (empty when the field is not
/// submitted at all, e.g. an unchecked checkbox). `equals_value` is the
/// current value of the field named by `rules.equals`, or `None` when no such
/// field exists.
///
/// Rules run in order and stop at the first failure. An empty optional
/// field is never rule-checked.
pub fn evaluate(
    rules: &RuleSet,
    value: &str,
    equals_value: Option<&str>,
    registry: &Registry,
) -> Option<MessageKey> {
    if value.is_empty() {
        return rules.required.then_some(MessageKey::Required);
    }

    let failed = rules
        .items
        .iter()
        .find(|rule| check_rule(rule, value, registry) == Some(false));
    if let Some(rule) = failed {
        return Some(MessageKey::Rule(rule.name().to_string()));
    }

    match (rules.equals.as_ref(), equals_value) {
        (Some(_), Some(other)) if other != value => Some(MessageKey::Equals),
        _ => None,
    }
}
