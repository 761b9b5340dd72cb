//! Clause grammar for `data-validation` and `data-filter` attributes
//!
//! An attribute is a list of clauses such as `required;length(2,5)`. The
//! grammar is a regex rendered from a template so both the clause name
//! character class and the delimiter can be swapped through configuration.

use crate::args::parse_args;
use crate::error::{Error, Result};
use crate::filter::{Filter, FilterSet};
use crate::rule::{Rule, RuleSet};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Default clause template. `{{delimiter}}` is replaced with the escaped delimiter.
pub const DEFAULT_FORMAT: &str = r"(\w+)(?:\((.*?)\))?\s?(?:{{delimiter}}|$)";

pub const DEFAULT_DELIMITER: &str = ";";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

static DEFAULT_GRAMMAR: Lazy<ClauseGrammar> =
    Lazy::new(|| ClauseGrammar::new(DEFAULT_FORMAT, DEFAULT_DELIMITER).unwrap());

/// Render `{{name}}` placeholders; names missing from `vars` render empty.
pub fn render(template: &str, vars: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// One `name` or `name(args)` unit of an attribute string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause<'a> {
    pub name: &'a str,
    pub args: Option<&'a str>,
}

/// Compiled clause grammar
#[derive(Debug, Clone)]
pub struct ClauseGrammar {
    pattern: Regex,
}

impl ClauseGrammar {
    /// Build a grammar from a template and a clause delimiter.
    ///
    /// Capture group 1 of the rendered pattern is the clause name, group 2
    /// (optional) the raw argument text.
    pub fn new(format: &str, delimiter: &str) -> Result<Self> {
        let vars = HashMap::from([("delimiter", regex::escape(delimiter))]);
        let source = render(format, &vars);

        let pattern = Regex::new(&source).map_err(|e| Error::InvalidFormat {
            format: source.clone(),
            source: e,
        })?;

        if pattern.captures_len() < 2 {
            return Err(Error::MissingNameGroup(source));
        }

        Ok(Self { pattern })
    }

    /// The rendered pattern source
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Iterate over the clauses of `text`. Text the grammar does not match is skipped.
    pub fn clauses<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Clause<'a>> + 'a {
        self.pattern.captures_iter(text).filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            Some(Clause {
                name,
                args: caps.get(2).map(|m| m.as_str()),
            })
        })
    }

    /// Parse a `data-validation` attribute.
    pub fn parse_rules(&self, text: &str) -> RuleSet {
        let mut rules = RuleSet::default();

        for clause in self.clauses(text) {
            match clause.name {
                "required" => rules.required = true,
                "equals" => {
                    if let Some(target) = clause.args.map(str::trim).filter(|s| !s.is_empty()) {
                        rules.equals = Some(target.to_string());
                    }
                }
                name => rules
                    .items
                    .push(Rule::from_clause(name, parse_args(clause.args))),
            }
        }

        rules
    }

    /// Parse a `data-filter` attribute.
    pub fn parse_filters(&self, text: &str) -> FilterSet {
        self.clauses(text)
            .map(|clause| Filter::from_clause(clause.name, parse_args(clause.args)))
            .collect()
    }
}

impl Default for ClauseGrammar {
    fn default() -> Self {
        DEFAULT_GRAMMAR.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Arg;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_required_and_length() {
        let rules = ClauseGrammar::default().parse_rules("required;length(2,5)");
        assert_eq!(
            rules,
            RuleSet {
                required: true,
                equals: None,
                items: vec![Rule::Length { min: 2.0, max: 5.0 }],
            }
        );
    }

    #[test]
    fn test_equals_target() {
        let rules = ClauseGrammar::default().parse_rules("required; equals(password)");
        assert!(rules.required);
        assert_eq!(rules.equals.as_deref(), Some("password"));
        assert!(rules.items.is_empty());
    }

    #[test]
    fn test_empty_parentheses_are_accepted() {
        let rules = ClauseGrammar::default().parse_rules("email();url()");
        assert_eq!(rules.items, vec![Rule::Email, Rule::Url]);
    }

    #[test]
    fn test_regex_argument_with_parenthesis() {
        let rules = ClauseGrammar::default().parse_rules("pattern(/^(ab)+$/)");
        match &rules.items[..] {
            [Rule::Pattern(Some(re))] => assert_eq!(re.as_str(), "^(ab)+$"),
            other => panic!("unexpected rules: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_names_become_custom() {
        let rules = ClauseGrammar::default().parse_rules("lenght(1,2)");
        assert_eq!(
            rules.items,
            vec![Rule::Custom {
                name: "lenght".to_string(),
                args: vec![Arg::Number(1.0), Arg::Number(2.0)],
            }]
        );
    }

    #[test]
    fn test_malformed_text_is_dropped() {
        let rules = ClauseGrammar::default().parse_rules("!!!");
        assert_eq!(rules, RuleSet::default());
    }

    #[test]
    fn test_custom_delimiter() {
        let grammar = ClauseGrammar::new(DEFAULT_FORMAT, "|").unwrap();
        let rules = grammar.parse_rules("required|integer()");
        assert!(rules.required);
        assert_eq!(rules.items, vec![Rule::Integer]);
    }

    #[test]
    fn test_filters_keep_every_clause() {
        let filters = ClauseGrammar::default().parse_filters("trim();required;zenhan()");
        assert_eq!(
            filters.items,
            vec![
                Filter::Trim,
                Filter::Custom {
                    name: "required".to_string(),
                    args: vec![],
                },
                Filter::Zenhan,
            ]
        );
    }

    #[test]
    fn test_invalid_format() {
        assert!(matches!(
            ClauseGrammar::new("(\\w+", ";"),
            Err(Error::InvalidFormat { .. })
        ));
        assert!(matches!(
            ClauseGrammar::new("\\w+", ";"),
            Err(Error::MissingNameGroup(_))
        ));
    }

    #[test]
    fn test_render_placeholders() {
        let vars = HashMap::from([("delimiter", ";".to_string())]);
        assert_eq!(render("a{{delimiter}}b{{other}}c", &vars), "a;bc");
    }
}
