//! Built-in value filters
//!
//! Filters run before any rule and rewrite the field value.

use crate::args::Arg;
use crate::zenhan::zenhan;
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Search pattern for `replace`
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

impl Pattern {
    /// Replace the first match of the pattern.
    ///
    /// The replacement follows browser `String.prototype.replace` rules:
    /// `$$`, `$&`, `` $` ``, `$'`, `$n`/`$nn` for existing groups and
    /// `$<name>` when the regex has named groups. Any other `$` is literal.
    pub fn replace_first(&self, value: &str, replacement: &str) -> String {
        let found = match self {
            Pattern::Literal(needle) => value.find(needle.as_str()).map(|start| Found {
                subject: value,
                start,
                end: start + needle.len(),
                groups: Vec::new(),
                named: None,
            }),
            Pattern::Regex(re) => re.captures(value).and_then(|caps| {
                let whole = caps.get(0)?;
                let has_names = re.capture_names().flatten().next().is_some();
                Some(Found {
                    subject: value,
                    start: whole.start(),
                    end: whole.end(),
                    groups: (1..caps.len())
                        .map(|i| caps.get(i).map(|m| m.as_str()))
                        .collect(),
                    named: has_names.then(|| {
                        re.capture_names()
                            .flatten()
                            .map(|name| (name, caps.name(name).map(|m| m.as_str())))
                            .collect()
                    }),
                })
            }),
        };

        match found {
            Some(found) => format!(
                "{}{}{}",
                &value[..found.start],
                found.expand(replacement),
                &value[found.end..]
            ),
            None => value.to_string(),
        }
    }

    fn to_arg(&self) -> Arg {
        match self {
            Pattern::Literal(s) => Arg::Str(s.clone()),
            Pattern::Regex(re) => Arg::Regex(re.clone()),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::Literal(a), Pattern::Literal(b)) => a == b,
            (Pattern::Regex(a), Pattern::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// A single match and its groups, used to expand a replacement template
struct Found<'a> {
    subject: &'a str,
    start: usize,
    end: usize,
    /// Groups 1..n; `None` for a group that did not participate
    groups: Vec<Option<&'a str>>,
    /// Named groups, `None` when the pattern declares none
    named: Option<Vec<(&'a str, Option<&'a str>)>>,
}

impl<'a> Found<'a> {
    fn expand(&self, template: &str) -> String {
        let bytes = template.as_bytes();
        let mut out = String::with_capacity(template.len());
        let mut literal_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'$' {
                i += 1;
                continue;
            }
            match self.token(&template[i + 1..]) {
                Some((text, len)) => {
                    out.push_str(&template[literal_start..i]);
                    out.push_str(text);
                    i += 1 + len;
                    literal_start = i;
                }
                None => i += 1,
            }
        }

        out.push_str(&template[literal_start..]);
        out
    }

    // Expansion of the token following a `$` and its length in bytes
    fn token(&self, rest: &str) -> Option<(&'a str, usize)> {
        let bytes = rest.as_bytes();
        match *bytes.first()? {
            b'$' => Some(("$", 1)),
            b'&' => Some((&self.subject[self.start..self.end], 1)),
            b'`' => Some((&self.subject[..self.start], 1)),
            b'\'' => Some((&self.subject[self.end..], 1)),
            first @ b'0'..=b'9' => {
                let group = |n: usize| {
                    (1..=self.groups.len())
                        .contains(&n)
                        .then(|| self.groups[n - 1].unwrap_or(""))
                };
                let one = usize::from(first - b'0');
                let two = bytes
                    .get(1)
                    .filter(|b| b.is_ascii_digit())
                    .map(|second| one * 10 + usize::from(second - b'0'));

                two.and_then(|n| group(n).map(|text| (text, 2)))
                    .or_else(|| group(one).map(|text| (text, 1)))
            }
            b'<' => {
                let named = self.named.as_ref()?;
                let close = rest.find('>')?;
                let name = &rest[1..close];
                let text = named
                    .iter()
                    .find(|(candidate, _)| *candidate == name)
                    .and_then(|(_, text)| *text)
                    .unwrap_or("");
                Some((text, close + 1))
            }
            _ => None,
        }
    }
}

pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// A parsed filter clause
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Trim,
    Replace {
        /// `None` when the clause had no arguments; the filter is then a no-op
        pattern: Option<Pattern>,
        replacement: String,
    },
    Zenhan,
    Custom { name: String, args: Vec<Arg> },
}

impl Filter {
    pub fn from_clause(name: &str, args: Vec<Arg>) -> Self {
        match name {
            "trim" => Filter::Trim,
            "zenhan" => Filter::Zenhan,
            "replace" => {
                let mut args = args.into_iter();
                let pattern = args.next().map(|arg| match arg {
                    Arg::Regex(re) => Pattern::Regex(re),
                    other => Pattern::Literal(other.as_text().into_owned()),
                });
                let replacement = args
                    .next()
                    .map(|arg| arg.as_text().into_owned())
                    .unwrap_or_default();
                Filter::Replace {
                    pattern,
                    replacement,
                }
            }
            _ => Filter::Custom {
                name: name.to_string(),
                args,
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Filter::Trim => "trim",
            Filter::Replace { .. } => "replace",
            Filter::Zenhan => "zenhan",
            Filter::Custom { name, .. } => name,
        }
    }

    pub fn args(&self) -> Vec<Arg> {
        match self {
            Filter::Replace {
                pattern,
                replacement,
            } => pattern
                .iter()
                .map(Pattern::to_arg)
                .chain(std::iter::once(Arg::Str(replacement.clone())))
                .collect(),
            Filter::Custom { args, .. } => args.clone(),
            _ => Vec::new(),
        }
    }

    /// Apply a built-in filter. Returns `None` for [`Filter::Custom`].
    pub fn apply(&self, value: &str) -> Option<String> {
        let filtered = match self {
            Filter::Trim => trim(value),
            Filter::Replace {
                pattern: Some(pattern),
                replacement,
            } => pattern.replace_first(value, replacement),
            Filter::Replace { pattern: None, .. } => value.to_string(),
            Filter::Zenhan => zenhan(value),
            Filter::Custom { .. } => return None,
        };
        Some(filtered)
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Filter", 2)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("args", &self.args())?;
        state.end()
    }
}

/// Parsed `data-filter` attribute, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterSet {
    pub items: Vec<Filter>,
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_trim() {
        assert_eq!(Filter::Trim.apply("  hi  ").as_deref(), Some("hi"));
        assert_eq!(Filter::Trim.apply("\thi\n").as_deref(), Some("hi"));
    }

    #[test]
    fn test_replace_literal_first_only() {
        let filter = Filter::from_clause("replace", vec![Arg::from("-"), Arg::from("")]);
        assert_eq!(filter.apply("090-1234-5678").as_deref(), Some("0901234-5678"));
    }

    #[test]
    fn test_replace_regex_first_only() {
        let filter = Filter::from_clause(
            "replace",
            vec![Arg::Regex(Regex::new("[0-9]+").unwrap()), Arg::from("#")],
        );
        assert_eq!(filter.apply("a1b22c333").as_deref(), Some("a#b22c333"));
    }

    #[test]
    fn test_replace_with_group_reference() {
        let filter = Filter::from_clause(
            "replace",
            vec![Arg::Regex(Regex::new("(\\w+)@").unwrap()), Arg::from("$1 at ")],
        );
        assert_eq!(filter.apply("me@host").as_deref(), Some("me at host"));
    }

    fn regex(pattern: &str) -> Pattern {
        Pattern::Regex(Regex::new(pattern).unwrap())
    }

    fn literal(needle: &str) -> Pattern {
        Pattern::Literal(needle.to_string())
    }

    #[rstest]
    #[case(regex("[0-9]+"), "price 5", "$USD", "price $USD")]
    #[case(regex("(a)"), "ab", "$1x", "axb")]
    #[case(regex("(a)"), "ab", "$2", "$2b")]
    #[case(regex("(a)"), "ab", "$0", "$0b")]
    #[case(regex("(a)"), "ab", "$10", "a0b")]
    #[case(regex("(a)|(z)"), "ab", "[$2]", "[]b")]
    #[case(regex("b"), "abc", "[$`|$&|$']", "a[a|b|c]c")]
    #[case(regex("b"), "abc", "$$", "a$c")]
    #[case(regex("b"), "abc", "$", "a$c")]
    #[case(regex("b"), "abc", "${1}", "a${1}c")]
    #[case(regex("(?P<word>b)"), "abc", "<$<word>>", "a<b>c")]
    #[case(regex("(?P<word>b)"), "abc", "$<nope>", "ac")]
    #[case(regex("b"), "abc", "$<word>", "a$<word>c")]
    #[case(literal("a"), "ab", "[$&]", "[a]b")]
    #[case(literal("a"), "ab", "$1", "$1b")]
    #[case(literal("-"), "1-2-3", "$$", "1$2-3")]
    #[case(literal("x"), "ab", "$&", "ab")]
    fn test_replacement_dollar_patterns(
        #[case] pattern: Pattern,
        #[case] value: &str,
        #[case] replacement: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(pattern.replace_first(value, replacement), expected);
    }

    #[test]
    fn test_replace_large_number_argument() {
        let filter = Filter::from_clause(
            "replace",
            vec![Arg::Number(100000000000000000000.0), Arg::from("x")],
        );
        assert_eq!(filter.apply("n=100000000000000000000").as_deref(), Some("n=x"));
    }

    #[test]
    fn test_replace_numeric_arguments_are_text() {
        let filter = Filter::from_clause("replace", vec![Arg::Number(0.0), Arg::Number(1.0)]);
        assert_eq!(filter.apply("100").as_deref(), Some("110"));
    }

    #[test]
    fn test_replace_without_arguments_is_noop() {
        let filter = Filter::from_clause("replace", vec![]);
        assert_eq!(filter.apply("keep").as_deref(), Some("keep"));
    }

    #[test]
    fn test_zenhan() {
        assert_eq!(Filter::Zenhan.apply("１２３").as_deref(), Some("123"));
    }

    #[test]
    fn test_custom_is_not_applied() {
        let filter = Filter::from_clause("upper", vec![]);
        assert_eq!(filter.apply("x"), None);
    }
}
