//! Built-in validation rules
//!
//! Each rule is a pure predicate over the field value. Arguments are coerced
//! the way the attribute syntax intends: `length`/`range` bounds become numbers
//! (non-numeric bounds are `NaN` and make the rule fail), `pattern` takes a
//! regex literal or a string compiled as one.

use crate::args::Arg;
use crate::number::to_number;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    let scheme = r"(https|http)://";
    let ip = r"([0-9]{1,3}(\.[0-9]{1,3}){3})";
    let host = r"([a-z0-9\-]+(\.[a-z0-9\-]+)*?)";
    let port = r"(:[0-9]{1,5})";
    let path = r#"[^\\'|`^"<>(){}\[\]]+"#;
    Regex::new(&format!("^{}({}|{})({})?({})?$", scheme, ip, host, port, path)).unwrap()
});

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").unwrap());

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Character count within `[min, max]`
pub fn is_valid_length(value: &str, min: f64, max: f64) -> bool {
    let len = value.chars().count() as f64;
    len >= min && len <= max
}

/// Numeric value within `[min, max]`
pub fn is_in_range(value: &str, min: f64, max: f64) -> bool {
    let n = to_number(value);
    n >= min && n <= max
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// `http`/`https` URL with an IPv4 or lowercase host, optional port and path
pub fn is_valid_url(value: &str) -> bool {
    URL_REGEX.is_match(value)
}

/// Unsigned integer or decimal
pub fn is_number(value: &str) -> bool {
    NUMBER_REGEX.is_match(value)
}

/// Unsigned integer
pub fn is_integer(value: &str) -> bool {
    INTEGER_REGEX.is_match(value)
}

pub fn matches_pattern(value: &str, pattern: &Regex) -> bool {
    pattern.is_match(value)
}

/// A parsed rule clause
#[derive(Debug, Clone)]
pub enum Rule {
    Length { min: f64, max: f64 },
    Range { min: f64, max: f64 },
    Email,
    Url,
    Number,
    Integer,
    /// `None` when the argument was missing or not a usable regex
    Pattern(Option<Regex>),
    /// Any other clause name, resolved through a [`Registry`](crate::Registry)
    Custom { name: String, args: Vec<Arg> },
}

impl Rule {
    /// Build a rule from a clause name and its parsed arguments.
    pub fn from_clause(name: &str, args: Vec<Arg>) -> Self {
        let bound = |i: usize| args.get(i).map(Arg::as_number).unwrap_or(f64::NAN);

        match name {
            "length" => Rule::Length {
                min: bound(0),
                max: bound(1),
            },
            "range" => Rule::Range {
                min: bound(0),
                max: bound(1),
            },
            "email" => Rule::Email,
            "url" => Rule::Url,
            "number" => Rule::Number,
            "integer" => Rule::Integer,
            "pattern" => Rule::Pattern(match args.into_iter().next() {
                Some(Arg::Regex(re)) => Some(re),
                Some(other) => Regex::new(&other.as_text()).ok(),
                None => None,
            }),
            _ => Rule::Custom {
                name: name.to_string(),
                args,
            },
        }
    }

    /// Clause name, which is also the message key on failure
    pub fn name(&self) -> &str {
        match self {
            Rule::Length { .. } => "length",
            Rule::Range { .. } => "range",
            Rule::Email => "email",
            Rule::Url => "url",
            Rule::Number => "number",
            Rule::Integer => "integer",
            Rule::Pattern(_) => "pattern",
            Rule::Custom { name, .. } => name,
        }
    }

    /// Arguments in clause form
    pub fn args(&self) -> Vec<Arg> {
        match self {
            Rule::Length { min, max } | Rule::Range { min, max } => {
                vec![Arg::Number(*min), Arg::Number(*max)]
            }
            Rule::Pattern(Some(re)) => vec![Arg::Regex(re.clone())],
            Rule::Custom { args, .. } => args.clone(),
            _ => Vec::new(),
        }
    }

    /// Check a built-in rule. Returns `None` for [`Rule::Custom`].
    pub fn check(&self, value: &str) -> Option<bool> {
        let valid = match self {
            Rule::Length { min, max } => is_valid_length(value, *min, *max),
            Rule::Range { min, max } => is_in_range(value, *min, *max),
            Rule::Email => is_valid_email(value),
            Rule::Url => is_valid_url(value),
            Rule::Number => is_number(value),
            Rule::Integer => is_integer(value),
            Rule::Pattern(Some(re)) => matches_pattern(value, re),
            Rule::Pattern(None) => false,
            Rule::Custom { .. } => return None,
        };
        Some(valid)
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Rule::Pattern(a), Rule::Pattern(b)) => {
                a.as_ref().map(Regex::as_str) == b.as_ref().map(Regex::as_str)
            }
            (
                Rule::Custom { name: a, args: x },
                Rule::Custom { name: b, args: y },
            ) => a == b && x == y,
            (
                Rule::Length { min: a, max: b },
                Rule::Length { min: c, max: d },
            )
            | (
                Rule::Range { min: a, max: b },
                Rule::Range { min: c, max: d },
            ) => a == c && b == d,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Rule", 2)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("args", &self.args())?;
        state.end()
    }
}

/// Parsed `data-validation` attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleSet {
    pub required: bool,
    /// Name of the field whose value must match this one
    pub equals: Option<String>,
    pub items: Vec<Rule>,
}
