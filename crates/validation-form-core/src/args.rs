//! Clause argument parsing
//!
//! Arguments are comma separated. Regex literals (`/.../`) and single-quoted
//! strings (`'...'`) may contain commas, so they are lifted out before the
//! split and put back afterwards.

use crate::number::to_number;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

static REGEX_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(.+?)/\s?(,|$)").unwrap());

static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"'(.*?)'\s?(,|$)").unwrap());

static NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").unwrap());

// Placeholders use control characters so they cannot collide with user text.
const REGEX_MARK: char = '\u{1}';
const STRING_MARK: char = '\u{2}';

/// A single typed clause argument
#[derive(Debug, Clone)]
pub enum Arg {
    Number(f64),
    Str(String),
    Regex(Regex),
}

impl Arg {
    /// Numeric value of the argument, `NaN` when it has none.
    pub fn as_number(&self) -> f64 {
        match self {
            Arg::Number(n) => *n,
            Arg::Str(s) => to_number(s),
            Arg::Regex(_) => f64::NAN,
        }
    }

    /// Text form of the argument (regex literals yield their source)
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Arg::Str(s) => Cow::Borrowed(s),
            Arg::Regex(re) => Cow::Borrowed(re.as_str()),
            Arg::Number(_) => Cow::Owned(self.to_string()),
        }
    }

    fn from_regex_source(source: &str) -> Self {
        match Regex::new(source) {
            Ok(re) => Arg::Regex(re),
            Err(e) => {
                tracing::warn!("Regex literal /{}/ does not compile, keeping it as text: {}", source, e);
                Arg::Str(source.to_string())
            }
        }
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Arg::Number(a), Arg::Number(b)) => a == b,
            (Arg::Str(a), Arg::Str(b)) => a == b,
            (Arg::Regex(a), Arg::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // Whole numbers print without a fraction at any magnitude
            Arg::Number(n) => write!(f, "{}", n),
            Arg::Str(s) => f.write_str(s),
            Arg::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl From<f64> for Arg {
    fn from(n: f64) -> Self {
        Arg::Number(n)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<Regex> for Arg {
    fn from(re: Regex) -> Self {
        Arg::Regex(re)
    }
}

impl Serialize for Arg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Arg::Number(n) => serializer.serialize_f64(*n),
            Arg::Str(s) => serializer.serialize_str(s),
            Arg::Regex(re) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("regex", re.as_str())?;
                map.end()
            }
        }
    }
}

/// Parse the raw text between a clause's parentheses.
///
/// `None` and blank input produce no arguments.
pub fn parse_args(input: Option<&str>) -> Vec<Arg> {
    let Some(input) = input.filter(|s| !s.trim().is_empty()) else {
        return Vec::new();
    };

    let mut regexes = Vec::new();
    let masked = REGEX_LITERAL.replace_all(input, |caps: &Captures| {
        regexes.push(caps[1].to_string());
        format!("{}{}", REGEX_MARK, &caps[2])
    });

    let mut strings = Vec::new();
    let masked = STRING_LITERAL.replace_all(&masked, |caps: &Captures| {
        strings.push(caps[1].to_string());
        format!("{}{}", STRING_MARK, &caps[2])
    });

    let mut regexes = regexes.into_iter();
    let mut strings = strings.into_iter();

    masked
        .split(',')
        .map(|token| {
            let token = token.trim();
            if token.contains(REGEX_MARK) {
                if let Some(source) = regexes.next() {
                    return Arg::from_regex_source(&source);
                }
            }
            if token.contains(STRING_MARK) {
                if let Some(s) = strings.next() {
                    return Arg::Str(s);
                }
            }
            if NUMERAL.is_match(token) {
                if let Ok(n) = token.parse() {
                    return Arg::Number(n);
                }
            }
            Arg::Str(token.to_string())
        })
        .collect()
}
