//! Numeric coercion matching the browser's `Number(string)`

use once_cell::sync::Lazy;
use regex::Regex;

static DECIMAL_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap());

/// Coerce a string to a number.
///
/// Surrounding whitespace is ignored, an empty string is `0`, `0x`/`0X`
/// prefixes are hexadecimal and anything else that is not a decimal literal
/// (or `Infinity`) is `NaN`.
pub fn to_number(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return parse_hex(hex);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if DECIMAL_LITERAL.is_match(trimmed) {
        trimmed.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

// Digits only, no sign; accumulated as f64 so large values stay finite.
fn parse_hex(digits: &str) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| c.to_digit(16).map(|d| acc * 16.0 + f64::from(d)))
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_literals() {
        assert_eq!(to_number("10"), 10.0);
        assert_eq!(to_number(" 2.5 "), 2.5);
        assert_eq!(to_number("-3"), -3.0);
        assert_eq!(to_number(".5"), 0.5);
        assert_eq!(to_number("1e3"), 1000.0);
    }

    #[test]
    fn test_special_forms() {
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("   "), 0.0);
        assert_eq!(to_number("0x1F"), 31.0);
        assert_eq!(to_number("Infinity"), f64::INFINITY);
        assert_eq!(to_number("0xff"), 255.0);
        assert_eq!(to_number("0x10000000000000000"), 18446744073709551616.0);
    }

    #[test]
    fn test_not_a_number() {
        assert!(to_number("abc").is_nan());
        assert!(to_number("12px").is_nan());
        assert!(to_number("inf").is_nan());
        assert!(to_number("0xZZ").is_nan());
        assert!(to_number("0x").is_nan());
        assert!(to_number("0x+1").is_nan());
        assert!(to_number("0x-1").is_nan());
    }
}
