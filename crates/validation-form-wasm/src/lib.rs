//! Validation Form WASM
//!
//! WebAssembly bindings for the validation-form core.
//! Lets a browser page parse `data-validation` / `data-filter` attributes,
//! run filters and evaluate rules with the same logic as the native engine.

use serde::Serialize;
use validation_form_core::{self as core, ClauseGrammar, Registry};
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Outcome of validating a value, returned to JavaScript
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldResult {
    pub valid: bool,
    /// Message key of the first failure (`required`, `equals` or a rule name)
    pub key: Option<String>,
    /// Value after filters, to be written back into the field
    pub value: String,
}

/// Rule and filter evaluation with a custom clause grammar
///
/// # Example (JavaScript)
/// ```javascript
/// const validator = new Validator(undefined, ',');
/// const result = validator.validate('required,length(2,8)', 'trim()', ' ab ', undefined);
/// ```
///
/// Custom rules and filters cannot be registered from JavaScript, so
/// unknown clause names are always skipped here.
#[wasm_bindgen]
#[derive(Default)]
pub struct Validator {
    grammar: ClauseGrammar,
}

#[wasm_bindgen]
impl Validator {
    /// Build a validator. Missing `format`/`delimiter` fall back to the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(format: Option<String>, delimiter: Option<String>) -> Result<Validator, JsValue> {
        let format = format.as_deref().unwrap_or(core::DEFAULT_FORMAT);
        let delimiter = delimiter.as_deref().unwrap_or(core::DEFAULT_DELIMITER);
        let grammar = ClauseGrammar::new(format, delimiter)
            .map_err(|e| JsValue::from_str(&format!("Invalid clause format: {}", e)))?;

        Ok(Validator { grammar })
    }

    /// Parsed rule set as a plain object (`{ required, equals, items }`)
    #[wasm_bindgen(js_name = parseRules)]
    pub fn parse_rules(&self, rules: &str) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.grammar.parse_rules(rules))?)
    }

    /// Parsed filter list as an array of `{ name, args }`
    #[wasm_bindgen(js_name = parseFilters)]
    pub fn parse_filters(&self, filters: &str) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.grammar.parse_filters(filters))?)
    }

    /// Apply a `data-filter` attribute to a value
    #[wasm_bindgen(js_name = applyFilters)]
    pub fn apply_filters(&self, filters: &str, value: &str) -> String {
        core::apply_filters(&self.grammar.parse_filters(filters), value, &Registry::new())
    }

    /// Message key of the first failing rule, `undefined` when the value is valid
    ///
    /// `equals_value` is the current value of the field named by `equals(...)`.
    #[wasm_bindgen(js_name = validateValue)]
    pub fn validate_value(&self, rules: &str, value: &str, equals_value: Option<String>) -> Option<String> {
        let rules = self.grammar.parse_rules(rules);
        core::evaluate(&rules, value, equals_value.as_deref(), &Registry::new()).map(|key| key.to_string())
    }

    /// Filter then validate, the way the engine handles a field
    pub fn validate(
        &self,
        rules: &str,
        filters: &str,
        value: &str,
        equals_value: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let result = self.check(rules, filters, value, equals_value.as_deref());
        Ok(serde_wasm_bindgen::to_value(&result)?)
    }
}

impl Validator {
    fn check(&self, rules: &str, filters: &str, value: &str, equals_value: Option<&str>) -> FieldResult {
        let value = self.apply_filters(filters, value);
        let key = core::evaluate(&self.grammar.parse_rules(rules), &value, equals_value, &Registry::new())
            .map(|key| key.to_string());
        FieldResult {
            valid: key.is_none(),
            key,
            value,
        }
    }
}

/// Quick rule check with the default grammar
///
/// # Example (JavaScript)
/// ```javascript
/// validateValue('required;email()', 'user@example.com'); // undefined
/// validateValue('required;email()', '');                 // "required"
/// ```
#[wasm_bindgen(js_name = validateValue)]
pub fn validate_value_js(rules: &str, value: &str, equals_value: Option<String>) -> Option<String> {
    Validator::default().validate_value(rules, value, equals_value)
}

/// Quick filter run with the default grammar
#[wasm_bindgen(js_name = applyFilters)]
pub fn apply_filters_js(filters: &str, value: &str) -> String {
    Validator::default().apply_filters(filters, value)
}

/// Full-width ASCII to half-width
#[wasm_bindgen(js_name = zenhan)]
pub fn zenhan_js(value: &str) -> String {
    core::zenhan::zenhan(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_validate_value() {
        assert_eq!(validate_value_js("required;email()", "user@example.com", None), None);
        assert_eq!(
            validate_value_js("required;email()", "", None),
            Some("required".to_string())
        );
        assert_eq!(
            validate_value_js("length(2,4)", "abcdef", None),
            Some("length".to_string())
        );
    }

    #[wasm_bindgen_test]
    fn test_equals_value() {
        let rules = "required;equals(password)";
        assert_eq!(validate_value_js(rules, "abc", Some("abc".to_string())), None);
        assert_eq!(
            validate_value_js(rules, "abc", Some("abd".to_string())),
            Some("equals".to_string())
        );
    }

    #[wasm_bindgen_test]
    fn test_apply_filters() {
        assert_eq!(apply_filters_js("zenhan();trim()", " ＡＢＣ１ "), "ABC1");
        assert_eq!(apply_filters_js("replace(/-/, '')", "a-b-c"), "ab-c");
        assert_eq!(zenhan_js("ｔｅｓｔ"), "test");
    }

    #[wasm_bindgen_test]
    fn test_check_filters_before_rules() {
        let result = Validator::default().check("required", "trim()", "   ", None);
        assert_eq!(
            result,
            FieldResult {
                valid: false,
                key: Some("required".to_string()),
                value: String::new(),
            }
        );
    }

    #[wasm_bindgen_test]
    fn test_custom_delimiter() {
        let validator = Validator::new(None, Some(",".to_string())).unwrap();
        assert_eq!(validator.validate_value("required,integer()", "12a", None), Some("integer".to_string()));
        assert_eq!(validator.validate_value("required,integer()", "12", None), None);
    }

    #[wasm_bindgen_test]
    fn test_format_without_name_group_is_rejected() {
        assert!(Validator::new(Some("{{delimiter}}".to_string()), Some(",".to_string())).is_err());

        let validator = Validator::new(None, Some(",".to_string())).unwrap();
        let result = validator.check("required,length(2,8)", "trim()", " ab ", None);
        assert!(result.valid);
        assert_eq!(result.value, "ab");
    }

    #[wasm_bindgen_test]
    fn test_unknown_clauses_are_skipped() {
        let validator = Validator::default();
        assert_eq!(validator.validate_value("nosuch();integer()", "5", None), None);
        assert_eq!(validator.apply_filters("upper();trim()", " x "), "x");
    }
}
