// File: src/config.rs
// Purpose: Per-instance options, deep-merged over the defaults

use crate::dom::{Transition, TransitionKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use validation_form_core::{ClauseGrammar, DEFAULT_DELIMITER, DEFAULT_FORMAT};

/// Field name -> message key -> text
pub type MessageCatalog = BTreeMap<String, BTreeMap<String, String>>;

/// Where a message node is inserted relative to its field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessagePosition {
    Before,
    #[default]
    After,
}

/// Validation options
///
/// Keys are camelCase in TOML/JSON (`validateEvent`, `messageClassName`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Allow the default submit action when the form is valid
    #[serde(default = "default_true")]
    pub submit: bool,

    /// Clause grammar template, see [`ClauseGrammar`]
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Space separated event names that validate a single field
    #[serde(default = "default_validate_event")]
    pub validate_event: String,

    #[serde(default = "default_message")]
    pub default_message: String,

    #[serde(default)]
    pub messages: Option<MessageCatalog>,

    #[serde(default = "default_message_class_name")]
    pub message_class_name: String,

    #[serde(default)]
    pub message_position: MessagePosition,

    #[serde(default = "default_true")]
    pub message_fade: bool,

    /// Show/hide transition length in milliseconds
    #[serde(default = "default_message_duration")]
    pub message_duration: u64,
}

// Default values
fn default_true() -> bool {
    true
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

fn default_validate_event() -> String {
    "change blur".to_string()
}

fn default_message() -> String {
    "Invalid input".to_string()
}

fn default_message_class_name() -> String {
    "validation-message".to_string()
}

fn default_message_duration() -> u64 {
    300
}

impl Default for Options {
    fn default() -> Self {
        Self {
            submit: true,
            format: default_format(),
            delimiter: default_delimiter(),
            validate_event: default_validate_event(),
            default_message: default_message(),
            messages: None,
            message_class_name: default_message_class_name(),
            message_position: MessagePosition::After,
            message_fade: true,
            message_duration: default_message_duration(),
        }
    }
}

/// Recursively merge `overrides` into `target`.
///
/// Objects merge key by key; any other override value (including `null`)
/// replaces the target value.
pub fn deep_merge(target: &mut Value, overrides: Value) {
    match (target, overrides) {
        (Value::Object(target), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, overrides) => *target = overrides,
    }
}

impl Options {
    /// Defaults with `overrides` deep-merged on top
    pub fn with_overrides(overrides: Value) -> Result<Self> {
        let mut options = Self::default();
        options.merge(overrides)?;
        Ok(options)
    }

    /// Deep-merge `overrides` into these options.
    pub fn merge(&mut self, overrides: Value) -> Result<()> {
        let mut current = serde_json::to_value(&*self).context("Failed to serialize options")?;
        deep_merge(&mut current, overrides);
        *self = serde_json::from_value(current).context("Invalid validation options")?;
        Ok(())
    }

    /// Load options from a TOML file, merged over the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let overrides: Value = toml::from_str(&content)
            .with_context(|| format!("Failed to parse options file: {:?}", path))?;

        Self::with_overrides(overrides)
            .with_context(|| format!("Invalid options in {:?}", path))
    }

    /// Event names that trigger single-field validation
    pub fn validate_events(&self) -> impl Iterator<Item = &str> {
        self.validate_event.split_whitespace()
    }

    pub fn triggers(&self, event: &str) -> bool {
        self.validate_events().any(|name| name == event)
    }

    /// Message text for a failing key, falling back to `default_message`
    pub fn message_for(&self, field: &str, key: &str) -> &str {
        self.messages
            .as_ref()
            .and_then(|catalog| catalog.get(field))
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
            .unwrap_or(&self.default_message)
    }

    pub fn transition(&self) -> Transition {
        Transition {
            kind: if self.message_fade {
                TransitionKind::Fade
            } else {
                TransitionKind::Instant
            },
            duration: Duration::from_millis(self.message_duration),
        }
    }

    pub fn grammar(&self) -> Result<ClauseGrammar> {
        ClauseGrammar::new(&self.format, &self.delimiter)
            .with_context(|| format!("Failed to build clause grammar from format {:?}", self.format))
    }
}
