// File: src/serialize.rs
// Purpose: Form serialization and asynchronous submission

use crate::dom::Form;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Value of a serialized field: a single value or, for repeated names, every value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    fn push(&mut self, value: String) {
        match self {
            FieldValue::Single(first) => {
                let first = std::mem::take(first);
                *self = FieldValue::Multiple(vec![first, value]);
            }
            FieldValue::Multiple(values) => values.push(value),
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            FieldValue::Single(s) => Some(s),
            FieldValue::Multiple(_) => None,
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            FieldValue::Single(s) => vec![s.as_str()],
            FieldValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// Name -> value map in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    entries: Vec<(String, FieldValue)>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value; a repeated name turns its entry into a list.
    pub fn append(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => existing.push(value.to_string()),
            None => self
                .entries
                .push((name.to_string(), FieldValue::Single(value.to_string()))),
        }
    }

    /// Replace the whole entry for `name`.
    pub fn insert(&mut self, name: &str, value: FieldValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `application/x-www-form-urlencoded` body; lists use `name[]` keys.
    pub fn to_urlencoded(&self) -> String {
        let mut pairs = Vec::new();
        for (name, value) in self.iter() {
            match value {
                FieldValue::Single(v) => pairs.push((name.to_string(), v.as_str())),
                FieldValue::Multiple(values) => {
                    let key = format!("{}[]", name);
                    pairs.extend(values.iter().map(|v| (key.clone(), v.as_str())));
                }
            }
        }

        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn encode_component(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

impl Serialize for FormValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut values = FormValues::new();
        for (name, value) in iter {
            values.append(name, value);
        }
        values
    }
}

impl Form {
    /// `(name, value)` of every successful control, in document order
    pub fn serialize_array(&self) -> Vec<(&str, &str)> {
        self.controls()
            .filter(|c| c.is_successful())
            .filter_map(|c| Some((c.name()?, c.value.as_str())))
            .collect()
    }

    /// Serialized values keyed by name; repeated names collect into a list.
    pub fn serialize_object(&self) -> FormValues {
        self.serialize_array().into_iter().collect()
    }

    /// Submit the serialized form through `transport`.
    pub async fn submit_async<T>(&self, transport: &T, json_key: Option<&str>) -> Result<SubmitResponse>
    where
        T: Transport + ?Sized,
    {
        submit_async(self, transport, json_key).await
    }
}

/// Request built from a form for asynchronous submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitRequest {
    pub url: String,
    /// Lowercase HTTP method, `get` when the form declares none
    pub method: String,
    pub data: FormValues,
}

impl SubmitRequest {
    /// Build the request for `form`.
    ///
    /// With `json_key`, the serialized values are sent as a single JSON string
    /// under that key instead of one entry per field.
    pub fn from_form(form: &Form, json_key: Option<&str>) -> Result<Self> {
        let values = form.serialize_object();
        let data = match json_key {
            Some(key) => {
                let json = serde_json::to_string(&values).context("Failed to encode form values as JSON")?;
                let mut data = FormValues::new();
                data.insert(key, FieldValue::Single(json));
                data
            }
            None => values,
        };

        let method = match form.method.trim() {
            "" => "get".to_string(),
            method => method.to_ascii_lowercase(),
        };

        Ok(Self {
            url: form.action.clone(),
            method,
            data,
        })
    }

    /// Urlencoded data; sent as the query string for `get`, the body otherwise
    pub fn encoded(&self) -> String {
        self.data.to_urlencoded()
    }

    pub fn is_get(&self) -> bool {
        self.method == "get"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: String,
}

/// Sends a submit request (an HTTP client in the host)
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: SubmitRequest) -> Result<SubmitResponse>;
}

/// Serialize `form` and send it through `transport`.
pub async fn submit_async<T>(form: &Form, transport: &T, json_key: Option<&str>) -> Result<SubmitResponse>
where
    T: Transport + ?Sized,
{
    let request = SubmitRequest::from_form(form, json_key)?;
    tracing::debug!("Submitting form to {:?} ({})", request.url, request.method);
    transport
        .send(request)
        .await
        .context("Form submission failed")
}
