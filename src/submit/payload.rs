//! Form state and request body construction.
//!
//! A [`FormPayload`] is the snapshot of the form taken at trigger time. It is
//! turned into a [`RequestBody`] immediately before the request is sent; for
//! the structured variant this is where the `global` and `month` fields are
//! parsed as JSON.

use serde_json::{Map, Value};
use tracing::debug;

use super::constants::{FORM_ENDPOINT, STRUCTURED_ENDPOINT};
use super::error::SubmitError;

/// Field holding the global (per-person) JSON document.
pub const FIELD_GLOBAL: &str = "global";
/// Field holding the per-month JSON document.
pub const FIELD_MONTH: &str = "month";
/// Checkbox field: sort entries chronologically.
pub const FIELD_SORT: &str = "sort";
/// Checkbox field: validate entries before rendering.
pub const FIELD_VALIDATE: &str = "validate";

/// Named form fields with string values, in insertion order.
///
/// Names may repeat, as they do in an HTML form with table rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
}

impl FormPayload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, keeping any earlier field with the same name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true when at least one field is called `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Iterates over all fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormPayload
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Which server endpoint a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Raw form data, URL-encoded, posted to the document root.
    Form,
    /// `{ global, month, sort?, validate? }` as JSON, posted to `tsg/`.
    #[default]
    Structured,
}

impl Variant {
    /// Path of the endpoint, relative to the configured server.
    #[must_use]
    pub fn endpoint_path(self) -> &'static str {
        match self {
            Self::Form => FORM_ENDPOINT,
            Self::Structured => STRUCTURED_ENDPOINT,
        }
    }

    /// Stable label for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Structured => "structured",
        }
    }
}

/// A serialized request body, ready to post.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` text.
    Form(String),
    /// `application/json` document.
    Json(Value),
}

impl RequestBody {
    /// Builds the body for `variant` from the current form state.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InvalidJson`] when `global` or `month` is
    /// present but does not hold valid JSON (structured variant only).
    pub fn build(variant: Variant, payload: &FormPayload) -> Result<Self, SubmitError> {
        match variant {
            Variant::Form => Ok(Self::Form(encode_form(payload))),
            Variant::Structured => structured_body(payload).map(Self::Json),
        }
    }

    /// Value for the `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Form(_) => "application/x-www-form-urlencoded",
            Self::Json(_) => "application/json",
        }
    }
}

fn encode_form(payload: &FormPayload) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(payload.iter())
        .finish()
}

fn structured_body(payload: &FormPayload) -> Result<Value, SubmitError> {
    let global = parse_json_field(payload, FIELD_GLOBAL)?;
    let month = parse_json_field(payload, FIELD_MONTH)?;

    let mut body = Map::new();
    body.insert(FIELD_GLOBAL.to_string(), global);
    body.insert(FIELD_MONTH.to_string(), month);
    // Checkbox semantics: present means checked, absent is left out entirely.
    for flag in [FIELD_SORT, FIELD_VALIDATE] {
        if payload.contains(flag) {
            body.insert(flag.to_string(), Value::Bool(true));
        }
    }
    Ok(Value::Object(body))
}

/// Absent fields become `null`; present ones must parse.
fn parse_json_field(payload: &FormPayload, field: &str) -> Result<Value, SubmitError> {
    let Some(raw) = payload.get(field) else {
        debug!(field, "json field absent, sending null");
        return Ok(Value::Null);
    };
    serde_json::from_str(raw).map_err(|e| SubmitError::invalid_json(field, e))
}
