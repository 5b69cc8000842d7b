//! Raw input parsing - CLI pairs, JSON documents, and text-generation output

use super::validation::{ValidationError, ValidationKind};
use super::{MetricValue, MetricsInput};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Failure to turn caller-supplied data into a `MetricsInput`
#[derive(Debug, Error)]
pub enum InputError {
    #[error("metric `{0}` must look like name=value")]
    MalformedPair(String),

    #[error("metrics must be a JSON object")]
    NotAnObject,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl MetricsInput {
    /// Parse `name=value` pairs as given on the command line
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut input = MetricsInput::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let Some((name, raw)) = pair.split_once('=') else {
                return Err(InputError::MalformedPair(pair.to_string()));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(InputError::MalformedPair(pair.to_string()));
            }
            input.insert(name, MetricValue::parse(raw));
        }
        Ok(input)
    }

    /// Build from a JSON object; `null` members are treated as absent
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, InputError> {
        let object = value.as_object().ok_or(InputError::NotAnObject)?;

        let mut input = MetricsInput::new();
        for (name, member) in object {
            let value = match member {
                serde_json::Value::Null => continue,
                serde_json::Value::Bool(b) => MetricValue::Bool(*b),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => MetricValue::Int(i),
                    None => MetricValue::Float(n.as_f64().unwrap_or(f64::NAN)),
                },
                serde_json::Value::String(s) => MetricValue::String(s.clone()),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(ValidationError::new(name.as_str(), ValidationKind::NotAScalar).into());
                }
            };
            input.insert(name.as_str(), value);
        }
        Ok(input)
    }

    /// Parse a JSON document string
    pub fn from_json_str(text: &str) -> Result<Self, InputError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }
}

fn object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{[^{}]*\}").unwrap())
}

/// Pull the first flat `{...}` object out of free text, e.g. a model reply
/// wrapped in a markdown code fence. No object means an empty input.
pub fn extract_json_object(text: &str) -> Result<MetricsInput, InputError> {
    match object_re().find(text) {
        Some(m) => MetricsInput::from_json_str(m.as_str()),
        None => {
            log::debug!("No JSON object found in {} bytes of text", text.len());
            Ok(MetricsInput::new())
        }
    }
}
