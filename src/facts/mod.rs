//! Facts layer - raw metric input and the validated metrics record
//!
//! Upstream callers (CLI flags, JSON files, text-generation output) produce a
//! loose `MetricsInput`. `MetricsRecord::from_input` turns it into the typed
//! record the rules are evaluated against.

pub mod input;
pub mod validation;

pub use input::{extract_json_object, InputError};
pub use validation::{ValidationError, ValidationKind};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw scalar value as supplied by a caller
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl MetricValue {
    /// Parse a CLI-style raw string: integer, then float, then bool, else string
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(v) = raw.parse::<i64>() {
            return MetricValue::Int(v);
        }
        if let Ok(v) = raw.parse::<f64>() {
            return MetricValue::Float(v);
        }
        match raw {
            "true" => MetricValue::Bool(true),
            "false" => MetricValue::Bool(false),
            _ => MetricValue::String(raw.to_string()),
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetricValue::Float(v) => Some(*v),
            MetricValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            MetricValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{}", v),
            MetricValue::Float(v) => write!(f, "{}", v),
            MetricValue::Bool(v) => write!(f, "{}", v),
            MetricValue::String(v) => write!(f, "{}", v),
        }
    }
}

/// Field name -> raw value mapping handed to the engine.
///
/// Absent fields are simply not present; there is no null or sentinel entry.
/// Deserializing drops `null` members for the same reason.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Option<MetricValue>>")]
pub struct MetricsInput {
    values: BTreeMap<String, MetricValue>,
}

impl MetricsInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field
    pub fn insert(&mut self, field: impl Into<String>, value: MetricValue) {
        self.values.insert(field.into(), value);
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: MetricValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&MetricValue> {
        self.values.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetricValue)> {
        self.values.iter()
    }

    /// Overlay `other` on top of `self`; fields in `other` win
    pub fn merge(&mut self, other: MetricsInput) {
        self.values.extend(other.values);
    }
}

impl FromIterator<(String, MetricValue)> for MetricsInput {
    fn from_iter<I: IntoIterator<Item = (String, MetricValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, Option<MetricValue>>> for MetricsInput {
    fn from(map: BTreeMap<String, Option<MetricValue>>) -> Self {
        map.into_iter()
            .filter_map(|(field, value)| Some((field, value?)))
            .collect()
    }
}

/// How much the training loss oscillates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossOscillation {
    High,
    Medium,
    Low,
}

impl LossOscillation {
    pub const VARIANTS: &'static [&'static str] = &["high", "medium", "low"];
}

impl FromStr for LossOscillation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(()),
        }
    }
}

/// How quickly training converges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceSpeed {
    VerySlow,
    Slow,
    Normal,
    Fast,
}

impl ConvergenceSpeed {
    pub const VARIANTS: &'static [&'static str] = &["very_slow", "slow", "normal", "fast"];
}

impl FromStr for ConvergenceSpeed {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "very_slow" => Ok(Self::VerySlow),
            "slow" => Ok(Self::Slow),
            "normal" => Ok(Self::Normal),
            "fast" => Ok(Self::Fast),
            _ => Err(()),
        }
    }
}

/// A percentage together with the text it was given as, so diagnoses can
/// quote `95.0` as `95.0` and `95` as `95`.
#[derive(Debug, Clone, PartialEq)]
pub struct Percentage {
    value: f64,
    repr: String,
}

impl Percentage {
    pub(crate) fn new(value: f64, repr: String) -> Self {
        Self { value, repr }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl From<i64> for Percentage {
    fn from(v: i64) -> Self {
        Self::new(v as f64, v.to_string())
    }
}

impl From<f64> for Percentage {
    fn from(v: f64) -> Self {
        Self::new(v, format!("{:?}", v))
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

/// Validated training metrics. `None` means unknown, never zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsRecord {
    pub train_accuracy: Option<Percentage>,
    pub test_accuracy: Option<Percentage>,
    pub validation_accuracy: Option<Percentage>,
    pub loss_oscillation: Option<LossOscillation>,
    pub convergence_speed: Option<ConvergenceSpeed>,
    pub dataset_size: Option<u64>,
    pub batch_size: Option<u64>,
    pub learning_rate: Option<f64>,
    pub epochs: Option<u64>,
}

impl MetricsRecord {
    /// Field names the record understands, in validation order
    pub const FIELDS: &'static [&'static str] = &[
        "train_accuracy",
        "test_accuracy",
        "validation_accuracy",
        "loss_oscillation",
        "convergence_speed",
        "dataset_size",
        "batch_size",
        "learning_rate",
        "epochs",
    ];

    /// Train and test accuracy, only when both are known
    pub fn accuracies(&self) -> Option<(&Percentage, &Percentage)> {
        Some((self.train_accuracy.as_ref()?, self.test_accuracy.as_ref()?))
    }
}
