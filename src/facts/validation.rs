//! Metrics record construction and validation

use super::{ConvergenceSpeed, LossOscillation, MetricValue, MetricsInput, MetricsRecord, Percentage};
use std::str::FromStr;
use thiserror::Error;

/// Why a supplied value was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationKind {
    #[error("expected a number")]
    NotANumber,

    #[error("must be a finite number")]
    NotFinite,

    #[error("must be between {min} and {max}")]
    OutOfRange { min: f64, max: f64 },

    #[error("expected a whole number")]
    NotAnInteger,

    #[error("must not be negative")]
    Negative,

    #[error("must be greater than zero")]
    NotPositive,

    #[error("expected one of: {}", .allowed.join(", "))]
    UnknownVariant { allowed: &'static [&'static str] },

    #[error("expected a scalar value, not a list or object")]
    NotAScalar,
}

/// A metric value that is out of domain or of the wrong kind
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value for `{field}`: {kind}")]
pub struct ValidationError {
    pub field: String,
    pub kind: ValidationKind,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ValidationKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

type Validated<T> = Result<Option<T>, ValidationError>;

impl MetricsRecord {
    /// Validate a raw input mapping.
    ///
    /// Fields are checked in [`MetricsRecord::FIELDS`] order, so the first
    /// offending field is the one reported. Unrecognized names are ignored.
    pub fn from_input(input: &MetricsInput) -> Result<Self, ValidationError> {
        for (field, value) in input.iter() {
            if !Self::FIELDS.contains(&field.as_str()) {
                log::debug!("Ignoring unrecognized metric {}={}", field, value);
            }
        }

        Ok(Self {
            train_accuracy: percentage(input, "train_accuracy")?,
            test_accuracy: percentage(input, "test_accuracy")?,
            validation_accuracy: percentage(input, "validation_accuracy")?,
            loss_oscillation: variant(input, "loss_oscillation", LossOscillation::VARIANTS)?,
            convergence_speed: variant(input, "convergence_speed", ConvergenceSpeed::VARIANTS)?,
            dataset_size: count(input, "dataset_size", false)?,
            batch_size: count(input, "batch_size", true)?,
            learning_rate: positive_real(input, "learning_rate")?,
            epochs: count(input, "epochs", false)?,
        })
    }
}

fn number(field: &str, value: &MetricValue) -> Result<f64, ValidationError> {
    let v = match value {
        MetricValue::Int(_) | MetricValue::Float(_) => value.as_float().unwrap_or(f64::NAN),
        MetricValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::new(field, ValidationKind::NotANumber))?,
        MetricValue::Bool(_) => return Err(ValidationError::new(field, ValidationKind::NotANumber)),
    };

    if !v.is_finite() {
        return Err(ValidationError::new(field, ValidationKind::NotFinite));
    }
    Ok(v)
}

/// Percentage in [0, 100], remembering how the caller wrote it
fn percentage(input: &MetricsInput, field: &str) -> Validated<Percentage> {
    let Some(value) = input.get(field) else {
        return Ok(None);
    };

    let v = number(field, value)?;
    if !(0.0..=100.0).contains(&v) {
        return Err(ValidationError::new(
            field,
            ValidationKind::OutOfRange {
                min: 0.0,
                max: 100.0,
            },
        ));
    }

    let repr = match value {
        MetricValue::Int(i) => i.to_string(),
        MetricValue::String(s) => s.trim().to_string(),
        _ => format!("{:?}", v),
    };
    Ok(Some(Percentage::new(v, repr)))
}

fn positive_real(input: &MetricsInput, field: &str) -> Validated<f64> {
    let Some(value) = input.get(field) else {
        return Ok(None);
    };

    let v = number(field, value)?;
    if v <= 0.0 {
        return Err(ValidationError::new(field, ValidationKind::NotPositive));
    }
    Ok(Some(v))
}

/// Whole-number field; integral floats such as `5000.0` are accepted
fn count(input: &MetricsInput, field: &str, positive: bool) -> Validated<u64> {
    let Some(value) = input.get(field) else {
        return Ok(None);
    };

    let n = match value {
        MetricValue::Int(v) => {
            if *v < 0 {
                return Err(ValidationError::new(field, ValidationKind::Negative));
            }
            *v as u64
        }
        other => {
            let v = number(field, other)?;
            if v.fract() != 0.0 {
                return Err(ValidationError::new(field, ValidationKind::NotAnInteger));
            }
            if v < 0.0 {
                return Err(ValidationError::new(field, ValidationKind::Negative));
            }
            v as u64
        }
    };

    if positive && n == 0 {
        return Err(ValidationError::new(field, ValidationKind::NotPositive));
    }
    Ok(Some(n))
}

fn variant<T: FromStr>(
    input: &MetricsInput,
    field: &str,
    allowed: &'static [&'static str],
) -> Validated<T> {
    let Some(value) = input.get(field) else {
        return Ok(None);
    };

    value
        .as_string()
        .and_then(|s| s.parse::<T>().ok())
        .map(Some)
        .ok_or_else(|| ValidationError::new(field, ValidationKind::UnknownVariant { allowed }))
}
