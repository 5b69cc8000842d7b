//! mldebug - ML Debugging Expert
//!
//! Rule-based diagnosis of machine-learning training problems (overfitting,
//! underfitting, bad learning rate, small dataset, small batch, healthy model)
//! from a set of training metrics.
//!
//! ```
//! use mldebug::{diagnose, MetricValue, MetricsInput};
//!
//! let metrics = MetricsInput::new()
//!     .with("train_accuracy", MetricValue::Int(95))
//!     .with("test_accuracy", MetricValue::Int(68));
//!
//! let result = diagnose(&metrics).unwrap();
//! assert_eq!(result.issues_found, 1);
//! assert!(result.diagnoses[0].starts_with("OVERFITTING DETECTED"));
//! ```

pub mod app;
pub mod config;
pub mod facts;
pub mod inference;
pub mod render;

// Re-exports
pub use app::App;
pub use config::{Config, OutputFormat};
pub use facts::{
    ConvergenceSpeed, InputError, LossOscillation, MetricValue, MetricsInput, MetricsRecord, Percentage,
    ValidationError, ValidationKind,
};
pub use inference::{diagnose, diagnose_record, DiagnosisResult, DiagnosticRule, InferenceEngine, RuleSet};

/// Result type alias
pub type Result<T> = anyhow::Result<T>;
