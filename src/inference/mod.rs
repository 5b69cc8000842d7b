//! Inference layer - diagnostic rules and the engine that evaluates them

pub mod engine;
pub mod rules;

pub use engine::{diagnose, diagnose_record, DiagnosisResult, InferenceEngine};
pub use rules::{DiagnosticRule, RuleSet};
