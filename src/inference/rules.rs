//! Diagnostic rules - the fixed knowledge base
//!
//! Each rule reads only the fields it declares interest in. A missing field
//! means the rule does not fire. Rules never look at each other's issue tags.

use crate::facts::{ConvergenceSpeed, LossOscillation, MetricsRecord};

/// A named predicate over the metrics record plus the advice it carries
pub trait DiagnosticRule: Send + Sync {
    /// Unique rule name
    fn name(&self) -> &'static str;

    /// Issue tag asserted when the rule fires
    fn issue(&self) -> &'static str;

    /// Fixed recommendations contributed on firing
    fn recommendations(&self) -> &'static [&'static str];

    /// Returns the diagnosis text if the rule fires
    fn evaluate(&self, metrics: &MetricsRecord) -> Option<String>;
}

/// Immutable, ordered collection of rules
#[derive(Clone, Copy)]
pub struct RuleSet {
    rules: &'static [&'static dyn DiagnosticRule],
}

static STANDARD_RULES: &[&dyn DiagnosticRule] = &[
    &OverfittingRule,
    &UnderfittingRule,
    &LearningRateTooHighRule,
    &LearningRateTooLowRule,
    &SmallDatasetRule,
    &BatchTooSmallRule,
    &GoodPerformanceRule,
];

impl RuleSet {
    /// The built-in training diagnostics, in evaluation order
    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES,
        }
    }

    /// Custom rule set, mostly useful for tests and embedding
    pub fn from_static(rules: &'static [&'static dyn DiagnosticRule]) -> Self {
        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static dyn DiagnosticRule> {
        let rules: &'static [&'static dyn DiagnosticRule] = self.rules;
        rules.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// (name, issue tag) for every rule
    pub fn describe(&self) -> Vec<(&'static str, &'static str)> {
        self.iter().map(|r| (r.name(), r.issue())).collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|r| r.name()))
            .finish()
    }
}

// === Built-in Rules ===

struct OverfittingRule;
impl DiagnosticRule for OverfittingRule {
    fn name(&self) -> &'static str {
        "overfitting"
    }

    fn issue(&self) -> &'static str {
        "overfitting"
    }

    fn recommendations(&self) -> &'static [&'static str] {
        &[
            "Add regularization (L1/L2)",
            "Increase dropout rate (try 0.3-0.5)",
            "Use data augmentation",
            "Reduce model complexity",
            "Get more training data",
        ]
    }

    fn evaluate(&self, metrics: &MetricsRecord) -> Option<String> {
        let (train, test) = metrics.accuracies()?;
        if train.value() - test.value() > 15.0 {
            return Some(format!(
                "OVERFITTING DETECTED: Train accuracy ({}%) significantly higher than test accuracy ({}%)",
                train, test
            ));
        }
        None
    }
}

struct UnderfittingRule;
impl DiagnosticRule for UnderfittingRule {
    fn name(&self) -> &'static str {
        "underfitting"
    }

    fn issue(&self) -> &'static str {
        "underfitting"
    }

    fn recommendations(&self) -> &'static [&'static str] {
        &[
            "Increase model complexity",
            "Add more features",
            "Train for more epochs",
            "Reduce regularization",
            "Check if data preprocessing is correct",
        ]
    }

    fn evaluate(&self, metrics: &MetricsRecord) -> Option<String> {
        let (train, test) = metrics.accuracies()?;
        let (ta, tea) = (train.value(), test.value());
        if ta < 70.0 && (ta - tea).abs() < 10.0 {
            return Some(format!(
                "UNDERFITTING DETECTED: Both train ({}%) and test ({}%) accuracy are low",
                train, test
            ));
        }
        None
    }
}

struct LearningRateTooHighRule;
impl DiagnosticRule for LearningRateTooHighRule {
    fn name(&self) -> &'static str {
        "lr_too_high"
    }

    fn issue(&self) -> &'static str {
        "lr_high"
    }

    fn recommendations(&self) -> &'static [&'static str] {
        &[
            "Reduce learning rate by factor of 10 (e.g., 0.01 -> 0.001)",
            "Use learning rate scheduler",
            "Try Adam optimizer with default LR (0.001)",
        ]
    }

    fn evaluate(&self, metrics: &MetricsRecord) -> Option<String> {
        if metrics.loss_oscillation? == LossOscillation::High {
            return Some("LEARNING RATE TOO HIGH: Loss is oscillating significantly".to_string());
        }
        None
    }
}

struct LearningRateTooLowRule;
impl DiagnosticRule for LearningRateTooLowRule {
    fn name(&self) -> &'static str {
        "lr_too_low"
    }

    fn issue(&self) -> &'static str {
        "lr_low"
    }

    fn recommendations(&self) -> &'static [&'static str] {
        &[
            "Increase learning rate gradually",
            "Try learning rate finder",
            "Use cyclic learning rate",
        ]
    }

    fn evaluate(&self, metrics: &MetricsRecord) -> Option<String> {
        if metrics.convergence_speed? == ConvergenceSpeed::VerySlow {
            return Some("LEARNING RATE TOO LOW: Model is converging very slowly".to_string());
        }
        None
    }
}

struct SmallDatasetRule;
impl DiagnosticRule for SmallDatasetRule {
    fn name(&self) -> &'static str {
        "small_dataset"
    }

    fn issue(&self) -> &'static str {
        "small_data"
    }

    fn recommendations(&self) -> &'static [&'static str] {
        &[
            "Use data augmentation heavily",
            "Consider transfer learning",
            "Use simpler model architecture",
            "Collect more data if possible",
        ]
    }

    fn evaluate(&self, metrics: &MetricsRecord) -> Option<String> {
        let size = metrics.dataset_size?;
        if size < 1000 {
            return Some(format!(
                "SMALL DATASET WARNING: Only {} samples may not be sufficient",
                size
            ));
        }
        None
    }
}

struct BatchTooSmallRule;
impl DiagnosticRule for BatchTooSmallRule {
    fn name(&self) -> &'static str {
        "batch_too_small"
    }

    fn issue(&self) -> &'static str {
        "small_batch"
    }

    fn recommendations(&self) -> &'static [&'static str] {
        &[
            "Increase batch size to 32-128",
            "Use gradient accumulation if memory limited",
            "Adjust learning rate proportionally",
        ]
    }

    fn evaluate(&self, metrics: &MetricsRecord) -> Option<String> {
        let batch = metrics.batch_size?;
        let size = metrics.dataset_size?;
        if batch < 16 && size > 1000 {
            return Some(format!(
                "BATCH SIZE TOO SMALL: Batch size of {} may cause noisy gradients",
                batch
            ));
        }
        None
    }
}

struct GoodPerformanceRule;
impl DiagnosticRule for GoodPerformanceRule {
    fn name(&self) -> &'static str {
        "good_performance"
    }

    fn issue(&self) -> &'static str {
        "good"
    }

    fn recommendations(&self) -> &'static [&'static str] {
        &[
            "Model is performing well!",
            "Consider fine-tuning hyperparameters for marginal improvements",
            "Monitor for overfitting with more epochs",
        ]
    }

    fn evaluate(&self, metrics: &MetricsRecord) -> Option<String> {
        let (train, test) = metrics.accuracies()?;
        let (ta, tea) = (train.value(), test.value());
        if ta >= 85.0 && tea >= 80.0 && (ta - tea).abs() <= 10.0 {
            return Some(format!(
                "GOOD MODEL: Train ({}%) and test ({}%) accuracy are both high and balanced",
                train, test
            ));
        }
        None
    }
}
