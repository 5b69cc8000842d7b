//! Inference engine - single linear pass of the rule set over one record

use super::rules::RuleSet;
use crate::facts::{MetricsInput, MetricsRecord, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Outcome of one diagnosis request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// One entry per fired rule, in rule order
    pub diagnoses: Vec<String>,
    /// Deduplicated; order is not significant
    pub recommendations: Vec<String>,
    pub issues_found: usize,
}

impl DiagnosisResult {
    pub fn has_issues(&self) -> bool {
        self.issues_found > 0
    }

    /// Recommendations in lexicographic order, for stable rendering
    pub fn sorted_recommendations(&self) -> Vec<&str> {
        let mut recs: Vec<&str> = self.recommendations.iter().map(String::as_str).collect();
        recs.sort_unstable();
        recs
    }
}

/// Holds one metrics record and the accumulator the rules write into
#[derive(Debug)]
pub struct InferenceEngine {
    rules: RuleSet,
    metrics: MetricsRecord,
    diagnoses: Vec<String>,
    recommendations: HashSet<&'static str>,
    issues: BTreeSet<&'static str>,
    fired: Vec<&'static str>,
}

impl InferenceEngine {
    /// Engine over the standard rule set
    pub fn new(metrics: MetricsRecord) -> Self {
        Self::with_rules(metrics, RuleSet::standard())
    }

    pub fn with_rules(metrics: MetricsRecord, rules: RuleSet) -> Self {
        Self {
            rules,
            metrics,
            diagnoses: Vec::new(),
            recommendations: HashSet::new(),
            issues: BTreeSet::new(),
            fired: Vec::new(),
        }
    }

    /// Swap in a new record and clear all results
    pub fn reset(&mut self, metrics: MetricsRecord) {
        self.metrics = metrics;
        self.clear();
    }

    fn clear(&mut self) {
        self.diagnoses.clear();
        self.recommendations.clear();
        self.issues.clear();
        self.fired.clear();
    }

    /// Evaluate every rule once, in order. Re-running starts from an empty
    /// accumulator, so no rule ever fires twice for the same record.
    pub fn run(&mut self) -> &mut Self {
        self.clear();

        for rule in self.rules.iter() {
            let Some(diagnosis) = rule.evaluate(&self.metrics) else {
                continue;
            };

            log::debug!("Rule fired: {} (issue: {})", rule.name(), rule.issue());
            self.diagnoses.push(diagnosis);
            self.recommendations.extend(rule.recommendations().iter().copied());
            self.issues.insert(rule.issue());
            self.fired.push(rule.name());
        }

        log::debug!(
            "Evaluated {} rules, {} fired",
            self.rules.len(),
            self.fired.len()
        );
        self
    }

    /// Package the accumulator into a result value
    pub fn result(&self) -> DiagnosisResult {
        DiagnosisResult {
            diagnoses: self.diagnoses.clone(),
            recommendations: self.recommendations.iter().map(|r| r.to_string()).collect(),
            issues_found: self.diagnoses.len(),
        }
    }

    /// Issue tags asserted so far (observability only)
    pub fn issues(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.issues.iter().copied()
    }

    /// Names of fired rules, in firing order
    pub fn fired_rules(&self) -> &[&'static str] {
        &self.fired
    }
}

/// Diagnose an already validated record
pub fn diagnose_record(metrics: &MetricsRecord) -> DiagnosisResult {
    InferenceEngine::new(metrics.clone()).run().result()
}

/// Validate raw metrics and diagnose them
pub fn diagnose(input: &MetricsInput) -> Result<DiagnosisResult, ValidationError> {
    let record = MetricsRecord::from_input(input)?;
    Ok(diagnose_record(&record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::MetricValue;
    use crate::inference::rules::DiagnosticRule;

    fn input(pairs: &[(&str, i64)]) -> MetricsInput {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), MetricValue::Int(*v)))
            .collect()
    }

    struct AlwaysA;
    impl DiagnosticRule for AlwaysA {
        fn name(&self) -> &'static str {
            "always_a"
        }
        fn issue(&self) -> &'static str {
            "a"
        }
        fn recommendations(&self) -> &'static [&'static str] {
            &["Shared advice", "Only from A"]
        }
        fn evaluate(&self, _metrics: &MetricsRecord) -> Option<String> {
            Some("A fired".to_string())
        }
    }

    struct AlwaysB;
    impl DiagnosticRule for AlwaysB {
        fn name(&self) -> &'static str {
            "always_b"
        }
        fn issue(&self) -> &'static str {
            "b"
        }
        fn recommendations(&self) -> &'static [&'static str] {
            &["Shared advice", "Only from B"]
        }
        fn evaluate(&self, _metrics: &MetricsRecord) -> Option<String> {
            Some("B fired".to_string())
        }
    }

    static SHARED: &[&dyn DiagnosticRule] = &[&AlwaysA, &AlwaysB];
    static NONE: &[&dyn DiagnosticRule] = &[];

    #[test]
    fn test_empty_rule_set() {
        let rules = RuleSet::from_static(NONE);
        assert!(rules.is_empty());
        assert!(!RuleSet::standard().is_empty());

        let mut engine = InferenceEngine::with_rules(MetricsRecord::default(), rules);
        assert_eq!(engine.run().result(), DiagnosisResult::default());
    }

    #[test]
    fn test_recommendations_are_deduplicated() {
        let mut engine = InferenceEngine::with_rules(MetricsRecord::default(), RuleSet::from_static(SHARED));
        let result = engine.run().result();

        assert_eq!(result.diagnoses, vec!["A fired", "B fired"]);
        assert_eq!(result.issues_found, 2);
        assert_eq!(
            result.sorted_recommendations(),
            vec!["Only from A", "Only from B", "Shared advice"]
        );
        assert_eq!(engine.issues().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_rerun_does_not_double_fire() {
        let record = MetricsRecord::from_input(&input(&[("dataset_size", 500)])).unwrap();
        let mut engine = InferenceEngine::new(record);
        engine.run();
        engine.run();

        let result = engine.result();
        assert_eq!(result.issues_found, 1);
        assert_eq!(engine.fired_rules(), &["small_dataset"]);
    }

    #[test]
    fn test_reset_clears_results() {
        let record = MetricsRecord::from_input(&input(&[("dataset_size", 500)])).unwrap();
        let mut engine = InferenceEngine::new(record);
        engine.run();
        assert!(engine.result().has_issues());

        engine.reset(MetricsRecord::default());
        assert_eq!(engine.result(), DiagnosisResult::default());
        assert_eq!(engine.issues().count(), 0);

        engine.run();
        assert!(!engine.result().has_issues());
    }

    #[test]
    fn test_issue_tags_collected() {
        let record = MetricsRecord::from_input(
            &input(&[("train_accuracy", 95), ("test_accuracy", 68), ("dataset_size", 200)]),
        )
        .unwrap();
        let mut engine = InferenceEngine::new(record);
        engine.run();

        assert_eq!(engine.fired_rules(), &["overfitting", "small_dataset"]);
        assert_eq!(engine.issues().collect::<Vec<_>>(), vec!["overfitting", "small_data"]);
    }

    #[test]
    fn test_no_rules_fire() {
        let result = diagnose(&input(&[("dataset_size", 5000), ("batch_size", 64)])).unwrap();
        assert_eq!(result, DiagnosisResult::default());
        assert!(!result.has_issues());
    }

    #[test]
    fn test_invalid_input_is_not_diagnosed() {
        let err = diagnose(&input(&[("train_accuracy", 150)])).unwrap_err();
        assert_eq!(err.field, "train_accuracy");
    }
}
