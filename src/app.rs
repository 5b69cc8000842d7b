//! Application layer - gathers metrics from every source and runs a diagnosis

use crate::config::{Config, OutputFormat};
use crate::facts::{extract_json_object, MetricValue, MetricsInput, MetricsRecord};
use crate::inference::{DiagnosisResult, InferenceEngine, RuleSet};
use crate::render;
use anyhow::{Context, Result};
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

/// Where metrics for a `diagnose` run come from
#[derive(Debug, Clone, Default)]
pub struct MetricSources {
    /// JSON document with a metrics object (`-` for stdin)
    pub input: Option<PathBuf>,
    /// Free text containing a JSON object, e.g. a saved model reply (`-` for stdin)
    pub extract: Option<PathBuf>,
    /// `name=value` pairs
    pub pairs: Vec<String>,
}

/// Questions asked in interactive mode: (field, prompt)
const PROMPTS: &[(&str, &str)] = &[
    ("train_accuracy", "Training accuracy (0-100)"),
    ("test_accuracy", "Test accuracy (0-100)"),
    ("dataset_size", "Dataset size (number of samples)"),
    ("batch_size", "Batch size"),
    ("loss_oscillation", "Loss oscillation (high/medium/low)"),
    ("convergence_speed", "Convergence speed (very_slow/slow/normal/fast)"),
];

/// Application state
pub struct App {
    pub config: Config,
    pub rules: RuleSet,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rules: RuleSet::standard(),
        }
    }

    /// Merge config defaults, JSON input, extracted text, then CLI pairs (later wins)
    pub fn gather(&self, sources: &MetricSources) -> Result<MetricsInput> {
        let mut metrics = self.config.metrics.clone();

        if let Some(path) = &sources.input {
            let text = read_source(path)?;
            let parsed = MetricsInput::from_json_str(&text)
                .with_context(|| format!("Failed to parse metrics from {}", path.display()))?;
            metrics.merge(parsed);
        }

        if let Some(path) = &sources.extract {
            let text = read_source(path)?;
            let extracted = extract_json_object(&text)
                .with_context(|| format!("Failed to extract metrics from {}", path.display()))?;
            log::info!("Extracted {} metric(s) from {}", extracted.len(), path.display());
            metrics.merge(extracted);
        }

        metrics.merge(MetricsInput::from_pairs(&sources.pairs)?);
        Ok(metrics)
    }

    /// Validate and diagnose
    pub fn diagnose(&self, metrics: &MetricsInput) -> Result<DiagnosisResult> {
        if metrics.is_empty() {
            anyhow::bail!("No metrics provided");
        }

        let record = MetricsRecord::from_input(metrics)?;
        let mut engine = InferenceEngine::with_rules(record, self.rules);
        engine.run();

        let issues: Vec<&str> = engine.issues().collect();
        log::info!(
            "Diagnosis complete: {} issue(s) [{}]",
            engine.fired_rules().len(),
            issues.join(", ")
        );
        Ok(engine.result())
    }

    pub fn render(&self, result: &DiagnosisResult, format: Option<OutputFormat>) -> Result<String> {
        match format.unwrap_or(self.config.output) {
            OutputFormat::Text => Ok(render::render_text(result)),
            OutputFormat::Json => render::render_json(result),
        }
    }

    /// Structured prompt mode. Empty answers skip a field; end of input stops asking.
    pub fn interactive<R: BufRead, W: Write>(&self, mut reader: R, mut out: W) -> Result<MetricsInput> {
        writeln!(out, "📊 STRUCTURED INPUT MODE")?;
        writeln!(out, "Enter metrics (press Enter to skip a field):")?;

        let mut metrics = self.config.metrics.clone();
        for (field, prompt) in PROMPTS {
            write!(out, "{}: ", prompt)?;
            out.flush()?;

            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }

            let answer = line.trim();
            if answer.is_empty() {
                continue;
            }
            let value = match MetricValue::parse(answer) {
                MetricValue::String(s) => MetricValue::String(s.to_ascii_lowercase()),
                other => other,
            };
            metrics.insert(*field, value);
        }
        Ok(metrics)
    }

    /// Rule listing for `mldebug rules`
    pub fn describe_rules(&self) -> String {
        self.rules
            .describe()
            .iter()
            .enumerate()
            .map(|(i, (name, issue))| format!("{}. {:<18} issue: {}\n", i + 1, name, issue))
            .collect()
    }
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
