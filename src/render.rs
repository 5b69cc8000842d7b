//! Report rendering for the command-line front end

use crate::inference::DiagnosisResult;
use anyhow::Result;
use serde::Serialize;

const RULE: &str = "======================================================================";

/// Human-readable report. Zero diagnoses is reported as healthy, not as an error.
pub fn render_text(result: &DiagnosisResult) -> String {
    let mut lines = vec![RULE.to_string(), "🔍 DIAGNOSIS RESULTS".to_string(), RULE.to_string()];

    if !result.has_issues() {
        lines.push("✅ No issues detected from the supplied metrics.".to_string());
    } else {
        lines.extend(result.diagnoses.iter().map(|d| format!("• {}", d)));
        lines.push(String::new());
        lines.push("📋 RECOMMENDATIONS:".to_string());
        lines.extend(
            result
                .sorted_recommendations()
                .iter()
                .enumerate()
                .map(|(i, rec)| format!("{}. {}", i + 1, rec)),
        );
        lines.push(String::new());
        lines.push(format!("Issues found: {}", result.issues_found));
    }

    lines.push(RULE.to_string());
    lines.iter().map(|line| format!("{}\n", line)).collect()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    diagnoses: &'a [String],
    recommendations: Vec<&'a str>,
    issues_found: usize,
}

/// Pretty JSON with recommendations sorted for stable output
pub fn render_json(result: &DiagnosisResult) -> Result<String> {
    let report = JsonReport {
        diagnoses: &result.diagnoses,
        recommendations: result.sorted_recommendations(),
        issues_found: result.issues_found,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
