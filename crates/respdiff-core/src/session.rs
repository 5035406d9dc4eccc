//! Aggregation of results across many compared endpoints

use crate::report::Report;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

const BANNER_WIDTH: usize = 80;

/// Result of comparing one endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EndpointOutcome {
    pub endpoint: String,
    pub passed: bool,
    pub violation_count: usize,
    pub severity_score: u32,
    pub summary: String,
}

/// Totals over a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub violation_count: usize,
    pub generated_at: String,
}

/// Collects per-endpoint outcomes for a run over several endpoints
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonSession {
    outcomes: Vec<EndpointOutcome>,
}

impl ComparisonSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the report produced for `endpoint`
    pub fn record(&mut self, endpoint: impl Into<String>, report: &Report) -> &EndpointOutcome {
        self.outcomes.push(EndpointOutcome {
            endpoint: endpoint.into(),
            passed: report.is_identical,
            violation_count: report.violation_count,
            severity_score: report.severity_score,
            summary: report.summary.clone(),
        });
        &self.outcomes[self.outcomes.len() - 1]
    }

    pub fn outcomes(&self) -> &[EndpointOutcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> impl Iterator<Item = &EndpointOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    /// Check if every recorded endpoint matched
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn summary(&self, generated_at: DateTime<Utc>) -> SessionSummary {
        let passed = self.outcomes.iter().filter(|o| o.passed).count();
        SessionSummary {
            total: self.outcomes.len(),
            passed,
            failed: self.outcomes.len() - passed,
            violation_count: self.outcomes.iter().map(|o| o.violation_count).sum(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Text summary of the session
    pub fn render(&self) -> String {
        let summary = self.summary(Utc::now());
        let banner = "=".repeat(BANNER_WIDTH);
        let mut lines = vec![
            banner.clone(),
            "API COMPARISON SUMMARY".to_string(),
            banner.clone(),
            format!("Total endpoints: {}", summary.total),
            format!("Passed: {}", summary.passed),
            format!("Failed: {}", summary.failed),
            format!("Violations found: {}", summary.violation_count),
            banner.clone(),
        ];

        if summary.failed > 0 {
            lines.push("\nFailed endpoints:".to_string());
            for outcome in self.failures() {
                lines.push(format!(
                    "\n❌ {} ({} violations, severity {}/100)",
                    outcome.endpoint, outcome.violation_count, outcome.severity_score
                ));
                lines.extend(outcome.summary.lines().map(|line| format!("   {}", line)));
            }
            lines.push(format!("\n{}", banner));
        } else if summary.total > 0 {
            lines.push("✅ All endpoints match".to_string());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
