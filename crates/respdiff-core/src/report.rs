//! Comparison reports and their text rendering

use crate::classify::{severity_score, Categorized, Category, Classifier};
use crate::differ::Violation;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

const RULE_WIDTH: usize = 80;

/// Outcome of comparing one reference/candidate pair
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub is_identical: bool,
    pub violation_count: usize,
    pub violations: Vec<Violation>,
    pub categorized: Categorized,
    pub severity_score: u32,
    pub summary: String,
}

impl Report {
    /// Number of violations in a category
    pub fn count(&self, category: Category) -> usize {
        self.categorized.get(&category).map_or(0, Vec::len)
    }
}

/// Turns a violation list into a [`Report`]
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    classifier: Classifier,
}

impl ReportBuilder {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn build(&self, violations: Vec<Violation>) -> Report {
        let categorized = self.classifier.analyze(&violations);
        let severity_score = severity_score(&categorized);
        let summary = summarize(&categorized, severity_score);

        Report {
            is_identical: violations.is_empty(),
            violation_count: violations.len(),
            violations,
            categorized,
            severity_score,
            summary,
        }
    }
}

fn summarize(categorized: &Categorized, severity: u32) -> String {
    if categorized.is_empty() {
        return "✓ No violations found - responses are identical".to_string();
    }

    let mut lines = vec![format!("Severity Score: {}/100", severity)];
    let count = |category: Category| categorized.get(&category).map_or(0, Vec::len);

    let critical = count(Category::Critical);
    if critical > 0 {
        lines.push(format!("❌ {} critical data integrity issue(s)", critical));
    }
    let missing = count(Category::MissingRequired);
    if missing > 0 {
        lines.push(format!("⚠️  {} required field(s) missing", missing));
    }
    let mismatched = count(Category::DataMismatch);
    if mismatched > 0 {
        lines.push(format!("⚠️  {} data value mismatch(es)", mismatched));
    }
    let retyped = count(Category::TypeMismatch);
    if retyped > 0 {
        lines.push(format!("⚠️  {} data type mismatch(es)", retyped));
    }
    let precision = count(Category::Precision);
    if precision > 0 {
        lines.push(format!("ℹ️  {} numeric precision difference(s)", precision));
    }

    lines.join("\n")
}

/// Render violations as a numbered, multi-line report
pub fn format_violation_report(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return "✓ No violations found".to_string();
    }

    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec!["API Comparison Violations:".to_string(), rule.clone()];

    for (i, violation) in violations.iter().enumerate() {
        lines.push(format!("\n{}. {}", i + 1, title_case(violation.kind().as_str())));
        lines.push(format!("   Path: {}", violation.path));
        for (key, value) in violation.details() {
            lines.push(format!("   {}: {}", title_case(key), value));
        }
    }

    lines.push(format!("\n{}", rule));
    lines.join("\n")
}

/// `old_value` -> `Old Value`
fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A report labelled with the endpoint it came from, ready to be stored
#[derive(Debug, Clone, Serialize)]
pub struct DetailedReport {
    pub endpoint: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub analysis: Report,
}

impl DetailedReport {
    pub fn new(endpoint: impl Into<String>, analysis: Report, timestamp: DateTime<Utc>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timestamp,
            analysis,
        }
    }

    /// Label a report with the current time
    pub fn now(endpoint: impl Into<String>, analysis: Report) -> Self {
        Self::new(endpoint, analysis, Utc::now())
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn serialize_timestamp<S: serde::Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::Change;
    use crate::node::Node;
    use crate::path::Path;
    use chrono::TimeZone;

    fn removed(key: &str) -> Violation {
        Violation::new(Path::root().key(key), Change::KeyRemoved { value: Node::from("x") })
    }

    #[test]
    fn test_empty_report() {
        let report = ReportBuilder::default().build(vec![]);
        assert!(report.is_identical);
        assert_eq!(report.violation_count, 0);
        assert_eq!(report.severity_score, 0);
        assert!(report.categorized.is_empty());
        assert_eq!(report.summary, "✓ No violations found - responses are identical");
    }

    #[test]
    fn test_report_fields() {
        let report = ReportBuilder::default().build(vec![removed("id"), removed("note")]);
        assert!(!report.is_identical);
        assert_eq!(report.violation_count, 2);
        assert_eq!(report.severity_score, 33);
        assert_eq!(report.count(Category::MissingRequired), 1);
        assert_eq!(report.count(Category::MissingOptional), 1);
        assert_eq!(report.count(Category::Critical), 0);
    }

    #[test]
    fn test_summary_lines_in_fixed_order() {
        let violations = vec![
            Violation::new(
                Path::root().key("price"),
                Change::ValueChanged {
                    old_value: Node::Float(1.0000001),
                    new_value: Node::Float(1.0),
                },
            ),
            removed("hash"),
            Violation::new(
                Path::root().key("hash"),
                Change::ValueChanged {
                    old_value: Node::from("ab"),
                    new_value: Node::from("cd"),
                },
            ),
        ];
        let report = ReportBuilder::default().build(violations);
        let lines: Vec<&str> = report.summary.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Severity Score: 85/100",
                "❌ 1 critical data integrity issue(s)",
                "⚠️  1 required field(s) missing",
                "ℹ️  1 numeric precision difference(s)",
            ]
        );
    }

    #[test]
    fn test_summary_omits_quiet_categories() {
        let added = Violation::new(Path::root().key("extra"), Change::KeyAdded { value: Node::Null });
        let report = ReportBuilder::default().build(vec![added]);
        assert_eq!(report.summary, "Severity Score: 2/100");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_violation_report(&[]), "✓ No violations found");
    }

    #[test]
    fn test_format_violation_report() {
        let text = format_violation_report(&[removed("hash")]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "API Comparison Violations:");
        assert_eq!(lines[1], "=".repeat(80));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "1. Key Removed");
        assert_eq!(lines[4], "   Path: root['hash']");
        assert_eq!(lines[5], "   Value: \"x\"");
        assert_eq!(lines[7], "=".repeat(80));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("value_changed"), "Value Changed");
        assert_eq!(title_case("expected_length"), "Expected Length");
        assert_eq!(title_case("value"), "Value");
    }

    #[test]
    fn test_detailed_report_json() {
        let report = ReportBuilder::default().build(vec![removed("id")]);
        let timestamp = Utc.with_ymd_and_hms(2026, 1, 7, 12, 0, 0).unwrap();
        let detailed = DetailedReport::new("/blocks/latest", report, timestamp);

        let json: serde_json::Value =
            serde_json::from_str(&detailed.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["endpoint"], "/blocks/latest");
        assert_eq!(json["timestamp"], "2026-01-07T12:00:00Z");
        assert_eq!(json["analysis"]["severity_score"], 30);
        assert_eq!(json["analysis"]["is_identical"], false);
        assert_eq!(
            json["analysis"]["categorized"]["missing_required"][0]["path"],
            "root['id']"
        );
    }
}
