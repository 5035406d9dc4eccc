//! Severity classification of violations
//!
//! Classification is a heuristic over field names: a path mentioning a hash,
//! an address or an amount points at data that must match exactly, while an
//! extra field in the candidate is usually harmless. Rules are checked in
//! order and the first match wins.

use crate::differ::{Change, Violation};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Highest possible severity score
pub const MAX_SEVERITY: u32 = 100;

/// Default relative difference under which two numbers count as equal-ish
pub const DEFAULT_PRECISION_TOLERANCE: f64 = 1e-5;

/// Bucket a violation is sorted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Critical,
    Precision,
    DataMismatch,
    MissingRequired,
    MissingOptional,
    ExtraField,
    TypeMismatch,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Critical,
        Category::Precision,
        Category::DataMismatch,
        Category::MissingRequired,
        Category::MissingOptional,
        Category::ExtraField,
        Category::TypeMismatch,
        Category::Unknown,
    ];

    /// Severity points contributed by one violation of this category
    pub fn weight(&self) -> u32 {
        match self {
            Category::Critical => 50,
            Category::MissingRequired => 30,
            Category::DataMismatch => 20,
            Category::TypeMismatch => 15,
            Category::Unknown => 10,
            Category::Precision => 5,
            Category::MissingOptional => 3,
            Category::ExtraField => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Critical => "critical",
            Category::Precision => "precision",
            Category::DataMismatch => "data_mismatch",
            Category::MissingRequired => "missing_required",
            Category::MissingOptional => "missing_optional",
            Category::ExtraField => "extra_field",
            Category::TypeMismatch => "type_mismatch",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Violations grouped by category; only non-empty buckets are present
pub type Categorized = BTreeMap<Category, Vec<Violation>>;

/// Keyword tables and thresholds used by [`Classifier`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Path fragments whose value changes are critical
    pub critical_patterns: Vec<String>,
    /// Path fragments whose removal means a required field is missing
    pub required_patterns: Vec<String>,
    /// Relative difference below which a numeric change is a precision issue
    pub precision_tolerance: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            critical_patterns: [
                "hash", "id", "address", "amount", "quantity", "epoch", "slot", "block",
                "tx_index",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            required_patterns: ["hash", "id", "address"]
                .into_iter()
                .map(String::from)
                .collect(),
            precision_tolerance: DEFAULT_PRECISION_TOLERANCE,
        }
    }
}

/// Maps violations to categories and scores them
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Category of a single violation
    pub fn classify(&self, violation: &Violation) -> Category {
        let path = violation.path.to_string().to_lowercase();

        match &violation.change {
            Change::ValueChanged {
                old_value,
                new_value,
            } => {
                if matches_any(&path, &self.config.critical_patterns) {
                    Category::Critical
                } else if self.is_precision_difference(old_value, new_value) {
                    Category::Precision
                } else {
                    Category::DataMismatch
                }
            }
            Change::KeyRemoved { .. } => {
                if matches_any(&path, &self.config.required_patterns) {
                    Category::MissingRequired
                } else {
                    Category::MissingOptional
                }
            }
            Change::KeyAdded { .. } => Category::ExtraField,
            Change::TypeChanged { .. } => Category::TypeMismatch,
            Change::LengthChanged { .. } => Category::Unknown,
        }
    }

    /// Group violations by category, keeping their relative order
    pub fn analyze(&self, violations: &[Violation]) -> Categorized {
        let mut categorized = Categorized::new();
        for violation in violations {
            categorized
                .entry(self.classify(violation))
                .or_default()
                .push(violation.clone());
        }
        categorized
    }

    /// Severity score in `0..=100`
    pub fn severity(&self, violations: &[Violation]) -> u32 {
        severity_score(&self.analyze(violations))
    }

    fn is_precision_difference(&self, old: &Node, new: &Node) -> bool {
        match (old.as_f64(), new.as_f64()) {
            (Some(old), Some(new)) if old != 0.0 => {
                ((new - old) / old).abs() < self.config.precision_tolerance
            }
            _ => false,
        }
    }
}

/// Saturating weighted sum over an already categorized set
pub fn severity_score(categorized: &Categorized) -> u32 {
    let total: u64 = categorized
        .iter()
        .map(|(category, items)| category.weight() as u64 * items.len() as u64)
        .sum();
    total.min(MAX_SEVERITY as u64) as u32
}

fn matches_any(path: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| path.contains(pattern.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use crate::path::Path;

    fn value_changed(key: &str, old: Node, new: Node) -> Violation {
        Violation::new(
            Path::root().key(key),
            Change::ValueChanged {
                old_value: old,
                new_value: new,
            },
        )
    }

    fn removed(key: &str) -> Violation {
        Violation::new(Path::root().key(key), Change::KeyRemoved { value: Node::Null })
    }

    #[test]
    fn test_critical_field_changes() {
        let classifier = Classifier::default();
        for key in ["tx_hash", "pool_id", "Address", "AMOUNT", "epoch_no", "slot", "block_height"] {
            let v = value_changed(key, Node::Int(1), Node::Int(2));
            assert_eq!(classifier.classify(&v), Category::Critical, "{}", key);
        }
    }

    #[test]
    fn test_critical_wins_over_precision() {
        let classifier = Classifier::default();
        let v = value_changed("amount", Node::Float(100.00001), Node::Float(100.0));
        assert_eq!(classifier.classify(&v), Category::Critical);
    }

    #[test]
    fn test_precision_difference() {
        let classifier = Classifier::default();
        let v = value_changed("price", Node::Float(100.00001), Node::Float(100.0));
        assert_eq!(classifier.classify(&v), Category::Precision);
    }

    #[test]
    fn test_precision_requires_relative_closeness() {
        let classifier = Classifier::default();
        let v = value_changed("price", Node::Float(100.0), Node::Float(100.1));
        assert_eq!(classifier.classify(&v), Category::DataMismatch);
    }

    #[test]
    fn test_precision_with_zero_reference_is_mismatch() {
        let classifier = Classifier::default();
        let v = value_changed("price", Node::Float(0.0), Node::Float(1e-12));
        assert_eq!(classifier.classify(&v), Category::DataMismatch);
    }

    #[test]
    fn test_precision_from_numeric_strings() {
        let classifier = Classifier::default();
        let v = value_changed("price", Node::from("2.0000001"), Node::from("2.0"));
        assert_eq!(classifier.classify(&v), Category::Precision);
    }

    #[test]
    fn test_non_numeric_change_is_mismatch() {
        let classifier = Classifier::default();
        let v = value_changed("name", Node::from("alice"), Node::from("bob"));
        assert_eq!(classifier.classify(&v), Category::DataMismatch);
        let v = value_changed("flag", Node::Bool(true), Node::Bool(false));
        assert_eq!(classifier.classify(&v), Category::DataMismatch);
    }

    #[test]
    fn test_removed_fields() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(&removed("hash")), Category::MissingRequired);
        assert_eq!(classifier.classify(&removed("stake_address")), Category::MissingRequired);
        assert_eq!(classifier.classify(&removed("metadata")), Category::MissingOptional);
        // amount is critical for changes but not required when absent
        assert_eq!(classifier.classify(&removed("amount")), Category::MissingOptional);
    }

    #[test]
    fn test_other_kinds() {
        let classifier = Classifier::default();
        let added = Violation::new(Path::root().key("hash"), Change::KeyAdded { value: Node::Null });
        assert_eq!(classifier.classify(&added), Category::ExtraField);

        let type_changed = Violation::new(
            Path::root().key("hash"),
            Change::TypeChanged {
                expected_type: NodeType::String,
                actual_type: NodeType::Null,
                expected_value: Node::from("ab"),
                actual_value: Node::Null,
            },
        );
        assert_eq!(classifier.classify(&type_changed), Category::TypeMismatch);

        let length = Violation::new(
            Path::root(),
            Change::LengthChanged {
                expected_length: 2,
                actual_length: 1,
            },
        );
        assert_eq!(classifier.classify(&length), Category::Unknown);
    }

    #[test]
    fn test_custom_patterns() {
        let classifier = Classifier::new(ClassifierConfig {
            critical_patterns: vec!["Fee".to_string()],
            required_patterns: vec![],
            precision_tolerance: 0.1,
        });
        let v = value_changed("fees", Node::Int(1), Node::Int(2));
        assert_eq!(classifier.classify(&v), Category::Critical);
        let v = value_changed("hash", Node::Float(10.0), Node::Float(10.5));
        assert_eq!(classifier.classify(&v), Category::Precision);
        assert_eq!(classifier.classify(&removed("hash")), Category::MissingOptional);
    }

    #[test]
    fn test_analyze_groups_by_category() {
        let classifier = Classifier::default();
        let violations = vec![
            removed("hash"),
            value_changed("name", Node::from("a"), Node::from("b")),
            removed("note"),
            removed("id"),
        ];
        let categorized = classifier.analyze(&violations);

        assert_eq!(categorized.len(), 3);
        assert_eq!(categorized[&Category::MissingRequired].len(), 2);
        assert_eq!(categorized[&Category::MissingOptional].len(), 1);
        assert_eq!(categorized[&Category::DataMismatch].len(), 1);
        assert!(!categorized.contains_key(&Category::Critical));

        let total: usize = categorized.values().map(Vec::len).sum();
        assert_eq!(total, violations.len());
    }

    #[test]
    fn test_severity_weights() {
        let classifier = Classifier::default();
        assert_eq!(classifier.severity(&[]), 0);
        assert_eq!(classifier.severity(&[removed("id")]), 30);
        assert_eq!(classifier.severity(&[removed("note")]), 3);
        assert_eq!(classifier.severity(&[removed("id"), removed("note")]), 33);
    }

    #[test]
    fn test_severity_saturates() {
        let classifier = Classifier::default();
        let violations: Vec<_> = (0..5)
            .map(|i| value_changed(&format!("hash{}", i), Node::Int(1), Node::Int(2)))
            .collect();
        assert_eq!(classifier.severity(&violations), MAX_SEVERITY);
    }

    #[test]
    fn test_weights_table() {
        let weights: Vec<u32> = Category::ALL.iter().map(Category::weight).collect();
        assert_eq!(weights, vec![50, 5, 20, 30, 3, 2, 15, 10]);
    }

    #[test]
    fn test_category_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Category::MissingRequired).unwrap(),
            r#""missing_required""#
        );
    }
}
