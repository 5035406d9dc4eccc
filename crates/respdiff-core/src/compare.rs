//! End-to-end comparison of a reference and a candidate response

use crate::classify::{Classifier, ClassifierConfig};
use crate::differ::diff;
use crate::node::Node;
use crate::normalize::{normalize, remove_fields};
use crate::report::{Report, ReportBuilder};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Options for comparing responses
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Canonicalize scalar representations before diffing
    pub normalize: bool,
    /// Field names dropped from both trees at any depth (e.g., timestamps)
    pub ignore_fields: HashSet<String>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            ignore_fields: HashSet::new(),
        }
    }
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_field(mut self, field: &str) -> Self {
        self.ignore_fields.insert(field.to_string());
        self
    }

    pub fn without_normalization(mut self) -> Self {
        self.normalize = false;
        self
    }
}

/// Normalizes, diffs and scores response pairs
#[derive(Debug, Clone, Default)]
pub struct ResponseComparator {
    options: CompareOptions,
    builder: ReportBuilder,
}

impl ResponseComparator {
    pub fn new(options: CompareOptions, classifier: ClassifierConfig) -> Self {
        Self {
            options,
            builder: ReportBuilder::new(Classifier::new(classifier)),
        }
    }

    pub fn with_options(options: CompareOptions) -> Self {
        Self::new(options, ClassifierConfig::default())
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare two responses
    pub fn compare(&self, reference: &Node, candidate: &Node) -> Report {
        let (reference, candidate) = if self.options.normalize {
            (normalize(reference), normalize(candidate))
        } else {
            (reference.clone(), candidate.clone())
        };

        let reference = remove_fields(reference, &self.options.ignore_fields);
        let candidate = remove_fields(candidate, &self.options.ignore_fields);

        let violations = diff(&reference, &candidate);
        trace!(?violations, "Raw violations");

        let report = self.builder.build(violations);
        debug!(
            violations = report.violation_count,
            severity = report.severity_score,
            "Compared responses"
        );
        report
    }
}

/// Compare two responses with default classification
pub fn compare_responses(reference: &Node, candidate: &Node, options: &CompareOptions) -> Report {
    ResponseComparator::with_options(options.clone()).compare(reference, candidate)
}
