//! Configuration for comparisons
//!
//! Loaded from YAML, with environment overrides:
//!
//! - `RESPDIFF_CONFIG`: path of a YAML config file
//! - `RESPDIFF_IGNORE_FIELDS`: comma-separated field names to ignore
//! - `RESPDIFF_NORMALIZE`: `true` or `false`

use crate::classify::ClassifierConfig;
use crate::compare::{CompareOptions, ResponseComparator};
use crate::error::{CompareError, CompareResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const CONFIG_ENV: &str = "RESPDIFF_CONFIG";
pub const IGNORE_FIELDS_ENV: &str = "RESPDIFF_IGNORE_FIELDS";
pub const NORMALIZE_ENV: &str = "RESPDIFF_NORMALIZE";

/// Top-level keys a config document may contain
const KNOWN_KEYS: &[&str] = &[
    "normalize",
    "ignore_fields",
    "critical_patterns",
    "required_patterns",
    "precision_tolerance",
];

/// Settings for a comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Normalize scalar representations before diffing
    pub normalize: bool,
    /// Field names excluded from comparison at any depth
    pub ignore_fields: BTreeSet<String>,
    /// Classification keyword tables and tolerance
    #[serde(flatten)]
    pub classifier: ClassifierConfig,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            ignore_fields: BTreeSet::new(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl ComparisonConfig {
    /// Parse and validate a YAML document.
    ///
    /// Unknown top-level keys are rejected. `deny_unknown_fields` does not
    /// combine with the flattened classifier block, so keys are checked here.
    pub fn from_yaml_str(content: &str, source_name: &str) -> CompareResult<Self> {
        let parse_error = |e: serde_yaml::Error| CompareError::ParseYaml {
            source_name: source_name.to_string(),
            source: e,
        };

        let document: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_error)?;
        if document.is_null() {
            return Ok(Self::default());
        }
        if let Some(mapping) = document.as_mapping() {
            check_known_keys(mapping)?;
        }

        let config: Self = serde_yaml::from_value(document).map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> CompareResult<Self> {
        let path = path.as_ref();
        debug!("Loading comparison config: {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| CompareError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> CompareResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CompareResult<Self> {
        let config = match lookup(CONFIG_ENV) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> CompareResult<Self> {
        if let Some(fields) = lookup(IGNORE_FIELDS_ENV) {
            self.ignore_fields.extend(
                fields
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from),
            );
        }

        if let Some(value) = lookup(NORMALIZE_ENV) {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" => self.normalize = true,
                "false" => self.normalize = false,
                other => warn!("Ignoring {}={:?}: expected true or false", NORMALIZE_ENV, other),
            }
        }

        self.validate()?;
        Ok(self)
    }

    /// Check that the classifier settings are usable
    pub fn validate(&self) -> CompareResult<()> {
        let tolerance = self.classifier.precision_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(CompareError::InvalidValue {
                key: "precision_tolerance".to_string(),
                reason: format!("must be a finite non-negative number, got {}", tolerance),
            });
        }

        for (key, patterns) in [
            ("critical_patterns", &self.classifier.critical_patterns),
            ("required_patterns", &self.classifier.required_patterns),
        ] {
            if patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(CompareError::InvalidValue {
                    key: key.to_string(),
                    reason: "patterns cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            normalize: self.normalize,
            ignore_fields: self.ignore_fields.iter().cloned().collect(),
        }
    }

    /// Build a comparator from these settings
    pub fn comparator(&self) -> ResponseComparator {
        ResponseComparator::new(self.compare_options(), self.classifier.clone())
    }
}

fn check_known_keys(mapping: &serde_yaml::Mapping) -> CompareResult<()> {
    for key in mapping.keys() {
        let known = key.as_str().is_some_and(|k| KNOWN_KEYS.contains(&k));
        if !known {
            let name = match key.as_str() {
                Some(k) => k.to_string(),
                None => format!("{:?}", key),
            };
            return Err(CompareError::InvalidValue {
                key: name,
                reason: format!("unknown configuration key, expected one of: {}", KNOWN_KEYS.join(", ")),
            });
        }
    }
    Ok(())
}
