use crate::cli::CompareArgs;
use anyhow::{Context, Result};
use respdiff_core::{
    format_violation_report, load_tree, ComparisonConfig, ComparisonSession, DetailedReport,
    EndpointOutcome, SessionSummary,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const REFERENCE_SUFFIX: &str = ".reference.json";
const CANDIDATE_SUFFIX: &str = ".candidate.json";

/// Build the effective config: file or environment first, then flags
pub fn resolve_config(args: &CompareArgs) -> Result<ComparisonConfig> {
    let mut config = match &args.config {
        Some(path) => ComparisonConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ComparisonConfig::from_env().context("loading config from environment")?,
    };

    config.ignore_fields.extend(args.ignore.iter().cloned());
    if args.no_normalize {
        config.normalize = false;
    }
    config.validate()?;
    debug!(?config, "Resolved comparison config");
    Ok(config)
}

/// Compare one pair; returns whether the responses matched
pub fn compare(
    reference: &Path,
    candidate: &Path,
    endpoint: Option<String>,
    args: &CompareArgs,
    json: bool,
) -> Result<bool> {
    let config = resolve_config(args)?;
    let reference_tree = load_tree(reference)
        .with_context(|| format!("loading reference {}", reference.display()))?;
    let candidate_tree = load_tree(candidate)
        .with_context(|| format!("loading candidate {}", candidate.display()))?;

    let report = config.comparator().compare(&reference_tree, &candidate_tree);
    let endpoint = endpoint.unwrap_or_else(|| reference.display().to_string());
    info!(endpoint = %endpoint, violations = report.violation_count, "Compared pair");

    let identical = report.is_identical;
    if json {
        println!("{}", DetailedReport::now(endpoint, report).to_json_pretty()?);
    } else {
        println!("{}", endpoint);
        println!("{}", report.summary);
        if !identical {
            println!("\n{}", format_violation_report(&report.violations));
        }
    }
    Ok(identical)
}

/// A reference/candidate file pair found in a batch directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasePair {
    pub name: String,
    pub reference: PathBuf,
    pub candidate: PathBuf,
}

/// Find `<name>.reference.json` files that have a matching candidate file
pub fn discover_pairs(dir: &Path, filter: Option<&str>) -> Result<Vec<CasePair>> {
    let filter = filter.map(str::to_lowercase);
    let mut pairs = Vec::new();

    let entries = fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(|n| n.strip_suffix(REFERENCE_SUFFIX)) else {
            continue;
        };

        if let Some(filter) = &filter {
            if !name.to_lowercase().contains(filter.as_str()) {
                debug!("Skipping {}: does not match filter", name);
                continue;
            }
        }

        let candidate = dir.join(format!("{}{}", name, CANDIDATE_SUFFIX));
        if !candidate.is_file() {
            warn!("Skipping {}: no candidate file at {}", name, candidate.display());
            continue;
        }

        pairs.push(CasePair {
            name: name.to_string(),
            reference: entry.path(),
            candidate,
        });
    }

    pairs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(pairs)
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    summary: SessionSummary,
    outcomes: &'a [EndpointOutcome],
}

/// Compare every pair in `dir`; returns whether all of them matched
pub fn batch(dir: &Path, filter: Option<&str>, args: &CompareArgs, json: bool) -> Result<bool> {
    let comparator = resolve_config(args)?.comparator();
    let pairs = discover_pairs(dir, filter)?;
    if pairs.is_empty() {
        warn!("No reference/candidate pairs found in {}", dir.display());
    }

    let mut session = ComparisonSession::new();
    for pair in &pairs {
        let reference = load_tree(&pair.reference)
            .with_context(|| format!("loading reference {}", pair.reference.display()))?;
        let candidate = load_tree(&pair.candidate)
            .with_context(|| format!("loading candidate {}", pair.candidate.display()))?;

        let outcome = session.record(pair.name.as_str(), &comparator.compare(&reference, &candidate));
        info!(case = %outcome.endpoint, passed = outcome.passed, "Compared pair");
    }

    if json {
        let output = BatchOutput {
            summary: session.summary(chrono::Utc::now()),
            outcomes: session.outcomes(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", session.render());
    }
    Ok(session.all_passed())
}
