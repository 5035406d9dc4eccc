//! Structural comparison of API responses
//!
//! This crate compares a response from a reference API against the response
//! a candidate implementation gives for the same request, and reports every
//! structural difference with a severity score.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐      ┌─────────────────┐
//! │  Reference tree │      │  Candidate tree │
//! └────────┬────────┘      └────────┬────────┘
//!          └──────────┬─────────────┘
//!              ┌──────▼──────┐
//!              │  normalize  │  canonical scalars, ignored fields dropped
//!              └──────┬──────┘
//!              ┌──────▼──────┐
//!              │    differ   │  typed violations with paths
//!              └──────┬──────┘
//!              ┌──────▼──────┐
//!              │   classify  │  category per violation, severity 0..=100
//!              └──────┬──────┘
//!              ┌──────▼──────┐
//!              │    report   │  summary and text rendering
//!              └─────────────┘
//! ```
//!
//! Fetching responses and storing reports are left to the caller.
//!
//! # Example
//!
//! ```
//! use respdiff_core::{Node, ResponseComparator};
//! use serde_json::json;
//!
//! let reference = Node::from(json!({"hash": "AB12", "amount": "100"}));
//! let candidate = Node::from(json!({"hash": "ab12", "amount": 100}));
//!
//! let report = ResponseComparator::default().compare(&reference, &candidate);
//! assert!(report.is_identical);
//! ```

pub mod classify;
pub mod compare;
pub mod config;
pub mod differ;
mod error;
pub mod node;
pub mod normalize;
pub mod path;
pub mod report;
pub mod session;
pub mod tree;

pub use classify::{Categorized, Category, Classifier, ClassifierConfig};
pub use compare::{compare_responses, CompareOptions, ResponseComparator};
pub use config::ComparisonConfig;
pub use differ::{diff, Change, Violation, ViolationKind};
pub use error::{CompareError, CompareResult};
pub use node::{Node, NodeType};
pub use normalize::normalize;
pub use path::{Path, PathSegment};
pub use report::{format_violation_report, DetailedReport, Report, ReportBuilder};
pub use session::{ComparisonSession, EndpointOutcome, SessionSummary};
pub use tree::{load_tree, parse_tree, TreeFormat};
