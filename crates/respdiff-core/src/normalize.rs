//! Canonicalization of scalar leaves before comparison
//!
//! APIs that agree on content often disagree on representation: one returns
//! `"100"` where the other returns `100`, or upper-cases a hash the other
//! lower-cases. Every string leaf is passed through these rules, in order:
//!
//! 1. `""`, `"null"` and `"None"` become null
//! 2. `true`/`yes`/`1` and `false`/`no`/`0` (any case) become booleans
//! 3. numeric strings become integers, or floats when they have a fraction
//! 4. strings made only of hex digits are lower-cased
//!
//! Because rule 2 runs first, `"1"` and `"0"` always become booleans, never
//! integers. Comparisons rely on this ordering.

use crate::node::Node;
use std::collections::HashSet;

/// Normalize every leaf of a tree, keeping its shape
pub fn normalize(node: &Node) -> Node {
    match node {
        Node::Map(map) => Node::Map(map.iter().map(|(k, v)| (k.clone(), normalize(v))).collect()),
        Node::Seq(items) => Node::Seq(items.iter().map(normalize).collect()),
        leaf => normalize_scalar(leaf.clone()),
    }
}

/// Apply the leaf rules to a single scalar
pub fn normalize_scalar(value: Node) -> Node {
    let value = normalize_null(value);
    let value = normalize_boolean(value);
    let value = normalize_numeric(value);
    normalize_hex(value)
}

fn normalize_null(value: Node) -> Node {
    match value {
        Node::Str(s) if s.is_empty() || s == "null" || s == "None" => Node::Null,
        other => other,
    }
}

fn normalize_boolean(value: Node) -> Node {
    match value {
        Node::Str(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Node::Bool(true),
            "false" | "no" | "0" => Node::Bool(false),
            _ => Node::Str(s),
        },
        other => other,
    }
}

fn normalize_numeric(value: Node) -> Node {
    match value {
        Node::Str(s) => parse_number(&s).unwrap_or(Node::Str(s)),
        other => other,
    }
}

fn parse_number(s: &str) -> Option<Node> {
    let text = s.trim();
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(i) = text.parse::<i128>() {
            return Some(Node::Int(i));
        }
    }

    let f = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Some(integral(f).map(|i| Node::Int(i as i128)).unwrap_or(Node::Float(f)))
}

/// Integer value of `f` when it has no fractional part and fits in an i64
fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn normalize_hex(value: Node) -> Node {
    match value {
        Node::Str(s) if is_hex(&s) => Node::Str(s.to_ascii_lowercase()),
        other => other,
    }
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Drop every mapping entry whose key is in `fields`, at any depth
pub fn remove_fields(node: Node, fields: &HashSet<String>) -> Node {
    if fields.is_empty() {
        return node;
    }
    match node {
        Node::Map(map) => Node::Map(
            map.into_iter()
                .filter(|(k, _)| !fields.contains(k))
                .map(|(k, v)| (k, remove_fields(v, fields)))
                .collect(),
        ),
        Node::Seq(items) => Node::Seq(items.into_iter().map(|v| remove_fields(v, fields)).collect()),
        leaf => leaf,
    }
}
