//! Recursive structural diff of two trees
//!
//! The left tree is the reference response and the right tree the candidate.
//! Violations come out in traversal order: reference keys in document order,
//! then keys only the candidate has, with sequences walked by index.

use crate::node::{Node, NodeType};
use crate::path::Path;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Kind of a detected difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    ValueChanged,
    TypeChanged,
    KeyAdded,
    KeyRemoved,
    LengthChanged,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::ValueChanged => "value_changed",
            ViolationKind::TypeChanged => "type_changed",
            ViolationKind::KeyAdded => "key_added",
            ViolationKind::KeyRemoved => "key_removed",
            ViolationKind::LengthChanged => "length_changed",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What changed at a path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Change {
    ValueChanged {
        old_value: Node,
        new_value: Node,
    },
    TypeChanged {
        expected_type: NodeType,
        actual_type: NodeType,
        expected_value: Node,
        actual_value: Node,
    },
    KeyAdded {
        value: Node,
    },
    KeyRemoved {
        value: Node,
    },
    LengthChanged {
        expected_length: usize,
        actual_length: usize,
    },
}

/// A single difference between the reference and candidate trees
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: Path,
    pub change: Change,
}

impl Violation {
    pub fn new(path: Path, change: Change) -> Self {
        Self { path, change }
    }

    pub fn kind(&self) -> ViolationKind {
        match self.change {
            Change::ValueChanged { .. } => ViolationKind::ValueChanged,
            Change::TypeChanged { .. } => ViolationKind::TypeChanged,
            Change::KeyAdded { .. } => ViolationKind::KeyAdded,
            Change::KeyRemoved { .. } => ViolationKind::KeyRemoved,
            Change::LengthChanged { .. } => ViolationKind::LengthChanged,
        }
    }

    /// Detail fields in display order, values rendered as text
    pub fn details(&self) -> Vec<(&'static str, String)> {
        match &self.change {
            Change::ValueChanged {
                old_value,
                new_value,
            } => vec![
                ("old_value", old_value.to_string()),
                ("new_value", new_value.to_string()),
            ],
            Change::TypeChanged {
                expected_type,
                actual_type,
                expected_value,
                actual_value,
            } => vec![
                ("expected_type", expected_type.to_string()),
                ("actual_type", actual_type.to_string()),
                ("expected_value", expected_value.to_string()),
                ("actual_value", actual_value.to_string()),
            ],
            Change::KeyAdded { value } | Change::KeyRemoved { value } => {
                vec![("value", value.to_string())]
            }
            Change::LengthChanged {
                expected_length,
                actual_length,
            } => vec![
                ("expected_length", expected_length.to_string()),
                ("actual_length", actual_length.to_string()),
            ],
        }
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", &self.kind())?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry("details", &self.change)?;
        map.end()
    }
}

/// Compare two trees from the root
pub fn diff(reference: &Node, candidate: &Node) -> Vec<Violation> {
    diff_at(&Path::root(), reference, candidate)
}

/// Compare two subtrees located at `path`
pub fn diff_at(path: &Path, reference: &Node, candidate: &Node) -> Vec<Violation> {
    let mut violations = Vec::new();
    compare_nodes(path, reference, candidate, &mut violations);
    violations
}

fn compare_nodes(path: &Path, reference: &Node, candidate: &Node, violations: &mut Vec<Violation>) {
    // A type change hides everything below it
    if reference.node_type() != candidate.node_type() {
        violations.push(Violation::new(
            path.clone(),
            Change::TypeChanged {
                expected_type: reference.node_type(),
                actual_type: candidate.node_type(),
                expected_value: reference.clone(),
                actual_value: candidate.clone(),
            },
        ));
        return;
    }

    match (reference, candidate) {
        (Node::Map(ref_map), Node::Map(cand_map)) => {
            for (key, ref_value) in ref_map {
                let key_path = path.key(key.as_str());
                match cand_map.get(key) {
                    Some(cand_value) => compare_nodes(&key_path, ref_value, cand_value, violations),
                    None => violations.push(Violation::new(
                        key_path,
                        Change::KeyRemoved {
                            value: ref_value.clone(),
                        },
                    )),
                }
            }

            for (key, cand_value) in cand_map {
                if !ref_map.contains_key(key) {
                    violations.push(Violation::new(
                        path.key(key.as_str()),
                        Change::KeyAdded {
                            value: cand_value.clone(),
                        },
                    ));
                }
            }
        }
        (Node::Seq(ref_items), Node::Seq(cand_items)) => {
            if ref_items.len() != cand_items.len() {
                violations.push(Violation::new(
                    path.clone(),
                    Change::LengthChanged {
                        expected_length: ref_items.len(),
                        actual_length: cand_items.len(),
                    },
                ));
            }

            // Only the shared prefix is compared element by element
            for (i, (ref_item, cand_item)) in ref_items.iter().zip(cand_items).enumerate() {
                compare_nodes(&path.index(i), ref_item, cand_item, violations);
            }
        }
        _ => {
            if !leaf_eq(reference, candidate) {
                violations.push(Violation::new(
                    path.clone(),
                    Change::ValueChanged {
                        old_value: reference.clone(),
                        new_value: candidate.clone(),
                    },
                ));
            }
        }
    }
}

/// Leaf equality where NaN matches NaN, so a tree always equals itself
fn leaf_eq(reference: &Node, candidate: &Node) -> bool {
    match (reference, candidate) {
        (Node::Float(a), Node::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
        _ => reference == candidate,
    }
}
