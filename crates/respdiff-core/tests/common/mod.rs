//! Shared helpers for integration tests

use respdiff_core::{load_tree, Node};
use std::path::{Path, PathBuf};

/// Path of a file in `tests/fixtures/`
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load a fixture file as a tree
pub fn load_fixture(name: &str) -> Node {
    let path = fixture_path(name);
    load_tree(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture '{}' from {:?}: {}", name, path, e))
}

/// Load the `<name>.reference.json` / `<name>.candidate.json` pair
pub fn load_pair(name: &str) -> (Node, Node) {
    (
        load_fixture(&format!("{}.reference.json", name)),
        load_fixture(&format!("{}.candidate.json", name)),
    )
}
