//! Location of a value inside a tree

use serde::{Serialize, Serializer};
use std::fmt;

/// One accessor step
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Accessors from the tree root, rendered as `root['outputs'][0]['amount']`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The tree root
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a mapping entry below this path
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(PathSegment::Key(key.into()))
    }

    /// Path of a sequence element below this path
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(k) => write!(f, "['{}']", k)?,
                PathSegment::Index(i) => write!(f, "[{}]", i)?,
            }
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_rendering() {
        assert_eq!(Path::root().to_string(), "root");
        assert!(Path::root().is_root());
    }

    #[test]
    fn test_nested_rendering() {
        let path = Path::root().key("outputs").index(0).key("amount");
        assert_eq!(path.to_string(), "root['outputs'][0]['amount']");
        assert_eq!(path.segments().len(), 3);
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = Path::root().key("a");
        let _child = parent.index(3);
        assert_eq!(parent.to_string(), "root['a']");
    }

    #[test]
    fn test_serializes_as_string() {
        let path = Path::root().key("id");
        assert_eq!(serde_json::to_string(&path).unwrap(), r#""root['id']""#);
    }
}
