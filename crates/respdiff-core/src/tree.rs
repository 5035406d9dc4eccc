//! Reading response trees from serialized text

use crate::error::{CompareError, CompareResult};
use crate::node::Node;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serialized form a tree is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Yaml,
}

impl TreeFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> CompareResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(TreeFormat::Json),
            Some("yaml") | Some("yml") => Ok(TreeFormat::Yaml),
            Some(other) => Err(CompareError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: format!("unknown extension '.{}'", other),
            }),
            None => Err(CompareError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "missing file extension".to_string(),
            }),
        }
    }
}

/// Parse a tree from text; `source_name` labels errors
pub fn parse_tree(text: &str, format: TreeFormat, source_name: &str) -> CompareResult<Node> {
    match format {
        TreeFormat::Json => serde_json::from_str(text).map_err(|e| CompareError::ParseJson {
            source_name: source_name.to_string(),
            source: e,
        }),
        TreeFormat::Yaml => serde_yaml::from_str(text).map_err(|e| CompareError::ParseYaml {
            source_name: source_name.to_string(),
            source: e,
        }),
    }
}

/// Load a tree from a `.json`, `.yaml` or `.yml` file
pub fn load_tree(path: impl AsRef<Path>) -> CompareResult<Node> {
    let path = path.as_ref();
    let format = TreeFormat::from_path(path)?;
    debug!("Loading {:?} tree from {:?}", format, path);

    let content = fs::read_to_string(path).map_err(|e| CompareError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_tree(&content, format, &path.display().to_string())
}
