//! Persisted dialogue graph assets.
//!
//! A [`GraphAsset`] is the durable owner of all node and edge data. It is
//! overwritten wholesale on every save and read wholesale on every open; the
//! live editor graph is rebuilt from it (see [`crate::serialization`]).

pub mod character;
pub mod node;
pub mod position;

pub use character::CharacterAsset;
pub use node::*;
pub use position::*;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{AssetError, AssetResult};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphAsset {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl GraphAsset {
    /// Fewer than two nodes means the Start/End pair was never saved.
    pub fn is_blank(&self) -> bool {
        self.nodes.len() < 2
    }

    pub fn stats(&self) -> String {
        format!("Nodes: {}, Edges: {}", self.nodes.len(), self.edges.len())
    }

    pub fn load(path: impl AsRef<Path>) -> AssetResult<Self> {
        read_file(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>, pretty: bool) -> AssetResult<()> {
        write_file(path.as_ref(), self, pretty)
    }
}

/// On-disk encodings, selected by file extension
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssetFormat {
    Json,
    Yaml,
}

impl AssetFormat {
    pub fn from_path(path: &Path) -> AssetResult<Self> {
        let extension = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("");

        match extension.to_lowercase().as_str() {
            "json" => Ok(AssetFormat::Json),
            "yaml" | "yml" => Ok(AssetFormat::Yaml),
            _ => Err(AssetError::UnsupportedFormat(extension.to_string())),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, content: &str) -> AssetResult<T> {
        match self {
            AssetFormat::Json => Ok(serde_json::from_str(content)?),
            AssetFormat::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }

    pub fn render<T: Serialize>(self, value: &T, pretty: bool) -> AssetResult<String> {
        match self {
            AssetFormat::Json if pretty => Ok(serde_json::to_string_pretty(value)?),
            AssetFormat::Json => Ok(serde_json::to_string(value)?),
            AssetFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

pub(crate) fn read_file<T: DeserializeOwned>(path: &Path) -> AssetResult<T> {
    let format = AssetFormat::from_path(path)?;
    debug!("Reading {:?} file {}", format, path.display());
    let content = fs::read_to_string(path)?;
    format.parse(&content)
}

pub(crate) fn write_file<T: Serialize>(path: &Path, value: &T, pretty: bool) -> AssetResult<()> {
    let format = AssetFormat::from_path(path)?;
    let content = format.render(value, pretty)?;
    crate::common::write_string_to_file(path, &content)?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TaggedValue;

    fn sample() -> GraphAsset {
        GraphAsset {
            nodes: vec![
                NodeRecord::new(0, NodeType::Start, Position::new(-200.0, 300.0), vec![]),
                NodeRecord::new(
                    1,
                    NodeType::End,
                    Position::new(200.0, 300.0),
                    vec![TaggedValue::Int(1)],
                ),
            ],
            edges: vec![EdgeRecord {
                from_node: 0,
                out_port_index: 0,
                to_node: 1,
                in_port_index: 0,
            }],
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(AssetFormat::from_path(Path::new("a.json")).unwrap(), AssetFormat::Json);
        assert_eq!(AssetFormat::from_path(Path::new("a.YML")).unwrap(), AssetFormat::Yaml);
        assert!(matches!(
            AssetFormat::from_path(Path::new("a.asset")),
            Err(AssetError::UnsupportedFormat(ext)) if ext == "asset"
        ));
    }

    #[test]
    fn json_and_yaml_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let asset = sample();

        for name in ["graph.json", "graph.yaml"] {
            let path = dir.path().join(name);
            asset.save(&path, true).unwrap();
            assert_eq!(GraphAsset::load(&path).unwrap(), asset);
        }
    }

    #[test]
    fn blank_assets() {
        assert!(GraphAsset::default().is_blank());
        assert!(!sample().is_blank());
        assert_eq!(sample().stats(), "Nodes: 2, Edges: 1");
    }

    #[test]
    fn empty_document_parses_as_empty_asset() {
        let asset: GraphAsset = AssetFormat::Json.parse("{}").unwrap();
        assert_eq!(asset, GraphAsset::default());
    }
}
