use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::asset::Position;
use crate::errors::AssetResult;

/// Editor settings, read from a YAML file. Every field has a default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub layout: LayoutConfig,
    pub asset: AssetConfig,
}

/// Where synthesized Start and End nodes land in a blank asset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub viewport_center: Position,
    pub start_offset: Position,
    pub end_offset: Position,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_center: Position::new(0.0, 0.0),
            start_offset: Position::new(-200.0, 300.0),
            end_offset: Position::new(200.0, 300.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Pretty-print JSON assets on save
    pub pretty: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> AssetResult<Self> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn to_yaml(&self) -> AssetResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let yaml = EditorConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("start_offset"));
        assert!(yaml.contains("pretty: true"));
    }

    #[test]
    fn test_partial_deserialization() {
        let yaml = r#"
layout:
  start_offset:
    x: -50.0
    y: 10.0
asset:
  pretty: false
"#;

        let config: EditorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.layout.start_offset, Position::new(-50.0, 10.0));
        assert_eq!(config.layout.end_offset, Position::new(200.0, 300.0));
        assert!(!config.asset.pretty);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EditorConfig::load(dir.path().join("missing.yaml")).is_err());
    }
}
