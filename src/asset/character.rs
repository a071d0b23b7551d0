use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{read_file, write_file, GraphAsset};
use crate::errors::AssetResult;

/// A speaking character and the conversations it can start.
///
/// Conversation paths are relative to the directory holding the character file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterAsset {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
    #[serde(default)]
    pub conversations: Vec<PathBuf>,
}

impl CharacterAsset {
    pub fn load(path: impl AsRef<Path>) -> AssetResult<Self> {
        read_file(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>, pretty: bool) -> AssetResult<()> {
        write_file(path.as_ref(), self, pretty)
    }

    /// Load every referenced conversation, in declaration order.
    pub fn load_conversations(&self, base_dir: &Path) -> AssetResult<Vec<GraphAsset>> {
        self.conversations
            .iter()
            .map(|relative| {
                let path = base_dir.join(relative);
                debug!("Loading conversation {} for {}", path.display(), self.name);
                GraphAsset::load(path)
            })
            .collect()
    }
}
