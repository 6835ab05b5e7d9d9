//! Item table loader.

use std::path::Path;

use battle_core::{ItemEffects, ItemId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One item record in the RON table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntry {
    pub id: ItemId,
    pub effects: ItemEffects,
}

/// Item table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemCatalog {
    items: Vec<ItemEntry>,
}

/// Loader for the item table from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load the item table from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemEntry>> {
        let content = read_file(path)?;
        let catalog: ItemCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item table RON: {}", e))?;
        Ok(catalog.items)
    }
}
