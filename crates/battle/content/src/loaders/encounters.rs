//! Encounter table loader.
//!
//! Encounters are identified by their position in the table, matching how
//! the event scripting layer refers to battles by number.

use std::path::Path;

use battle_core::EncounterDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Encounter table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EncounterCatalog {
    encounters: Vec<EncounterDefinition>,
}

/// Loader for the encounter table from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load the encounter table from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<EncounterDefinition>> {
        let content = read_file(path)?;
        let catalog: EncounterCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter table RON: {}", e))?;
        Ok(catalog.encounters)
    }
}
