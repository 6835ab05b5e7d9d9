//! Skill table loader.

use std::path::Path;

use battle_core::{SkillData, SkillId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One skill record in the RON table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub id: SkillId,
    pub data: SkillData,
}

/// Skill table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SkillCatalog {
    skills: Vec<SkillEntry>,
}

/// Loader for the skill table from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load the skill table from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<SkillEntry>> {
        let content = read_file(path)?;
        let catalog: SkillCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill table RON: {}", e))?;
        Ok(catalog.skills)
    }
}
