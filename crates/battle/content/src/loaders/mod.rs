//! Loaders for reading battle data from files.
//!
//! RON tables for definitions, raw binary payloads for battlefield
//! geometry. All loaders return [`LoadResult`] and leave fallback policy to
//! the caller — only the field loader is lenient, because the engine
//! guarantees a usable default field.

mod encounters;
mod fields;
mod items;
mod skills;

pub use encounters::EncounterLoader;
pub use fields::FieldLoader;
pub use items::{ItemEntry, ItemLoader};
pub use skills::{SkillEntry, SkillLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
