//! Content loading for the battle engine.
//!
//! Realizes the "external resource collaborator": RON tables for skills,
//! items, characters, and encounters, plus raw battlefield payload files,
//! exposed to `battle-core` through its oracle traits. Loaders convert
//! files into [`ContentStore`]/[`CharacterStore`]; nothing here contains
//! battle rules.

pub mod characters;
pub mod loaders;
pub mod store;

pub use characters::{CharacterSheet, CharacterStore};
pub use loaders::{EncounterLoader, FieldLoader, ItemLoader, SkillLoader};
pub use store::ContentStore;
