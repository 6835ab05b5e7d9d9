//! Aggregated content store implementing the battle oracles.

use std::collections::HashMap;
use std::path::Path;

use battle_core::{
    EncounterDefinition, ItemEffects, ItemId, ItemOracle, SkillData, SkillId, SkillOracle,
};

use crate::loaders::{EncounterLoader, FieldLoader, ItemLoader, SkillLoader};

/// Skill/item/encounter tables plus battlefield payload access, loaded once
/// from a content directory and shared read-only for the program's lifetime.
pub struct ContentStore {
    skills: HashMap<SkillId, SkillData>,
    items: HashMap<ItemId, ItemEffects>,
    encounters: Vec<EncounterDefinition>,
    fields: FieldLoader,
}

impl ContentStore {
    /// Loads `skills.ron`, `items.ron`, and `encounters.ron` from `root`,
    /// with battlefield payloads under `root/fields/`.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let skills = SkillLoader::load(&root.join("skills.ron"))?
            .into_iter()
            .map(|entry| (entry.id, entry.data))
            .collect::<HashMap<_, _>>();
        let items = ItemLoader::load(&root.join("items.ron"))?
            .into_iter()
            .map(|entry| (entry.id, entry.effects))
            .collect::<HashMap<_, _>>();
        let encounters = EncounterLoader::load(&root.join("encounters.ron"))?;

        tracing::info!(
            skills = skills.len(),
            items = items.len(),
            encounters = encounters.len(),
            "content tables loaded"
        );

        Ok(Self {
            skills,
            items,
            encounters,
            fields: FieldLoader::new(root.join("fields")),
        })
    }

    /// Builds a store from already-materialized tables (test harnesses, the
    /// scripting collaborator).
    pub fn from_tables(
        skills: HashMap<SkillId, SkillData>,
        items: HashMap<ItemId, ItemEffects>,
        encounters: Vec<EncounterDefinition>,
        fields_dir: impl Into<std::path::PathBuf>,
    ) -> Self {
        Self {
            skills,
            items,
            encounters,
            fields: FieldLoader::new(fields_dir),
        }
    }

    pub fn encounter(&self, id: usize) -> Option<&EncounterDefinition> {
        self.encounters.get(id)
    }

    pub fn encounter_count(&self) -> usize {
        self.encounters.len()
    }

    /// Raw battlefield payload for a map id; `None` defers to the engine's
    /// default field.
    pub fn field_payload(&self, map: u16) -> Option<Vec<u8>> {
        self.fields.payload(map)
    }
}

impl SkillOracle for ContentStore {
    fn skill(&self, id: SkillId) -> Option<SkillData> {
        self.skills.get(&id).cloned()
    }
}

impl ItemOracle for ContentStore {
    fn battle_effects(&self, id: ItemId) -> Option<ItemEffects> {
        self.items.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SKILLS_RON: &str = r#"(
    skills: [
        (
            id: (1),
            data: (
                name: "Plain Palm",
                category: Some(Unarmed),
                hurt: Health,
                area_code: 0,
                min_hurt: 10,
                max_hurt: 50,
                proportion: 0,
                attack_mod: 1,
                mp_mod: 0,
                speed_mod: 0,
                weapon_mod: 1,
                step: (1, 1, 1, 1, 2, 2, 2, 2, 3, 3),
                range: (0, 0, 0, 0, 0, 0, 0, 0, 1, 1),
            ),
        ),
    ],
)"#;

    const ITEMS_RON: &str = r#"(
    items: [
        (id: (5), effects: (restore_hp: 100, restore_mp: 0, restore_stamina: 0, poison: 0)),
        (id: (9), effects: (restore_hp: -20, restore_mp: 0, restore_stamina: 0, poison: 40)),
    ],
)"#;

    const ENCOUNTERS_RON: &str = r#"(
    encounters: [
        (
            name: "Ambush at the ford",
            map: 3,
            music: 2,
            allies: [(character: (0), x: 10, y: 12, auto: false)],
            enemies: [(character: (7), x: 14, y: 12, auto: false)],
            rewards: (experience: 200, items: [(item: (5), count: 1)], money: 50),
        ),
    ],
)"#;

    fn write(dir: &Path, name: &str, contents: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn loads_tables_and_serves_oracles() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "skills.ron", SKILLS_RON);
        write(dir.path(), "items.ron", ITEMS_RON);
        write(dir.path(), "encounters.ron", ENCOUNTERS_RON);

        let store = ContentStore::load(dir.path()).unwrap();

        let skill = store.skill(SkillId(1)).unwrap();
        assert_eq!(skill.name, "Plain Palm");
        assert_eq!(skill.step_at(5), 2);
        assert!(store.skill(SkillId(99)).is_none());

        let dart = store.battle_effects(ItemId(9)).unwrap();
        assert_eq!(dart.poison, 40);

        let encounter = store.encounter(0).unwrap();
        assert_eq!(encounter.map, 3);
        assert_eq!(encounter.enemies.len(), 1);
        assert!(store.encounter(1).is_none());
    }

    #[test]
    fn missing_table_is_an_error_but_missing_field_is_not() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ContentStore::load(dir.path()).is_err());

        write(dir.path(), "skills.ron", SKILLS_RON);
        write(dir.path(), "items.ron", ITEMS_RON);
        write(dir.path(), "encounters.ron", ENCOUNTERS_RON);
        let store = ContentStore::load(dir.path()).unwrap();
        assert!(store.field_payload(3).is_none());
    }

    #[test]
    fn field_payload_roundtrips_bytes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "skills.ron", SKILLS_RON);
        write(dir.path(), "items.ron", ITEMS_RON);
        write(dir.path(), "encounters.ron", ENCOUNTERS_RON);
        std::fs::create_dir(dir.path().join("fields")).unwrap();
        std::fs::write(dir.path().join("fields/field_003.bin"), vec![1u8; 16]).unwrap();

        let store = ContentStore::load(dir.path()).unwrap();
        assert_eq!(store.field_payload(3).unwrap().len(), 16);
    }
}
