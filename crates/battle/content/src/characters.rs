//! Character store: the persistent side of the stat-provider contract.
//!
//! Holds aggregated character sheets (base stats already folded with
//! equipment and cultivation bonuses by whatever produced the file), the
//! shared bag, and the party purse. The battle engine reads and writes it
//! through [`battle_core::StatProvider`]; every write lands immediately, so
//! an interrupted battle leaves this store consistent.

use std::path::Path;

use arrayvec::ArrayVec;
use battle_core::{
    BattleConfig, CarriedItem, CharacterId, CombatStats, ItemId, KnownSkill, StatProvider,
};
use serde::{Deserialize, Serialize};

use crate::loaders::LoadResult;

/// One character's persistent record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: String,
    pub stats: CombatStats,
    #[serde(default)]
    pub skills: Vec<KnownSkill>,
    #[serde(default)]
    pub carried: Vec<CarriedItem>,
    #[serde(default)]
    pub experience: i32,
}

/// File structure for `characters.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PartyFile {
    characters: Vec<CharacterSheet>,
    #[serde(default)]
    bag: Vec<(ItemId, u32)>,
    #[serde(default)]
    money: i32,
}

/// In-memory character store backing the stat-provider trait.
#[derive(Debug, Clone, Default)]
pub struct CharacterStore {
    sheets: Vec<CharacterSheet>,
    bag: Vec<(ItemId, u32)>,
    money: i32,
}

impl CharacterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the party file from RON.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = crate::loaders::read_file(path)?;
        let file: PartyFile = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse party RON: {}", e))?;
        Ok(Self {
            sheets: file.characters,
            bag: file.bag,
            money: file.money,
        })
    }

    /// Appends a sheet and returns its character id.
    pub fn push(&mut self, sheet: CharacterSheet) -> CharacterId {
        self.sheets.push(sheet);
        CharacterId((self.sheets.len() - 1) as u16)
    }

    pub fn sheet(&self, id: CharacterId) -> Option<&CharacterSheet> {
        self.sheets.get(id.0 as usize)
    }

    pub fn money(&self) -> i32 {
        self.money
    }

    pub fn stock_bag(&mut self, item: ItemId, count: u32) {
        self.bag.push((item, count));
    }

    fn sheet_mut(&mut self, id: CharacterId) -> Option<&mut CharacterSheet> {
        self.sheets.get_mut(id.0 as usize)
    }
}

impl StatProvider for CharacterStore {
    fn stats(&self, id: CharacterId) -> CombatStats {
        self.sheet(id).map(|s| s.stats).unwrap_or_default()
    }

    fn known_skills(&self, id: CharacterId) -> ArrayVec<KnownSkill, { BattleConfig::MAX_SKILLS }> {
        self.sheet(id)
            .map(|s| {
                s.skills
                    .iter()
                    .take(BattleConfig::MAX_SKILLS)
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn carried_items(
        &self,
        id: CharacterId,
    ) -> ArrayVec<CarriedItem, { BattleConfig::MAX_CARRIED }> {
        self.sheet(id)
            .map(|s| {
                s.carried
                    .iter()
                    .take(BattleConfig::MAX_CARRIED)
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_hp(&mut self, id: CharacterId, value: i32) {
        if let Some(sheet) = self.sheet_mut(id) {
            sheet.stats.hp = value;
        }
    }

    fn set_mp(&mut self, id: CharacterId, value: i32) {
        if let Some(sheet) = self.sheet_mut(id) {
            sheet.stats.mp = value;
        }
    }

    fn set_phy_power(&mut self, id: CharacterId, value: i32) {
        if let Some(sheet) = self.sheet_mut(id) {
            sheet.stats.phy_power = value;
        }
    }

    fn set_injury(&mut self, id: CharacterId, value: i32) {
        if let Some(sheet) = self.sheet_mut(id) {
            sheet.stats.injury = value;
        }
    }

    fn set_poison(&mut self, id: CharacterId, value: i32) {
        if let Some(sheet) = self.sheet_mut(id) {
            sheet.stats.poison = value;
        }
    }

    fn add_experience(&mut self, id: CharacterId, amount: i32) {
        if let Some(sheet) = self.sheet_mut(id) {
            sheet.experience += amount;
        }
    }

    fn consume_carried(&mut self, id: CharacterId, item: ItemId) {
        if let Some(sheet) = self.sheet_mut(id) {
            if let Some(index) = sheet
                .carried
                .iter()
                .position(|c| c.item == item && c.count > 0)
            {
                sheet.carried[index].count -= 1;
                if sheet.carried[index].count == 0 {
                    sheet.carried.remove(index);
                }
            }
        }
    }

    fn bag_items(&self) -> Vec<(ItemId, u32)> {
        self.bag.clone()
    }

    fn consume_bag(&mut self, item: ItemId) {
        if let Some(index) = self.bag.iter().position(|(i, n)| *i == item && *n > 0) {
            self.bag[index].1 -= 1;
            if self.bag[index].1 == 0 {
                self.bag.remove(index);
            }
        }
    }

    fn grant_bag(&mut self, item: ItemId, count: u32) {
        match self.bag.iter_mut().find(|(i, _)| *i == item) {
            Some((_, n)) => *n += count,
            None => self.bag.push((item, count)),
        }
    }

    fn add_money(&mut self, amount: i32) {
        self.money += amount;
    }
}
