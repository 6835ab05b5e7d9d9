//! In-memory collaborators for unit tests.

use std::collections::{HashMap, VecDeque};

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::env::{
    BattleRng, CarriedItem, CombatStats, ItemEffects, ItemId, ItemOracle, KnownSkill, SkillData,
    SkillId, SkillOracle, StatProvider,
};
use crate::state::CharacterId;

#[derive(Clone, Debug, Default)]
struct FixtureCharacter {
    stats: CombatStats,
    skills: ArrayVec<KnownSkill, { BattleConfig::MAX_SKILLS }>,
    carried: ArrayVec<CarriedItem, { BattleConfig::MAX_CARRIED }>,
    exp: i32,
}

/// Character store + skill/item tables backed by plain maps.
#[derive(Clone, Debug, Default)]
pub struct FixtureWorld {
    characters: Vec<FixtureCharacter>,
    skills: HashMap<SkillId, SkillData>,
    items: HashMap<ItemId, ItemEffects>,
    bag: Vec<(ItemId, u32)>,
    pub money: i32,
}

impl FixtureWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_character(&mut self, stats: CombatStats) -> CharacterId {
        self.characters.push(FixtureCharacter {
            stats,
            ..Default::default()
        });
        CharacterId((self.characters.len() - 1) as u16)
    }

    pub fn learn_skill(&mut self, id: CharacterId, skill: SkillId, mastery: i32) {
        self.characters[id.0 as usize]
            .skills
            .push(KnownSkill { skill, mastery });
    }

    pub fn give_carried(&mut self, id: CharacterId, item: ItemId, count: u16) {
        self.characters[id.0 as usize]
            .carried
            .push(CarriedItem { item, count });
    }

    pub fn define_skill(&mut self, id: SkillId, data: SkillData) {
        self.skills.insert(id, data);
    }

    pub fn define_item(&mut self, id: ItemId, effects: ItemEffects) {
        self.items.insert(id, effects);
    }

    pub fn stock_bag(&mut self, item: ItemId, count: u32) {
        self.bag.push((item, count));
    }

    pub fn experience(&self, id: CharacterId) -> i32 {
        self.characters[id.0 as usize].exp
    }

    fn character_mut(&mut self, id: CharacterId) -> &mut FixtureCharacter {
        &mut self.characters[id.0 as usize]
    }
}

impl StatProvider for FixtureWorld {
    fn stats(&self, id: CharacterId) -> CombatStats {
        self.characters
            .get(id.0 as usize)
            .map(|c| c.stats)
            .unwrap_or_default()
    }

    fn known_skills(&self, id: CharacterId) -> ArrayVec<KnownSkill, { BattleConfig::MAX_SKILLS }> {
        self.characters
            .get(id.0 as usize)
            .map(|c| c.skills.clone())
            .unwrap_or_default()
    }

    fn carried_items(
        &self,
        id: CharacterId,
    ) -> ArrayVec<CarriedItem, { BattleConfig::MAX_CARRIED }> {
        self.characters
            .get(id.0 as usize)
            .map(|c| c.carried.clone())
            .unwrap_or_default()
    }

    fn set_hp(&mut self, id: CharacterId, value: i32) {
        self.character_mut(id).stats.hp = value;
    }

    fn set_mp(&mut self, id: CharacterId, value: i32) {
        self.character_mut(id).stats.mp = value;
    }

    fn set_phy_power(&mut self, id: CharacterId, value: i32) {
        self.character_mut(id).stats.phy_power = value;
    }

    fn set_injury(&mut self, id: CharacterId, value: i32) {
        self.character_mut(id).stats.injury = value;
    }

    fn set_poison(&mut self, id: CharacterId, value: i32) {
        self.character_mut(id).stats.poison = value;
    }

    fn add_experience(&mut self, id: CharacterId, amount: i32) {
        self.character_mut(id).exp += amount;
    }

    fn consume_carried(&mut self, id: CharacterId, item: ItemId) {
        let carried = &mut self.character_mut(id).carried;
        if let Some(index) = carried.iter().position(|c| c.item == item && c.count > 0) {
            carried[index].count -= 1;
            if carried[index].count == 0 {
                carried.remove(index);
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

impl SkillOracle for FixtureWorld {
    fn skill(&self, id: SkillId) -> Option<SkillData> {
        self.skills.get(&id).cloned()
    }
}

impl ItemOracle for FixtureWorld {
    fn battle_effects(&self, id: ItemId) -> Option<ItemEffects> {
        self.items.get(&id).copied()
    }
}

/// RNG that replays a scripted prefix, then settles on zero. Lets tests
/// force specific dice without fighting a real stream.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    queue: VecDeque<u32>,
}

impl ScriptedRng {
    pub fn with(values: &[u32]) -> Self {
        Self {
            queue: values.iter().copied().collect(),
        }
    }
}

impl BattleRng for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.queue.pop_front().unwrap_or(0)
    }
}
