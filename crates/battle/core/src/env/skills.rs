use core::fmt;

/// Identifier of a skill record in the external skill table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(pub u16);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skill#{}", self.0)
    }
}

/// Weapon discipline a skill channels; each has its own proficiency stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponCategory {
    Unarmed,
    Sword,
    Blade,
    Exotic,
}

impl WeaponCategory {
    /// Maps the skill table's raw category code; 0 (and anything unknown)
    /// means the skill has no weapon component.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(Self::Unarmed),
            2 => Some(Self::Sword),
            3 => Some(Self::Blade),
            4 => Some(Self::Exotic),
            _ => None,
        }
    }
}

/// Which resource an offensive skill depletes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HurtKind {
    #[default]
    Health,
    Mana,
}

impl HurtKind {
    pub fn from_code(code: i16) -> Self {
        if code == 1 { Self::Mana } else { Self::Health }
    }
}

/// Skill definition as the damage resolver and targeting need it.
///
/// `step` and `range` are indexed by mastery level − 1: `step` bounds how far
/// the cast anchor may sit from the caster, `range` parameterizes the area
/// template.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillData {
    pub name: String,
    pub category: Option<WeaponCategory>,
    pub hurt: HurtKind,
    /// Raw area template code, resolved by `targeting::AreaTemplate`.
    pub area_code: i16,
    pub min_hurt: i16,
    pub max_hurt: i16,
    /// Curve proportion parameter; 0 means the default curve (100).
    pub proportion: i16,
    pub attack_mod: i16,
    pub mp_mod: i16,
    pub speed_mod: i16,
    pub weapon_mod: i16,
    pub step: [i16; 10],
    pub range: [i16; 10],
}

impl SkillData {
    /// Cast distance for a given mastery level (1-based, clamped).
    pub fn step_at(&self, level: i32) -> i32 {
        self.step[level_slot(level)] as i32
    }

    /// Template range for a given mastery level (1-based, clamped).
    pub fn range_at(&self, level: i32) -> i32 {
        self.range[level_slot(level)] as i32
    }
}

fn level_slot(level: i32) -> usize {
    (level.clamp(1, 10) - 1) as usize
}

/// Read access to the external skill table.
pub trait SkillOracle: Send + Sync {
    /// Returns the skill record, or `None` for an unknown id. Callers fall
    /// back to a plain physical strike when a skill cannot be resolved.
    fn skill(&self, id: SkillId) -> Option<SkillData>;
}
