//! Damage, healing, and status magnitude resolution.
//!
//! The offensive formula blends four stat differentials (attack, mana,
//! speed, weapon proficiency) over a level-scaled base value, shifted by a
//! team-wide knowledge differential and damped by cast distance. Support
//! magnitudes (healing, poison cure/apply, defrost, hidden weapons) use
//! simpler stat curves. Everything here is a pure computation over stat
//! snapshots — application and clamping against resources happen in the
//! executor.

use crate::env::{BattleRng, CombatStats, SkillData, StatProvider};
use crate::state::{CombatantRoster, TeamId};

/// Hard ceiling on any single hit.
pub const MAX_HURT: i32 = 9999;

// ============================================================================
// Base curve
// ============================================================================

/// Level-to-value curve between `min` and `max`.
///
/// # Formula
///
/// ```text
/// p' = proportion / 1000        (proportion 0 means the default 100)
/// n  = (max − min)^(1/p') / 9
/// value = round((level_index · n)^p') + min
/// ```
///
/// With `max == min` the curve collapses to `min` for every level, which is
/// what keeps fixed-magnitude skills fixed.
pub fn level_curve(level_index: i32, min: i32, max: i32, proportion: i32) -> i32 {
    let proportion = if proportion == 0 { 100 } else { proportion };
    let p = proportion as f64 / 1000.0;
    let spread = (max - min).max(0) as f64;
    let n = spread.powf(1.0 / p) / 9.0;
    ((level_index as f64 * n).powf(p).round()) as i32 + min
}

// ============================================================================
// Knowledge differential
// ============================================================================

/// Team-vs-team knowledge differential, clamped to ±100.
///
/// Sums the cached knowledge of every living combatant above the floor of 0
/// per side; any non-player side additionally receives
/// `average player-team level × difficulty / 50`, which is how encounter
/// difficulty leans on the scale.
pub fn knowledge_diff(
    roster: &CombatantRoster,
    characters: &dyn StatProvider,
    attacker: usize,
    target: usize,
    difficulty: i32,
) -> i32 {
    let (Some(att), Some(tar)) = (roster.get(attacker), roster.get(target)) else {
        return 0;
    };

    let mut attacker_sum = 0;
    let mut target_sum = 0;
    let mut level_total = 0;
    let mut player_count = 0;

    for (_, combatant) in roster.iter() {
        if combatant.is_alive() && combatant.knowledge > 0 {
            if combatant.team == att.team {
                attacker_sum += combatant.knowledge as i32;
            }
            if combatant.team == tar.team {
                target_sum += combatant.knowledge as i32;
            }
        }
        if combatant.team == TeamId::PLAYER {
            level_total += characters.stats(combatant.character).level;
            player_count += 1;
        }
    }

    let average_level = if player_count == 0 {
        0
    } else {
        level_total / player_count
    };
    if !att.team.is_player_side() {
        attacker_sum += average_level * difficulty / 50;
    }
    if !tar.team.is_player_side() {
        target_sum += average_level * difficulty / 50;
    }

    (attacker_sum - target_sum).clamp(-100, 100)
}

// ============================================================================
// Offensive formula
// ============================================================================

/// Pre-jitter blended damage for one attacker/target stat pairing.
///
/// Four stat pairs, each +1 so a zeroed stat never divides by zero: attack
/// vs defense, current mana, speed, and the proficiency of the skill's
/// weapon category. A complete matching equipment set grants the attacker
/// +50 attack / +30 speed and costs the target 25 defense while speeding it
/// up by 30. Per pair: `difference = max(a − b, 5)`, `ratio =
/// min(difference/a, 1)`.
///
/// The weight total is `p = atk·6 + mp·1 + spd·2 + wpn·2`; the attack
/// category's numerator is its coefficient ×3×2, double its own share of
/// the weight. That asymmetry is a deliberate balance rule, not a bug.
pub fn blended_hurt(
    mhurt: i32,
    attacker: &CombatStats,
    target: &CombatStats,
    skill: &SkillData,
) -> i32 {
    let mut att = attacker.attack + 1;
    let mut def = target.defense + 1;
    let mut spd1 = attacker.speed + 1;
    let mut spd2 = target.speed + 1;
    let (mut wpn1, mut wpn2) = match skill.category {
        Some(category) => (
            attacker.proficiency(category) + 1,
            target.proficiency(category) + 1,
        ),
        None => (0, 0),
    };
    let mut mp1 = attacker.mp + 1;
    let mut mp2 = target.mp + 1;

    if attacker.matching_set {
        att += 50;
        spd1 += 30;
    }
    if target.matching_set {
        def -= 25;
        spd2 += 30;
    }

    att = att.max(1);
    def = def.max(1);
    spd1 = spd1.max(1);
    spd2 = spd2.max(1);
    wpn1 = wpn1.max(1);
    wpn2 = wpn2.max(1);
    mp1 = mp1.max(1);
    mp2 = mp2.max(1);

    let ratio = |a: i32, b: i32| -> f64 {
        let difference = (a - b).max(5) as f64;
        (difference / a as f64).min(1.0)
    };
    let a1 = ratio(att, def);
    let m1 = ratio(mp1, mp2);
    let s1 = ratio(spd1, spd2);
    let w1 = ratio(wpn1, wpn2);

    let attack_mod = skill.attack_mod as i32;
    let mp_mod = skill.mp_mod as i32;
    let speed_mod = skill.speed_mod as i32;
    let weapon_mod = skill.weapon_mod as i32;
    let p = attack_mod * 6 + mp_mod + speed_mod * 2 + weapon_mod * 2;
    if p <= 0 {
        return 0;
    }

    let mhurt = mhurt as f64;
    let p = p as f64;
    let mut result = 0;
    if attack_mod > 0 {
        result += (mhurt * a1 * (attack_mod as f64 * 3.0 * 2.0 / p)) as i32;
    }
    if mp_mod > 0 {
        result += (mhurt * m1 * (mp_mod as f64 / p)) as i32;
    }
    if speed_mod > 0 {
        result += (mhurt * s1 * (speed_mod as f64 * 2.0 / p)) as i32;
    }
    if weapon_mod > 0 {
        result += (mhurt * w1 * (weapon_mod as f64 * 2.0 / p)) as i32;
    }
    result
}

/// Full offensive magnitude: base curve → knowledge scaling → stat blend →
/// jitter → distance falloff → floor/ceiling.
///
/// Never returns less than 1 or more than [`MAX_HURT`]; a degenerate input
/// (level ≤ 0 or a blend that bottoms out) falls back to a small random
/// positive hit so battles cannot stall on zero damage.
#[allow(clippy::too_many_arguments)]
pub fn hurt_value(
    roster: &CombatantRoster,
    characters: &dyn StatProvider,
    rng: &mut dyn BattleRng,
    attacker: usize,
    target: usize,
    skill: &SkillData,
    level: i32,
    difficulty: i32,
) -> i32 {
    let (Some(att), Some(tar)) = (roster.get(attacker), roster.get(target)) else {
        return 1;
    };

    let knowledge = knowledge_diff(roster, characters, attacker, target, difficulty);
    let base = level_curve(
        level - 1,
        skill.min_hurt as i32,
        skill.max_hurt as i32,
        skill.proportion as i32,
    );
    let mhurt = base * (100 + knowledge * 4 / 5) / 100;

    let attacker_stats = characters.stats(att.character);
    let target_stats = characters.stats(tar.character);
    let mut result = blended_hurt(mhurt, &attacker_stats, &target_stats, skill) as f64;

    result += rng.below(10) as f64 - rng.below(10) as f64;
    let floor = mhurt as f64 / 20.0;
    if result < floor {
        result = floor + rng.below(5) as f64 - rng.below(5) as f64;
    }

    let distance = att.position.manhattan(tar.position).min(10);
    result = result * (100 - (distance - 1) * 3) as f64 / 100.0;

    if result <= 0.0 || level <= 0 {
        result = (rng.below(10) + 1) as f64;
    }
    (result as i32).clamp(1, MAX_HURT)
}

// ============================================================================
// Support magnitudes
// ============================================================================

/// Healing delivered by the medicine discipline.
///
/// Heavy injury dampens treatment: `med × (10 − injury/15) / 10`, and a
/// wound more than 20 points past the healer's skill cannot be treated at
/// all. The caller clamps against missing HP.
pub fn heal_value(healer: &CombatStats, target: &CombatStats) -> i32 {
    if target.injury - healer.medicine > 20 {
        return 0;
    }
    (healer.medicine * (10 - target.injury / 15) / 10).max(0)
}

/// Poison points removed by a cure attempt: all of it when the healer's
/// cure-poison skill is at least half the meter, otherwise nothing.
pub fn cure_poison_value(healer: &CombatStats, target: &CombatStats) -> i32 {
    let cut = healer.cure_poison;
    if cut < target.poison / 2 {
        return 0;
    }
    cut.min(target.poison)
}

/// Poison points added by a deliberate poisoning, saturating at the
/// attacker's use-poison skill.
pub fn apply_poison_value(attacker: &CombatStats, target: &CombatStats) -> i32 {
    (attacker.use_poison - target.poison).clamp(0, attacker.use_poison)
}

/// Thaw magnitude for the defrost action; fueled by current mana plus the
/// medicine discipline.
pub fn defrost_value(healer: &CombatStats) -> i32 {
    (healer.mp + healer.medicine * 5) / 3
}

/// Hidden-weapon throw: `(hurt, poison_added)`.
///
/// Throwable items carry a negative HP "restore", so the damage is the
/// negated product scaled by proficiency, floored at 25. Poison delivery is
/// reduced by the target's poison resistance.
pub fn hidden_weapon_values(
    attacker: &CombatStats,
    target: &CombatStats,
    weapon: &crate::env::ItemEffects,
) -> (i32, i32) {
    let hurt = (-(attacker.hidden_weapon * weapon.restore_hp as i32) / 100).max(25);
    let poison =
        (attacker.hidden_weapon * weapon.poison as i32 / 100 - target.resist_poison).max(0);
    (hurt, poison)
}
