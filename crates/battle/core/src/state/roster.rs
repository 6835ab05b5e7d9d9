use super::{CharacterId, Facing, Position, TeamId};
use crate::config::BattleConfig;

/// One battle participant.
///
/// Persistent character data (HP, stats, inventory) stays in the external
/// store; a combatant only carries what scheduling and the field need, plus
/// a cached speed/knowledge snapshot so the scheduler does not re-query the
/// stat provider every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub character: CharacterId,
    pub team: TeamId,
    pub position: Position,
    pub facing: Facing,
    pub dead: bool,
    /// Set once the combatant has spent its current turn.
    pub acted: bool,
    /// Player-side combatant driven by the AI (encounter "auto" allies, or
    /// the player delegating a turn).
    pub auto: bool,
    /// Initiative meter; the combatant may act at
    /// [`BattleConfig::READY_PROGRESS`]. Support actions push it negative.
    pub progress: i32,
    /// Cached derived speed, refreshed at battle start.
    pub speed: i16,
    /// Cached derived knowledge, refreshed at battle start.
    pub knowledge: i16,
    /// Last effect magnitude, passed through for display only.
    pub last_shown: i16,
    /// Experience earned during this battle, written back at the end.
    pub exp_gained: i32,
}

impl Combatant {
    pub fn new(character: CharacterId, team: TeamId, position: Position) -> Self {
        Self {
            character,
            team,
            position,
            facing: Facing::default(),
            dead: false,
            acted: false,
            auto: false,
            progress: 0,
            speed: 0,
            knowledge: 0,
            last_shown: 0,
            exp_gained: 0,
        }
    }

    pub fn with_stats(mut self, speed: i16, knowledge: i16) -> Self {
        self.speed = speed;
        self.knowledge = knowledge;
        self
    }

    pub fn with_auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }
}

/// How completing an action charges the initiative meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionCost {
    /// Movement, attacks, waiting: meter resets to zero.
    Standard,
    /// Support actions (heal, cure, poison, hidden weapon, items): a flat
    /// penalty is subtracted instead, which can leave the meter negative and
    /// delay the combatant past a full recharge.
    Support,
}

/// Ordered collection of battle participants plus the initiative scheduler.
///
/// Roster order is battle order: indices are stable for the whole battle and
/// double as the occupancy values on the field grid.
#[derive(Clone, Debug, Default)]
pub struct CombatantRoster {
    slots: Vec<Combatant>,
}

impl CombatantRoster {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Appends a combatant and returns its roster index.
    pub fn add(&mut self, combatant: Combatant) -> usize {
        self.slots.push(combatant);
        self.slots.len() - 1
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the combatant at `index`, or `None` out of range. Harness
    /// code probing blindly gets a neutral answer instead of a panic.
    pub fn get(&self, index: usize) -> Option<&Combatant> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Combatant> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Combatant)> {
        self.slots.iter().enumerate()
    }

    pub fn living(&self) -> impl Iterator<Item = (usize, &Combatant)> {
        self.iter().filter(|(_, c)| c.is_alive())
    }

    /// True while the team still has a living member.
    pub fn team_alive(&self, team: TeamId) -> bool {
        self.living().any(|(_, c)| c.team == team)
    }

    /// True when every living member shares one team, i.e. the battle is
    /// decided.
    pub fn one_side_left(&self) -> bool {
        let mut teams = self.living().map(|(_, c)| c.team.is_player_side());
        match teams.next() {
            Some(first) => teams.all(|side| side == first),
            None => true,
        }
    }

    // ========================================================================
    // Initiative scheduling
    // ========================================================================

    /// One scheduler tick: every living combatant gains `max(1, speed/2)`
    /// progress. Dead combatants' meters stay frozen.
    pub fn advance_progress(&mut self) {
        for combatant in self.slots.iter_mut().filter(|c| c.is_alive()) {
            combatant.progress += (combatant.speed as i32 / 2).max(1);
        }
    }

    /// The combatant that should act now: living, meter at or past the ready
    /// threshold, and the highest meter of all such combatants. Ties resolve
    /// to the lowest roster index, which the scan order makes implicit: a
    /// later equal meter never displaces an earlier one.
    pub fn ready_actor(&self) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (index, combatant) in self.living() {
            if combatant.progress < BattleConfig::READY_PROGRESS {
                continue;
            }
            if best.is_none_or(|(_, progress)| combatant.progress > progress) {
                best = Some((index, combatant.progress));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Charges the meter after a completed action and marks the actor spent.
    pub fn apply_action_cost(&mut self, index: usize, cost: ActionCost) {
        if let Some(combatant) = self.slots.get_mut(index) {
            combatant.acted = true;
            match cost {
                ActionCost::Standard => combatant.progress = 0,
                ActionCost::Support => {
                    combatant.progress -= BattleConfig::SUPPORT_ACTION_COST;
                }
            }
        }
    }
}
