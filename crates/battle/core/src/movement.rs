//! Movement reachability over the battle field.
//!
//! Breadth-first search from the acting combatant's cell, bounded by a
//! speed-derived step budget. Results land in the grid's move-range layer:
//! minimum step count for every reachable cell, [`BattlefieldGrid::EMPTY`]
//! everywhere else.

use std::collections::VecDeque;

use crate::state::{BattlefieldGrid, CombatantRoster, Layer, Position};

const NEIGHBORS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Steps a combatant may move per turn given its derived speed.
pub fn step_budget(speed: i32) -> i32 {
    (speed / 10).max(1)
}

/// Fills the move-range layer for `actor`.
///
/// A neighbor is admissible when it is inside the field, its terrain is
/// passable, it carries no obstacle, no one occupies it, and BFS has not
/// visited it yet. Expansion stops at the step budget, so the layer holds
/// exactly the cells reachable this turn with their shortest step distance.
pub fn plan_movement(grid: &mut BattlefieldGrid, roster: &CombatantRoster, actor: usize) {
    grid.clear_layer(Layer::MoveRange, BattlefieldGrid::EMPTY);

    let Some(combatant) = roster.get(actor) else {
        return;
    };
    let budget = step_budget(combatant.speed as i32);
    let start = combatant.position;

    let mut queue = VecDeque::new();
    grid.set(Layer::MoveRange, start, 0);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let step = grid.get(Layer::MoveRange, cell);
        if step as i32 >= budget {
            continue;
        }

        for (dx, dy) in NEIGHBORS {
            let next = Position::new(cell.x + dx, cell.y + dy);
            if !grid.contains(next) {
                continue;
            }
            if grid.get(Layer::MoveRange, next) != BattlefieldGrid::EMPTY {
                continue;
            }
            if grid.get(Layer::Terrain, next) <= 0
                || grid.get(Layer::Obstacle, next) != 0
                || grid.get(Layer::Occupancy, next) != BattlefieldGrid::EMPTY
            {
                continue;
            }
            grid.set(Layer::MoveRange, next, step + 1);
            queue.push_back(next);
        }
    }
}

/// True when the move-range layer marks `cell` as a reachable destination
/// (strictly positive: staying put is not a move).
pub fn is_reachable(grid: &BattlefieldGrid, cell: Position) -> bool {
    grid.get(Layer::MoveRange, cell) > 0
}

/// The marked cell that brings the actor closest to `target` by Manhattan
/// distance, given the current move-range layer. Falls back to `from` when
/// nothing reachable improves on standing still.
pub fn best_approach(grid: &BattlefieldGrid, from: Position, target: Position) -> Position {
    let mut best = from;
    let mut best_distance = from.manhattan(target);
    for x in 0..BattlefieldGrid::size() as i32 {
        for y in 0..BattlefieldGrid::size() as i32 {
            let cell = Position::new(x, y);
            if grid.get(Layer::MoveRange, cell) < 0 {
                continue;
            }
            let distance = cell.manhattan(target);
            if distance < best_distance {
                best_distance = distance;
                best = cell;
            }
        }
    }
    best
}
