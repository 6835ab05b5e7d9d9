//! Area-of-effect targeting.
//!
//! Skills select cells through a geometric template anchored at the cast
//! point (and, for directional shapes, the caster's own cell). The resolver
//! writes the eligible set into the grid's attack-range layer, which the
//! damage sweep and the player's target selection both read.

use crate::state::{BattlefieldGrid, Layer, Position};

/// Geometric pattern of an attack or skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum AreaTemplate {
    /// Manhattan diamond around the anchor.
    Point,
    /// Axis-aligned half-line from the origin toward the anchor.
    Line,
    /// Orthogonal arms plus diagonal arms from the origin.
    Cross,
    /// Chebyshev box around the anchor.
    Square,
    /// Just the anchor cell.
    Single,
}

impl AreaTemplate {
    /// Maps the skill table's raw area code. Codes 0 and 6 are both the
    /// diamond ("point" and "far" variants differ only in cast distance);
    /// unknown codes degrade to the single-cell template.
    pub fn from_code(code: i16) -> Self {
        match code {
            0 | 6 => Self::Point,
            1 => Self::Line,
            2 => Self::Cross,
            3 => Self::Square,
            _ => Self::Single,
        }
    }
}

/// Anchoring and extent of one template evaluation.
#[derive(Clone, Copy, Debug)]
pub struct AreaParams {
    /// Cast point the player or AI aimed at.
    pub anchor: Position,
    /// The caster's cell; directional templates radiate from here.
    pub origin: Position,
    /// Template radius (diamond/box/diagonals).
    pub range: i32,
    /// Arm length for line and cross templates.
    pub step: i32,
}

/// Clears the attack-range layer, then marks every passable cell the
/// template covers with 1.
pub fn mark_attack_area(grid: &mut BattlefieldGrid, template: AreaTemplate, params: AreaParams) {
    grid.clear_layer(Layer::AttackRange, 0);

    for x in 0..BattlefieldGrid::size() as i32 {
        for y in 0..BattlefieldGrid::size() as i32 {
            let cell = Position::new(x, y);
            if grid.get(Layer::Terrain, cell) <= 0 {
                continue;
            }
            if covers(template, params, cell) {
                grid.set(Layer::AttackRange, cell, 1);
            }
        }
    }
}

fn covers(template: AreaTemplate, params: AreaParams, cell: Position) -> bool {
    let AreaParams {
        anchor,
        origin,
        range,
        step,
    } = params;
    match template {
        AreaTemplate::Point => cell.manhattan(anchor) <= range,
        AreaTemplate::Line => {
            // Restricted to the half-line toward the anchor: the offset from
            // the origin must share its sign with the origin→anchor delta.
            if cell.x == origin.x && (cell.y - origin.y).abs() <= step {
                (cell.y - origin.y) * (anchor.y - origin.y) > 0
            } else if cell.y == origin.y && (cell.x - origin.x).abs() <= step {
                (cell.x - origin.x) * (anchor.x - origin.x) > 0
            } else {
                false
            }
        }
        AreaTemplate::Cross => {
            let dx = (cell.x - origin.x).abs();
            let dy = (cell.y - origin.y).abs();
            (cell.x == origin.x && dy <= step)
                || (cell.y == origin.y && dx <= step)
                || (dx == dy && dx <= range)
        }
        AreaTemplate::Square => {
            (cell.x - anchor.x).abs() <= range && (cell.y - anchor.y).abs() <= range
        }
        AreaTemplate::Single => cell == anchor,
    }
}
