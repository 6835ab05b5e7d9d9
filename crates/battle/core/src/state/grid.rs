use crate::config::BattleConfig;
use crate::state::Position;

const SIZE: usize = BattleConfig::FIELD_SIZE;
const LAYERS: usize = BattleConfig::FIELD_LAYERS;

/// Semantic names for the field's cell layers.
///
/// The grid stores raw `i16` values; what a value means depends on the layer:
/// terrain codes > 0 are passable, the obstacle layer blocks movement when
/// non-zero, occupancy holds a roster index or [`BattlefieldGrid::EMPTY`],
/// and the two mark layers are scratch output of the movement planner and the
/// area targeting resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Terrain = 0,
    Obstacle = 1,
    Occupancy = 2,
    MoveRange = 3,
    AttackRange = 4,
    Reserved5 = 5,
    Reserved6 = 6,
    Reserved7 = 7,
}

/// Multi-layer 64×64 battle field.
///
/// Rebuilt for every battle. Out-of-range reads return 0 and out-of-range
/// writes are ignored, so harness code can probe freely without panics.
#[derive(Clone)]
pub struct BattlefieldGrid {
    cells: Box<[[[i16; SIZE]; SIZE]; LAYERS]>,
}

impl BattlefieldGrid {
    /// Occupancy/move-range sentinel for "nothing here" / "unreachable".
    pub const EMPTY: i16 = -1;

    /// Creates a field with all layers zeroed and occupancy/move-range
    /// cleared to [`Self::EMPTY`].
    pub fn new() -> Self {
        let mut grid = Self {
            cells: Box::new([[[0; SIZE]; SIZE]; LAYERS]),
        };
        grid.clear_layer(Layer::Occupancy, Self::EMPTY);
        grid.clear_layer(Layer::MoveRange, Self::EMPTY);
        grid
    }

    /// Creates an all-passable field: terrain 1 everywhere, no obstacles.
    /// Used when the external map payload cannot be decoded.
    pub fn all_passable() -> Self {
        let mut grid = Self::new();
        grid.clear_layer(Layer::Terrain, 1);
        grid
    }

    pub const fn size() -> usize {
        SIZE
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as usize) < SIZE
            && (position.y as usize) < SIZE
    }

    /// Reads a cell. Out-of-range coordinates yield 0.
    pub fn get(&self, layer: Layer, position: Position) -> i16 {
        if !self.contains(position) {
            return 0;
        }
        self.cells[layer as usize][position.x as usize][position.y as usize]
    }

    /// Writes a cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, layer: Layer, position: Position, value: i16) {
        if !self.contains(position) {
            return;
        }
        self.cells[layer as usize][position.x as usize][position.y as usize] = value;
    }

    /// Resets every cell of a layer to `fill`.
    pub fn clear_layer(&mut self, layer: Layer, fill: i16) {
        for column in self.cells[layer as usize].iter_mut() {
            column.fill(fill);
        }
    }

    /// True when the terrain is passable and no obstacle sits on the cell.
    pub fn is_open(&self, position: Position) -> bool {
        self.contains(position)
            && self.get(Layer::Terrain, position) > 0
            && self.get(Layer::Obstacle, position) == 0
    }

    /// Roster index occupying the cell, if any.
    pub fn occupant(&self, position: Position) -> Option<usize> {
        let value = self.get(Layer::Occupancy, position);
        (self.contains(position) && value >= 0).then_some(value as usize)
    }

    /// Loads the two static layers from a raw field payload: ground then
    /// obstacle, each 64×64 little-endian `i16` in row-major order. Any
    /// payload with the wrong byte length falls back to the all-passable
    /// default field rather than failing.
    pub fn from_field_payload(payload: &[u8]) -> Self {
        const LAYER_BYTES: usize = SIZE * SIZE * 2;
        if payload.len() != 2 * LAYER_BYTES {
            return Self::all_passable();
        }

        let mut grid = Self::new();
        for (index, chunk) in payload.chunks_exact(2).enumerate() {
            let value = i16::from_le_bytes([chunk[0], chunk[1]]);
            let cell = index % (SIZE * SIZE);
            let layer = if index < SIZE * SIZE {
                Layer::Terrain
            } else {
                Layer::Obstacle
            };
            let position = Position::new((cell % SIZE) as i32, (cell / SIZE) as i32);
            grid.set(layer, position, value);
        }
        grid
    }
}

impl Default for BattlefieldGrid {
    fn default() -> Self {
        Self::new()
    }
}
