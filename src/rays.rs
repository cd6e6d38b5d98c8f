//! Board geometry that does not depend on piece placement: rays for the
//! sliding pieces and jump targets for knights and kings, computed once.

use itertools::iproduct;
use once_cell::sync::Lazy;

use crate::types::{Position, BOARD_SIZE};

/// The eight compass directions as `(row_delta, col_delta)`. Row 0 is rank 8,
/// so north is a negative row delta.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::NorthEast => (-1, 1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (1, -1),
        }
    }

    fn index(&self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
            Direction::NorthEast => 4,
            Direction::NorthWest => 5,
            Direction::SouthEast => 6,
            Direction::SouthWest => 7,
        }
    }
}

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn square_index(pos: &Position) -> usize {
    (pos.row * BOARD_SIZE + pos.col) as usize
}

fn all_squares() -> impl Iterator<Item = Position> {
    iproduct!(0..BOARD_SIZE, 0..BOARD_SIZE).map(|(row, col)| Position { row, col })
}

/// Squares reachable in each direction from one square, nearest first
pub struct RaysFromPosition {
    rays: [Vec<Position>; 8],
}

impl RaysFromPosition {
    pub fn new_from_position(pos: Position) -> Self {
        let rays = Direction::ALL.map(|direction| {
            let (row_delta, col_delta) = direction.delta();
            std::iter::successors(pos.offset(row_delta, col_delta), |p| {
                p.offset(row_delta, col_delta)
            })
            .collect::<Vec<_>>()
        });
        Self { rays }
    }

    pub fn ray(&self, direction: Direction) -> &[Position] {
        &self.rays[direction.index()]
    }
}

pub struct RaysForBoard {
    positions: Vec<RaysFromPosition>,
}

impl RaysForBoard {
    pub fn new() -> Self {
        RaysForBoard {
            positions: all_squares().map(RaysFromPosition::new_from_position).collect(),
        }
    }

    pub fn ray(&self, from: Position, direction: Direction) -> &[Position] {
        self.positions[square_index(&from)].ray(direction)
    }
}

impl Default for RaysForBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// On-board targets of a fixed offset table, per square
pub struct JumpTable {
    targets: Vec<Vec<Position>>,
}

impl JumpTable {
    pub fn new(offsets: &[(i8, i8)]) -> Self {
        let targets = all_squares()
            .map(|pos| {
                offsets
                    .iter()
                    .filter_map(|&(row_delta, col_delta)| pos.offset(row_delta, col_delta))
                    .collect::<Vec<_>>()
            })
            .collect();
        JumpTable { targets }
    }

    pub fn targets(&self, from: Position) -> &[Position] {
        &self.targets[square_index(&from)]
    }
}

pub static RAYS: Lazy<RaysForBoard> = Lazy::new(RaysForBoard::new);
pub static KNIGHT_JUMPS: Lazy<JumpTable> = Lazy::new(|| JumpTable::new(&KNIGHT_OFFSETS));
pub static KING_STEPS: Lazy<JumpTable> = Lazy::new(|| JumpTable::new(&KING_OFFSETS));
