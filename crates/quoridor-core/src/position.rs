//! Grid coordinates and the four movement directions.
//!
//! Positions address the cells of an N×N board with `x` growing east and
//! `y` growing south, so (0, 0) is the north-west corner. The adjacency list
//! of the board graph is indexed row-major: `index = y * N + x`.

use crate::edge::Edge;
use crate::error::GameError;
use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four orthogonal directions a pawn can move in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0
    North,
    /// Towards column N-1
    East,
    /// Towards row N-1
    South,
    /// Towards column 0
    West,
}

impl Direction {
    /// All directions, clockwise starting from North
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The (dx, dy) step for this direction
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The two directions perpendicular to this one
    pub const fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::North | Direction::South => [Direction::West, Direction::East],
            Direction::East | Direction::West => [Direction::North, Direction::South],
        }
    }

    /// Direction whose step is exactly `(dx, dy)`
    pub fn from_offset(dx: i32, dy: i32) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| dir.offset() == (dx, dy))
    }

    /// Direction of a single orthogonal step from `from` to `to`, if it is one
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        let dx = i64::from(to.x) - i64::from(from.x);
        let dy = i64::from(to.y) - i64::from(from.y);
        match (dx, dy) {
            (0, -1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, 1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "east" | "e" => Ok(Direction::East),
            "south" | "s" => Ok(Direction::South),
            "west" | "w" => Ok(Direction::West),
            _ => Err(GameError::UnknownEnumerationValue(s.to_string())),
        }
    }
}

/// A cell on the board.
///
/// Equality and hashing are value based. Positions are `Copy`, so a move
/// always produces a new value rather than mutating one shared by others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Column (increases going east)
    pub x: u32,
    /// Row (increases going south)
    pub y: u32,
}

impl Position {
    /// Create a position without bounds checking
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Create a position, checking it lies on a board of the given size
    pub fn try_new(x: i64, y: i64, size: u32) -> Result<Self, GameError> {
        let size = i64::from(size);
        if x < 0 || y < 0 || x >= size || y >= size {
            return Err(GameError::InvalidPosition { x, y });
        }
        Ok(Self::new(x as u32, y as u32))
    }

    /// Create a position from a coordinate array such as `[x, y]`
    pub fn try_from_slice(coords: &[i64], size: u32) -> Result<Self, GameError> {
        match coords {
            [x, y] => Self::try_new(*x, *y, size),
            _ => Err(GameError::MalformedPosition { len: coords.len() }),
        }
    }

    /// The position `(dx, dy)` away from this one, if it is still on the board
    pub fn offset(self, dx: i32, dy: i32, size: u32) -> Result<Position, GameError> {
        Self::try_new(
            i64::from(self.x) + i64::from(dx),
            i64::from(self.y) + i64::from(dy),
            size,
        )
    }

    /// The neighbouring cell in `direction`, or `None` past the board edge
    pub fn step(self, direction: Direction, size: u32) -> Option<Position> {
        let (dx, dy) = direction.offset();
        self.offset(dx, dy, size).ok()
    }

    /// Row-major index into the adjacency list
    pub const fn index(self, size: u32) -> usize {
        self.y as usize * size as usize + self.x as usize
    }

    /// Inverse of [`Position::index`]
    pub const fn from_index(index: usize, size: u32) -> Self {
        let size = size as usize;
        Self::new((index % size) as u32, (index / size) as u32)
    }

    /// Whether this position lies on a board of the given size
    pub const fn is_within(self, size: u32) -> bool {
        self.x < size && self.y < size
    }

    /// Passable edges leaving this position, keyed by direction
    pub fn neighbour_edges<'a>(
        self,
        graph: &'a Graph,
    ) -> impl Iterator<Item = (Direction, &'a Edge)> + 'a {
        graph
            .edges_from(self)
            .iter()
            .filter(|edge| edge.is_passable())
            .filter_map(|edge| edge.direction().map(|dir| (dir, edge)))
    }

    /// Cells reachable in one step from this position, keyed by direction
    pub fn neighbour_positions<'a>(
        self,
        graph: &'a Graph,
    ) -> impl Iterator<Item = (Direction, Position)> + 'a {
        self.neighbour_edges(graph)
            .map(|(dir, edge)| (dir, edge.target))
    }

    /// Whether `other` differs from this position by exactly `(dx, dy)` in
    /// absolute value on each axis
    pub fn is_at_distance(self, other: Position, dx: u32, dy: u32) -> bool {
        self.x.abs_diff(other.x) == dx && self.y.abs_diff(other.y) == dy
    }

    /// Like [`Position::is_at_distance`] but reports the actual offset on failure
    pub fn check_distance(self, other: Position, dx: u32, dy: u32) -> Result<(), GameError> {
        if self.is_at_distance(other, dx, dy) {
            Ok(())
        } else {
            Err(GameError::InvalidDistance {
                dx: other.x as i32 - self.x as i32,
                dy: other.y as i32 - self.y as i32,
            })
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
