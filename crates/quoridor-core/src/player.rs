//! Players, their colors and goals, and move/barrier validation.
//!
//! This module contains:
//! - `PlayerColor`, which fixes a player's start cell and goal side
//! - `Goal`, the row or column a pawn must reach
//! - `Pawn`, the lightweight (id, position, goal) view the connectivity check runs on
//! - `Player` with step, jump and side-step validation and barrier placement

use crate::board::{Barrier, Board};
use crate::error::GameError;
use crate::position::{Direction, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Player identifier (0-3 for a 4-player game), also the index in the turn order
pub type PlayerId = u8;

/// The side of the board a pawn has to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    /// Any cell with this `y`
    Row(u32),
    /// Any cell with this `x`
    Column(u32),
}

impl Goal {
    pub fn is_reached_at(&self, pos: Position) -> bool {
        match *self {
            Goal::Row(y) => pos.y == y,
            Goal::Column(x) => pos.x == x,
        }
    }
}

/// Player color. Each color owns one side of the board as its start and the
/// opposite side as its goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    /// Starts on row 0, heads south
    Yellow,
    /// Starts on the last row, heads north
    Blue,
    /// Starts on column 0, heads east
    Red,
    /// Starts on the last column, heads west
    Green,
}

impl PlayerColor {
    /// Seating order; two-player games use the first two
    pub const ALL: [PlayerColor; 4] = [
        PlayerColor::Yellow,
        PlayerColor::Blue,
        PlayerColor::Red,
        PlayerColor::Green,
    ];

    /// Get color for a player index
    pub fn for_player(id: PlayerId) -> Self {
        Self::ALL[usize::from(id) % Self::ALL.len()]
    }

    /// Starting cell on a board of the given size
    pub fn start(&self, size: u32) -> Position {
        let last = size - 1;
        let mid = last / 2;
        match self {
            PlayerColor::Yellow => Position::new(mid, 0),
            PlayerColor::Blue => Position::new(mid, last),
            PlayerColor::Red => Position::new(0, mid),
            PlayerColor::Green => Position::new(last, mid),
        }
    }

    /// The side opposite the start
    pub fn goal(&self, size: u32) -> Goal {
        let last = size - 1;
        match self {
            PlayerColor::Yellow => Goal::Row(last),
            PlayerColor::Blue => Goal::Row(0),
            PlayerColor::Red => Goal::Column(last),
            PlayerColor::Green => Goal::Column(0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlayerColor::Yellow => "Yellow",
            PlayerColor::Blue => "Blue",
            PlayerColor::Red => "Red",
            PlayerColor::Green => "Green",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerColor {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownEnumerationValue(s.to_string()))
    }
}

/// What the connectivity check needs to know about a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    pub id: PlayerId,
    pub position: Position,
    pub goal: Goal,
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID, also the seat in the turn order
    pub id: PlayerId,
    /// Display name
    pub name: String,
    pub color: PlayerColor,
    /// Current cell
    pub position: Position,
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId, name: String, color: PlayerColor, position: Position) -> Self {
        Self {
            id,
            name,
            color,
            position,
        }
    }

    /// Create the player for a seat at its canonical start, named after its color
    pub fn seated(id: PlayerId, size: u32) -> Self {
        let color = PlayerColor::for_player(id);
        Self::new(id, color.name().to_string(), color, color.start(size))
    }

    pub fn goal(&self, size: u32) -> Goal {
        self.color.goal(size)
    }

    pub fn pawn(&self, size: u32) -> Pawn {
        Pawn {
            id: self.id,
            position: self.position,
            goal: self.goal(size),
        }
    }

    pub fn has_reached_goal(&self, size: u32) -> bool {
        self.goal(size).is_reached_at(self.position)
    }

    pub fn barriers_remaining(&self, board: &Board) -> u32 {
        board.barriers_remaining(self.id)
    }

    /// Check a move by `(dx, dy)` and return the destination.
    ///
    /// Legal moves are a single orthogonal step, a straight jump over an
    /// adjacent pawn, or a diagonal side-step around an adjacent pawn that
    /// cannot be jumped straight over. `occupied` lists every pawn's cell;
    /// this player's own cell is ignored.
    pub fn is_move_valid(
        &self,
        dx: i32,
        dy: i32,
        board: &Board,
        occupied: &[Position],
    ) -> Result<Position, GameError> {
        let size = board.size();
        let from = self.position;
        let destination = from.offset(dx, dy, size)?;

        let is_occupied = |pos: Position| pos != from && occupied.contains(&pos);
        if is_occupied(destination) {
            return Err(GameError::CellOccupied {
                x: destination.x,
                y: destination.y,
            });
        }

        let graph = board.graph();
        let invalid = GameError::InvalidDistance { dx, dy };

        match (dx.abs(), dy.abs()) {
            // Single step
            (1, 0) | (0, 1) => {
                let dir = Direction::from_offset(dx, dy).ok_or(invalid)?;
                if graph.is_blocked(from, dir) {
                    return Err(GameError::MoveBlocked);
                }
                Ok(destination)
            }

            // Straight jump over an adjacent pawn
            (2, 0) | (0, 2) => {
                let dir = Direction::from_offset(dx / 2, dy / 2).ok_or(invalid.clone())?;
                let over = from.step(dir, size).ok_or(invalid.clone())?;
                if !is_occupied(over) {
                    return Err(invalid);
                }
                if graph.is_blocked(from, dir) || graph.is_blocked(over, dir) {
                    return Err(GameError::MoveBlocked);
                }
                Ok(destination)
            }

            // Side-step around a pawn that cannot be jumped
            (1, 1) => {
                let horizontal = Direction::from_offset(dx, 0).ok_or(invalid.clone())?;
                let vertical = Direction::from_offset(0, dy).ok_or(invalid.clone())?;
                let mut beside_pawn = false;

                for (toward, aside) in [(horizontal, vertical), (vertical, horizontal)] {
                    let Some(over) = from.step(toward, size) else {
                        continue;
                    };
                    if !is_occupied(over) {
                        continue;
                    }
                    beside_pawn = true;

                    let straight_jump_open = !graph.is_blocked(over, toward)
                        && over
                            .step(toward, size)
                            .is_some_and(|behind| !is_occupied(behind));

                    if !graph.is_blocked(from, toward)
                        && !straight_jump_open
                        && !graph.is_blocked(over, aside)
                    {
                        return Ok(destination);
                    }
                }

                if beside_pawn {
                    Err(GameError::MoveBlocked)
                } else {
                    Err(invalid)
                }
            }

            _ => Err(invalid),
        }
    }

    /// Validate and commit a move. On failure the position is unchanged.
    pub fn move_by(
        &mut self,
        dx: i32,
        dy: i32,
        board: &Board,
        occupied: &[Position],
    ) -> Result<Position, GameError> {
        let destination = self.is_move_valid(dx, dy, board, occupied)?;
        self.position = destination;
        Ok(destination)
    }

    /// Every cell this player could move to right now
    pub fn legal_moves(&self, board: &Board, occupied: &[Position]) -> Vec<Position> {
        const OFFSETS: [(i32, i32); 12] = [
            (0, -1),
            (1, 0),
            (0, 1),
            (-1, 0),
            (0, -2),
            (2, 0),
            (0, 2),
            (-2, 0),
            (-1, -1),
            (1, -1),
            (1, 1),
            (-1, 1),
        ];
        OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.is_move_valid(dx, dy, board, occupied).ok())
            .collect()
    }

    /// Place a barrier across the edges joining each pair of cells.
    ///
    /// Checks the allowance first, then geometry, then that no pawn in
    /// `pawns` is cut off from its goal. Returns the committed barrier.
    pub fn place_barrier(
        &self,
        first: [Position; 2],
        second: [Position; 2],
        board: &mut Board,
        pawns: &[Pawn],
    ) -> Result<Barrier, GameError> {
        board.ensure_barrier_available(self.id)?;
        let barrier = board.prepare_barrier(first, second, self.id)?;
        board.try_place_barrier(barrier, pawns)?;
        board
            .barriers()
            .last()
            .copied()
            .ok_or_else(|| GameError::barrier_edges("barrier was not recorded"))
    }
}
