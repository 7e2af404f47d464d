//! Weighted connections between neighbouring cells.
//!
//! A weight of [`BLOCKED`] means the edge cannot be crossed; any positive
//! weight is the traversal cost. Every edge in the board graph has a reverse
//! twin, and barriers always update both.

use crate::board::Board;
use crate::error::GameError;
use crate::graph::Graph;
use crate::position::{Direction, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight of an edge crossed by a barrier
pub const BLOCKED: u32 = 0;

/// Weight of a freshly built edge
pub const DEFAULT_WEIGHT: u32 = 1;

/// A directed connection from `source` to `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: Position,
    pub target: Position,
    pub weight: u32,
}

impl Edge {
    /// Create an edge, rejecting negative weights
    pub fn new(source: Position, target: Position, weight: i64) -> Result<Self, GameError> {
        let weight = checked_weight(weight)?;
        Ok(Self {
            source,
            target,
            weight,
        })
    }

    /// Create an edge with the default passable weight
    pub const fn open(source: Position, target: Position) -> Self {
        Self {
            source,
            target,
            weight: DEFAULT_WEIGHT,
        }
    }

    pub const fn is_passable(&self) -> bool {
        self.weight != BLOCKED
    }

    /// Direction of travel along this edge, `None` if the ends are not neighbours
    pub fn direction(&self) -> Option<Direction> {
        Direction::between(self.source, self.target)
    }

    /// The twin edge pointing the other way, carrying the same weight
    pub const fn reversed(&self) -> Edge {
        Edge {
            source: self.target,
            target: self.source,
            weight: self.weight,
        }
    }

    /// Whether this edge joins `a` and `b`, in either orientation
    pub fn connects(&self, a: Position, b: Position) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    /// The same edge oriented so that its source has the smaller adjacency index
    pub fn canonical(self, size: u32) -> Edge {
        if self.source.index(size) <= self.target.index(size) {
            self
        } else {
            self.reversed()
        }
    }

    /// Set the weight of this edge and of its reverse twin in `graph`
    pub fn set_bidirectional_weight(&mut self, weight: i64, graph: &mut Graph) -> Result<(), GameError> {
        let weight = checked_weight(weight)?;
        graph.set_bidirectional_weight(self.source, self.target, weight)?;
        self.weight = weight;
        Ok(())
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} (weight {})", self.source, self.target, self.weight)
    }
}

fn checked_weight(weight: i64) -> Result<u32, GameError> {
    u32::try_from(weight).map_err(|_| GameError::InvalidWeight(weight))
}

/// Turn a user-supplied pair of cells into the board edge joining them.
///
/// Both cells must be on the board and orthogonally adjacent. The returned
/// edge is in canonical orientation (smaller adjacency index first) and
/// carries the live weight from the board graph.
pub fn normalize_edge_positions(positions: [Position; 2], board: &Board) -> Result<Edge, GameError> {
    let size = board.size();
    for pos in positions {
        if !pos.is_within(size) {
            return Err(GameError::barrier_edges(format!("{pos} is outside the board")));
        }
    }

    let [a, b] = positions;
    if Direction::between(a, b).is_none() {
        return Err(GameError::barrier_edges(format!("{a} and {b} are not adjacent")));
    }

    let (low, high) = if a.index(size) < b.index(size) { (a, b) } else { (b, a) };
    board
        .graph()
        .edge_between(low, high)
        .copied()
        .ok_or_else(|| GameError::barrier_edges(format!("no edge between {low} and {high}")))
}
