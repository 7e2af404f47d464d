//! Board representation: the weighted graph plus the committed barriers.
//!
//! This module contains:
//! - Barrier orientation and the two-edge `Barrier` record
//! - The `Board`, which owns the graph weights and the barrier list
//! - Barrier validation (geometry, overlap, crossing, per-player limit)
//! - The transactional place-or-roll-back step guarded by the connectivity check

use crate::edge::{normalize_edge_positions, Edge, BLOCKED};
use crate::error::GameError;
use crate::graph::Graph;
use crate::player::{Pawn, PlayerId};
use crate::position::{Direction, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Smallest playable board
pub const MIN_BOARD_SIZE: u32 = 3;

/// Largest board the engine will build
pub const MAX_BOARD_SIZE: u32 = 99;

/// Odd and within [`MIN_BOARD_SIZE`]..=[`MAX_BOARD_SIZE`]
pub fn is_valid_board_size(size: u32) -> bool {
    (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) && size % 2 == 1
}

/// Which way a barrier runs across the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarrierOrientation {
    /// Runs east-west, blocking north-south movement
    Horizontal,
    /// Runs north-south, blocking east-west movement
    Vertical,
}

impl BarrierOrientation {
    pub const fn other(self) -> Self {
        match self {
            BarrierOrientation::Horizontal => BarrierOrientation::Vertical,
            BarrierOrientation::Vertical => BarrierOrientation::Horizontal,
        }
    }

    /// Orientation of a barrier that blocks travel in `direction`
    pub const fn blocking(direction: Direction) -> Self {
        match direction {
            Direction::North | Direction::South => BarrierOrientation::Horizontal,
            Direction::East | Direction::West => BarrierOrientation::Vertical,
        }
    }
}

impl fmt::Display for BarrierOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarrierOrientation::Horizontal => f.write_str("horizontal"),
            BarrierOrientation::Vertical => f.write_str("vertical"),
        }
    }
}

impl FromStr for BarrierOrientation {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(BarrierOrientation::Horizontal),
            "vertical" | "v" => Ok(BarrierOrientation::Vertical),
            _ => Err(GameError::UnknownEnumerationValue(s.to_string())),
        }
    }
}

/// A wall segment two cells long, made of two parallel side-by-side edges.
///
/// Edges are stored in canonical orientation with the first edge nearest the
/// north-west corner. `placed_by` is the id of the owning player, not the
/// player itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Barrier {
    pub edges: [Edge; 2],
    pub placed_by: PlayerId,
}

impl Barrier {
    /// Build a barrier from two canonical edges.
    ///
    /// The edges must both be passable and must sit side by side so that
    /// together they form one straight wall. The graph is not touched.
    pub fn new(first: Edge, second: Edge, placed_by: PlayerId) -> Result<Self, GameError> {
        let orientation = Self::edge_orientation(&first)?;
        if Self::edge_orientation(&second)? != orientation {
            return Err(GameError::barrier_edges("edges are not parallel"));
        }

        let side_by_side = match orientation {
            BarrierOrientation::Horizontal => first.source.is_at_distance(second.source, 1, 0),
            BarrierOrientation::Vertical => first.source.is_at_distance(second.source, 0, 1),
        };
        if !side_by_side {
            return Err(GameError::barrier_edges("edges are not adjacent"));
        }

        if !first.is_passable() || !second.is_passable() {
            return Err(GameError::barrier_edges("overlaps an existing barrier"));
        }

        let edges = if (first.source.y, first.source.x) <= (second.source.y, second.source.x) {
            [first, second]
        } else {
            [second, first]
        };
        Ok(Self { edges, placed_by })
    }

    /// Orientation of a wall that would block this canonical edge
    fn edge_orientation(edge: &Edge) -> Result<BarrierOrientation, GameError> {
        match edge.direction() {
            Some(dir @ (Direction::South | Direction::East)) => Ok(BarrierOrientation::blocking(dir)),
            _ => Err(GameError::barrier_edges(format!("{edge} is not in canonical form"))),
        }
    }

    pub fn orientation(&self) -> BarrierOrientation {
        // Validated at construction, so the first edge is always South or East
        match self.edges[0].direction() {
            Some(Direction::East) => BarrierOrientation::Vertical,
            _ => BarrierOrientation::Horizontal,
        }
    }

    /// North-west cell of the 2×2 block this barrier runs through
    pub fn anchor(&self) -> Position {
        self.edges[0].source
    }

    /// The two cell pairs whose connecting edges this barrier blocks
    pub fn positions(&self) -> [[Position; 2]; 2] {
        self.edges.map(|edge| [edge.source, edge.target])
    }

    /// Whether this barrier separates `a` from `b`
    pub fn blocks(&self, a: Position, b: Position) -> bool {
        self.edges.iter().any(|edge| edge.connects(a, b))
    }
}

/// The game board: size, graph weights and committed barriers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: u32,
    /// Maximum barriers any single player may place
    barrier_limit: u32,
    graph: Graph,
    barriers: Vec<Barrier>,
}

impl Board {
    /// Create an empty board of odd size (3 to 99) with a fully connected graph
    pub fn new(size: u32, barrier_limit: u32) -> Result<Self, GameError> {
        if !is_valid_board_size(size) {
            return Err(GameError::InvalidBoardSize(size));
        }
        Ok(Self {
            size,
            barrier_limit,
            graph: Graph::lattice(size)?,
            barriers: Vec::new(),
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn barrier_limit(&self) -> u32 {
        self.barrier_limit
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn barriers(&self) -> &[Barrier] {
        &self.barriers
    }

    pub fn barrier_count(&self) -> usize {
        self.barriers.len()
    }

    /// Number of barriers committed by one player
    pub fn barriers_placed_by(&self, player: PlayerId) -> u32 {
        self.barriers
            .iter()
            .filter(|barrier| barrier.placed_by == player)
            .count() as u32
    }

    pub fn barriers_remaining(&self, player: PlayerId) -> u32 {
        self.barrier_limit
            .saturating_sub(self.barriers_placed_by(player))
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.is_within(self.size)
    }

    /// Fails with [`GameError::BarrierLimitExceeded`] once `player` has used
    /// up their allowance
    pub fn ensure_barrier_available(&self, player: PlayerId) -> Result<(), GameError> {
        if self.barriers_remaining(player) == 0 {
            return Err(GameError::BarrierLimitExceeded { player });
        }
        Ok(())
    }

    /// Whether a committed barrier with this anchor and orientation exists
    pub fn has_barrier_at(&self, anchor: Position, orientation: BarrierOrientation) -> bool {
        self.barriers
            .iter()
            .any(|barrier| barrier.anchor() == anchor && barrier.orientation() == orientation)
    }

    /// The two cell pairs a barrier anchored at `anchor` would separate.
    ///
    /// The anchor is the north-west cell of the 2×2 block the wall runs
    /// through, so it can be at most `size - 2` on either axis.
    pub fn wall_positions(
        &self,
        anchor: Position,
        orientation: BarrierOrientation,
    ) -> Result<[[Position; 2]; 2], GameError> {
        let last = self.size - 1;
        if anchor.x >= last || anchor.y >= last {
            return Err(GameError::barrier_edges(format!(
                "no wall slot anchored at {anchor}"
            )));
        }
        let Position { x, y } = anchor;
        Ok(match orientation {
            BarrierOrientation::Horizontal => [
                [Position::new(x, y), Position::new(x, y + 1)],
                [Position::new(x + 1, y), Position::new(x + 1, y + 1)],
            ],
            BarrierOrientation::Vertical => [
                [Position::new(x, y), Position::new(x + 1, y)],
                [Position::new(x, y + 1), Position::new(x + 1, y + 1)],
            ],
        })
    }

    /// Normalise two user-supplied cell pairs into a barrier and check it
    /// against the committed ones. Does not touch the graph.
    pub fn prepare_barrier(
        &self,
        first: [Position; 2],
        second: [Position; 2],
        placed_by: PlayerId,
    ) -> Result<Barrier, GameError> {
        let first = normalize_edge_positions(first, self)?;
        let second = normalize_edge_positions(second, self)?;
        let barrier = Barrier::new(first, second, placed_by)?;
        self.check_crossing(&barrier)?;
        Ok(barrier)
    }

    fn check_crossing(&self, barrier: &Barrier) -> Result<(), GameError> {
        if self.has_barrier_at(barrier.anchor(), barrier.orientation().other()) {
            return Err(GameError::barrier_edges("crosses an existing barrier"));
        }
        Ok(())
    }

    /// Live weights of the barrier's edges, failing if either edge is gone
    /// or already blocked
    fn live_weights(&self, barrier: &Barrier) -> Result<[u32; 2], GameError> {
        let mut weights = [BLOCKED; 2];
        for (slot, edge) in weights.iter_mut().zip(&barrier.edges) {
            let live = self
                .graph
                .edge_between(edge.source, edge.target)
                .ok_or_else(|| GameError::barrier_edges(format!("no edge {edge}")))?;
            if !live.is_passable() {
                return Err(GameError::barrier_edges("overlaps an existing barrier"));
            }
            *slot = live.weight;
        }
        Ok(weights)
    }

    fn write_weights(&mut self, barrier: &Barrier, weights: [u32; 2]) -> Result<(), GameError> {
        for (edge, weight) in barrier.edges.iter().zip(weights) {
            self.graph
                .set_bidirectional_weight(edge.source, edge.target, weight)?;
        }
        Ok(())
    }

    /// Commit a barrier if every pawn keeps a path to its goal.
    ///
    /// Both edges are blocked tentatively, the connectivity check runs, and
    /// then either the barrier is appended or the original weights are
    /// restored. Either both weight changes and the append happen, or none.
    pub fn try_place_barrier(&mut self, barrier: Barrier, pawns: &[Pawn]) -> Result<(), GameError> {
        self.ensure_barrier_available(barrier.placed_by)?;
        self.check_crossing(&barrier)?;
        let saved = self.live_weights(&barrier)?;

        let outcome = self
            .write_weights(&barrier, [BLOCKED; 2])
            .and_then(|()| self.graph.check_path(pawns));

        if let Err(err) = outcome {
            // Restoring edges that were just found in the graph cannot fail
            self.write_weights(&barrier, saved)?;
            debug!(player = barrier.placed_by, anchor = %barrier.anchor(), error = %err, "barrier rejected");
            return Err(err);
        }

        let mut committed = barrier;
        for edge in &mut committed.edges {
            edge.weight = BLOCKED;
        }
        info!(
            player = committed.placed_by,
            anchor = %committed.anchor(),
            orientation = %committed.orientation(),
            "barrier placed"
        );
        self.barriers.push(committed);
        Ok(())
    }
}
