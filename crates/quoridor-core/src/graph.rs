//! Edge-weighted graph of the board and the connectivity oracle.
//!
//! The graph is an adjacency list indexed by [`Position::index`]. It is built
//! once as a 4-neighbour lattice with uniform weight; afterwards its topology
//! never changes and barriers only toggle edge weights. The connectivity
//! check is what keeps every player from being walled in.

use crate::edge::Edge;
use crate::error::GameError;
use crate::player::{Goal, Pawn, PlayerId};
use crate::position::{Direction, Position};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Adjacency-list graph over every cell of an N×N board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Number of rows/columns
    size: u32,
    /// Outgoing edges of every cell, indexed row-major
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    /// Create a graph with `size * size` nodes and no edges
    pub fn new(size: u32) -> Result<Self, GameError> {
        if size == 0 {
            return Err(GameError::InvalidBoardSize(size));
        }
        let nodes = size as usize * size as usize;
        Ok(Self {
            size,
            adjacency: vec![Vec::new(); nodes],
        })
    }

    /// Create a fully connected lattice of the given size
    pub fn lattice(size: u32) -> Result<Self, GameError> {
        let mut graph = Self::new(size)?;
        graph.initialize();
        Ok(graph)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Raw adjacency list, one entry per cell
    pub fn adjacency(&self) -> &[Vec<Edge>] {
        &self.adjacency
    }

    /// Every directed edge in the graph, passable or not
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.adjacency.iter().flatten()
    }

    /// Insert an edge into the list of its source
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GameError> {
        for end in [edge.source, edge.target] {
            if !end.is_within(self.size) {
                return Err(GameError::InvalidPosition {
                    x: i64::from(end.x),
                    y: i64::from(end.y),
                });
            }
        }
        let index = edge.source.index(self.size);
        self.adjacency[index].push(edge);
        Ok(())
    }

    /// Rebuild the lattice: every cell is joined to its north, south, west
    /// and east neighbours with the default weight.
    pub fn initialize(&mut self) {
        for list in &mut self.adjacency {
            list.clear();
        }

        let order = [
            Direction::North,
            Direction::South,
            Direction::West,
            Direction::East,
        ];
        for y in 0..self.size {
            for x in 0..self.size {
                let source = Position::new(x, y);
                for dir in order {
                    if let Some(target) = source.step(dir, self.size) {
                        self.adjacency[source.index(self.size)].push(Edge::open(source, target));
                    }
                }
            }
        }
    }

    /// Outgoing edges of `pos`, empty if it is off the board
    pub fn edges_from(&self, pos: Position) -> &[Edge] {
        if !pos.is_within(self.size) {
            return &[];
        }
        &self.adjacency[pos.index(self.size)]
    }

    /// The edge leaving `pos` in `direction`
    pub fn edge(&self, pos: Position, direction: Direction) -> Option<&Edge> {
        self.edges_from(pos)
            .iter()
            .find(|edge| edge.direction() == Some(direction))
    }

    /// The edge from `source` to `target`
    pub fn edge_between(&self, source: Position, target: Position) -> Option<&Edge> {
        self.edges_from(source)
            .iter()
            .find(|edge| edge.target == target)
    }

    /// Whether a pawn can step from `source` straight to `target`
    pub fn is_passable(&self, source: Position, target: Position) -> bool {
        self.edge_between(source, target)
            .is_some_and(Edge::is_passable)
    }

    /// Whether the step from `pos` in `direction` is blocked, counting the
    /// board border as a barrier
    pub fn is_blocked(&self, pos: Position, direction: Direction) -> bool {
        !self.edge(pos, direction).is_some_and(Edge::is_passable)
    }

    fn edge_mut(&mut self, source: Position, target: Position) -> Option<&mut Edge> {
        if !source.is_within(self.size) {
            return None;
        }
        let index = source.index(self.size);
        self.adjacency[index]
            .iter_mut()
            .find(|edge| edge.target == target)
    }

    /// Set the weight of the edge `a -> b` and of its twin `b -> a`.
    ///
    /// Both edges are looked up before either is written, so a missing twin
    /// leaves the graph untouched.
    pub(crate) fn set_bidirectional_weight(
        &mut self,
        a: Position,
        b: Position,
        weight: u32,
    ) -> Result<(), GameError> {
        if self.edge_between(a, b).is_none() || self.edge_between(b, a).is_none() {
            return Err(GameError::barrier_edges(format!("no edge between {a} and {b}")));
        }
        for (source, target) in [(a, b), (b, a)] {
            if let Some(edge) = self.edge_mut(source, target) {
                edge.weight = weight;
            }
        }
        Ok(())
    }

    /// Iterative depth-first walk over passable edges from `start`.
    ///
    /// Stops as soon as `found` accepts a cell and reports whether it did,
    /// along with every cell visited so far.
    fn walk(&self, start: Position, mut found: impl FnMut(Position) -> bool) -> (Vec<bool>, bool) {
        let mut visited = vec![false; self.node_count()];
        if !start.is_within(self.size) {
            return (visited, false);
        }

        let mut stack = vec![start];
        visited[start.index(self.size)] = true;

        while let Some(current) = stack.pop() {
            if found(current) {
                return (visited, true);
            }
            for (_, next) in current.neighbour_positions(self) {
                let index = next.index(self.size);
                if !visited[index] {
                    visited[index] = true;
                    stack.push(next);
                }
            }
        }

        (visited, false)
    }

    /// Mark every cell reachable from `start` over passable edges.
    ///
    /// Each cell and edge is visited once.
    pub fn reachable_from(&self, start: Position) -> Vec<bool> {
        self.walk(start, |_| false).0
    }

    /// Depth-first search from `start`, stopping as soon as a cell satisfying
    /// `goal` is found.
    pub fn dfs(&self, start: Position, goal: Goal) -> bool {
        self.walk(start, |pos| goal.is_reached_at(pos)).1
    }

    /// Succeeds only if every pawn can still reach its goal.
    ///
    /// Fails with [`GameError::BlockedPath`] naming the first stranded player.
    pub fn check_path(&self, pawns: &[Pawn]) -> Result<(), GameError> {
        for pawn in pawns {
            let reachable = self.dfs(pawn.position, pawn.goal);
            trace!(player = pawn.id, reachable, "connectivity check");
            if !reachable {
                return Err(GameError::BlockedPath { player: pawn.id });
            }
        }
        Ok(())
    }

    /// Whether each pawn can reach its goal, in pawn order
    pub fn path_report(&self, pawns: &[Pawn]) -> Vec<(PlayerId, bool)> {
        pawns
            .iter()
            .map(|pawn| (pawn.id, self.dfs(pawn.position, pawn.goal)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::BLOCKED;

    fn block(graph: &mut Graph, a: Position, b: Position) {
        graph.set_bidirectional_weight(a, b, BLOCKED).unwrap();
    }

    #[test]
    fn test_lattice_edge_counts() {
        let graph = Graph::lattice(9).unwrap();
        assert_eq!(graph.node_count(), 81);

        // Corners have 2 neighbours, borders 3, interior 4
        assert_eq!(graph.edges_from(Position::new(0, 0)).len(), 2);
        assert_eq!(graph.edges_from(Position::new(4, 0)).len(), 3);
        assert_eq!(graph.edges_from(Position::new(4, 4)).len(), 4);

        // 2 * N * (N - 1) undirected edges, stored in both directions
        assert_eq!(graph.edges().count(), 2 * 2 * 9 * 8);
        assert!(graph.edges().all(Edge::is_passable));
    }

    #[test]
    fn test_adjacency_is_row_major() {
        let graph = Graph::lattice(3).unwrap();
        let adjacency = graph.adjacency();
        assert_eq!(adjacency.len(), 9);
        for (index, edges) in adjacency.iter().enumerate() {
            let source = Position::from_index(index, 3);
            assert!(edges.iter().all(|edge| edge.source == source));
        }
        // North, south, west, east
        let targets: Vec<Position> = adjacency[4].iter().map(|edge| edge.target).collect();
        assert_eq!(
            targets,
            vec![
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(0, 1),
                Position::new(2, 1),
            ]
        );
    }

    #[test]
    fn test_every_edge_has_a_twin() {
        let graph = Graph::lattice(5).unwrap();
        for edge in graph.edges() {
            let twin = graph.edge_between(edge.target, edge.source).unwrap();
            assert_eq!(twin.weight, edge.weight);
        }
    }

    #[test]
    fn test_initial_lattice_is_connected() {
        for size in [3, 5, 7, 9, 11] {
            let graph = Graph::lattice(size).unwrap();
            for index in 0..graph.node_count() {
                let start = Position::from_index(index, size);
                assert!(graph.reachable_from(start).iter().all(|&seen| seen));
            }
        }
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(Graph::new(0), Err(GameError::InvalidBoardSize(0)));
    }

    #[test]
    fn test_add_edge_out_of_bounds() {
        let mut graph = Graph::new(3).unwrap();
        let edge = Edge::open(Position::new(2, 2), Position::new(3, 2));
        assert!(matches!(
            graph.add_edge(edge),
            Err(GameError::InvalidPosition { x: 3, y: 2 })
        ));
        graph
            .add_edge(Edge::open(Position::new(0, 0), Position::new(1, 0)))
            .unwrap();
        assert_eq!(graph.edges().count(), 1);
    }

    #[test]
    fn test_dfs_respects_blocked_edges() {
        let mut graph = Graph::lattice(3).unwrap();
        let goal = Goal::Row(2);
        let start = Position::new(1, 0);
        assert!(graph.dfs(start, goal));

        // Wall off row 2 entirely
        for x in 0..3 {
            block(&mut graph, Position::new(x, 1), Position::new(x, 2));
        }
        assert!(!graph.dfs(start, goal));
        assert!(graph.dfs(start, Goal::Row(0)));
    }

    #[test]
    fn test_check_path_names_stranded_player() {
        let mut graph = Graph::lattice(3).unwrap();
        // Seal the corner cell (0, 0)
        block(&mut graph, Position::new(0, 0), Position::new(1, 0));
        block(&mut graph, Position::new(0, 0), Position::new(0, 1));

        let free = Pawn {
            id: 0,
            position: Position::new(2, 0),
            goal: Goal::Row(2),
        };
        let trapped = Pawn {
            id: 1,
            position: Position::new(0, 0),
            goal: Goal::Row(2),
        };
        assert_eq!(graph.check_path(&[free]), Ok(()));
        assert_eq!(
            graph.check_path(&[free, trapped]),
            Err(GameError::BlockedPath { player: 1 })
        );
        assert_eq!(graph.path_report(&[free, trapped]), vec![(0, true), (1, false)]);
    }

    #[test]
    fn test_goal_already_reached() {
        let mut graph = Graph::lattice(3).unwrap();
        let pos = Position::new(0, 2);
        block(&mut graph, pos, Position::new(0, 1));
        block(&mut graph, pos, Position::new(1, 2));
        assert!(graph.dfs(pos, Goal::Row(2)));
        assert!(!graph.dfs(pos, Goal::Column(2)));
    }
}
