//! Quoridor - a rule engine for the Quoridor board game
//!
//! This crate provides the core game logic, including:
//! - A grid coordinate system and the weighted graph of cell adjacencies
//! - Board representation with barriers and their placement rules
//! - Player state with step, jump and side-step move validation
//! - Game state machine with turn order, victory and snapshots
//!
//! # Architecture
//!
//! Every barrier placement is checked against the rule that each pawn must
//! keep a path to its goal. A barrier that would strand anyone is rolled
//! back and the board is left exactly as it was.
//!
//! The engine is platform-agnostic. It can be compiled to:
//! - Native Rust for command-line tools and servers
//! - WebAssembly for browser clients
//!
//! # Modules
//!
//! - [`position`]: Cell coordinates and directions
//! - [`edge`]: Weighted edges between neighbouring cells
//! - [`graph`]: The board graph and the reachability search
//! - [`board`]: Barriers and the board that owns them
//! - [`player`]: Players, colors, goals and move rules
//! - [`game`]: Game state machine

pub mod actions;
pub mod board;
pub mod edge;
pub mod error;
pub mod game;
pub mod graph;
pub mod player;
pub mod position;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use board::{Barrier, BarrierOrientation, Board, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use edge::{Edge, BLOCKED, DEFAULT_WEIGHT};
pub use error::GameError;
pub use game::{GameConfig, GamePhase, GameSnapshot, GameState, DEFAULT_BOARD_SIZE, TOTAL_BARRIERS};
pub use graph::Graph;
pub use player::{Goal, Pawn, Player, PlayerColor, PlayerId};
pub use position::{Direction, Position};
