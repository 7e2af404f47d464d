//! Errors returned by every engine operation.
//!
//! All of these are local validation failures: they are detected before any
//! state is mutated, so a rejected action leaves the board, the graph and the
//! players exactly as they were.

use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building a game or applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Position ({x}, {y}) is outside the board")]
    InvalidPosition { x: i64, y: i64 },

    #[error("Malformed coordinates: expected 2 values, got {len}")]
    MalformedPosition { len: usize },

    #[error("Cell ({x}, {y}) is already occupied")]
    CellOccupied { x: u32, y: u32 },

    #[error("Movement is blocked by a barrier")]
    MoveBlocked,

    #[error("Offset ({dx}, {dy}) is not a legal move")]
    InvalidDistance { dx: i32, dy: i32 },

    #[error("Edge weight {0} is negative")]
    InvalidWeight(i64),

    #[error("Board size {0} must be odd and between 3 and 99")]
    InvalidBoardSize(u32),

    #[error("Invalid barrier edges: {0}")]
    InvalidBarrierEdges(String),

    #[error("Player {player} has no barriers left")]
    BarrierLimitExceeded { player: PlayerId },

    #[error("Barrier would leave player {player} without a path to their goal")]
    BlockedPath { player: PlayerId },

    #[error("Unsupported number of players: {0} (expected 2 or 4)")]
    InvalidPlayerCount(usize),

    #[error("Unknown value: {0}")]
    UnknownEnumerationValue(String),

    #[error("No player with id {0} in this game")]
    UnknownPlayerIdentity(PlayerId),

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Game is over")]
    GameOver,

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl GameError {
    pub(crate) fn barrier_edges(reason: impl Into<String>) -> Self {
        GameError::InvalidBarrierEdges(reason.into())
    }
}
