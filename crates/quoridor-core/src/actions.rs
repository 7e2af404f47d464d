//! Game actions that players can take.
//!
//! This module defines the two possible actions in a turn and the events
//! that result from them.

use crate::board::Barrier;
use crate::player::PlayerId;
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// All possible actions a player can take on their turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Move the pawn by an offset: a step, a straight jump or a side-step
    Move { dx: i32, dy: i32 },
    /// Place a barrier across the edges joining each pair of cells
    PlaceBarrier {
        first: [Position; 2],
        second: [Position; 2],
    },
}

impl GameAction {
    /// Build a barrier action from cell pairs such as those returned by
    /// [`crate::Board::wall_positions`]
    pub fn barrier(pairs: [[Position; 2]; 2]) -> Self {
        let [first, second] = pairs;
        GameAction::PlaceBarrier { first, second }
    }
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A pawn moved
    PlayerMoved {
        player: PlayerId,
        from: Position,
        to: Position,
    },

    /// A barrier was committed
    BarrierPlaced { player: PlayerId, barrier: Barrier },

    /// Turn ended
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
        turn_count: u32,
    },

    /// A player reached their goal
    GameWon { player: PlayerId },
}
