//! Core game state machine.
//!
//! This module contains the main `GameState` struct, its configuration, and
//! the snapshot used to save and resume a session.

use crate::actions::{GameAction, GameEvent};
use crate::board::{BarrierOrientation, Board};
use crate::error::GameError;
use crate::player::{Pawn, Player, PlayerId};
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Standard board size
pub const DEFAULT_BOARD_SIZE: u32 = 9;

/// Barriers in the box, shared evenly between the players
pub const TOTAL_BARRIERS: u32 = 20;

/// Session parameters fixed at game creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// 2 or 4
    pub player_count: usize,
    /// Odd, between 3 and 99
    pub board_size: u32,
    /// Barriers each player may place
    pub barrier_limit: u32,
}

impl GameConfig {
    /// Configuration with the barrier pool split evenly between players
    pub fn new(player_count: usize, board_size: u32) -> Self {
        Self {
            player_count,
            board_size,
            barrier_limit: u32::try_from(player_count)
                .ok()
                .and_then(|count| TOTAL_BARRIERS.checked_div(count))
                .unwrap_or(0),
        }
    }

    pub fn with_barrier_limit(mut self, barrier_limit: u32) -> Self {
        self.barrier_limit = barrier_limit;
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.player_count != 2 && self.player_count != 4 {
            return Err(GameError::InvalidPlayerCount(self.player_count));
        }
        if !crate::board::is_valid_board_size(self.board_size) {
            return Err(GameError::InvalidBoardSize(self.board_size));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(2, DEFAULT_BOARD_SIZE)
    }
}

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Players take turns
    InProgress,
    /// Game is over
    Finished { winner: PlayerId },
}

/// Everything needed to rebuild a game. Graph weights are not stored; they
/// are recomputed from the barrier list on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub config: GameConfig,
    pub players: Vec<Player>,
    pub barriers: Vec<crate::board::Barrier>,
    pub turn_count: u32,
    pub phase: GamePhase,
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,
    /// The game board
    board: Board,
    /// All players, in turn order
    players: Vec<Player>,
    /// Successful actions so far
    turn_count: u32,
    /// Current game phase
    phase: GamePhase,
}

impl GameState {
    /// Start a new game with players at their canonical starting cells
    pub fn new(player_count: usize, board_size: u32) -> Result<Self, GameError> {
        Self::with_config(GameConfig::new(player_count, board_size))
    }

    /// Create a standard two-player game on a 9×9 board
    pub fn new_standard_2player() -> Result<Self, GameError> {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let board = Board::new(config.board_size, config.barrier_limit)?;
        let players = (0..config.player_count as PlayerId)
            .map(|id| Player::seated(id, config.board_size))
            .collect();
        info!(
            players = config.player_count,
            size = config.board_size,
            "game started"
        );
        Ok(Self {
            config,
            board,
            players,
            turn_count: 0,
            phase: GamePhase::InProgress,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_size(&self) -> u32 {
        self.board.size()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(id))
    }

    fn player_index(&self, id: PlayerId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::UnknownPlayerIdentity(id))
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Overwrite the turn counter, used when resuming a saved game
    pub fn set_turn_count(&mut self, turn_count: u32) {
        self.turn_count = turn_count;
    }

    pub fn turn_count_increment(&mut self) {
        self.turn_count += 1;
    }

    /// Index of the player whose turn it is
    pub fn current_player(&self) -> PlayerId {
        (self.turn_count as usize % self.players.len()) as PlayerId
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    /// Get the winner if the game is finished
    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::Finished { winner } => Some(winner),
            GamePhase::InProgress => None,
        }
    }

    /// Look for a player standing on their goal side and finish the game if
    /// one is found
    pub fn check_victory(&mut self) -> Option<PlayerId> {
        if let Some(winner) = self.winner() {
            return Some(winner);
        }
        let size = self.board.size();
        let winner = self
            .players
            .iter()
            .find(|p| p.has_reached_goal(size))
            .map(|p| p.id)?;
        self.phase = GamePhase::Finished { winner };
        info!(player = winner, turn = self.turn_count, "game won");
        Some(winner)
    }

    /// Connectivity view of every player
    pub fn pawns(&self) -> Vec<Pawn> {
        let size = self.board.size();
        self.players.iter().map(|p| p.pawn(size)).collect()
    }

    fn occupied(&self) -> Vec<Position> {
        self.players.iter().map(|p| p.position).collect()
    }

    /// Whether each player can still reach their goal
    pub fn path_report(&self) -> Vec<(PlayerId, bool)> {
        self.board.graph().path_report(&self.pawns())
    }

    /// Apply an action for `player`. On error nothing changes and the turn
    /// does not advance.
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        let outcome = self.try_apply_action(player, action);
        if let Err(err) = &outcome {
            debug!(player, error = %err, "action rejected");
        }
        outcome
    }

    fn try_apply_action(
        &mut self,
        player: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        // Check game not over
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        let index = self.player_index(player)?;
        if player != self.current_player() {
            return Err(GameError::NotYourTurn);
        }

        let mut events = Vec::new();

        match action {
            GameAction::Move { dx, dy } => {
                let occupied = self.occupied();
                let board = &self.board;
                let mover = &mut self.players[index];
                let from = mover.position;
                let to = mover.move_by(dx, dy, board, &occupied)?;
                events.push(GameEvent::PlayerMoved { player, from, to });
            }

            GameAction::PlaceBarrier { first, second } => {
                let pawns = self.pawns();
                let barrier =
                    self.players[index].place_barrier(first, second, &mut self.board, &pawns)?;
                events.push(GameEvent::BarrierPlaced { player, barrier });
            }
        }

        self.turn_count_increment();

        if let Some(winner) = self.check_victory() {
            events.push(GameEvent::GameWon { player: winner });
        } else {
            let next_player = self.current_player();
            info!(player, next_player, turn = self.turn_count, "turn ended");
            events.push(GameEvent::TurnEnded {
                player,
                next_player,
                turn_count: self.turn_count,
            });
        }

        Ok(events)
    }

    /// Move the current player's pawn
    pub fn move_current(&mut self, dx: i32, dy: i32) -> Result<Vec<GameEvent>, GameError> {
        self.apply_action(self.current_player(), GameAction::Move { dx, dy })
    }

    /// Place a barrier for the current player
    pub fn place_barrier_current(
        &mut self,
        first: [Position; 2],
        second: [Position; 2],
    ) -> Result<Vec<GameEvent>, GameError> {
        self.apply_action(
            self.current_player(),
            GameAction::PlaceBarrier { first, second },
        )
    }

    /// Cells `player` could move to if it were their turn
    pub fn valid_moves(&self, player: PlayerId) -> Vec<Position> {
        if self.is_finished() {
            return Vec::new();
        }
        match self.get_player(player) {
            Some(p) => p.legal_moves(&self.board, &self.occupied()),
            None => Vec::new(),
        }
    }

    /// Wall slots where `player` could legally place a barrier right now,
    /// as (anchor, orientation) pairs
    pub fn valid_barriers(&self, player: PlayerId) -> Vec<(Position, BarrierOrientation)> {
        let mut slots = Vec::new();
        if self.is_finished() || self.board.ensure_barrier_available(player).is_err() {
            return slots;
        }

        let pawns = self.pawns();
        let last = self.board.size() - 1;
        for y in 0..last {
            for x in 0..last {
                let anchor = Position::new(x, y);
                for orientation in [BarrierOrientation::Horizontal, BarrierOrientation::Vertical] {
                    let legal = self
                        .board
                        .wall_positions(anchor, orientation)
                        .and_then(|[first, second]| {
                            self.board.prepare_barrier(first, second, player)
                        })
                        .and_then(|barrier| {
                            let mut trial = self.board.clone();
                            trial.try_place_barrier(barrier, &pawns)
                        });
                    if legal.is_ok() {
                        slots.push((anchor, orientation));
                    }
                }
            }
        }
        slots
    }

    /// Capture everything needed to rebuild this game
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            config: self.config,
            players: self.players.clone(),
            barriers: self.board.barriers().to_vec(),
            turn_count: self.turn_count,
            phase: self.phase,
        }
    }

    /// Rebuild a game from a snapshot.
    ///
    /// Barriers are replayed through the normal validation, so a snapshot
    /// that could not have come from a real game is rejected.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, GameError> {
        let GameSnapshot {
            config,
            players,
            barriers,
            turn_count,
            phase,
        } = snapshot;

        config.validate()?;
        if players.len() != config.player_count {
            return Err(GameError::InvalidSnapshot(format!(
                "expected {} players, found {}",
                config.player_count,
                players.len()
            )));
        }

        let size = config.board_size;
        let mut colors = HashSet::new();
        let mut cells = HashSet::new();
        for (seat, player) in players.iter().enumerate() {
            if usize::from(player.id) != seat {
                return Err(GameError::InvalidSnapshot(format!(
                    "player {} sits in seat {seat}",
                    player.id
                )));
            }
            if !colors.insert(player.color) {
                return Err(GameError::InvalidSnapshot(format!(
                    "color {} used twice",
                    player.color
                )));
            }
            if !player.position.is_within(size) {
                return Err(GameError::InvalidPosition {
                    x: i64::from(player.position.x),
                    y: i64::from(player.position.y),
                });
            }
            if !cells.insert(player.position) {
                return Err(GameError::InvalidSnapshot(format!(
                    "two players on {}",
                    player.position
                )));
            }
        }

        if let GamePhase::Finished { winner } = phase {
            if usize::from(winner) >= players.len() {
                return Err(GameError::UnknownPlayerIdentity(winner));
            }
        }

        let mut board = Board::new(size, config.barrier_limit)?;
        let pawns: Vec<Pawn> = players.iter().map(|p| p.pawn(size)).collect();
        for saved in barriers {
            if usize::from(saved.placed_by) >= players.len() {
                return Err(GameError::UnknownPlayerIdentity(saved.placed_by));
            }
            let [first, second] = saved.positions();
            let barrier = board.prepare_barrier(first, second, saved.placed_by)?;
            board.try_place_barrier(barrier, &pawns)?;
        }

        Ok(Self {
            config,
            board,
            players,
            turn_count,
            phase,
        })
    }

    /// Serialize a snapshot of this game as JSON
    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string(&self.snapshot())
            .map_err(|e| GameError::InvalidSnapshot(e.to_string()))
    }

    /// Rebuild a game from JSON produced by [`GameState::to_json`]
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let snapshot: GameSnapshot =
            serde_json::from_str(json).map_err(|e| GameError::InvalidSnapshot(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MAX_BOARD_SIZE;
    use crate::player::PlayerColor;

    #[test]
    fn test_new_game_starts_in_progress() {
        let game = GameState::new(4, 9).unwrap();
        assert_eq!(game.phase(), GamePhase::InProgress);
        assert_eq!(game.turn_count(), 0);
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.board().barrier_limit(), 5);

        let colors: Vec<PlayerColor> = game.players().iter().map(|p| p.color).collect();
        assert_eq!(colors, PlayerColor::ALL.to_vec());
    }

    #[test]
    fn test_player_count_validation() {
        assert_eq!(GameState::new(3, 9).unwrap_err(), GameError::InvalidPlayerCount(3));
        assert_eq!(GameState::new(1, 9).unwrap_err(), GameError::InvalidPlayerCount(1));
        assert_eq!(GameState::new(2, 10).unwrap_err(), GameError::InvalidBoardSize(10));
    }

    #[test]
    fn test_huge_player_count_rejected() {
        let count = 1usize << 32;
        assert_eq!(GameConfig::new(count, 9).barrier_limit, 0);
        assert_eq!(GameState::new(count, 9).unwrap_err(), GameError::InvalidPlayerCount(count));
        assert_eq!(GameState::new(0, 9).unwrap_err(), GameError::InvalidPlayerCount(0));
    }

    #[test]
    fn test_board_size_capped() {
        assert!(GameState::new(2, MAX_BOARD_SIZE).is_ok());
        assert_eq!(
            GameState::new(2, MAX_BOARD_SIZE + 2).unwrap_err(),
            GameError::InvalidBoardSize(MAX_BOARD_SIZE + 2)
        );
        assert_eq!(
            GameState::new(2, u32::MAX).unwrap_err(),
            GameError::InvalidBoardSize(u32::MAX)
        );
    }

    #[test]
    fn test_place_barrier_current() {
        let mut game = GameState::new(2, 9).unwrap();
        let [first, second] = game
            .board()
            .wall_positions(Position::new(2, 4), BarrierOrientation::Vertical)
            .unwrap();
        let events = game.place_barrier_current(first, second).unwrap();
        assert!(matches!(events[0], GameEvent::BarrierPlaced { player: 0, .. }));
        assert_eq!(game.board().barriers_placed_by(0), 1);
        assert_eq!(game.current_player(), 1);
    }

    #[test]
    fn test_standard_config() {
        let game = GameState::new_standard_2player().unwrap();
        assert_eq!(game.config(), GameConfig::new(2, 9));
        assert_eq!(game.board().barrier_limit(), 10);
    }

    #[test]
    fn test_turn_rotation() {
        let mut game = GameState::new(2, 9).unwrap();
        game.move_current(0, 1).unwrap();
        assert_eq!(game.current_player(), 1);
        game.move_current(0, -1).unwrap();
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.turn_count(), 2);
    }

    #[test]
    fn test_not_your_turn() {
        let mut game = GameState::new(2, 9).unwrap();
        assert_eq!(
            game.apply_action(1, GameAction::Move { dx: 0, dy: -1 }),
            Err(GameError::NotYourTurn)
        );
        assert_eq!(
            game.apply_action(7, GameAction::Move { dx: 0, dy: 1 }),
            Err(GameError::UnknownPlayerIdentity(7))
        );
        assert_eq!(game.turn_count(), 0);
    }

    #[test]
    fn test_set_turn_count_changes_current_player() {
        let mut game = GameState::new(4, 9).unwrap();
        game.set_turn_count(7);
        assert_eq!(game.current_player(), 3);
    }

    #[test]
    fn test_check_victory() {
        let mut game = GameState::new(2, 9).unwrap();
        assert_eq!(game.check_victory(), None);

        game.players[1].position = Position::new(4, 0);
        game.players[0].position = Position::new(3, 0);
        assert_eq!(game.check_victory(), Some(1));
        assert_eq!(game.phase(), GamePhase::Finished { winner: 1 });
        assert_eq!(game.move_current(0, 1), Err(GameError::GameOver));
    }

    #[test]
    fn test_valid_barriers_on_small_board() {
        let game = GameState::new(2, 3).unwrap();
        // 2×2 anchors, two orientations each, all legal on an empty board
        assert_eq!(game.valid_barriers(0).len(), 8);
    }

    #[test]
    fn test_snapshot_rejects_duplicate_cells() {
        let game = GameState::new(2, 9).unwrap();
        let mut snapshot = game.snapshot();
        snapshot.players[1].position = snapshot.players[0].position;
        assert!(matches!(
            GameState::from_snapshot(snapshot),
            Err(GameError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_snapshot_rejects_unknown_barrier_owner() {
        let mut game = GameState::new(2, 9).unwrap();
        let pairs = game
            .board()
            .wall_positions(Position::new(0, 3), BarrierOrientation::Horizontal)
            .unwrap();
        game.apply_action(0, GameAction::barrier(pairs)).unwrap();

        let mut snapshot = game.snapshot();
        snapshot.barriers[0].placed_by = 3;
        assert_eq!(
            GameState::from_snapshot(snapshot),
            Err(GameError::UnknownPlayerIdentity(3))
        );
    }
}
