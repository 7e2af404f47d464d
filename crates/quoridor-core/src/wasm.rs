//! WebAssembly bindings for the Quoridor engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::actions::GameAction;
use crate::board::BarrierOrientation;
use crate::game::{GamePhase, GameState};

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game with the specified number of players
    #[wasm_bindgen(constructor)]
    pub fn new(player_count: u8, board_size: u32) -> Result<WasmGame, JsValue> {
        let state = GameState::new(usize::from(player_count), board_size).map_err(js_error)?;
        Ok(WasmGame { state })
    }

    /// Resume a game from snapshot JSON produced by `getState`
    #[wasm_bindgen(js_name = loadSnapshot)]
    pub fn load_snapshot(json: &str) -> Result<WasmGame, JsValue> {
        let state = GameState::from_json(json).map_err(js_error)?;
        Ok(WasmGame { state })
    }

    /// Get the current game state as snapshot JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<String, JsValue> {
        self.state.to_json().map_err(js_error)
    }

    /// Get the current player ID
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> u8 {
        self.state.current_player()
    }

    #[wasm_bindgen(js_name = getTurnCount)]
    pub fn get_turn_count(&self) -> u32 {
        self.state.turn_count()
    }

    /// Cells the player could move to, as a JSON array of positions
    #[wasm_bindgen(js_name = getValidMoves)]
    pub fn get_valid_moves(&self, player: u8) -> String {
        let moves = self.state.valid_moves(player);
        serde_json::to_string(&moves).unwrap_or_else(|_| "[]".to_string())
    }

    /// Legal barrier slots as a JSON array of `[anchor, orientation]`
    #[wasm_bindgen(js_name = getValidBarriers)]
    pub fn get_valid_barriers(&self, player: u8) -> String {
        let slots: Vec<(crate::position::Position, BarrierOrientation)> =
            self.state.valid_barriers(player);
        serde_json::to_string(&slots).unwrap_or_else(|_| "[]".to_string())
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, player: u8, action_json: &str) -> Result<String, JsValue> {
        let action: GameAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;

        let events = self
            .state
            .apply_action(player, action)
            .map_err(|e| JsValue::from_str(&format!("Action failed: {}", e)))?;
        serde_json::to_string(&events).map_err(js_error)
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Get the winner (if game is finished)
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<u8> {
        self.state.winner()
    }

    /// Get the current phase as a string
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        match self.state.phase() {
            GamePhase::InProgress => "InProgress".to_string(),
            GamePhase::Finished { .. } => "Finished".to_string(),
        }
    }

    /// Get a specific player's state as JSON
    #[wasm_bindgen(js_name = getPlayer)]
    pub fn get_player(&self, player: u8) -> String {
        match self.state.get_player(player) {
            Some(p) => serde_json::to_string(p).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }

    /// Barriers left for a player
    #[wasm_bindgen(js_name = getBarriersRemaining)]
    pub fn get_barriers_remaining(&self, player: u8) -> u32 {
        self.state.board().barriers_remaining(player)
    }
}
