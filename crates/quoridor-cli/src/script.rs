//! Action scripts and the replay report.

use quoridor_core::{
    GameAction, GameError, GameEvent, GameSnapshot, GameState, PlayerId, DEFAULT_BOARD_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Cannot read script {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Cannot set up game: {0}")]
    Setup(GameError),

    #[error("Step {step} failed: {source}")]
    Aborted { step: usize, source: GameError },
}

fn default_board_size() -> u32 {
    DEFAULT_BOARD_SIZE
}

/// One scripted turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedAction {
    pub player: PlayerId,
    pub action: GameAction,
}

/// A game to replay: either a fresh game or a saved snapshot, plus the
/// actions to apply to it in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub players: usize,
    #[serde(default = "default_board_size")]
    pub board_size: u32,
    /// Saved game to continue from; `players` and `board_size` are ignored
    #[serde(default)]
    pub resume: Option<GameSnapshot>,
    /// Abort on the first rejected action instead of reporting and skipping it
    #[serde(default)]
    pub stop_on_error: bool,
    pub actions: Vec<ScriptedAction>,
}

/// Result of a single scripted action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub step: usize,
    pub player: PlayerId,
    pub success: bool,
    pub events: Vec<GameEvent>,
    pub error: Option<String>,
}

/// Everything the replay produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub winner: Option<PlayerId>,
    /// Whether each player can still reach their goal
    pub paths: Vec<(PlayerId, bool)>,
    pub final_state: GameSnapshot,
}

impl Script {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(text)?)
    }

    fn start(&self) -> Result<GameState, GameError> {
        match &self.resume {
            Some(snapshot) => GameState::from_snapshot(snapshot.clone()),
            None => GameState::new(self.players, self.board_size),
        }
    }

    /// Apply every action in order and report what happened
    pub fn run(&self) -> Result<ReplayReport, ScriptError> {
        let mut game = self.start().map_err(ScriptError::Setup)?;
        info!(
            players = game.player_count(),
            size = game.board_size(),
            turn = game.turn_count(),
            "Replaying {} actions",
            self.actions.len()
        );

        let mut steps = Vec::with_capacity(self.actions.len());
        for (step, scripted) in self.actions.iter().enumerate() {
            match game.apply_action(scripted.player, scripted.action.clone()) {
                Ok(events) => steps.push(StepReport {
                    step,
                    player: scripted.player,
                    success: true,
                    events,
                    error: None,
                }),
                Err(source) if self.stop_on_error => {
                    return Err(ScriptError::Aborted { step, source });
                }
                Err(err) => {
                    warn!(step, player = scripted.player, error = %err, "Action rejected");
                    steps.push(StepReport {
                        step,
                        player: scripted.player,
                        success: false,
                        events: Vec::new(),
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        Ok(ReplayReport {
            steps,
            winner: game.winner(),
            paths: game.path_report(),
            final_state: game.snapshot(),
        })
    }
}
