//! Integration tests for the Quoridor engine.
//!
//! These tests drive complete games through `GameState::apply_action`, from
//! the opening move through barrier fights to victory.

use pretty_assertions::assert_eq;
use quoridor_core::*;

fn wall(game: &GameState, x: u32, y: u32, orientation: BarrierOrientation) -> GameAction {
    let pairs = game
        .board()
        .wall_positions(Position::new(x, y), orientation)
        .unwrap();
    GameAction::barrier(pairs)
}

fn step(dx: i32, dy: i32) -> GameAction {
    GameAction::Move { dx, dy }
}

#[test]
fn test_opening_move() {
    let mut game = GameState::new(2, 9).unwrap();
    let events = game.apply_action(0, step(0, 1)).unwrap();

    assert_eq!(
        events,
        vec![
            GameEvent::PlayerMoved {
                player: 0,
                from: Position::new(4, 0),
                to: Position::new(4, 1),
            },
            GameEvent::TurnEnded {
                player: 0,
                next_player: 1,
                turn_count: 1,
            },
        ]
    );
    assert_eq!(game.turn_count(), 1);
    assert_eq!(game.current_player(), 1);
    assert_eq!(game.get_player(0).unwrap().position, Position::new(4, 1));
}

#[test]
fn test_stranding_barrier_rejected() {
    let mut game = GameState::new(2, 3).unwrap();

    // Close off row 0 except through column 2
    let first = wall(&game, 0, 0, BarrierOrientation::Horizontal);
    game.apply_action(0, first).unwrap();
    assert_eq!(game.board().barrier_count(), 1);

    // Sealing column 2 would trap Yellow at (1,0)
    let before = game.clone();
    let sealing = wall(&game, 1, 0, BarrierOrientation::Vertical);
    assert_eq!(
        game.apply_action(1, sealing),
        Err(GameError::BlockedPath { player: 0 })
    );
    assert_eq!(game, before);
    assert_eq!(game.turn_count(), 1);
    assert_eq!(game.current_player(), 1);
    assert!(game
        .board()
        .graph()
        .is_passable(Position::new(1, 0), Position::new(2, 0)));
}

#[test]
fn test_game_to_victory() {
    let mut game = GameState::new(2, 3).unwrap();

    game.apply_action(0, step(1, 0)).unwrap();
    game.apply_action(1, step(0, -1)).unwrap();
    game.apply_action(0, step(0, 1)).unwrap();
    let events = game.apply_action(1, step(0, -1)).unwrap();

    assert_eq!(
        events,
        vec![
            GameEvent::PlayerMoved {
                player: 1,
                from: Position::new(1, 1),
                to: Position::new(1, 0),
            },
            GameEvent::GameWon { player: 1 },
        ]
    );
    assert_eq!(game.phase(), GamePhase::Finished { winner: 1 });
    assert_eq!(game.winner(), Some(1));
    assert_eq!(game.turn_count(), 4);

    assert_eq!(game.apply_action(0, step(0, 1)), Err(GameError::GameOver));
    assert!(game.valid_moves(0).is_empty());
}

#[test]
fn test_turn_order_enforced() {
    let mut game = GameState::new(4, 9).unwrap();

    for expected in [0, 1, 2, 3, 0] {
        assert_eq!(game.current_player(), expected);
        let wrong = (expected + 1) % 4;
        assert_eq!(
            game.apply_action(wrong, step(0, 0)),
            Err(GameError::NotYourTurn)
        );
        let (dx, dy) = match game.get_player(expected).unwrap().color {
            PlayerColor::Yellow => (0, 1),
            PlayerColor::Blue => (0, -1),
            PlayerColor::Red => (1, 0),
            PlayerColor::Green => (-1, 0),
        };
        game.apply_action(expected, step(dx, dy)).unwrap();
    }
    assert_eq!(game.turn_count(), 5);
}

#[test]
fn test_rejected_actions_leave_state_unchanged() {
    let mut game = GameState::new(2, 9).unwrap();
    let before = game.clone();

    // Off the board
    assert_eq!(
        game.apply_action(0, step(0, -1)),
        Err(GameError::InvalidPosition { x: 4, y: -1 })
    );
    // Too far
    assert_eq!(
        game.apply_action(0, step(0, 3)),
        Err(GameError::InvalidDistance { dx: 0, dy: 3 })
    );
    // Edges that do not form a wall
    let bad = GameAction::PlaceBarrier {
        first: [Position::new(0, 0), Position::new(0, 1)],
        second: [Position::new(5, 5), Position::new(5, 6)],
    };
    assert!(matches!(
        game.apply_action(0, bad),
        Err(GameError::InvalidBarrierEdges(_))
    ));

    assert_eq!(game, before);
}

#[test]
fn test_barrier_limit_enforced() {
    let config = GameConfig::new(2, 9).with_barrier_limit(1);
    let mut game = GameState::with_config(config).unwrap();

    let first = wall(&game, 0, 3, BarrierOrientation::Horizontal);
    game.apply_action(0, first).unwrap();
    game.apply_action(1, step(0, -1)).unwrap();

    let second = wall(&game, 4, 3, BarrierOrientation::Horizontal);
    assert_eq!(
        game.apply_action(0, second),
        Err(GameError::BarrierLimitExceeded { player: 0 })
    );
    assert_eq!(game.board().barrier_count(), 1);
    assert_eq!(game.turn_count(), 2);
    assert!(game.valid_barriers(0).is_empty());

    // Moving is still allowed
    game.apply_action(0, step(0, 1)).unwrap();
}

#[test]
fn test_default_barrier_allowance() {
    assert_eq!(GameState::new(2, 9).unwrap().board().barrier_limit(), 10);
    assert_eq!(GameState::new(4, 9).unwrap().board().barrier_limit(), 5);
}

#[test]
fn test_invalid_configurations() {
    assert_eq!(GameState::new(3, 9), Err(GameError::InvalidPlayerCount(3)));
    assert_eq!(GameState::new(0, 9), Err(GameError::InvalidPlayerCount(0)));
    assert_eq!(GameState::new(2, 8), Err(GameError::InvalidBoardSize(8)));
    assert_eq!(GameState::new(4, 1), Err(GameError::InvalidBoardSize(1)));
}

#[test]
fn test_barrier_blocks_moves_and_jumps() {
    let mut game = GameState::new(2, 9).unwrap();

    // Walk the pawns towards each other along column 4
    for _ in 0..3 {
        game.apply_action(0, step(0, 1)).unwrap();
        game.apply_action(1, step(0, -1)).unwrap();
    }
    // Yellow at (4,3), Blue at (4,5)
    game.apply_action(0, step(0, 1)).unwrap();
    assert_eq!(game.get_player(0).unwrap().position, Position::new(4, 4));

    // Blue jumps over Yellow
    game.apply_action(1, step(0, -2)).unwrap();
    assert_eq!(game.get_player(1).unwrap().position, Position::new(4, 3));

    // Yellow walls off the cell north of Blue
    let barrier = wall(&game, 3, 2, BarrierOrientation::Horizontal);
    game.apply_action(0, barrier).unwrap();
    assert_eq!(game.apply_action(1, step(0, -1)), Err(GameError::MoveBlocked));
    assert_eq!(
        game.apply_action(1, step(0, 1)),
        Err(GameError::CellOccupied { x: 4, y: 4 })
    );
}

#[test]
fn test_snapshot_json_round_trip() {
    let mut game = GameState::new(4, 9).unwrap();
    let barrier = wall(&game, 2, 2, BarrierOrientation::Vertical);
    game.apply_action(0, barrier).unwrap();
    game.apply_action(1, step(0, -1)).unwrap();
    let barrier = wall(&game, 5, 6, BarrierOrientation::Horizontal);
    game.apply_action(2, barrier).unwrap();

    let json = game.to_json().unwrap();
    let restored = GameState::from_json(&json).unwrap();

    assert_eq!(restored, game);
    assert_eq!(restored.current_player(), 3);
    assert!(!restored
        .board()
        .graph()
        .is_passable(Position::new(2, 2), Position::new(3, 2)));
}

#[test]
fn test_snapshot_rejects_crossing_barriers() {
    let mut game = GameState::new(2, 9).unwrap();
    let barrier = wall(&game, 2, 2, BarrierOrientation::Vertical);
    game.apply_action(0, barrier).unwrap();

    let mut snapshot = game.snapshot();
    let mut crossing = snapshot.barriers[0];
    crossing.edges = [
        Edge::open(Position::new(2, 2), Position::new(2, 3)),
        Edge::open(Position::new(3, 2), Position::new(3, 3)),
    ];
    snapshot.barriers.push(crossing);

    assert!(matches!(
        GameState::from_snapshot(snapshot),
        Err(GameError::InvalidBarrierEdges(_))
    ));
}

#[test]
fn test_from_json_rejects_garbage() {
    assert!(matches!(
        GameState::from_json("{\"config\": 5}"),
        Err(GameError::InvalidSnapshot(_))
    ));
}

#[test]
fn test_every_pawn_keeps_a_path() {
    let mut game = GameState::new(4, 5).unwrap();

    for _ in 0..60 {
        if game.is_finished() {
            break;
        }
        let player = game.current_player();
        let action = match game.valid_barriers(player).first() {
            Some(&(anchor, orientation)) => wall(&game, anchor.x, anchor.y, orientation),
            None => match game.valid_moves(player).first() {
                Some(to) => {
                    let from = game.get_player(player).unwrap().position;
                    step(to.x as i32 - from.x as i32, to.y as i32 - from.y as i32)
                }
                None => break,
            },
        };

        let turn = game.turn_count();
        game.apply_action(player, action).unwrap();
        assert_eq!(game.turn_count(), turn + 1);
        assert!(
            game.path_report().iter().all(|&(_, reachable)| reachable),
            "a pawn lost its path after turn {}",
            turn
        );
    }

    assert!(game.board().barrier_count() <= TOTAL_BARRIERS as usize);
}
