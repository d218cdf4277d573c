use rand::seq::SliceRandom;
use tracing::Level;

use super::*;
use crate::types::{BoardEvent, Direction, EventLog, NoopObserver};

type Session = GameSession<EventLog, SmallRng>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::TRACE)
        .try_init();
}

fn session(seed: u64) -> Session {
    init_tracing();
    GameSession::new(
        GameConfig::default(),
        EventLog::new(),
        SmallRng::seed_from_u64(seed),
    )
    .unwrap()
}

fn playing(width: i32, height: i32, fruit: usize) -> Session {
    let mut s = session(42);
    s.init_board(width, height).unwrap();
    s.new_game(fruit).unwrap();
    s
}

fn remove_all_fruit(s: &mut Session) {
    for pos in s.fruit_positions() {
        let fruit = s.fruits.remove(&pos).unwrap();
        s.grid.as_mut().unwrap().clear_occupant(pos).unwrap();
        s.observer.on_piece_removed(fruit.handle());
    }
}

fn put_fruit(s: &mut Session, pos: Position) {
    s.grid
        .as_mut()
        .unwrap()
        .set_occupant(pos, Occupant::Fruit)
        .unwrap();
    s.register_fruit(pos);
}

// grows the snake by eating a fruit laid directly in front of it
fn eat(s: &mut Session, direction: Direction) {
    remove_all_fruit(s);
    let target = s.head_position().unwrap().step(direction);
    put_fruit(s, target);
    assert_eq!(s.make_move(direction), Ok(MoveOutcome::Grew));
    remove_all_fruit(s);
}

// the observer's view of the board has to match the session's
fn assert_observer_in_sync(s: &Session) {
    let live = s.observer().live_pieces();
    let displayed = |kind| {
        live.values()
            .filter(|(k, _)| *k == kind)
            .map(|(_, p)| *p)
            .sorted()
            .collect_vec()
    };
    assert_eq!(
        displayed(PieceKind::SnakeSegment),
        s.snake_positions().into_iter().sorted().collect_vec()
    );
    assert_eq!(displayed(PieceKind::Fruit), s.fruit_positions());
}

#[test]
fn test_lifecycle() {
    let mut s = session(1);
    assert_eq!(s.state(), SessionState::Uninitialized);
    assert_eq!(s.new_game(1), Err(GameError::NotInitialized));
    assert_eq!(
        s.make_move(Direction::Up),
        Err(GameError::NotPlaying(SessionState::Uninitialized))
    );

    s.init_board(12, 8).unwrap();
    assert_eq!(s.state(), SessionState::Ready);
    assert_eq!(
        s.make_move(Direction::Up),
        Err(GameError::NotPlaying(SessionState::Ready))
    );

    s.new_game(1).unwrap();
    assert_eq!(s.state(), SessionState::Playing);
}

#[test]
fn test_init_board_rejects_bad_dimensions_without_changes() {
    let mut s = playing(12, 8, 1);
    let before = s.snapshot();
    let events = s.observer().events().len();
    assert_eq!(
        s.init_board(0, 8),
        Err(GameError::InvalidDimension {
            width: 0,
            height: 8
        })
    );
    assert_eq!(
        s.init_board(12, -3),
        Err(GameError::InvalidDimension {
            width: 12,
            height: -3
        })
    );
    assert_eq!(s.snapshot(), before);
    assert_eq!(s.observer().events().len(), events);
}

#[test]
fn test_new_game_on_12_by_8() {
    let s = playing(12, 8, 1);
    assert_eq!(s.snake_length(), 1);
    assert_eq!(s.head_position(), Some(Position::new(6, 4)));
    let fruits = s.fruit_positions();
    assert_eq!(fruits.len(), 1);
    assert_ne!(fruits[0], Position::new(6, 4));
    assert!(s.grid().unwrap().in_bounds(fruits[0]));
    assert_eq!(s.free_cells(), 96 - 2);
    assert!(s.assert_consistency());
    assert_observer_in_sync(&s);
}

#[test]
fn test_init_board_places_a_border_ring() {
    let mut s = session(1);
    s.init_board(12, 8).unwrap();
    let events = s.observer().events();
    assert_eq!(
        events[0],
        BoardEvent::BoardInitialized {
            width: 12,
            height: 8
        }
    );
    let borders = s
        .observer()
        .live_pieces()
        .values()
        .filter(|(k, _)| *k == PieceKind::Border)
        .map(|(_, p)| *p)
        .collect::<FxHashSet<_>>();
    // 14 along the bottom and top, 8 up each side
    assert_eq!(borders.len(), 44);
    assert_eq!(s.observer().live_pieces().len(), 44);
    let grid = s.grid().unwrap();
    for pos in borders.iter() {
        assert!(!grid.in_bounds(*pos));
        let touches_board = Direction::all()
            .iter()
            .any(|d| grid.in_bounds(pos.step(*d)))
            || grid.in_bounds(Position::new(pos.x - 1, pos.y - 1))
            || grid.in_bounds(Position::new(pos.x + 1, pos.y - 1))
            || grid.in_bounds(Position::new(pos.x - 1, pos.y + 1))
            || grid.in_bounds(Position::new(pos.x + 1, pos.y + 1));
        assert!(touches_board, "{} is not next to the board", pos);
    }
}

#[test]
fn test_reinit_releases_every_piece() {
    let mut s = playing(12, 8, 3);
    s.init_board(5, 5).unwrap();
    assert_eq!(s.state(), SessionState::Ready);
    assert_eq!(s.snake_length(), 0);
    assert_eq!(s.active_fruit_count(), 0);
    let live = s.observer().live_pieces();
    // only the new 5x5 ring is left
    assert_eq!(live.len(), 2 * 7 + 2 * 5);
    assert!(live.values().all(|(k, _)| *k == PieceKind::Border));
    assert!(s.assert_consistency());
}

#[test]
fn test_advance_into_empty_cell() {
    let mut s = playing(10, 10, 0);
    assert_eq!(s.head_position(), Some(Position::new(5, 5)));
    let handle = s.snake().head().unwrap().handle();
    s.observer_mut().take();

    assert_eq!(s.make_move(Direction::Right), Ok(MoveOutcome::Advanced));
    assert_eq!(s.head_position(), Some(Position::new(6, 5)));
    assert_eq!(s.snake_length(), 1);
    let grid = s.grid().unwrap();
    assert_eq!(grid.occupant_at(Position::new(5, 5)), Ok(Occupant::Empty));
    assert_eq!(
        grid.occupant_at(Position::new(6, 5)),
        Ok(Occupant::SnakeSegment)
    );
    assert_eq!(s.free_cells(), 99);
    // the same display object is moved, not replaced
    assert_eq!(
        s.observer().events(),
        &[BoardEvent::PieceMoved { handle, x: 6, y: 5 }]
    );
    assert!(s.assert_consistency());
}

#[test]
fn test_eating_grows_and_replaces_fruit() {
    let mut s = playing(10, 10, 0);
    put_fruit(&mut s, Position::new(5, 6));
    let free_before = s.free_cells();
    s.observer_mut().take();

    assert_eq!(s.make_move(Direction::Up), Ok(MoveOutcome::Grew));
    assert_eq!(s.snake_length(), 2);
    assert_eq!(
        s.snake_positions(),
        vec![Position::new(5, 6), Position::new(5, 5)]
    );
    assert_eq!(s.active_fruit_count(), 1);
    assert_eq!(s.free_cells(), free_before - 1);

    let events = s.observer().events();
    assert!(matches!(events[0], BoardEvent::PieceRemoved { .. }));
    assert!(matches!(
        events[1],
        BoardEvent::PiecePlaced {
            kind: PieceKind::SnakeSegment,
            x: 5,
            y: 6,
            ..
        }
    ));
    assert!(matches!(
        events[2],
        BoardEvent::PiecePlaced {
            kind: PieceKind::Fruit,
            ..
        }
    ));
    assert!(s.assert_consistency());
    assert_observer_in_sync(&s);
}

#[test]
fn test_eating_the_last_free_cell() {
    let mut s = playing(2, 1, 0);
    assert_eq!(s.head_position(), Some(Position::new(1, 0)));
    put_fruit(&mut s, Position::new(0, 0));
    assert_eq!(s.make_move(Direction::Left), Ok(MoveOutcome::Grew));
    assert_eq!(s.snake_length(), 2);
    // nowhere to put a new fruit, the game carries on without one
    assert_eq!(s.active_fruit_count(), 0);
    assert_eq!(s.free_cells(), 0);
    assert_eq!(s.state(), SessionState::Playing);
    assert!(s.assert_consistency());
}

#[test]
fn test_hit_wall_from_every_edge() {
    let cases = [
        (Position::new(0, 2), Direction::Left),
        (Position::new(4, 2), Direction::Right),
        (Position::new(2, 0), Direction::Down),
        (Position::new(2, 4), Direction::Up),
    ];
    for (start, direction) in cases.iter() {
        let mut s = playing(5, 5, 0);
        remove_all_fruit(&mut s);
        let mut head = s.head_position().unwrap();
        // walk the single segment to the edge
        while head.x != start.x {
            let d = if head.x < start.x {
                Direction::Right
            } else {
                Direction::Left
            };
            assert_eq!(s.make_move(d), Ok(MoveOutcome::Advanced));
            head = s.head_position().unwrap();
        }
        while head.y != start.y {
            let d = if head.y < start.y {
                Direction::Up
            } else {
                Direction::Down
            };
            assert_eq!(s.make_move(d), Ok(MoveOutcome::Advanced));
            head = s.head_position().unwrap();
        }

        let before = s.snapshot();
        let events = s.observer().events().len();
        assert_eq!(s.make_move(*direction), Ok(MoveOutcome::HitWall));
        assert_eq!(s.state(), SessionState::Terminated);
        let after = s.snapshot();
        assert_eq!(after.snake, before.snake);
        assert_eq!(after.fruits, before.fruits);
        assert_eq!(after.free_cells, before.free_cells);
        assert_eq!(s.observer().events().len(), events);
        assert_eq!(
            s.make_move(Direction::Up),
            Err(GameError::NotPlaying(SessionState::Terminated))
        );
    }
}

#[test]
fn test_moving_into_the_tail_is_a_collision() {
    let mut s = playing(10, 10, 0);
    eat(&mut s, Direction::Right);
    eat(&mut s, Direction::Right);
    eat(&mut s, Direction::Right);
    assert_eq!(
        s.snake_positions(),
        vec![
            Position::new(8, 5),
            Position::new(7, 5),
            Position::new(6, 5),
            Position::new(5, 5)
        ]
    );
    assert_eq!(s.make_move(Direction::Up), Ok(MoveOutcome::Advanced));
    assert_eq!(s.make_move(Direction::Left), Ok(MoveOutcome::Advanced));
    assert_eq!(s.snake().tail().unwrap().position(), Position::new(7, 5));

    let before = s.snapshot();
    // the tail would vacate (7, 5) this turn, it still counts
    assert_eq!(s.make_move(Direction::Down), Ok(MoveOutcome::HitSelf));
    assert_eq!(s.state(), SessionState::Terminated);
    let after = s.snapshot();
    assert_eq!(after.snake, before.snake);
    assert_eq!(after.free_cells, before.free_cells);
    assert!(s.assert_consistency());
}

#[test]
fn test_reversing_into_the_neck_is_a_collision() {
    let mut s = playing(10, 10, 0);
    eat(&mut s, Direction::Up);
    assert_eq!(s.make_move(Direction::Down), Ok(MoveOutcome::HitSelf));
    assert_eq!(s.snake_length(), 2);
}

#[test]
fn test_body_collision() {
    let mut s = playing(10, 10, 0);
    for _ in 0..4 {
        eat(&mut s, Direction::Right);
    }
    // (9,5) (8,5) (7,5) (6,5) (5,5), curl back onto the middle of the body
    assert_eq!(s.make_move(Direction::Up), Ok(MoveOutcome::Advanced));
    assert_eq!(s.make_move(Direction::Left), Ok(MoveOutcome::Advanced));
    assert_eq!(s.make_move(Direction::Down), Ok(MoveOutcome::HitSelf));
}

#[test]
fn test_new_game_restarts_after_termination() {
    let mut s = playing(3, 3, 1);
    remove_all_fruit(&mut s);
    assert_eq!(s.make_move(Direction::Up), Ok(MoveOutcome::Advanced));
    assert_eq!(s.make_move(Direction::Up), Ok(MoveOutcome::HitWall));

    s.new_game(2).unwrap();
    assert_eq!(s.state(), SessionState::Playing);
    assert_eq!(s.head_position(), Some(Position::new(1, 1)));
    assert_eq!(s.snake_length(), 1);
    assert_eq!(s.active_fruit_count(), 2);
    assert!(s.assert_consistency());
    assert_observer_in_sync(&s);
}

#[test]
fn test_too_many_fruit_is_not_fatal() {
    let mut s = playing(1, 1, 5);
    assert_eq!(s.state(), SessionState::Playing);
    assert_eq!(s.snake_length(), 1);
    assert_eq!(s.active_fruit_count(), 0);
    assert_eq!(s.place_fruit(), Err(GameError::PlacementFailed { attempts: 200 }));
    assert!(s.assert_consistency());
}

#[test]
fn test_extra_fruit_only_during_a_game() {
    let mut s = session(3);
    assert_eq!(
        s.place_fruit(),
        Err(GameError::NotPlaying(SessionState::Uninitialized))
    );

    s.init_board(4, 4).unwrap();
    let events = s.observer().events().len();
    assert_eq!(
        s.place_fruit(),
        Err(GameError::NotPlaying(SessionState::Ready))
    );
    assert_eq!(s.free_cells(), 16);
    assert_eq!(s.observer().events().len(), events);

    s.new_game(0).unwrap();
    let pos = s.place_fruit().unwrap();
    assert_eq!(s.fruit_positions(), vec![pos]);

    remove_all_fruit(&mut s);
    assert_eq!(s.make_move(Direction::Up), Ok(MoveOutcome::Advanced));
    assert_eq!(s.make_move(Direction::Up), Ok(MoveOutcome::HitWall));
    let free = s.free_cells();
    let placed = s.observer().events().len();
    assert_eq!(
        s.place_fruit(),
        Err(GameError::NotPlaying(SessionState::Terminated))
    );
    assert_eq!(s.active_fruit_count(), 0);
    assert_eq!(s.free_cells(), free);
    assert_eq!(s.observer().events().len(), placed);
    assert!(s.assert_consistency());
}

#[test]
fn test_config_fixture_session() {
    init_tracing();
    let config = crate::config_fixture(include_str!("../../fixtures/crowded_5x5.json"));
    let mut s = GameSession::new(config, NoopObserver, SmallRng::seed_from_u64(9)).unwrap();
    s.init_board_from_config().unwrap();
    s.new_game_from_config().unwrap();
    // the fallback scan guarantees every free cell gets a fruit
    assert_eq!(s.active_fruit_count(), 24);
    assert_eq!(s.free_cells(), 0);
    assert!(s.assert_consistency());
}

#[test]
fn test_handles_are_unique_among_live_pieces() {
    let mut s = playing(6, 6, 3);
    let mut rng = SmallRng::seed_from_u64(5);
    for _ in 0..50 {
        let d = *Direction::all().choose(&mut rng).unwrap();
        if s.make_move(d).unwrap().is_terminal() {
            s.new_game(3).unwrap();
        }
    }
    let placed = s
        .observer()
        .events()
        .iter()
        .filter_map(|e| match e {
            BoardEvent::PiecePlaced { handle, .. } => Some(*handle),
            _ => None,
        })
        .collect_vec();
    assert_eq!(placed.len(), placed.iter().unique().count());
}

#[test]
fn test_random_games_stay_consistent() {
    let mut rng = SmallRng::seed_from_u64(2024);
    for seed in 0..20 {
        let mut s = session(seed);
        s.init_board(8, 6).unwrap();
        s.new_game(2).unwrap();
        let mut moves = 0;
        loop {
            let d = *Direction::all().choose(&mut rng).unwrap();
            let length = s.snake_length();
            let outcome = s.make_move(d).unwrap();
            moves += 1;
            assert!(s.assert_consistency(), "inconsistent after {} moves: {}", moves, s);
            assert_observer_in_sync(&s);
            match outcome {
                MoveOutcome::Advanced => assert_eq!(s.snake_length(), length),
                MoveOutcome::Grew => assert_eq!(s.snake_length(), length + 1),
                MoveOutcome::HitWall | MoveOutcome::HitSelf => break,
            }
        }
    }
}

#[test]
fn test_same_seed_same_game() {
    let play = |seed| {
        let mut s = session(seed);
        s.init_board(12, 8).unwrap();
        s.new_game(3).unwrap();
        for d in [Direction::Up, Direction::Left, Direction::Left, Direction::Down].iter() {
            if s.make_move(*d).unwrap().is_terminal() {
                break;
            }
        }
        s.snapshot()
    };
    assert_eq!(play(77), play(77));
}

#[test]
fn test_snapshot_display_and_json() {
    let mut s = playing(4, 3, 0);
    put_fruit(&mut s, Position::new(0, 0));
    let snap = s.snapshot();
    assert_eq!(
        snap.to_string(),
        "\n. . . . \n. . H . \nf . . . \n(length: 1 free: 10 state: Playing)"
    );
    assert_eq!(s.to_string(), snap.to_string());

    let json = serde_json::to_string(&snap).unwrap();
    let back: BoardSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
}
