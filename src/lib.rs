#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! Simulation core for a single-player snake game on a bounded grid.
//!
//! The crate holds the game's rules and nothing else: the board, the snake's
//! body, fruit placement and move resolution. Drawing the game, reading input
//! and timing moves are left to the caller, which hears about every change to
//! the board through the [types::BoardObserver] trait.
//!
//! ```
//! use rand::{rngs::SmallRng, SeedableRng};
//! use snake_board_core::config::GameConfig;
//! use snake_board_core::session::{GameSession, MoveOutcome};
//! use snake_board_core::types::{Direction, NoopObserver, Position};
//!
//! let mut session = GameSession::new(
//!     GameConfig::default(),
//!     NoopObserver,
//!     SmallRng::seed_from_u64(1),
//! )
//! .unwrap();
//! session.init_board(12, 8).unwrap();
//! session.new_game(0).unwrap();
//! assert_eq!(session.head_position(), Some(Position::new(6, 4)));
//!
//! assert_eq!(session.make_move(Direction::Right), Ok(MoveOutcome::Advanced));
//! assert_eq!(session.snake_length(), 1);
//! ```

pub mod config;
pub mod error;
pub mod fruit;
pub mod grid;
pub mod session;
pub mod snake;
pub mod steering;
pub mod types;

/// Loads a session config from a json fixture
pub fn config_fixture(config_fixture: &str) -> config::GameConfig {
    let c: Result<config::GameConfig, _> = config::GameConfig::from_json(config_fixture);
    c.expect("the json literal is valid")
}
