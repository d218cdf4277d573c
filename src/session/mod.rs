//! A single game of snake, from board setup to the final move
//!
//! [GameSession] owns the authoritative state of a game: the [Grid], the
//! [Snake], the fruit on the board and the border around it. Whatever
//! displays the game implements [BoardObserver] and is told about every
//! piece that appears, moves or disappears.
use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::fruit::{Fruit, FruitPlacer};
use crate::grid::{Grid, Occupant};
use crate::snake::{Snake, SnakeBit};
use crate::types::{BoardObserver, PieceHandle, PieceKind, Position};

mod resolve;
mod snapshot;

pub use resolve::MoveOutcome;
pub use snapshot::BoardSnapshot;

/// Where a session is in its lifecycle
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// no board yet
    Uninitialized,
    /// a board exists but no game has been started on it
    Ready,
    /// moves are being accepted
    Playing,
    /// the last move ran into a wall or the snake
    Terminated,
}

/// One board and the game being played on it
#[derive(Debug)]
pub struct GameSession<O: BoardObserver, R: Rng> {
    config: GameConfig,
    placer: FruitPlacer,
    state: SessionState,
    grid: Option<Grid>,
    snake: Snake,
    fruits: FxHashMap<Position, Fruit>,
    borders: Vec<PieceHandle>,
    observer: O,
    rng: R,
    next_handle: u64,
}

impl<O: BoardObserver> GameSession<O, SmallRng> {
    /// a session drawing its randomness from a freshly seeded [SmallRng]
    pub fn from_entropy(config: GameConfig, observer: O) -> Result<Self, GameError> {
        Self::new(config, observer, SmallRng::from_entropy())
    }
}

impl<O: BoardObserver, R: Rng> GameSession<O, R> {
    /// Create a new, uninitialized session. `rng` is the only source of
    /// randomness the session uses, so a seeded rng makes a game replayable.
    pub fn new(config: GameConfig, observer: O, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        Ok(GameSession {
            placer: FruitPlacer::from_config(&config),
            config,
            state: SessionState::Uninitialized,
            grid: None,
            snake: Snake::new(),
            fruits: FxHashMap::default(),
            borders: vec![],
            observer,
            rng,
            next_handle: 0,
        })
    }

    /// Replaces the board with an empty one of the given size, ending any game
    /// in progress. On error nothing changes.
    pub fn init_board(&mut self, width: i32, height: i32) -> Result<(), GameError> {
        let grid = Grid::initialize(width, height)?;

        self.release_game_pieces();
        for handle in self.borders.drain(..) {
            self.observer.on_piece_removed(handle);
        }

        self.observer.on_board_initialized(width, height);
        self.grid = Some(grid);
        self.place_borders(width, height);
        self.state = SessionState::Ready;
        info!(width, height, "board initialized");
        Ok(())
    }

    /// [GameSession::init_board] with the configured size
    pub fn init_board_from_config(&mut self) -> Result<(), GameError> {
        self.init_board(self.config.width, self.config.height)
    }

    /// Starts a game: one segment in the middle of the board and up to
    /// `fruit_count` fruit. Fruit that cannot be placed is skipped.
    pub fn new_game(&mut self, fruit_count: usize) -> Result<(), GameError> {
        if self.grid.is_none() {
            return Err(GameError::NotInitialized);
        }
        self.release_game_pieces();
        let grid = self.grid.as_ref().ok_or(GameError::NotInitialized)?;
        let start = Position::new(grid.width() / 2, grid.height() / 2);

        self.add_snake_head(start)?;
        for _ in 0..fruit_count {
            self.replenish_fruit();
        }
        self.state = SessionState::Playing;
        info!(%start, fruit = self.fruits.len(), "new game");
        Ok(())
    }

    /// [GameSession::new_game] with the configured number of fruit
    pub fn new_game_from_config(&mut self) -> Result<(), GameError> {
        self.new_game(self.config.fruit_number)
    }

    /// Puts one more fruit on a random empty cell. Only a game in progress
    /// takes extra fruit, in any other state this returns
    /// [GameError::NotPlaying] and leaves the board alone.
    pub fn place_fruit(&mut self) -> Result<Position, GameError> {
        if self.state != SessionState::Playing {
            return Err(GameError::NotPlaying(self.state));
        }
        self.spawn_fruit()
    }

    /// number of segments in the snake
    pub fn snake_length(&self) -> usize {
        self.snake.len()
    }

    #[allow(missing_docs)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// the board, once one has been initialized
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    #[allow(missing_docs)]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// cells with nothing on them, zero before the board exists
    pub fn free_cells(&self) -> usize {
        self.grid.as_ref().map(|g| g.free_cells()).unwrap_or(0)
    }

    #[allow(missing_docs)]
    pub fn active_fruit_count(&self) -> usize {
        self.fruits.len()
    }

    /// every fruit on the board, sorted
    pub fn fruit_positions(&self) -> Vec<Position> {
        self.fruits.keys().copied().sorted().collect()
    }

    #[allow(missing_docs)]
    pub fn head_position(&self) -> Option<Position> {
        self.snake.head().map(|b| b.position())
    }

    /// the body, head first
    pub fn snake_positions(&self) -> Vec<Position> {
        self.snake.iter().map(|b| b.position()).collect()
    }

    #[allow(missing_docs)]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    #[allow(missing_docs)]
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Checks that the grid agrees with the snake and the fruit: one snake
    /// tag per segment, one fruit tag per fruit, no overlap, and an accurate
    /// free cell count. Returns false if the session is inconsistent.
    pub fn assert_consistency(&self) -> bool {
        let grid = match self.grid.as_ref() {
            Some(grid) => grid,
            None => return self.snake.is_empty() && self.fruits.is_empty(),
        };

        if self.snake.len() != grid.count(Occupant::SnakeSegment)
            || self.snake.iter().count() != self.snake.len()
        {
            return false;
        }
        let mut body = FxHashSet::default();
        for bit in self.snake.iter() {
            let pos = bit.position();
            if !body.insert(pos) || grid.occupant_at(pos) != Ok(Occupant::SnakeSegment) {
                return false;
            }
        }

        if self.fruits.len() != grid.count(Occupant::Fruit) {
            return false;
        }
        for (pos, fruit) in self.fruits.iter() {
            if *pos != fruit.position()
                || body.contains(pos)
                || grid.occupant_at(*pos) != Ok(Occupant::Fruit)
            {
                return false;
            }
        }

        grid.free_cells() == grid.count(Occupant::Empty)
    }

    fn mint_handle(&mut self) -> PieceHandle {
        let handle = PieceHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn place_borders(&mut self, width: i32, height: i32) {
        let ring = (-1..=width)
            .flat_map(|x| vec![Position::new(x, -1), Position::new(x, height)])
            .chain((0..height).flat_map(|y| vec![Position::new(-1, y), Position::new(width, y)]))
            .collect_vec();
        for pos in ring {
            let handle = self.mint_handle();
            self.observer
                .on_piece_placed(PieceKind::Border, pos.x, pos.y, handle);
            self.borders.push(handle);
        }
    }

    // drops the snake and the fruit, telling the observer about each
    fn release_game_pieces(&mut self) {
        for bit in self.snake.iter() {
            self.observer.on_piece_removed(bit.handle());
        }
        self.snake.clear();
        let fruits = self
            .fruits
            .drain()
            .map(|(_, f)| f.handle())
            .sorted()
            .collect_vec();
        for handle in fruits {
            self.observer.on_piece_removed(handle);
        }
        if let Some(grid) = self.grid.as_mut() {
            grid.clear();
        }
        self.state = match self.state {
            SessionState::Uninitialized => SessionState::Uninitialized,
            _ => SessionState::Ready,
        };
    }

    fn add_snake_head(&mut self, pos: Position) -> Result<(), GameError> {
        let grid = self.grid.as_mut().ok_or(GameError::NotInitialized)?;
        grid.set_occupant(pos, Occupant::SnakeSegment)?;
        let handle = self.mint_handle();
        self.observer
            .on_piece_placed(PieceKind::SnakeSegment, pos.x, pos.y, handle);
        self.snake.push_head(SnakeBit::new(pos, handle));
        Ok(())
    }

    fn spawn_fruit(&mut self) -> Result<Position, GameError> {
        let grid = self.grid.as_mut().ok_or(GameError::NotInitialized)?;
        let pos = self.placer.place_fruit(grid, &mut self.rng)?;
        self.register_fruit(pos);
        Ok(pos)
    }

    // the cell at `pos` must already be tagged as fruit
    fn register_fruit(&mut self, pos: Position) {
        let handle = self.mint_handle();
        self.fruits.insert(pos, Fruit::new(pos, handle));
        self.observer
            .on_piece_placed(PieceKind::Fruit, pos.x, pos.y, handle);
    }

    // a fruit that cannot be placed is not fatal, the game goes on with fewer
    fn replenish_fruit(&mut self) -> Option<Position> {
        match self.spawn_fruit() {
            Ok(pos) => Some(pos),
            Err(e) => {
                warn!(error = %e, "could not place fruit");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
