use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{GameSession, SessionState};
use crate::error::GameError;
use crate::grid::Occupant;
use crate::types::{BoardObserver, Direction, Position};

/// What a single move did
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// the head moved to an empty cell and the tail followed
    Advanced,
    /// the head moved onto a fruit and the snake got one segment longer
    Grew,
    /// the head would have left the board, the game is over
    HitWall,
    /// the head would have run into the snake, the game is over
    HitSelf,
}

impl MoveOutcome {
    /// true if this move ended the game
    pub fn is_terminal(&self) -> bool {
        matches!(self, MoveOutcome::HitWall | MoveOutcome::HitSelf)
    }
}

impl<O: BoardObserver, R: Rng> GameSession<O, R> {
    /// Moves the snake's head one cell in `direction`.
    ///
    /// Running into the wall or into any segment of the snake, including the
    /// tail that would have moved away this turn, ends the game and leaves
    /// the board untouched.
    #[instrument(level = "trace", skip(self))]
    pub fn make_move(&mut self, direction: Direction) -> Result<MoveOutcome, GameError> {
        if self.state != SessionState::Playing {
            return Err(GameError::NotPlaying(self.state));
        }
        let grid = self.grid.as_ref().ok_or(GameError::NotInitialized)?;
        let head = self
            .snake
            .head()
            .ok_or(GameError::NotPlaying(self.state))?
            .position();
        let candidate = head.step(direction);

        if !grid.in_bounds(candidate) {
            debug!(%candidate, "hit a wall");
            self.state = SessionState::Terminated;
            return Ok(MoveOutcome::HitWall);
        }

        match grid.occupant_at(candidate)? {
            Occupant::Empty => {
                self.advance(candidate)?;
                debug!(%candidate, "moved");
                Ok(MoveOutcome::Advanced)
            }
            Occupant::SnakeSegment => {
                debug!(%candidate, "hit the snake");
                self.state = SessionState::Terminated;
                Ok(MoveOutcome::HitSelf)
            }
            Occupant::Fruit => {
                self.grow(candidate)?;
                debug!(%candidate, length = self.snake.len(), "ate a fruit");
                Ok(MoveOutcome::Grew)
            }
        }
    }

    // the tail segment becomes the new head, nothing is allocated
    fn advance(&mut self, candidate: Position) -> Result<(), GameError> {
        let grid = self.grid.as_mut().ok_or(GameError::NotInitialized)?;
        let mut tail = self
            .snake
            .pop_tail()
            .ok_or(GameError::NotPlaying(self.state))?;
        grid.clear_occupant(tail.position())?;
        grid.set_occupant(candidate, Occupant::SnakeSegment)?;
        tail.relocate(candidate);
        self.observer
            .on_piece_moved(tail.handle(), candidate.x, candidate.y);
        self.snake.push_head(tail);
        Ok(())
    }

    fn grow(&mut self, candidate: Position) -> Result<(), GameError> {
        let grid = self.grid.as_mut().ok_or(GameError::NotInitialized)?;
        grid.clear_occupant(candidate)?;
        if let Some(fruit) = self.fruits.remove(&candidate) {
            self.observer.on_piece_removed(fruit.handle());
        }
        self.add_snake_head(candidate)?;
        self.replenish_fruit();
        Ok(())
    }
}
