#![allow(missing_docs)]
use std::fmt;

use fxhash::FxHashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GameSession, SessionState};
use crate::types::{BoardObserver, Position};

/// A plain copy of everything on the board, for logging and fixtures
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub width: i32,
    pub height: i32,
    pub state: SessionState,
    /// head first
    pub snake: Vec<Position>,
    pub fruits: Vec<Position>,
    pub free_cells: usize,
}

impl<O: BoardObserver, R: Rng> GameSession<O, R> {
    /// copies the current board out of the session
    pub fn snapshot(&self) -> BoardSnapshot {
        let (width, height) = self
            .grid
            .as_ref()
            .map(|g| (g.width(), g.height()))
            .unwrap_or((0, 0));
        BoardSnapshot {
            width,
            height,
            state: self.state,
            snake: self.snake_positions(),
            fruits: self.fruit_positions(),
            free_cells: self.free_cells(),
        }
    }
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        let body = self.snake.iter().copied().collect::<FxHashSet<_>>();
        let fruits = self.fruits.iter().copied().collect::<FxHashSet<_>>();
        for i in 0..self.height {
            let y = self.height - i - 1;
            for x in 0..self.width {
                let position = Position { x, y };
                if self.snake.first() == Some(&position) {
                    write!(f, "H")?;
                } else if body.contains(&position) {
                    write!(f, "s")?;
                } else if fruits.contains(&position) {
                    write!(f, "f")?;
                } else {
                    write!(f, ".")?;
                }
                write!(f, " ")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "(length: {} free: {} state: {:?})",
            self.snake.len(),
            self.free_cells,
            self.state
        )
    }
}

impl<O: BoardObserver, R: Rng> fmt::Display for GameSession<O, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.snapshot())
    }
}
