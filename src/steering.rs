//! Turning player requests into the direction of the next move
use crate::types::Direction;

/// Tracks which way the snake is heading between moves.
///
/// A snake longer than one segment cannot turn straight back on itself, its
/// head would run into its neck. Requests to do so are ignored, which is what
/// a player pressing the opposite key almost always wants.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Steering {
    heading: Direction,
    previous: Direction,
}

impl Default for Steering {
    fn default() -> Self {
        Steering::new(Direction::Up)
    }
}

impl Steering {
    /// starts out heading in `initial`
    pub fn new(initial: Direction) -> Self {
        Steering {
            heading: initial,
            previous: initial.opposite(),
        }
    }

    /// the direction the next move will be made in
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// the direction of the last committed move
    pub fn previous(&self) -> Direction {
        self.previous
    }

    /// Asks to head in `requested`. Returns false, keeping the old heading,
    /// when that would reverse the last move of a snake longer than one.
    pub fn steer(&mut self, requested: Direction, snake_length: usize) -> bool {
        let can_turn_back = snake_length <= 1;
        if can_turn_back || !requested.is_opposite(&self.previous) {
            self.heading = requested;
            true
        } else {
            false
        }
    }

    /// Locks in the current heading as the direction of the move about to be
    /// made, and returns it.
    pub fn commit(&mut self) -> Direction {
        self.previous = self.heading;
        self.heading
    }
}
