//! the errors a game session can report
use std::error::Error;
use std::fmt;

use crate::session::SessionState;

/// Everything that can go wrong while driving a board. Losing the game is not
/// in here, see [`crate::session::MoveOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// a board needs a strictly positive width and height
    InvalidDimension {
        #[allow(missing_docs)]
        width: i32,
        #[allow(missing_docs)]
        height: i32,
    },
    /// a coordinate outside of the board was indexed
    OutOfBounds {
        #[allow(missing_docs)]
        x: i32,
        #[allow(missing_docs)]
        y: i32,
    },
    /// no empty cell turned up within the allowed number of attempts
    PlacementFailed {
        #[allow(missing_docs)]
        attempts: u32,
    },
    /// `init_board` has not been called yet
    NotInitialized,
    /// moves and extra fruit are only accepted while a game is being played
    NotPlaying(SessionState),
    /// the configuration could not be parsed or does not make sense
    InvalidConfig(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidDimension { width, height } => {
                write!(f, "invalid board dimensions {}x{}", width, height)
            }
            GameError::OutOfBounds { x, y } => write!(f, "({}, {}) is off the board", x, y),
            GameError::PlacementFailed { attempts } => {
                write!(f, "could not place fruit after {} attempts", attempts)
            }
            GameError::NotInitialized => write!(f, "the board has not been initialized"),
            GameError::NotPlaying(state) => write!(f, "no game in progress (state: {:?})", state),
            GameError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl Error for GameError {}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::InvalidConfig(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            GameError::InvalidDimension {
                width: 0,
                height: 8
            }
            .to_string(),
            "invalid board dimensions 0x8"
        );
        assert_eq!(
            GameError::PlacementFailed { attempts: 200 }.to_string(),
            "could not place fruit after 200 attempts"
        );
    }

    #[test]
    fn test_boxes_as_std_error() {
        let e: Box<dyn Error> = Box::new(GameError::OutOfBounds { x: -1, y: 3 });
        assert_eq!(e.to_string(), "(-1, 3) is off the board");
    }
}
