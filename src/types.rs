//! various types that are shared by the board, the snake and the session
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vector with which to do positional math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vector {
    /// x offset
    pub x: i64,
    /// y offset
    pub y: i64,
}

/// A logical cell coordinate. `(0, 0)` is the bottom left of the board.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl Position {
    /// makes a new position
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// the position reached by applying `v` to this position
    pub fn add_vec(&self, v: Vector) -> Position {
        Position {
            x: (self.x as i64 + v.x) as i32,
            y: (self.y as i64 + v.y) as i32,
        }
    }

    /// the neighbouring position in direction `d`
    pub fn step(&self, d: Direction) -> Position {
        self.add_vec(d.to_vector())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents a direction the snake's head can travel in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[allow(missing_docs)]
    Up,
    #[allow(missing_docs)]
    Down,
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

impl Direction {
    /// convert this direction to a unit vector, up is +y
    pub fn to_vector(self) -> Vector {
        match self {
            Direction::Left => Vector { x: -1, y: 0 },
            Direction::Right => Vector { x: 1, y: 0 },
            Direction::Up => Vector { x: 0, y: 1 },
            Direction::Down => Vector { x: 0, y: -1 },
        }
    }

    /// returns all four directions
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    /// converts this direction to a usize index. indices are the same order as `Direction::all()`
    pub fn as_index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// converts a usize index to a direction, `None` for anything past 3
    pub fn from_index(index: usize) -> Option<Direction> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    /// the direction pointing the other way
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// checks if a given direction is opposite this one. e.g. Up is not opposite to Left, but is opposite to Down
    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }
}

/// The kinds of piece the core asks its collaborator to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    #[allow(missing_docs)]
    SnakeSegment,
    #[allow(missing_docs)]
    Fruit,
    /// the ring drawn just outside the playable area
    Border,
}

/// token naming one display object owned by the collaborator. The core mints
/// these and hands them back on removal and relocation, it never looks inside.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PieceHandle(pub u64);

impl PieceHandle {
    /// convert this handle to a u64
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// The presentation side of a game. The core notifies an observer of every
/// change to what is on the board, and never asks it anything back.
pub trait BoardObserver: fmt::Debug {
    /// a new board of the given size replaces whatever was displayed before
    fn on_board_initialized(&mut self, width: i32, height: i32);

    /// a piece of `kind` now lives at `(x, y)` and will be referred to by `handle`
    fn on_piece_placed(&mut self, kind: PieceKind, x: i32, y: i32, handle: PieceHandle);

    /// the piece behind `handle` is gone and its display object may be recycled
    fn on_piece_removed(&mut self, handle: PieceHandle);

    /// the piece behind `handle` now lives at `(x, y)`
    fn on_piece_moved(&mut self, handle: PieceHandle, x: i32, y: i32);
}

impl<O: BoardObserver + ?Sized> BoardObserver for &mut O {
    fn on_board_initialized(&mut self, width: i32, height: i32) {
        (**self).on_board_initialized(width, height)
    }

    fn on_piece_placed(&mut self, kind: PieceKind, x: i32, y: i32, handle: PieceHandle) {
        (**self).on_piece_placed(kind, x, y, handle)
    }

    fn on_piece_removed(&mut self, handle: PieceHandle) {
        (**self).on_piece_removed(handle)
    }

    fn on_piece_moved(&mut self, handle: PieceHandle, x: i32, y: i32) {
        (**self).on_piece_moved(handle, x, y)
    }
}

#[derive(Clone, Copy, Debug, Default)]
/// Observer that does not do anything
pub struct NoopObserver;

impl BoardObserver for NoopObserver {
    fn on_board_initialized(&mut self, _width: i32, _height: i32) {}

    fn on_piece_placed(&mut self, _kind: PieceKind, _x: i32, _y: i32, _handle: PieceHandle) {}

    fn on_piece_removed(&mut self, _handle: PieceHandle) {}

    fn on_piece_moved(&mut self, _handle: PieceHandle, _x: i32, _y: i32) {}
}

/// One notification sent to a [`BoardObserver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum BoardEvent {
    BoardInitialized {
        width: i32,
        height: i32,
    },
    PiecePlaced {
        kind: PieceKind,
        x: i32,
        y: i32,
        handle: PieceHandle,
    },
    PieceRemoved {
        handle: PieceHandle,
    },
    PieceMoved {
        handle: PieceHandle,
        x: i32,
        y: i32,
    },
}

/// Observer that records every event it is sent, in order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<BoardEvent>,
}

impl EventLog {
    /// an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// every event seen so far
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// drops the recorded events, returning them
    pub fn take(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// replays the log and returns the pieces that are still displayed,
    /// keyed by handle
    pub fn live_pieces(&self) -> fxhash::FxHashMap<PieceHandle, (PieceKind, Position)> {
        let mut live = fxhash::FxHashMap::default();
        for event in self.events.iter() {
            match *event {
                BoardEvent::BoardInitialized { .. } => {}
                BoardEvent::PiecePlaced { kind, x, y, handle } => {
                    live.insert(handle, (kind, Position::new(x, y)));
                }
                BoardEvent::PieceRemoved { handle } => {
                    live.remove(&handle);
                }
                BoardEvent::PieceMoved { handle, x, y } => {
                    if let Some(entry) = live.get_mut(&handle) {
                        entry.1 = Position::new(x, y);
                    }
                }
            }
        }
        live
    }
}

impl BoardObserver for EventLog {
    fn on_board_initialized(&mut self, width: i32, height: i32) {
        self.events.push(BoardEvent::BoardInitialized { width, height });
    }

    fn on_piece_placed(&mut self, kind: PieceKind, x: i32, y: i32, handle: PieceHandle) {
        self.events.push(BoardEvent::PiecePlaced { kind, x, y, handle });
    }

    fn on_piece_removed(&mut self, handle: PieceHandle) {
        self.events.push(BoardEvent::PieceRemoved { handle });
    }

    fn on_piece_moved(&mut self, handle: PieceHandle, x: i32, y: i32) {
        self.events.push(BoardEvent::PieceMoved { handle, x, y });
    }
}
