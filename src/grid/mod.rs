//! The occupancy map for a board
//!
//! A [Grid] is a fixed size, row major array of [Cell]s. Every cell knows its
//! own [Position] and what currently sits on it. The grid also keeps a running
//! count of empty cells, so asking how much room is left never scans the board.
use std::fmt;

use itertools::Itertools;

use crate::error::GameError;
use crate::types::Position;

/// What sits on a cell
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Occupant {
    #[allow(missing_docs)]
    Empty = 0x00,
    #[allow(missing_docs)]
    SnakeSegment = 0x01,
    #[allow(missing_docs)]
    Fruit = 0x02,
}

impl Occupant {
    /// true for anything but [Occupant::Empty]
    pub fn is_occupied(&self) -> bool {
        *self != Occupant::Empty
    }
}

/// wrapper type for an index in to the grid
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct CellIndex(pub usize);

impl CellIndex {
    /// makes a new cell index from an in-bounds position, needs to know the width of the board
    pub fn new(pos: Position, width: i32) -> Self {
        Self(pos.y as usize * width as usize + pos.x as usize)
    }

    /// converts a cell index back to a position
    pub fn into_position(self, width: i32) -> Position {
        let y = (self.0 as i32) / width;
        let x = (self.0 as i32) % width;
        Position { x, y }
    }

    /// get a usize from a CellIndex
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

/// A single square of the board
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    occupant: Occupant,
    position: Position,
}

impl Cell {
    fn empty(position: Position) -> Self {
        Cell {
            occupant: Occupant::Empty,
            position,
        }
    }

    #[allow(missing_docs)]
    pub fn occupant(&self) -> Occupant {
        self.occupant
    }

    #[allow(missing_docs)]
    pub fn position(&self) -> Position {
        self.position
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.occupant == Occupant::Empty
    }
}

/// A bounded 2D occupancy map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    free_cells: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates an empty grid of `width` by `height` cells. Both sides must
    /// be positive and the area must fit in an `i32`, so every cell index can
    /// be turned back into a [Position].
    pub fn initialize(width: i32, height: i32) -> Result<Self, GameError> {
        let invalid = GameError::InvalidDimension { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid);
        }
        let area = i64::from(width) * i64::from(height);
        if area > i64::from(i32::MAX) {
            return Err(invalid);
        }
        let area = area as usize;
        let cells = (0..height)
            .cartesian_product(0..width)
            .map(|(y, x)| Cell::empty(Position { x, y }))
            .collect_vec();
        debug_assert_eq!(cells.len(), area);

        Ok(Grid {
            width,
            height,
            free_cells: area,
            cells,
        })
    }

    #[allow(missing_docs)]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[allow(missing_docs)]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// total number of cells on the board
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// number of cells with nothing on them
    pub fn free_cells(&self) -> usize {
        self.free_cells
    }

    /// is `pos` inside `[0, width) x [0, height)`
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index_of(&self, pos: Position) -> Result<CellIndex, GameError> {
        if self.in_bounds(pos) {
            Ok(CellIndex::new(pos, self.width))
        } else {
            Err(GameError::OutOfBounds { x: pos.x, y: pos.y })
        }
    }

    /// the cell at `pos`
    pub fn cell(&self, pos: Position) -> Result<&Cell, GameError> {
        let idx = self.index_of(pos)?;
        Ok(&self.cells[idx.as_usize()])
    }

    /// what sits at `pos`
    pub fn occupant_at(&self, pos: Position) -> Result<Occupant, GameError> {
        Ok(self.cell(pos)?.occupant)
    }

    /// puts `occupant` on `pos`, replacing whatever was there
    pub fn set_occupant(&mut self, pos: Position, occupant: Occupant) -> Result<(), GameError> {
        let idx = self.index_of(pos)?;
        let cell = &mut self.cells[idx.as_usize()];
        match (cell.occupant.is_occupied(), occupant.is_occupied()) {
            (false, true) => self.free_cells -= 1,
            (true, false) => self.free_cells += 1,
            _ => {}
        }
        cell.occupant = occupant;
        Ok(())
    }

    /// empties `pos`
    pub fn clear_occupant(&mut self, pos: Position) -> Result<(), GameError> {
        self.set_occupant(pos, Occupant::Empty)
    }

    /// empties every cell
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.occupant = Occupant::Empty;
        }
        self.free_cells = self.cells.len();
    }

    /// how many cells hold `occupant`
    pub fn count(&self, occupant: Occupant) -> usize {
        self.cells
            .iter()
            .filter(|c| c.occupant == occupant)
            .count()
    }

    /// the positions of every empty cell, bottom row first
    pub fn empty_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(|c| c.is_empty())
            .map(|c| c.position)
    }

    /// iterates all cells, bottom row first
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for row in self.cells.chunks(self.width as usize).rev() {
            let line = row
                .iter()
                .map(|c| match c.occupant {
                    Occupant::Empty => '.',
                    Occupant::SnakeSegment => 's',
                    Occupant::Fruit => 'f',
                })
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
