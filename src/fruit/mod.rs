//! Fruit and the randomized search for somewhere to put it
use rand::seq::IteratorRandom;
use rand::Rng;
use tracing::{instrument, trace};

use crate::config::{FruitRange, GameConfig};
use crate::error::GameError;
use crate::grid::{Grid, Occupant};
use crate::types::{PieceHandle, Position};

/// how many random cells are tried before placement gives up
pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 200;

/// A fruit sitting on the board
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fruit {
    position: Position,
    handle: PieceHandle,
}

impl Fruit {
    #[allow(missing_docs)]
    pub fn new(position: Position, handle: PieceHandle) -> Self {
        Fruit { position, handle }
    }

    #[allow(missing_docs)]
    pub fn position(&self) -> Position {
        self.position
    }

    #[allow(missing_docs)]
    pub fn handle(&self) -> PieceHandle {
        self.handle
    }
}

/// Finds empty cells for new fruit by sampling the board at random
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FruitPlacer {
    attempts: u32,
    range: FruitRange,
    exhaustive_fallback: bool,
}

impl Default for FruitPlacer {
    fn default() -> Self {
        FruitPlacer::new(DEFAULT_PLACEMENT_ATTEMPTS, FruitRange::default())
    }
}

impl FruitPlacer {
    /// a placer trying at most `attempts` random cells drawn from `range`
    pub fn new(attempts: u32, range: FruitRange) -> Self {
        FruitPlacer {
            attempts,
            range,
            exhaustive_fallback: false,
        }
    }

    /// the placer described by `config`
    pub fn from_config(config: &GameConfig) -> Self {
        FruitPlacer::new(config.placement_attempts, config.fruit_range)
            .with_exhaustive_fallback(config.exhaustive_fallback)
    }

    /// when enabled, running out of attempts falls back to picking among all
    /// empty cells, so placement only fails on a full board
    pub fn with_exhaustive_fallback(mut self, enabled: bool) -> Self {
        self.exhaustive_fallback = enabled;
        self
    }

    #[allow(missing_docs)]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[allow(missing_docs)]
    pub fn range(&self) -> FruitRange {
        self.range
    }

    /// Tags a random empty cell of `grid` as fruit and returns its position.
    ///
    /// On failure the grid is left exactly as it was.
    #[instrument(level = "trace", skip_all)]
    pub fn place_fruit<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
    ) -> Result<Position, GameError> {
        let max_x = self.range.upper_bound(grid.width());
        let max_y = self.range.upper_bound(grid.height());

        for attempt in 1..=self.attempts {
            let candidate = Position::new(rng.gen_range(0..max_x), rng.gen_range(0..max_y));
            if grid.occupant_at(candidate)? == Occupant::Empty {
                trace!(%candidate, attempt, "found a spot for fruit");
                grid.set_occupant(candidate, Occupant::Fruit)?;
                return Ok(candidate);
            }
        }

        if self.exhaustive_fallback {
            let chosen = grid.empty_cells().choose(rng);
            if let Some(candidate) = chosen {
                trace!(%candidate, "placed fruit by scanning the board");
                grid.set_occupant(candidate, Occupant::Fruit)?;
                return Ok(candidate);
            }
        }

        Err(GameError::PlacementFailed {
            attempts: self.attempts,
        })
    }
}
