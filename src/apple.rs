use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::GameError;
use crate::grid::{Grid, TileKind};
use crate::pos::Pos;

/// The single food item. Holds only its position; the grid tile is the
/// authoritative occupancy record.
pub struct Apple {
    pub pos: Pos,
}

impl Apple {
    pub fn spawn<R: Rng>(grid: &mut Grid, rng: &mut R) -> Result<Self, GameError> {
        let mut apple = Self { pos: Pos::new(0, 0) };
        apple.respawn(grid, rng)?;
        Ok(apple)
    }

    /// Moves the apple to a uniformly random unoccupied tile. A full board
    /// means the snake covers everything: the win condition.
    pub fn respawn<R: Rng>(&mut self, grid: &mut Grid, rng: &mut R) -> Result<Pos, GameError> {
        if grid.kind(self.pos) == TileKind::Apple {
            grid.set(self.pos, TileKind::Empty);
        }

        let free = grid.free_positions();
        let Some(&p) = free.choose(rng) else {
            return Err(GameError::BoardFull);
        };

        grid.set(p, TileKind::Apple);
        self.pos = p;
        Ok(p)
    }
}
