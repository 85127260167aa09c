use crate::pos::Pos;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TileKind {
    #[default]
    Empty,
    SnakeHead,
    SnakeBody,
    Apple,
}

/// Fixed-size tile board. Single source of truth for occupancy; the snake
/// and apple mutate tiles here as a side effect of their own moves.
pub struct Grid {
    pub width: i32,
    pub height: i32,
    tiles: Vec<TileKind>,
    pub active: bool,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0);
        Self {
            width,
            height,
            tiles: vec![TileKind::Empty; (width * height) as usize],
            active: true,
        }
    }

    /// Resets every tile to empty and re-arms the board (game-over path).
    pub fn clear(&mut self) {
        self.tiles.fill(TileKind::Empty);
        self.active = true;
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn idx(&self, p: Pos) -> usize {
        debug_assert!(self.in_bounds(p.x, p.y));
        (p.y * self.width + p.x) as usize
    }

    pub fn kind(&self, p: Pos) -> TileKind {
        self.tiles[self.idx(p)]
    }

    pub fn set(&mut self, p: Pos, kind: TileKind) {
        let i = self.idx(p);
        self.tiles[i] = kind;
    }

    pub fn occupied(&self, p: Pos) -> bool {
        self.kind(p) != TileKind::Empty
    }

    pub fn free_positions(&self) -> Vec<Pos> {
        let mut free = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Pos::new(x, y);
                if !self.occupied(p) {
                    free.push(p);
                }
            }
        }
        free
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty_and_active() {
        let grid = Grid::new(8, 6);
        assert!(grid.active);
        assert_eq!(grid.free_positions().len(), 48);
    }

    #[test]
    fn set_and_clear() {
        let mut grid = Grid::new(4, 4);
        let p = Pos::new(2, 1);
        grid.set(p, TileKind::Apple);
        assert_eq!(grid.kind(p), TileKind::Apple);
        assert!(grid.occupied(p));
        assert_eq!(grid.free_positions().len(), 15);

        grid.active = false;
        grid.clear();
        assert!(grid.active);
        assert!(!grid.occupied(p));
        assert_eq!(grid.free_positions().len(), 16);
    }

    #[test]
    fn bounds() {
        let grid = Grid::new(5, 3);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(4, 2));
        assert!(!grid.in_bounds(5, 0));
        assert!(!grid.in_bounds(0, 3));
        assert!(!grid.in_bounds(-1, 1));
    }
}
