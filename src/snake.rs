use std::collections::VecDeque;

use rand::Rng;

use crate::apple::Apple;
use crate::error::GameError;
use crate::grid::{Grid, TileKind};
use crate::pos::{Dir, Pos};

pub const INITIAL_LENGTH: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    Moved,
    Ate,
    Died,
    Won,
}

/// The growing segment chain. `body` is head-first; `length` is the target
/// the body grows toward after eating.
pub struct Snake {
    pub body: VecDeque<Pos>,
    pub length: usize,
    pub dir: Dir,
    /// Heading of the last committed move. Steering rejects its opposite so
    /// the snake cannot fold back on itself in a single tick.
    pub natural_dir: Dir,
    pub lives: u32,
    pub active: bool,
    spawn: Pos,
}

impl Snake {
    pub fn new(grid: &mut Grid, lives: u32) -> Self {
        let spawn = Pos::new(grid.width / 2, grid.height / 2);
        let mut snake = Self {
            body: VecDeque::new(),
            length: INITIAL_LENGTH,
            dir: Dir::Up,
            natural_dir: Dir::Up,
            lives,
            active: true,
            spawn,
        };
        snake.reset(grid);
        snake
    }

    /// Places a fresh single-tile snake at the spawn point. Deactivates
    /// instead if the spawn tile is already taken.
    fn reset(&mut self, grid: &mut Grid) {
        if grid.occupied(self.spawn) {
            self.active = false;
            return;
        }
        self.body.clear();
        self.body.push_front(self.spawn);
        self.length = INITIAL_LENGTH;
        self.dir = Dir::Up;
        self.natural_dir = Dir::Up;
        self.active = true;
        grid.set(self.spawn, TileKind::SnakeHead);
    }

    pub fn head(&self) -> Pos {
        *self.body.front().expect("snake body is never empty while active")
    }

    /// One tile ahead of the head in the given direction.
    pub fn peek_next(&self, dir: Dir) -> Pos {
        dir.step(self.head())
    }

    /// True if moving in `dir` hits a wall or an occupied non-apple tile.
    /// The apple is never danger.
    pub fn is_danger_ahead(&self, grid: &Grid, apple: Pos, dir: Dir) -> bool {
        let next = self.peek_next(dir);
        if !grid.in_bounds(next.x, next.y) {
            return true;
        }
        if next == apple {
            return false;
        }
        grid.occupied(next)
    }

    /// Rejects 180-degree turns against the committed heading.
    pub fn steer(&mut self, dir: Dir) {
        if dir != self.natural_dir.opposite() {
            self.dir = dir;
        }
    }

    /// Commits one simulation step in the current heading.
    pub fn advance<R: Rng>(
        &mut self,
        grid: &mut Grid,
        apple: &mut Apple,
        rng: &mut R,
    ) -> StepOutcome {
        if !self.active {
            return StepOutcome::Died;
        }

        if self.is_danger_ahead(grid, apple.pos, self.dir) {
            self.die(grid);
            return StepOutcome::Died;
        }

        let next = self.peek_next(self.dir);
        let ate = next == apple.pos;

        grid.set(self.head(), TileKind::SnakeBody);
        self.body.push_front(next);
        grid.set(next, TileKind::SnakeHead);
        self.natural_dir = self.dir;

        if ate {
            self.length += 1;
            if self.length >= (grid.width * grid.height) as usize {
                self.active = false;
                return StepOutcome::Won;
            }
            match apple.respawn(grid, rng) {
                Ok(_) => return StepOutcome::Ate,
                Err(GameError::BoardFull) => {
                    self.active = false;
                    return StepOutcome::Won;
                }
                Err(_) => unreachable!(),
            }
        }

        // Pop the tail once the body has caught up with the target length;
        // keeping it is what makes the snake grow.
        while self.body.len() > self.length {
            if let Some(tail) = self.body.pop_back() {
                grid.set(tail, TileKind::Empty);
            }
        }

        StepOutcome::Moved
    }

    /// Clears the body off the grid, spends a life, and either respawns or
    /// deactivates for good.
    fn die(&mut self, grid: &mut Grid) {
        for &p in &self.body {
            grid.set(p, TileKind::Empty);
        }
        self.body.clear();
        self.lives = self.lives.saturating_sub(1);

        if self.lives > 0 {
            self.reset(grid);
        } else {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup(w: i32, h: i32, lives: u32) -> (Grid, Snake, Apple, StdRng) {
        let mut grid = Grid::new(w, h);
        let mut rng = StdRng::seed_from_u64(11);
        let snake = Snake::new(&mut grid, lives);
        let apple = Apple::spawn(&mut grid, &mut rng).unwrap();
        (grid, snake, apple, rng)
    }

    /// Moves the apple to a fixed tile so a test can control the board.
    fn park_apple(grid: &mut Grid, apple: &mut Apple, at: Pos) {
        grid.set(apple.pos, TileKind::Empty);
        apple.pos = at;
        grid.set(at, TileKind::Apple);
    }

    #[test]
    fn spawns_at_center_facing_up() {
        let (grid, snake, _, _) = setup(10, 10, 1);
        assert_eq!(snake.head(), Pos::new(5, 5));
        assert_eq!(snake.dir, Dir::Up);
        assert_eq!(snake.length, INITIAL_LENGTH);
        assert_eq!(grid.kind(Pos::new(5, 5)), TileKind::SnakeHead);
    }

    #[test]
    fn grows_by_one_per_apple() {
        let (mut grid, mut snake, mut apple, mut rng) = setup(10, 10, 1);

        // Walk the snake onto the apple by manual steering.
        for _ in 0..200 {
            let head = snake.head();
            let target = apple.pos;
            let dir = if target.x > head.x {
                Dir::Right
            } else if target.x < head.x {
                Dir::Left
            } else if target.y < head.y {
                Dir::Up
            } else {
                Dir::Down
            };
            snake.steer(dir);
            if snake.is_danger_ahead(&grid, apple.pos, snake.dir) {
                // sidestep; the short test snake has room
                for d in Dir::ALL {
                    if !snake.is_danger_ahead(&grid, apple.pos, d)
                        && d != snake.natural_dir.opposite()
                    {
                        snake.steer(d);
                        break;
                    }
                }
            }
            if snake.advance(&mut grid, &mut apple, &mut rng) == StepOutcome::Ate {
                break;
            }
        }
        assert_eq!(snake.length, INITIAL_LENGTH + 1);
    }

    #[test]
    fn body_catches_up_with_target_length() {
        let (mut grid, mut snake, mut apple, mut rng) = setup(12, 12, 1);
        park_apple(&mut grid, &mut apple, Pos::new(0, 0));
        for _ in 0..INITIAL_LENGTH {
            snake.advance(&mut grid, &mut apple, &mut rng);
        }
        assert_eq!(snake.body.len(), INITIAL_LENGTH);
        // Consecutive body tiles stay grid-adjacent.
        for pair in snake.body.iter().zip(snake.body.iter().skip(1)) {
            let d = (pair.0.x - pair.1.x).abs() + (pair.0.y - pair.1.y).abs();
            assert_eq!(d, 1);
        }
    }

    #[test]
    fn wall_hit_spends_a_life_and_respawns() {
        let (mut grid, mut snake, mut apple, mut rng) = setup(8, 8, 2);
        park_apple(&mut grid, &mut apple, Pos::new(0, 7));
        // Drive straight up into the wall.
        loop {
            if snake.advance(&mut grid, &mut apple, &mut rng) == StepOutcome::Died {
                break;
            }
        }
        assert_eq!(snake.lives, 1);
        assert!(snake.active);
        assert_eq!(snake.head(), Pos::new(4, 4));
    }

    #[test]
    fn last_life_deactivates() {
        let (mut grid, mut snake, mut apple, mut rng) = setup(8, 8, 1);
        park_apple(&mut grid, &mut apple, Pos::new(0, 7));
        loop {
            if snake.advance(&mut grid, &mut apple, &mut rng) == StepOutcome::Died {
                break;
            }
        }
        assert_eq!(snake.lives, 0);
        assert!(!snake.active);
    }

    #[test]
    fn steering_rejects_reversal() {
        let (mut grid, mut snake, mut apple, mut rng) = setup(8, 8, 1);
        park_apple(&mut grid, &mut apple, Pos::new(0, 0));
        snake.advance(&mut grid, &mut apple, &mut rng);
        assert_eq!(snake.natural_dir, Dir::Up);
        snake.steer(Dir::Down);
        assert_eq!(snake.dir, Dir::Up);
        snake.steer(Dir::Left);
        assert_eq!(snake.dir, Dir::Left);
    }

    #[test]
    fn eating_the_apple_is_not_danger() {
        let (mut grid, snake, mut apple, _) = setup(8, 8, 1);
        let ahead = snake.peek_next(Dir::Up);
        park_apple(&mut grid, &mut apple, ahead);
        assert!(!snake.is_danger_ahead(&grid, apple.pos, Dir::Up));
    }
}
