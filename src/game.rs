use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use crate::agent::Autopilot;
use crate::apple::Apple;
use crate::config::Config;
use crate::cycle::HamiltonianCycle;
use crate::grid::Grid;
use crate::pos::Dir;
use crate::snake::{Snake, StepOutcome};

/// The whole simulation context: board, actors, cycle, pilot and clock.
/// One writer (the tick), any number of readers between ticks.
pub struct SnakeGame {
    pub grid: Grid,
    pub snake: Snake,
    pub apple: Apple,
    pub cycle: HamiltonianCycle,
    pilot: Autopilot,
    pub autopilot: bool,
    pub paused: bool,
    pub won: bool,
    pub score: usize,
    pub tick_count: u64,
    speed: u64,
    lives: u32,
    next_dir: Option<Dir>,
    subsequent_dir: Option<Dir>,
    rng: SmallRng,
}

impl SnakeGame {
    pub fn new(config: &Config) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut grid = Grid::new(config.grid_width, config.grid_height);
        let snake = Snake::new(&mut grid, config.lives);
        let apple = Apple::spawn(&mut grid, &mut rng)
            .expect("a fresh board always has room for the apple");
        let cycle = HamiltonianCycle::build(config.grid_width, config.grid_height, &mut rng);

        info!(
            width = config.grid_width,
            height = config.grid_height,
            cycle_len = cycle.len(),
            autopilot = config.autopilot,
            "new game"
        );

        Self {
            grid,
            snake,
            apple,
            cycle,
            pilot: Autopilot::new(),
            autopilot: config.autopilot,
            paused: false,
            won: false,
            score: 0,
            tick_count: 0,
            speed: config.speed,
            lives: config.lives,
            next_dir: None,
            subsequent_dir: None,
            rng,
        }
    }

    pub fn game_over(&self) -> bool {
        !self.grid.active
    }

    /// Tears the whole context down and rebuilds it, including a fresh
    /// cycle. Any in-flight pilot state is discarded.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.snake = Snake::new(&mut self.grid, self.lives);
        self.apple = Apple::spawn(&mut self.grid, &mut self.rng)
            .expect("a fresh board always has room for the apple");
        self.cycle = HamiltonianCycle::build(self.grid.width, self.grid.height, &mut self.rng);
        self.pilot.clear();
        self.won = false;
        self.score = 0;
        self.tick_count = 0;
        self.next_dir = None;
        self.subsequent_dir = None;
        info!("game reset");
    }

    /// One simulation tick. Movement happens only every `speed`-th tick;
    /// everything in here runs to completion before rendering reads state.
    pub fn tick(&mut self) {
        self.tick_count += 1;
        if self.game_over() || self.paused {
            return;
        }

        if !self.snake.active {
            info!(score = self.score, "game over");
            self.grid.active = false;
            return;
        }

        if self.tick_count % self.speed != 0 {
            return;
        }

        let dir = if self.autopilot {
            self.pilot
                .decide(&self.grid, &self.snake, &self.apple, &self.cycle)
        } else {
            match self.next_dir.take() {
                Some(d) => {
                    self.next_dir = self.subsequent_dir.take();
                    d
                }
                None => self.snake.dir,
            }
        };
        self.snake.steer(dir);

        match self.snake.advance(&mut self.grid, &mut self.apple, &mut self.rng) {
            StepOutcome::Ate => self.score += 1,
            StepOutcome::Won => {
                info!(score = self.score, "board full, perfect run");
                self.won = true;
                self.grid.active = false;
            }
            StepOutcome::Died => {
                // Discard in-flight plans; the body layout they were
                // verified against is gone.
                self.pilot.clear();
                self.next_dir = None;
                self.subsequent_dir = None;
            }
            StepOutcome::Moved => {}
        }
    }

    /// Buffers a steering input for manual play. Two slots deep so a fast
    /// double-tap (e.g. up-then-left round a corner) lands on consecutive
    /// moves; direct reversals are dropped.
    pub fn queue_direction(&mut self, dir: Dir) {
        if self.autopilot {
            return;
        }
        if self.next_dir.is_none() {
            if dir != self.snake.natural_dir.opposite() {
                self.next_dir = Some(dir);
            }
        } else if self.subsequent_dir.is_none() {
            if self.next_dir != Some(dir.opposite()) {
                self.subsequent_dir = Some(dir);
            }
        } else {
            self.next_dir = self.subsequent_dir;
            self.subsequent_dir = Some(dir);
        }
    }

    pub fn toggle_autopilot(&mut self) {
        self.autopilot = !self.autopilot;
        self.pilot.clear();
        self.next_dir = None;
        self.subsequent_dir = None;
        info!(autopilot = self.autopilot, "autopilot toggled");
    }
}
