use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::apple::Apple;
use crate::astar::{self, Occupancy};
use crate::cycle::HamiltonianCycle;
use crate::grid::Grid;
use crate::pos::{Dir, Pos};
use crate::snake::Snake;

/// Autonomous pilot: prefers a verified A* shortcut to the apple, falls
/// back to Hamiltonian-cycle following, and re-verifies every fallback
/// move against the live body before committing to it.
pub struct Autopilot {
    /// Directions of an approved shortcut, consumed one per tick. Each
    /// queued step is still checked against immediate danger; a stale
    /// plan drops the whole queue.
    queue: VecDeque<Dir>,
    /// Whether the last approved rejoin ran the cycle tail-first. The
    /// cycle is undirected for safety purposes, so fallback prefers the
    /// same orientation.
    reverse: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            reverse: false,
        }
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.reverse = false;
    }

    /// Picks the direction for this tick. Every choice that is not part
    /// of an already-approved shortcut goes through the rejoin check, so
    /// cycle-following is re-proven against the current body each tick
    /// instead of trusted blindly.
    pub fn decide(
        &mut self,
        grid: &Grid,
        snake: &Snake,
        apple: &Apple,
        cycle: &HamiltonianCycle,
    ) -> Dir {
        if let Some(dir) = self.queue.pop_front() {
            if dir != snake.natural_dir.opposite() && !snake.is_danger_ahead(grid, apple.pos, dir)
            {
                return dir;
            }
            // The board no longer matches what the plan was verified
            // against; drop it and decide from scratch.
            debug!(?dir, "queued step turned unsafe, replanning");
            self.queue.clear();
        }

        if let Some(dir) = self.try_shortcut(grid, snake, apple, cycle) {
            return dir;
        }

        if let Some(dir) = self.follow_cycle(grid, snake, apple, cycle) {
            return dir;
        }

        if let Some(dir) = self.sidestep(grid, snake, apple, cycle) {
            return dir;
        }

        // Nothing verifies; any open tile buys a tick.
        warn!("no verified direction, taking any open tile");
        Dir::ALL
            .into_iter()
            .find(|&d| {
                d != snake.natural_dir.opposite() && !snake.is_danger_ahead(grid, apple.pos, d)
            })
            .unwrap_or(snake.natural_dir)
    }

    /// Runs the planner and, if the candidate path passes the rejoin
    /// check, loads its tail into the queue and returns its first step.
    fn try_shortcut(
        &mut self,
        grid: &Grid,
        snake: &Snake,
        apple: &Apple,
        cycle: &HamiltonianCycle,
    ) -> Option<Dir> {
        let occ = occupancy_of(grid, snake);
        let path = match astar::plan(&occ, snake.head(), apple.pos) {
            Ok(path) if !path.is_empty() => path,
            Ok(_) => return None,
            Err(err) => {
                debug!(%err, "planner found no shortcut");
                return None;
            }
        };

        for reverse in [self.reverse, !self.reverse] {
            match self.rejoin_is_clear(grid, snake, cycle, &path, reverse, apple.pos) {
                Ok(true) => {
                    debug!(len = path.len(), reverse, "shortcut approved");
                    self.reverse = reverse;
                    let mut steps = VecDeque::from(path);
                    let first = steps.pop_front()?;
                    self.queue = steps;
                    return Some(first);
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(%err, "rejoin check hit a missing node");
                    return None;
                }
            }
        }

        debug!(len = path.len(), "shortcut rejected, staying on the cycle");
        None
    }

    /// One verified step along the cycle, preferring the current
    /// orientation but willing to turn around when only the other one
    /// clears.
    fn follow_cycle(
        &mut self,
        grid: &Grid,
        snake: &Snake,
        apple: &Apple,
        cycle: &HamiltonianCycle,
    ) -> Option<Dir> {
        let head = snake.head();
        for reverse in [self.reverse, !self.reverse] {
            let followed = if reverse {
                cycle.dir_to_prev(head)
            } else {
                cycle.dir_to_next(head)
            };
            let dir = match followed {
                Ok(dir) => dir,
                Err(err) => {
                    warn!(%err, "cycle lookup failed");
                    continue;
                }
            };
            if dir == snake.natural_dir.opposite() || snake.is_danger_ahead(grid, apple.pos, dir)
            {
                continue;
            }
            if matches!(
                self.rejoin_is_clear(grid, snake, cycle, &[dir], reverse, apple.pos),
                Ok(true)
            ) {
                if reverse != self.reverse {
                    debug!(reverse, "switching cycle orientation");
                }
                self.reverse = reverse;
                return Some(dir);
            }
        }
        None
    }

    /// Last resort before an unverified move: step off the cycle onto any
    /// open neighbor from which a cycle walk in either orientation still
    /// clears.
    fn sidestep(
        &mut self,
        grid: &Grid,
        snake: &Snake,
        apple: &Apple,
        cycle: &HamiltonianCycle,
    ) -> Option<Dir> {
        for dir in Dir::ALL {
            if dir == snake.natural_dir.opposite() || snake.is_danger_ahead(grid, apple.pos, dir)
            {
                continue;
            }
            for reverse in [self.reverse, !self.reverse] {
                if matches!(
                    self.rejoin_is_clear(grid, snake, cycle, &[dir], reverse, apple.pos),
                    Ok(true)
                ) {
                    debug!(?dir, reverse, "sidestepping onto a clear rejoin");
                    self.reverse = reverse;
                    return Some(dir);
                }
            }
        }
        None
    }

    /// Simulates the path's aftermath: with the body's vacate timers plus
    /// the hypothetical path occupancy, the snake must be able to walk
    /// the cycle from the path's end for its own length without meeting a
    /// tile that is still taken at that future tick.
    ///
    /// Eating at the path's end skips one tail pop, so when the path
    /// lands on the apple every tile still held at that tick frees one
    /// tick later, and path tiles are held one tick longer too. Timers
    /// beyond the walk window are at most `length + 1`, which the window
    /// outlasts, so a clear walk is clear however far it is extended.
    fn rejoin_is_clear(
        &self,
        grid: &Grid,
        snake: &Snake,
        cycle: &HamiltonianCycle,
        path: &[Dir],
        reverse: bool,
        apple: Pos,
    ) -> Result<bool, crate::error::GameError> {
        let mut timers = occupancy_of(grid, snake);
        let len = snake.length as u32;
        let depart = path.len() as u32;

        let end = path.iter().fold(snake.head(), |p, dir| dir.step(p));
        let eats = end == apple;
        if eats {
            for &p in &snake.body {
                let vacate = timers.vacate_tick(p);
                if vacate >= depart {
                    timers.block_until(p, vacate + 1);
                }
            }
        }

        // Arriving at tick t, the snake sits on the tile until its tail
        // passes.
        let hold = len + u32::from(eats);
        let mut p = snake.head();
        for (i, dir) in path.iter().enumerate() {
            let t = i as u32 + 1;
            p = dir.step(p);
            timers.block_until(p, t + hold);
        }

        let mut cur = end;
        for k in 1..=hold + 1 {
            cur = if reverse {
                cycle.prev_of(cur)?
            } else {
                cycle.next_of(cur)?
            };
            if !timers.passable(cur, depart + k) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Vacate timers from the live body: the tail frees its tile first, the
/// head last. Timers run off the target length because a still-growing
/// body does not pop its tail until it has caught up.
fn occupancy_of(grid: &Grid, snake: &Snake) -> Occupancy {
    let mut occ = Occupancy::new(grid.width, grid.height);
    let len = snake.length as u32;
    for (i, &p) in snake.body.iter().enumerate() {
        occ.block_until(p, len - i as u32);
    }
    occ
}
