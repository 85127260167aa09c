use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};

use crate::error::PlanError;
use crate::pos::{Dir, Pos};

/// Guards against runaway search on large or badly blocked boards.
const MAX_EXPANSIONS: u32 = 1000;

/// Time-aware occupancy view the planner searches against. `vacate` holds,
/// per tile, the last tick the tile is still taken (0 = free now). A tile
/// is passable once the arrival tick is strictly past its vacate tick, the
/// "soon-to-be-vacated" relaxation: the snake will have moved on by then.
pub struct Occupancy {
    width: i32,
    height: i32,
    vacate: Vec<u32>,
}

impl Occupancy {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            vacate: vec![0; (width * height) as usize],
        }
    }

    pub fn in_bounds(&self, p: Pos) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    pub fn block_until(&mut self, p: Pos, tick: u32) {
        let i = (p.y * self.width + p.x) as usize;
        self.vacate[i] = self.vacate[i].max(tick);
    }

    pub fn vacate_tick(&self, p: Pos) -> u32 {
        self.vacate[(p.y * self.width + p.x) as usize]
    }

    pub fn passable(&self, p: Pos, arrival: u32) -> bool {
        self.in_bounds(p) && arrival > self.vacate_tick(p)
    }
}

/// Open-set entry ordered by lowest f-cost (BinaryHeap is a max-heap).
struct Open {
    f: f64,
    g: u32,
    pos: Pos,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}

impl Eq for Open {}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f)
    }
}

fn heuristic(a: Pos, b: Pos) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Shortest direction sequence from `start` to `goal`, one entry per tick.
/// The goal tile itself is always considered passable (it is the apple).
pub fn plan(occ: &Occupancy, start: Pos, goal: Pos) -> Result<Vec<Dir>, PlanError> {
    let mut open = BinaryHeap::new();
    let mut best_g: AHashMap<Pos, u32> = AHashMap::new();
    let mut came_from: AHashMap<Pos, Pos> = AHashMap::new();
    let mut closed: AHashSet<Pos> = AHashSet::new();

    open.push(Open {
        f: heuristic(start, goal),
        g: 0,
        pos: start,
    });
    best_g.insert(start, 0);

    let mut expansions = 0;
    while let Some(current) = open.pop() {
        if current.pos == goal {
            return Ok(trace(&came_from, start, goal));
        }

        // Stale entry from a re-insertion; the better one was handled.
        if best_g.get(&current.pos).is_some_and(|&g| g < current.g) {
            continue;
        }
        if !closed.insert(current.pos) {
            continue;
        }

        expansions += 1;
        if expansions > MAX_EXPANSIONS {
            return Err(PlanError::IterationLimitExceeded);
        }

        let arrival = current.g + 1;
        for dir in Dir::ALL {
            let next = dir.step(current.pos);
            if !occ.in_bounds(next) || closed.contains(&next) {
                continue;
            }
            if next != goal && !occ.passable(next, arrival) {
                continue;
            }
            // Re-insertion on improvement stands in for decrease-key.
            if best_g.get(&next).is_none_or(|&g| arrival < g) {
                best_g.insert(next, arrival);
                came_from.insert(next, current.pos);
                open.push(Open {
                    f: arrival as f64 + heuristic(next, goal),
                    g: arrival,
                    pos: next,
                });
            }
        }
    }

    Err(PlanError::NoPathFound)
}

fn trace(came_from: &AHashMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Dir> {
    let mut tiles = vec![goal];
    let mut p = goal;
    while p != start {
        p = came_from[&p];
        tiles.push(p);
    }
    tiles.reverse();

    tiles
        .windows(2)
        .map(|w| Dir::between(w[0], w[1]).expect("path tiles are adjacent"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(start: Pos, path: &[Dir]) -> Pos {
        path.iter().fold(start, |p, d| d.step(p))
    }

    #[test]
    fn shortest_path_on_empty_grid() {
        let occ = Occupancy::new(10, 10);
        let path = plan(&occ, Pos::new(0, 0), Pos::new(5, 5)).unwrap();
        assert_eq!(path.len(), 10);
        assert_eq!(apply(Pos::new(0, 0), &path), Pos::new(5, 5));
    }

    #[test]
    fn detours_around_a_wall() {
        let mut occ = Occupancy::new(7, 7);
        // Vertical wall at x=3, open only at y=6.
        for y in 0..6 {
            occ.block_until(Pos::new(3, y), u32::MAX);
        }
        let start = Pos::new(0, 3);
        let goal = Pos::new(6, 3);
        let path = plan(&occ, start, goal).unwrap();
        assert_eq!(apply(start, &path), goal);
        // Detour through (3, 6) costs 3 + 3 down, 6 across... at least 12.
        assert!(path.len() >= 12);
    }

    #[test]
    fn enclosed_start_finds_no_path() {
        let mut occ = Occupancy::new(8, 8);
        for p in [Pos::new(1, 0), Pos::new(0, 1), Pos::new(1, 1)] {
            occ.block_until(p, u32::MAX);
        }
        assert_eq!(
            plan(&occ, Pos::new(0, 0), Pos::new(7, 7)).err(),
            Some(PlanError::NoPathFound)
        );
    }

    #[test]
    fn soon_vacated_tile_is_passable() {
        let mut occ = Occupancy::new(4, 2);
        // Taken now, free from tick 2 onward; the direct path arrives there
        // at tick 2.
        occ.block_until(Pos::new(2, 0), 1);
        let path = plan(&occ, Pos::new(0, 0), Pos::new(3, 0)).unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn late_vacated_tile_forces_a_detour() {
        let mut occ = Occupancy::new(4, 2);
        occ.block_until(Pos::new(2, 0), 5);
        let path = plan(&occ, Pos::new(0, 0), Pos::new(3, 0)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(apply(Pos::new(0, 0), &path), Pos::new(3, 0));
    }

    #[test]
    fn goal_tile_ignores_occupancy() {
        let mut occ = Occupancy::new(4, 4);
        occ.block_until(Pos::new(3, 3), u32::MAX);
        let path = plan(&occ, Pos::new(0, 0), Pos::new(3, 3)).unwrap();
        assert_eq!(apply(Pos::new(0, 0), &path), Pos::new(3, 3));
    }
}
