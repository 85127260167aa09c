use rand::Rng;

use crate::error::GameError;
use crate::pos::{Dir, Pos};

/// A tour visiting every grid tile exactly once, built per game start.
/// Gameplay only reads it; the verifier works on transient timer tables,
/// never on the cycle itself.
pub struct HamiltonianCycle {
    width: i32,
    height: i32,
    next: Vec<u32>,
    prev: Vec<u32>,
}

/// Union-find with path compression and union by rank, for Kruskal.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Returns false if the two elements were already connected.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        if self.rank[ra] < self.rank[rb] {
            self.parent[ra] = rb;
        } else if self.rank[ra] > self.rank[rb] {
            self.parent[rb] = ra;
        } else {
            self.parent[rb] = ra;
            self.rank[ra] += 1;
        }
        true
    }
}

impl HamiltonianCycle {
    /// Builds the cycle from a randomized spanning tree over the
    /// half-resolution grid. Dimensions must be even and at least 4.
    pub fn build<R: Rng>(width: i32, height: i32, rng: &mut R) -> Self {
        assert!(
            width >= 4 && height >= 4 && width % 2 == 0 && height % 2 == 0,
            "cycle construction needs even dimensions >= 4"
        );

        let half_w = width / 2;
        let half_h = height / 2;
        let tree = spanning_tree(half_w, half_h, rng);
        let adj = scale_up(&tree, half_w, half_h, width);
        let order = walk_cycle(&adj, (width * height) as usize);

        let total = (width * height) as usize;
        let mut next = vec![0u32; total];
        let mut prev = vec![0u32; total];
        for i in 0..total {
            let from = order[i];
            let to = order[(i + 1) % total];
            next[from as usize] = to;
            prev[to as usize] = from;
        }

        Self {
            width,
            height,
            next,
            prev,
        }
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    fn id(&self, p: Pos) -> usize {
        (p.y * self.width + p.x) as usize
    }

    fn pos(&self, id: u32) -> Pos {
        Pos::new(id as i32 % self.width, id as i32 / self.width)
    }

    fn in_bounds(&self, p: Pos) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    pub fn next_of(&self, p: Pos) -> Result<Pos, GameError> {
        if !self.in_bounds(p) {
            return Err(GameError::NodeNotFound { x: p.x, y: p.y });
        }
        Ok(self.pos(self.next[self.id(p)]))
    }

    pub fn prev_of(&self, p: Pos) -> Result<Pos, GameError> {
        if !self.in_bounds(p) {
            return Err(GameError::NodeNotFound { x: p.x, y: p.y });
        }
        Ok(self.pos(self.prev[self.id(p)]))
    }

    pub fn dir_to_next(&self, p: Pos) -> Result<Dir, GameError> {
        let next = self.next_of(p)?;
        Dir::between(p, next).ok_or(GameError::NodeNotFound { x: next.x, y: next.y })
    }

    pub fn dir_to_prev(&self, p: Pos) -> Result<Dir, GameError> {
        let prev = self.prev_of(p)?;
        Dir::between(p, prev).ok_or(GameError::NodeNotFound { x: prev.x, y: prev.y })
    }

    /// Successor edges, for the debug overlay.
    pub fn edges(&self) -> impl Iterator<Item = (Pos, Pos)> + '_ {
        (0..self.next.len() as u32).map(|id| (self.pos(id), self.pos(self.next[id as usize])))
    }
}

/// Connected cardinal directions per half-resolution cell, indexed by the
/// `Dir` discriminant.
fn spanning_tree<R: Rng>(half_w: i32, half_h: i32, rng: &mut R) -> Vec<[bool; 4]> {
    let n = (half_w * half_h) as usize;
    let cell = |x: i32, y: i32| (x * half_h + y) as usize;

    // Grid-graph edges with uniform random weights in 1..=10. Kruskal's
    // stable sort keeps tie-breaks deterministic for a fixed seed.
    let mut edges: Vec<(usize, usize, u8)> = Vec::new();
    for x in 0..half_w {
        for y in 0..half_h {
            if y < half_h - 1 {
                edges.push((cell(x, y), cell(x, y + 1), rng.gen_range(1..=10)));
            }
            if x < half_w - 1 {
                edges.push((cell(x, y), cell(x + 1, y), rng.gen_range(1..=10)));
            }
        }
    }
    edges.sort_by_key(|&(_, _, w)| w);

    let mut set = DisjointSet::new(n);
    let mut tree = vec![[false; 4]; n];
    for (a, b, _) in edges {
        if set.union(a, b) {
            let (ax, ay) = ((a / half_h as usize) as i32, (a % half_h as usize) as i32);
            let (bx, by) = ((b / half_h as usize) as i32, (b % half_h as usize) as i32);
            let dir = Dir::between(Pos::new(ax, ay), Pos::new(bx, by))
                .expect("spanning tree edges connect adjacent cells");
            tree[a][dir as usize] = true;
            tree[b][dir.opposite() as usize] = true;
        }
    }
    tree
}

/// Doubles the tree into a degree-2 graph on the full grid. Each half cell
/// becomes four sub-tiles; sides without a tree edge close up internally,
/// sides with one connect through to the neighboring cell.
fn scale_up(tree: &[[bool; 4]], half_w: i32, half_h: i32, width: i32) -> Vec<[u32; 2]> {
    let total = (width * 2 * half_h) as usize;
    let mut adj: Vec<Vec<u32>> = vec![Vec::with_capacity(2); total];
    let fid = |x: i32, y: i32| (y * width + x) as u32;

    let mut connect = |a: u32, b: u32| {
        adj[a as usize].push(b);
        adj[b as usize].push(a);
    };

    for x in 0..half_w {
        for y in 0..half_h {
            let cell = (x * half_h + y) as usize;
            // Sub-tiles: n0 top-left, n1 top-right, n2 bottom-left,
            // n3 bottom-right.
            let n0 = fid(2 * x, 2 * y);
            let n1 = fid(2 * x + 1, 2 * y);
            let n2 = fid(2 * x, 2 * y + 1);
            let n3 = fid(2 * x + 1, 2 * y + 1);

            if !tree[cell][Dir::Up as usize] {
                connect(n0, n1);
            }
            if !tree[cell][Dir::Down as usize] {
                connect(n2, n3);
            }
            if !tree[cell][Dir::Left as usize] {
                connect(n0, n2);
            }
            if !tree[cell][Dir::Right as usize] {
                connect(n1, n3);
            }

            // Through-connections are added once, from the cell on the
            // upper/left side of the tree edge.
            if tree[cell][Dir::Right as usize] {
                let m0 = fid(2 * (x + 1), 2 * y);
                let m2 = fid(2 * (x + 1), 2 * y + 1);
                connect(n1, m0);
                connect(n3, m2);
            }
            if tree[cell][Dir::Down as usize] {
                let m0 = fid(2 * x, 2 * (y + 1));
                let m1 = fid(2 * x + 1, 2 * (y + 1));
                connect(n2, m0);
                connect(n3, m1);
            }
        }
    }

    adj.into_iter()
        .map(|links| {
            debug_assert_eq!(links.len(), 2, "every scaled tile has degree 2");
            [links[0], links[1]]
        })
        .collect()
}

/// Follows the degree-2 graph from tile (0, 0) into a single closed tour.
fn walk_cycle(adj: &[[u32; 2]], total: usize) -> Vec<u32> {
    let mut order = Vec::with_capacity(total);
    let start = 0u32;
    let mut current = start;
    let mut came_from = start;

    loop {
        order.push(current);
        let [a, b] = adj[current as usize];
        let next = if a != came_from || order.len() == 1 { a } else { b };
        came_from = current;
        current = next;
        if current == start {
            break;
        }
    }

    debug_assert_eq!(order.len(), total, "spanning tree must yield one cycle");
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn covers_every_tile_exactly_once() {
        for &(w, h) in &[(4, 4), (6, 6), (8, 4), (4, 8), (10, 10)] {
            for seed in 0..4 {
                let mut rng = StdRng::seed_from_u64(seed);
                let cycle = HamiltonianCycle::build(w, h, &mut rng);
                assert_eq!(cycle.len(), (w * h) as usize);

                let mut seen = HashSet::new();
                let start = Pos::new(0, 0);
                let mut p = start;
                for _ in 0..(w * h) {
                    assert!(seen.insert(p), "tile {:?} revisited ({}x{}, seed {})", p, w, h, seed);
                    p = cycle.next_of(p).unwrap();
                }
                assert_eq!(p, start, "cycle must close after {} steps", w * h);
                assert_eq!(seen.len(), (w * h) as usize);
            }
        }
    }

    #[test]
    fn consecutive_tiles_are_adjacent() {
        let mut rng = StdRng::seed_from_u64(9);
        let cycle = HamiltonianCycle::build(8, 8, &mut rng);
        for (from, to) in cycle.edges() {
            let d = (from.x - to.x).abs() + (from.y - to.y).abs();
            assert_eq!(d, 1, "{:?} -> {:?} is not a grid step", from, to);
        }
    }

    #[test]
    fn next_and_prev_are_inverse() {
        let mut rng = StdRng::seed_from_u64(5);
        let cycle = HamiltonianCycle::build(6, 6, &mut rng);
        for y in 0..6 {
            for x in 0..6 {
                let p = Pos::new(x, y);
                let next = cycle.next_of(p).unwrap();
                assert_eq!(cycle.prev_of(next).unwrap(), p);
            }
        }
    }

    #[test]
    fn directions_follow_the_pointers() {
        let mut rng = StdRng::seed_from_u64(2);
        let cycle = HamiltonianCycle::build(6, 4, &mut rng);
        let p = Pos::new(3, 2);
        let next = cycle.next_of(p).unwrap();
        assert_eq!(cycle.dir_to_next(p).unwrap().step(p), next);
        let prev = cycle.prev_of(p).unwrap();
        assert_eq!(cycle.dir_to_prev(p).unwrap().step(p), prev);
    }

    #[test]
    fn out_of_bounds_lookup_is_a_node_not_found() {
        let mut rng = StdRng::seed_from_u64(2);
        let cycle = HamiltonianCycle::build(4, 4, &mut rng);
        assert_eq!(
            cycle.next_of(Pos::new(4, 0)).err(),
            Some(GameError::NodeNotFound { x: 4, y: 0 })
        );
    }

    #[test]
    fn same_seed_same_cycle() {
        let mut a = StdRng::seed_from_u64(123);
        let mut b = StdRng::seed_from_u64(123);
        let ca = HamiltonianCycle::build(8, 8, &mut a);
        let cb = HamiltonianCycle::build(8, 8, &mut b);
        assert_eq!(ca.next, cb.next);
    }
}
