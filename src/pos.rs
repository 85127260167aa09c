#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Cardinal heading, in counterclockwise discriminant order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Dir {
    Right,
    Up,
    Left,
    Down,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Right, Dir::Up, Dir::Left, Dir::Down];

    /// Tile delta, y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Right => (1, 0),
            Dir::Up => (0, -1),
            Dir::Left => (-1, 0),
            Dir::Down => (0, 1),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Right => Dir::Left,
            Dir::Up => Dir::Down,
            Dir::Left => Dir::Right,
            Dir::Down => Dir::Up,
        }
    }

    pub fn step(self, from: Pos) -> Pos {
        let (dx, dy) = self.delta();
        Pos::new(from.x + dx, from.y + dy)
    }

    /// Direction from `a` to a grid-adjacent tile `b`.
    pub fn between(a: Pos, b: Pos) -> Option<Dir> {
        Dir::ALL
            .into_iter()
            .find(|d| d.step(a) == b)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_matches_angle_stepping() {
        // Angle-based stepping computes round(x + cos d), round(y - sin d)
        // with a small epsilon bias (y grows downward). The enum table must
        // agree for all four cardinal angles.
        use std::f64::consts::FRAC_PI_2;
        const EPSILON: f64 = 0.0001;
        for (i, dir) in Dir::ALL.into_iter().enumerate() {
            let rad = i as f64 * FRAC_PI_2;
            let dx = (rad.cos() + EPSILON).round() as i32;
            let dy = (-rad.sin() + EPSILON).round() as i32;
            assert_eq!(dir.delta(), (dx, dy), "mismatch for {:?}", dir);
        }
    }

    #[test]
    fn step_round_trip() {
        let origin = Pos::new(5, 5);
        for dir in Dir::ALL {
            let there = dir.step(origin);
            assert_eq!(dir.opposite().step(there), origin);
        }
    }

    #[test]
    fn between_adjacent_tiles() {
        let p = Pos::new(3, 3);
        assert_eq!(Dir::between(p, Pos::new(4, 3)), Some(Dir::Right));
        assert_eq!(Dir::between(p, Pos::new(3, 2)), Some(Dir::Up));
        assert_eq!(Dir::between(p, Pos::new(3, 4)), Some(Dir::Down));
        assert_eq!(Dir::between(p, Pos::new(2, 3)), Some(Dir::Left));
        assert_eq!(Dir::between(p, Pos::new(5, 3)), None);
    }
}
