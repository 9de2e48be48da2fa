/// Direction tiles slide in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in traversal table order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Index into per-direction tables
    pub fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Classify a drag gesture by its dominant axis.
    ///
    /// `dy` is scaled by `aspect` before comparing, so callers working in
    /// terminal cells (roughly twice as tall as wide) can pass 2. Returns
    /// `None` for a zero-length drag.
    pub fn from_swipe(dx: i32, dy: i32, aspect: i32) -> Option<Direction> {
        let scaled_dy = dy.saturating_mul(aspect);
        if dx == 0 && dy == 0 {
            return None;
        }

        if dx.abs() > scaled_dy.abs() {
            if dx > 0 {
                Some(Direction::Right)
            } else {
                Some(Direction::Left)
            }
        } else if dy > 0 {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}
