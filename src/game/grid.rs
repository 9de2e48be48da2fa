use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

use super::action::Direction;
use super::cell::Cell;
use super::config::GRID_SIZE;

/// A cell coordinate; `x` is the column, `y` the row, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// One line of cells in the direction of travel, destination first
pub type Group = [Position; GRID_SIZE];

/// All lines for one direction
pub type Traversal = [Group; GRID_SIZE];

/// The board: a fixed arena of cells plus per-direction traversal orders
#[derive(Debug)]
pub struct Grid {
    /// Indexed `[row][column]`
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
    /// Indexed by `Direction::index`
    traversals: [Traversal; 4],
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|y| std::array::from_fn(|x| Cell::new(Position::new(x, y)))),
            traversals: Direction::ALL.map(build_traversal),
        }
    }

    /// Precomputed traversal for sliding towards `direction`
    pub fn cells_at(&self, direction: Direction) -> &Traversal {
        &self.traversals[direction.index()]
    }

    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.y][pos.x]
    }

    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.y][pos.x]
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut().flatten()
    }

    /// Pick an empty cell uniformly at random, `None` on a full board
    pub fn random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let empty: Vec<Position> = self
            .cells()
            .filter(|cell| cell.is_empty())
            .map(Cell::position)
            .collect();
        empty.choose(rng).copied()
    }

    pub fn empty_count(&self) -> usize {
        self.cells().filter(|cell| cell.is_empty()).count()
    }

    /// Resident tiles (staged merge partners are not counted)
    pub fn tile_count(&self) -> usize {
        self.cells().filter(|cell| !cell.is_empty()).count()
    }

    /// Snapshot of resident values, `[row][column]`, 0 for empty
    pub fn values(&self) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        std::array::from_fn(|y| std::array::from_fn(|x| self.cells[y][x].value()))
    }

    /// Largest resident value, 0 on an empty board
    pub fn max_value(&self) -> u32 {
        self.cells().map(Cell::value).max().unwrap_or(0)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell.value() {
                    0 => format!("{:>5}", "."),
                    value => format!("{:>5}", value),
                })
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}

fn build_traversal(direction: Direction) -> Traversal {
    std::array::from_fn(|line| {
        std::array::from_fn(|step| {
            let back = GRID_SIZE - 1 - step;
            match direction {
                Direction::Up => Position::new(line, step),
                Direction::Down => Position::new(line, back),
                Direction::Left => Position::new(step, line),
                Direction::Right => Position::new(back, line),
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::InstantAnimator;
    use crate::game::tile::{Tile, TileId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_cells_know_their_position() {
        let grid = Grid::new();
        assert_eq!(grid.cell(Position::new(3, 1)).position(), Position::new(3, 1));
        assert_eq!(grid.cells().count(), GRID_SIZE * GRID_SIZE);
    }

    #[test]
    fn test_traversal_destination_first() {
        let grid = Grid::new();

        let up = &grid.cells_at(Direction::Up)[2];
        assert_eq!(up[0], Position::new(2, 0));
        assert_eq!(up[3], Position::new(2, 3));

        let down = &grid.cells_at(Direction::Down)[2];
        assert_eq!(down[0], Position::new(2, 3));
        assert_eq!(down[3], Position::new(2, 0));

        let left = &grid.cells_at(Direction::Left)[1];
        assert_eq!(left[0], Position::new(0, 1));
        assert_eq!(left[3], Position::new(3, 1));

        let right = &grid.cells_at(Direction::Right)[1];
        assert_eq!(right[0], Position::new(3, 1));
        assert_eq!(right[3], Position::new(0, 1));
    }

    #[test]
    fn test_each_traversal_covers_board_once() {
        let grid = Grid::new();
        for direction in Direction::ALL {
            let seen: HashSet<Position> = grid
                .cells_at(direction)
                .iter()
                .flatten()
                .copied()
                .collect();
            assert_eq!(seen.len(), GRID_SIZE * GRID_SIZE, "{direction}");
        }
    }

    #[test]
    fn test_random_empty_cell() {
        let mut grid = Grid::new();
        let mut rng = StdRng::seed_from_u64(3);

        // Fill everything except (1, 2)
        let mut id = 0;
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                if (x, y) != (1, 2) {
                    id += 1;
                    grid.cell_mut(Position::new(x, y))
                        .link_tile(Tile::new(TileId(id), 2), &mut InstantAnimator);
                }
            }
        }

        assert_eq!(grid.empty_count(), 1);
        assert_eq!(grid.random_empty_cell(&mut rng), Some(Position::new(1, 2)));

        grid.cell_mut(Position::new(1, 2))
            .link_tile(Tile::new(TileId(99), 4), &mut InstantAnimator);
        assert_eq!(grid.random_empty_cell(&mut rng), None);
        assert_eq!(grid.max_value(), 4);
    }

    #[test]
    fn test_values_and_display() {
        let mut grid = Grid::new();
        grid.cell_mut(Position::new(0, 0))
            .link_tile(Tile::new(TileId(1), 2), &mut InstantAnimator);
        grid.cell_mut(Position::new(3, 1))
            .link_tile(Tile::new(TileId(2), 128), &mut InstantAnimator);

        let values = grid.values();
        assert_eq!(values[0], [2, 0, 0, 0]);
        assert_eq!(values[1], [0, 0, 0, 128]);
        assert_eq!(grid.tile_count(), 2);

        let printed = grid.to_string();
        let first_line = printed.lines().next().unwrap();
        assert_eq!(first_line, "    2    .    .    .");
    }
}
