use super::animation::Animator;
use super::grid::Position;
use super::tile::Tile;

/// What a cell holds right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Occupied,
    /// Holding a resident plus an incoming tile waiting to merge into it
    PendingMerge,
}

/// One fixed position on the board
#[derive(Debug)]
pub struct Cell {
    position: Position,
    tile: Option<Tile>,
    merge_tile: Option<Tile>,
}

impl Cell {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            tile: None,
            merge_tile: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> CellState {
        match (&self.tile, &self.merge_tile) {
            (None, _) => CellState::Empty,
            (Some(_), None) => CellState::Occupied,
            (Some(_), Some(_)) => CellState::PendingMerge,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }

    /// The resident tile
    pub fn tile(&self) -> Option<&Tile> {
        self.tile.as_ref()
    }

    pub fn tile_mut(&mut self) -> Option<&mut Tile> {
        self.tile.as_mut()
    }

    /// Value of the resident tile, 0 when empty
    pub fn value(&self) -> u32 {
        self.tile.as_ref().map_or(0, Tile::value)
    }

    /// Make `tile` the resident and move it here
    pub fn link_tile<A: Animator + ?Sized>(&mut self, mut tile: Tile, animator: &mut A) -> &mut Tile {
        debug_assert!(self.is_empty(), "linking into occupied cell {:?}", self.position);
        tile.set_position(self.position, animator);
        self.tile.insert(tile)
    }

    /// Release the resident without destroying it
    pub fn unlink_tile(&mut self) -> Option<Tile> {
        self.tile.take()
    }

    /// Stage `tile` to merge into the resident and move it here
    pub fn link_tile_for_merge<A: Animator + ?Sized>(
        &mut self,
        mut tile: Tile,
        animator: &mut A,
    ) -> &mut Tile {
        debug_assert!(
            !self.is_empty() && self.can_accept(&tile),
            "illegal merge into {:?}",
            self.position
        );
        tile.set_position(self.position, animator);
        self.merge_tile.insert(tile)
    }

    /// Whether `tile` may slide into this cell.
    ///
    /// An empty cell accepts anything. An occupied cell accepts an equal
    /// value, once per move.
    pub fn can_accept(&self, tile: &Tile) -> bool {
        match &self.tile {
            None => true,
            Some(resident) => self.merge_tile.is_none() && resident.value() == tile.value(),
        }
    }

    pub fn has_tile_for_merge(&self) -> bool {
        self.merge_tile.is_some()
    }

    /// Fold the staged tile into the resident.
    ///
    /// Returns the doubled value, or `None` if nothing was staged.
    pub fn merge_tiles<A: Animator + ?Sized>(&mut self, animator: &mut A) -> Option<u32> {
        let absorbed = self.merge_tile.take()?;
        let resident = self.tile.as_mut()?;
        resident.double();
        animator.tile_merged(resident.id(), resident.value(), absorbed.id());
        Some(resident.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::InstantAnimator;
    use crate::game::tile::TileId;

    fn tile(id: u64, value: u32) -> Tile {
        Tile::new(TileId(id), value)
    }

    #[test]
    fn test_empty_cell_accepts_anything() {
        let cell = Cell::new(Position::new(0, 0));
        assert!(cell.is_empty());
        assert_eq!(cell.state(), CellState::Empty);
        assert!(cell.can_accept(&tile(1, 2)));
        assert!(cell.can_accept(&tile(2, 1024)));
    }

    #[test]
    fn test_link_and_unlink() {
        let mut cell = Cell::new(Position::new(2, 1));
        let linked = cell.link_tile(tile(1, 2), &mut InstantAnimator);
        assert_eq!(linked.position(), Some(Position::new(2, 1)));
        assert_eq!(cell.state(), CellState::Occupied);
        assert_eq!(cell.value(), 2);

        let released = cell.unlink_tile().unwrap();
        assert_eq!(released.id(), TileId(1));
        assert!(cell.is_empty());
    }

    #[test]
    fn test_occupied_cell_accepts_equal_value_only() {
        let mut cell = Cell::new(Position::new(0, 0));
        cell.link_tile(tile(1, 4), &mut InstantAnimator);
        assert!(cell.can_accept(&tile(2, 4)));
        assert!(!cell.can_accept(&tile(3, 2)));
        assert!(!cell.can_accept(&tile(4, 8)));
    }

    #[test]
    fn test_one_merge_per_cell() {
        let mut cell = Cell::new(Position::new(0, 0));
        cell.link_tile(tile(1, 2), &mut InstantAnimator);
        cell.link_tile_for_merge(tile(2, 2), &mut InstantAnimator);

        assert_eq!(cell.state(), CellState::PendingMerge);
        assert!(cell.has_tile_for_merge());
        assert!(!cell.can_accept(&tile(3, 2)));
    }

    #[test]
    fn test_merge_doubles_resident() {
        let mut cell = Cell::new(Position::new(0, 0));
        cell.link_tile(tile(1, 8), &mut InstantAnimator);
        cell.link_tile_for_merge(tile(2, 8), &mut InstantAnimator);

        assert_eq!(cell.merge_tiles(&mut InstantAnimator), Some(16));
        assert_eq!(cell.state(), CellState::Occupied);
        assert_eq!(cell.tile().unwrap().id(), TileId(1));
        assert_eq!(cell.value(), 16);

        // Nothing staged any more
        assert_eq!(cell.merge_tiles(&mut InstantAnimator), None);
        assert_eq!(cell.value(), 16);
    }
}
