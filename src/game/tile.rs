use super::animation::{Animator, Completion};
use super::grid::Position;

/// Stable identity of a tile, used by the animator to track its sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// A value-bearing piece on the board
#[derive(Debug)]
pub struct Tile {
    id: TileId,
    value: u32,
    position: Option<Position>,
    /// Signal for the last slide
    transition: Option<Completion>,
    /// Signal for the spawn pop
    appearance: Option<Completion>,
}

impl Tile {
    /// Create a tile that is not on the board yet
    pub fn new(id: TileId, value: u32) -> Self {
        Self {
            id,
            value,
            position: None,
            transition: None,
            appearance: None,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Where the tile is (or is heading); `None` before its first placement
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Move the tile and tell the animator.
    ///
    /// The first placement is reported as an appearance, later ones as
    /// slides. Placing a tile where it already is does nothing.
    pub fn set_position<A: Animator + ?Sized>(&mut self, to: Position, animator: &mut A) {
        match self.position {
            None => {
                self.appearance = Some(animator.tile_appeared(self.id, self.value, to));
            }
            Some(from) if from != to => {
                self.transition = Some(animator.tile_moved(self.id, from, to));
            }
            Some(_) => {}
        }
        self.position = Some(to);
    }

    /// Double the value after absorbing an equal tile
    pub(crate) fn double(&mut self) {
        self.value *= 2;
    }

    /// Signal for the last slide to finish. Resolves at once if none is running.
    pub fn wait_for_transition_end(&mut self) -> Completion {
        self.transition.take().unwrap_or_default()
    }

    /// Signal for the spawn animation to finish. Resolves at once if none is running.
    pub fn wait_for_animation_end(&mut self) -> Completion {
        self.appearance.take().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::InstantAnimator;

    #[derive(Default)]
    struct CountingAnimator {
        appeared: usize,
        moved: usize,
    }

    impl Animator for CountingAnimator {
        fn tile_appeared(&mut self, _id: TileId, _value: u32, _at: Position) -> Completion {
            self.appeared += 1;
            Completion::ready()
        }

        fn tile_moved(&mut self, _id: TileId, _from: Position, _to: Position) -> Completion {
            self.moved += 1;
            let (_handle, completion) = Completion::pending();
            completion
        }

        fn tile_merged(&mut self, _id: TileId, _value: u32, _absorbed: TileId) {}

        fn board_cleared(&mut self) {}
    }

    #[test]
    fn test_new_tile_is_unplaced() {
        let tile = Tile::new(TileId(1), 2);
        assert_eq!(tile.value(), 2);
        assert_eq!(tile.position(), None);
    }

    #[test]
    fn test_first_placement_is_appearance() {
        let mut animator = CountingAnimator::default();
        let mut tile = Tile::new(TileId(1), 2);

        tile.set_position(Position::new(1, 2), &mut animator);
        assert_eq!(animator.appeared, 1);
        assert_eq!(animator.moved, 0);

        tile.set_position(Position::new(0, 2), &mut animator);
        assert_eq!(animator.appeared, 1);
        assert_eq!(animator.moved, 1);
        assert_eq!(tile.position(), Some(Position::new(0, 2)));
    }

    #[test]
    fn test_same_position_is_not_a_move() {
        let mut animator = CountingAnimator::default();
        let mut tile = Tile::new(TileId(1), 2);
        tile.set_position(Position::new(3, 3), &mut animator);
        tile.set_position(Position::new(3, 3), &mut animator);
        assert_eq!(animator.moved, 0);
    }

    #[test]
    fn test_signals_are_single_shot() {
        let mut tile = Tile::new(TileId(9), 4);
        tile.set_position(Position::new(0, 0), &mut InstantAnimator);
        tile.set_position(Position::new(1, 0), &mut InstantAnimator);

        assert!(tile.transition.is_some());
        let _ = tile.wait_for_transition_end();
        assert!(tile.transition.is_none());

        // With nothing running the signal is already resolved
        assert!(tile.wait_for_transition_end().try_complete());
        assert!(tile.wait_for_animation_end().try_complete());
    }

    #[test]
    fn test_double() {
        let mut tile = Tile::new(TileId(1), 8);
        tile.double();
        assert_eq!(tile.value(), 16);
    }
}
