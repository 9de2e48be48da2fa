use anyhow::{Context, Result, ensure};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::{
    action::Direction,
    animation::{Animator, Barrier, Completion},
    config::{GRID_SIZE, GameConfig},
    grid::{Grid, Group, Position},
    tile::{Tile, TileId},
};

/// What a completed move did
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub direction: Direction,
    /// Number of tile pairs merged
    pub merges: usize,
    /// Sum of the merged values (added to the score)
    pub points: u32,
    /// Largest value a merge produced, 0 without merges
    pub largest_merge: u32,
    /// Cell that received the new tile
    pub spawned: Position,
    /// No direction can move any more
    pub game_over: bool,
}

/// The move engine: owns the board and runs slides, merges and spawns
pub struct GameEngine<A: Animator> {
    config: GameConfig,
    grid: Grid,
    animator: A,
    rng: StdRng,
    next_tile_id: u64,
    score: u32,
    moves: u32,
    /// Direction of a move whose slides are placed but not yet merged
    in_flight: Option<Direction>,
}

impl<A: Animator> GameEngine<A> {
    /// Create an engine and deal the opening tiles
    pub fn new(config: GameConfig, animator: A) -> Result<Self> {
        config.validate()?;
        let mut engine = Self::empty(config, animator);
        engine.reset()?;
        Ok(engine)
    }

    /// Create an engine with a given board, `rows[y][x]`, 0 for empty
    pub fn with_board(
        config: GameConfig,
        rows: [[u32; GRID_SIZE]; GRID_SIZE],
        animator: A,
    ) -> Result<Self> {
        config.validate()?;
        let mut engine = Self::empty(config, animator);

        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                ensure!(
                    value >= 2 && value.is_power_of_two(),
                    "tile value {value} at ({x}, {y}) is not a power of two"
                );
                let tile = engine.new_tile(value);
                engine
                    .grid
                    .cell_mut(Position::new(x, y))
                    .link_tile(tile, &mut engine.animator);
            }
        }

        Ok(engine)
    }

    fn empty(config: GameConfig, animator: A) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            grid: Grid::new(),
            animator,
            rng,
            next_tile_id: 0,
            score: 0,
            moves: 0,
            in_flight: None,
        }
    }

    /// Clear the board and deal the opening tiles
    pub fn reset(&mut self) -> Result<()> {
        self.animator.board_cleared();
        self.grid = Grid::new();
        self.score = 0;
        self.moves = 0;
        self.in_flight = None;

        for _ in 0..self.config.initial_tiles {
            self.spawn_tile()?;
        }

        info!(seed = ?self.config.seed, tiles = self.grid.tile_count(), "new game");
        Ok(())
    }

    fn new_tile(&mut self, value: u32) -> Tile {
        self.next_tile_id += 1;
        Tile::new(TileId(self.next_tile_id), value)
    }

    /// Put a fresh tile on a random empty cell
    pub fn spawn_tile(&mut self) -> Result<Position> {
        let pos = self
            .grid
            .random_empty_cell(&mut self.rng)
            .context("no empty cell to spawn a tile into")?;
        let tile = self.new_tile(self.config.spawn_value);
        self.grid.cell_mut(pos).link_tile(tile, &mut self.animator);
        Ok(pos)
    }

    /// Whether sliding towards `direction` would change the board. Read only.
    pub fn can_move(&self, direction: Direction) -> bool {
        self.grid
            .cells_at(direction)
            .iter()
            .any(|group| self.can_move_in_group(group))
    }

    fn can_move_in_group(&self, group: &Group) -> bool {
        group.windows(2).any(|pair| match self.grid.cell(pair[1]).tile() {
            Some(tile) => self.grid.cell(pair[0]).can_accept(tile),
            None => false,
        })
    }

    /// True when no direction can move
    pub fn is_game_over(&self) -> bool {
        !Direction::ALL.iter().any(|&direction| self.can_move(direction))
    }

    /// Slide phase of a move.
    ///
    /// Places every tile at its destination (staging merges) and returns the
    /// barrier over their slide signals, or `None` if the move is illegal.
    /// Call [`finish_move`](Self::finish_move) once the barrier resolves.
    pub fn begin_move(&mut self, direction: Direction) -> Result<Option<Barrier>> {
        ensure!(self.in_flight.is_none(), "a move is already in progress");

        if !self.can_move(direction) {
            return Ok(None);
        }

        let traversal = *self.grid.cells_at(direction);
        let mut barrier = Barrier::new();
        for group in &traversal {
            self.slide_group(group, &mut barrier);
        }

        self.in_flight = Some(direction);
        Ok(Some(barrier))
    }

    fn slide_group(&mut self, group: &Group, barrier: &mut Barrier) {
        for i in 1..group.len() {
            let Some(tile) = self.grid.cell(group[i]).tile() else {
                continue;
            };

            // Farthest cell the tile can reach before something blocks it
            let mut target = None;
            for j in (0..i).rev() {
                if !self.grid.cell(group[j]).can_accept(tile) {
                    break;
                }
                target = Some(group[j]);
            }

            let Some(target) = target else {
                continue;
            };
            let Some(tile) = self.grid.cell_mut(group[i]).unlink_tile() else {
                continue;
            };

            let cell = self.grid.cell_mut(target);
            let linked = if cell.is_empty() {
                cell.link_tile(tile, &mut self.animator)
            } else {
                cell.link_tile_for_merge(tile, &mut self.animator)
            };
            barrier.push(linked.wait_for_transition_end());
        }
    }

    /// Commit phase of a move: merge, spawn, check for the end
    pub fn finish_move(&mut self) -> Result<MoveOutcome> {
        let direction = self.in_flight.take().context("no move in progress")?;

        let mut merges = 0;
        let mut points = 0;
        let mut largest_merge = 0;
        for cell in self.grid.cells_mut() {
            if let Some(value) = cell.merge_tiles(&mut self.animator) {
                merges += 1;
                points += value;
                largest_merge = largest_merge.max(value);
            }
        }

        self.score += points;
        self.moves += 1;

        let spawned = self.spawn_tile()?;
        let game_over = self.is_game_over();

        debug!(
            %direction,
            merges,
            points,
            score = self.score,
            empty = self.grid.empty_count(),
            "move"
        );
        if game_over {
            info!(
                score = self.score,
                moves = self.moves,
                best_tile = self.grid.max_value(),
                "no moves left"
            );
        }

        Ok(MoveOutcome {
            direction,
            merges,
            points,
            largest_merge,
            spawned,
            game_over,
        })
    }

    /// Run a whole move, waiting for slides before merging.
    ///
    /// Returns `None` when the move is illegal and nothing changed.
    pub async fn attempt_move(&mut self, direction: Direction) -> Result<Option<MoveOutcome>> {
        let Some(mut barrier) = self.begin_move(direction)? else {
            return Ok(None);
        };
        barrier.wait().await;
        self.finish_move().map(Some)
    }

    /// Appearance signal of the tile at `pos`
    pub fn wait_for_animation_end(&mut self, pos: Position) -> Completion {
        self.grid
            .cell_mut(pos)
            .tile_mut()
            .map(Tile::wait_for_animation_end)
            .unwrap_or_default()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn best_tile(&self) -> u32 {
        self.grid.max_value()
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }
}
