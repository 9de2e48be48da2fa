//! Core game logic for 2048
//!
//! Everything here is free of terminal I/O. Drawing goes through the
//! [`Animator`] trait so the same engine runs the TUI, the headless autoplay
//! mode and the tests.

pub mod action;
pub mod animation;
pub mod cell;
pub mod config;
pub mod engine;
pub mod grid;
pub mod session;
pub mod tile;

// Re-export commonly used types
pub use action::Direction;
pub use animation::{Animator, Barrier, Completion, CompletionHandle, InstantAnimator};
pub use cell::{Cell, CellState};
pub use config::{CELL_COUNT, GRID_SIZE, GameConfig};
pub use engine::{GameEngine, MoveOutcome};
pub use grid::{Grid, Group, Position, Traversal};
pub use session::{GameEvent, Phase, Session};
pub use tile::{Tile, TileId};
