//! tui-2048 - The 2048 sliding-tile puzzle in the terminal
//!
//! This library provides:
//! - Core game logic: grid, cells, tiles and the move engine (game module)
//! - The session input gate that keeps one move in flight at a time
//! - Timed tile animations and TUI rendering (render module)
//! - Keyboard and mouse-swipe input (input module)
//! - Interactive and headless execution modes (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
