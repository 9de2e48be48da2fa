use std::time::{Duration, Instant};

use crate::game::MoveOutcome;

/// Result of one finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub moves: u32,
    pub best_tile: u32,
}

/// Play statistics across the games of one process
///
/// The clock runs from the start of a game until its game over. Best score
/// follows the live score so the header never lags behind the board.
#[derive(Debug)]
pub struct GameMetrics {
    started: Instant,
    elapsed: Duration,
    clock_running: bool,
    pub best_score: u32,
    pub best_tile: u32,
    /// Merges made in the current game
    pub merges: u32,
    /// Largest value produced by a merge in the current game
    pub largest_merge: u32,
    history: Vec<GameSummary>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            elapsed: Duration::ZERO,
            clock_running: true,
            best_score: 0,
            best_tile: 0,
            merges: 0,
            largest_merge: 0,
            history: Vec::new(),
        }
    }

    pub fn tick(&mut self) {
        if self.clock_running {
            self.elapsed = self.started.elapsed();
        }
    }

    pub fn start_game(&mut self) {
        self.started = Instant::now();
        self.elapsed = Duration::ZERO;
        self.clock_running = true;
        self.merges = 0;
        self.largest_merge = 0;
    }

    /// Fold in a finished move; `score` is the running total after it
    pub fn record_move(&mut self, outcome: &MoveOutcome, score: u32, best_tile: u32) {
        self.merges += outcome.merges as u32;
        self.largest_merge = self.largest_merge.max(outcome.largest_merge);
        self.best_score = self.best_score.max(score);
        self.best_tile = self.best_tile.max(best_tile);
    }

    pub fn finish_game(&mut self, summary: GameSummary) {
        self.tick();
        self.clock_running = false;
        self.best_score = self.best_score.max(summary.score);
        self.best_tile = self.best_tile.max(summary.best_tile);
        self.history.push(summary);
    }

    pub fn games_played(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[GameSummary] {
        &self.history
    }

    pub fn mean_score(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let total: u64 = self.history.iter().map(|game| game.score as u64).sum();
        Some(total as f64 / self.history.len() as f64)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed game time as mm:ss
    pub fn format_elapsed(&self) -> String {
        let secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
