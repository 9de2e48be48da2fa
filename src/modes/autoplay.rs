//! Headless mode that plays random legal moves
//!
//! Useful for exercising the engine without a terminal and for eyeballing
//! how far pure chance gets. Seeded runs are reproducible.
//!
//! # Example
//!
//! ```rust
//! use tui_2048::game::GameConfig;
//! use tui_2048::modes::AutoplayMode;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let mut autoplay = AutoplayMode::new(GameConfig::seeded(7), 1);
//! let summaries = runtime.block_on(autoplay.run()).unwrap();
//! assert_eq!(summaries.len(), 1);
//! ```

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::game::{Direction, GameConfig, GameEvent, InstantAnimator, Session};
use crate::metrics::{GameMetrics, GameSummary};

/// Mixed into the seed for move choices so they don't mirror tile placement
const POLICY_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

fn policy_seed(seed: u64) -> u64 {
    seed ^ POLICY_SALT
}

/// Engine seed for game number `game` of a seeded run
fn game_seed(seed: u64, game: usize) -> u64 {
    seed.wrapping_add(game as u64)
}

pub struct AutoplayMode {
    config: GameConfig,
    games: usize,
    rng: StdRng,
    metrics: GameMetrics,
    /// Print boards and summaries to stdout
    verbose: bool,
}

impl AutoplayMode {
    pub fn new(config: GameConfig, games: usize) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(policy_seed(seed)),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            games,
            rng,
            metrics: GameMetrics::new(),
            verbose: false,
        }
    }

    /// Print each final board and a closing summary
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub async fn run(&mut self) -> Result<Vec<GameSummary>> {
        for game in 0..self.games {
            let mut config = self.config.clone();
            // Different boards per game, still reproducible from one seed
            config.seed = self.config.seed.map(|seed| game_seed(seed, game));

            self.metrics.start_game();
            let summary = self.play_game(config).await?;
            self.metrics.finish_game(summary);
        }

        if self.verbose {
            self.print_totals();
        }

        Ok(self.metrics.history().to_vec())
    }

    /// Play one game to the end
    pub async fn play_game(&mut self, config: GameConfig) -> Result<GameSummary> {
        let mut session = Session::new(config, InstantAnimator)?;
        let mut summary = None;

        while !session.is_over() {
            let legal: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|&direction| session.engine().can_move(direction))
                .collect();
            let direction = *legal
                .choose(&mut self.rng)
                .context("live session has no legal move")?;

            let mut moved = None;
            session
                .attempt_move_with_events(direction, |event| match event {
                    GameEvent::Moved(outcome) => moved = Some(outcome),
                    GameEvent::GameOver {
                        score,
                        moves,
                        best_tile,
                    } => {
                        summary = Some(GameSummary {
                            score,
                            moves,
                            best_tile,
                        });
                    }
                })
                .await?;

            if let Some(outcome) = moved {
                let engine = session.engine();
                self.metrics.record_move(&outcome, engine.score(), engine.best_tile());
            }
        }

        let summary = summary.context("game ended without a game over event")?;
        debug!(
            ?summary,
            merges = self.metrics.merges,
            largest_merge = self.metrics.largest_merge,
            "autoplay game finished"
        );

        if self.verbose {
            println!("{}", session.engine().grid());
            println!("{}", self.report(&summary));
            println!();
        }

        Ok(summary)
    }

    /// One-line result of the game that just ended
    fn report(&self, summary: &GameSummary) -> String {
        format!(
            "Score: {}  Moves: {}  Merges: {}  Largest merge: {}  Best tile: {}",
            summary.score,
            summary.moves,
            self.metrics.merges,
            self.metrics.largest_merge,
            summary.best_tile
        )
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    fn print_totals(&self) {
        let Some(mean) = self.metrics.mean_score() else {
            return;
        };

        println!("{}", "=".repeat(40));
        println!("Games: {}", self.metrics.games_played());
        println!("Best score: {}", self.metrics.best_score);
        println!("Mean score: {:.1}", mean);
        println!("Best tile: {}", self.metrics.best_tile);
        println!("{}", "=".repeat(40));
    }
}
