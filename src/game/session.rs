//! A single game session and its input gate
//!
//! The session admits one move at a time. While slides are animating, or the
//! final spawn is popping in, further directions are rejected rather than
//! queued, so the board is never touched by two moves at once.
//!
//! ```text
//! AwaitingInput --submit--> Sliding --advance--> AwaitingInput
//!                                   \--advance--> Revealing --advance--> GameOver
//! ```

use anyhow::Result;
use tracing::{debug, info};

use super::action::Direction;
use super::animation::{Animator, Barrier};
use super::config::GameConfig;
use super::engine::{GameEngine, MoveOutcome};

/// Where the session is in its move cycle
#[derive(Debug)]
pub enum Phase {
    AwaitingInput,
    /// Slides placed, waiting for them to land before merging
    Sliding(Barrier),
    /// Board is dead, waiting for the last spawn to finish appearing
    Revealing(Barrier),
    GameOver,
}

/// Something collaborators outside the engine should hear about
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Moved(MoveOutcome),
    /// Sent once per game
    GameOver { score: u32, moves: u32, best_tile: u32 },
}

/// Session context: the engine plus the input gate
pub struct Session<A: Animator> {
    engine: GameEngine<A>,
    phase: Phase,
}

impl<A: Animator> Session<A> {
    pub fn new(config: GameConfig, animator: A) -> Result<Self> {
        Ok(Self::from_engine(GameEngine::new(config, animator)?))
    }

    /// Wrap an engine that is between moves
    pub fn from_engine(engine: GameEngine<A>) -> Self {
        let phase = if engine.is_game_over() {
            Phase::GameOver
        } else {
            Phase::AwaitingInput
        };
        Self { engine, phase }
    }

    /// Try to start a move. Returns whether one started.
    ///
    /// Directions that cannot move anything, or that arrive while a move is
    /// running or the game is over, are dropped without touching the board.
    pub fn submit(&mut self, direction: Direction) -> Result<bool> {
        if !matches!(self.phase, Phase::AwaitingInput) {
            debug!(%direction, "input rejected, session busy");
            return Ok(false);
        }

        match self.engine.begin_move(direction)? {
            Some(barrier) => {
                self.phase = Phase::Sliding(barrier);
                Ok(true)
            }
            None => {
                debug!(%direction, "illegal move ignored");
                Ok(false)
            }
        }
    }

    /// True while a move or the end-of-game reveal is running
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Sliding(_) | Phase::Revealing(_))
    }

    /// Wait for the current animation barrier.
    ///
    /// Never resolves when nothing is running. Cancel-safe.
    pub async fn settle(&mut self) {
        match &mut self.phase {
            Phase::Sliding(barrier) | Phase::Revealing(barrier) => barrier.wait().await,
            _ => std::future::pending().await,
        }
    }

    /// Step past a settled barrier. Call after [`settle`](Self::settle).
    pub fn advance(&mut self) -> Result<Option<GameEvent>> {
        match std::mem::replace(&mut self.phase, Phase::AwaitingInput) {
            Phase::Sliding(_) => {
                let outcome = self.engine.finish_move()?;
                if outcome.game_over {
                    let reveal = self.engine.wait_for_animation_end(outcome.spawned);
                    self.phase = Phase::Revealing(Barrier::from(reveal));
                }
                Ok(Some(GameEvent::Moved(outcome)))
            }
            Phase::Revealing(_) => {
                self.phase = Phase::GameOver;
                let event = GameEvent::GameOver {
                    score: self.engine.score(),
                    moves: self.engine.moves(),
                    best_tile: self.engine.best_tile(),
                };
                info!(?event, "game over");
                Ok(Some(event))
            }
            Phase::AwaitingInput => Ok(None),
            Phase::GameOver => {
                self.phase = Phase::GameOver;
                Ok(None)
            }
        }
    }

    /// Run a whole move to completion. Returns whether a move occurred.
    pub async fn attempt_move(&mut self, direction: Direction) -> Result<bool> {
        self.attempt_move_with_events(direction, |_| {}).await
    }

    /// Like [`attempt_move`](Self::attempt_move), handing every event to `on_event`
    pub async fn attempt_move_with_events<F>(
        &mut self,
        direction: Direction,
        mut on_event: F,
    ) -> Result<bool>
    where
        F: FnMut(GameEvent),
    {
        if !self.submit(direction)? {
            return Ok(false);
        }

        while self.is_busy() {
            self.settle().await;
            if let Some(event) = self.advance()? {
                on_event(event);
            }
        }

        Ok(true)
    }

    /// Throw the board away and deal a new one
    pub fn restart(&mut self) -> Result<()> {
        self.engine.reset()?;
        self.phase = Phase::AwaitingInput;
        Ok(())
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    pub fn engine(&self) -> &GameEngine<A> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine<A> {
        &mut self.engine
    }
}

impl<A: Animator> std::fmt::Debug for Session<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("score", &self.engine.score())
            .finish()
    }
}
