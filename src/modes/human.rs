use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use crate::game::{GameConfig, GameEvent, Session};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::{GameMetrics, GameSummary};
use crate::render::{Renderer, TileAnimator};

pub struct HumanMode {
    session: Session<TileAnimator>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Something changed since the last frame was drawn
    dirty: bool,
    /// Clock second shown on the last frame
    drawn_second: u64,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let animator = TileAnimator::new(&config);
        let session = Session::new(config, animator)?;

        Ok(Self {
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            dirty: true,
            drawn_second: 0,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render (and advance animations) at ~60 FPS
        let render_interval = Duration::from_millis(16);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Slides landed (or the final spawn finished popping in)
                _ = self.session.settle(), if self.session.is_busy() => {
                    self.advance_session()?;
                }

                // Render frame, skipping idle ones
                _ = render_timer.tick() => {
                    let now = Instant::now();
                    if self.prepare_frame(now) {
                        terminal.draw(|frame| {
                            self.renderer.render(frame, &self.session, &self.metrics, now);
                        }).context("Failed to draw frame")?;
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Advance animations and the clock to `now`. Returns whether the
    /// frame differs from the last one drawn.
    fn prepare_frame(&mut self, now: Instant) -> bool {
        let animator = self.session.engine_mut().animator_mut();
        // The frame that lands the last animation still has to be drawn
        let animating = animator.is_animating();
        animator.advance(now);

        self.metrics.tick();
        let second = self.metrics.elapsed().as_secs();

        let due = animating || self.dirty || second != self.drawn_second;
        self.dirty = false;
        self.drawn_second = second;
        due
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        // Covers resizes too
        self.dirty = true;
        let action = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self.input_handler.handle_mouse_event(mouse),
            _ => return Ok(()),
        };

        match action {
            KeyAction::Move(direction) => {
                self.session.submit(direction)?;
            }
            KeyAction::Tap => {
                // Clicking the end screen starts over
                if self.session.is_over() {
                    self.reset_game()?;
                }
            }
            KeyAction::Restart => {
                self.reset_game()?;
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        Ok(())
    }

    fn advance_session(&mut self) -> Result<()> {
        self.dirty = true;
        match self.session.advance()? {
            Some(GameEvent::Moved(outcome)) => {
                let engine = self.session.engine();
                self.metrics
                    .record_move(&outcome, engine.score(), engine.best_tile());
            }
            Some(GameEvent::GameOver {
                score,
                moves,
                best_tile,
            }) => {
                self.metrics.finish_game(GameSummary {
                    score,
                    moves,
                    best_tile,
                });
            }
            None => {}
        }
        Ok(())
    }

    fn reset_game(&mut self) -> Result<()> {
        self.session.restart()?;
        self.metrics.start_game();
        info!(games_played = self.metrics.games_played(), "restarted");
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
