use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use std::time::Instant;

use super::animator::{Sprite, TileAnimator};
use crate::game::{GRID_SIZE, Session};
use crate::metrics::GameMetrics;

const TILE_WIDTH: u16 = 8;
const TILE_HEIGHT: u16 = 3;
const GAP_X: u16 = 2;
const GAP_Y: u16 = 1;

/// Board size including its border
const BOARD_WIDTH: u16 = GRID_SIZE as u16 * (TILE_WIDTH + GAP_X) + GAP_X + 2;
const BOARD_HEIGHT: u16 = GRID_SIZE as u16 * (TILE_HEIGHT + GAP_Y) + GAP_Y + 2;

const EMPTY_CELL: Color = Color::Rgb(205, 193, 180);
const BOARD_BG: Color = Color::Rgb(187, 173, 160);
const DARK_TEXT: Color = Color::Rgb(119, 110, 101);
const LIGHT_TEXT: Color = Color::Rgb(249, 246, 242);

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        session: &Session<TileAnimator>,
        metrics: &GameMetrics,
        now: Instant,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(session, metrics);
        frame.render_widget(stats, chunks[0]);

        let board = centered(chunks[1], BOARD_WIDTH, BOARD_HEIGHT);
        self.render_board(frame, board, session.engine().animator(), now);

        if session.is_over() {
            let banner = centered(board, BOARD_WIDTH.saturating_sub(6), 8);
            frame.render_widget(Clear, banner);
            frame.render_widget(self.render_game_over(session), banner);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect, animator: &TileAnimator, now: Instant) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::White))
            .style(Style::default().bg(BOARD_BG))
            .title(" 2048 ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let rect = tile_rect(inner, x as f32, y as f32, 1.0);
                frame.render_widget(Block::default().style(Style::default().bg(EMPTY_CELL)), rect);
            }
        }

        for sprite in animator.sprites() {
            let (x, y) = sprite.placement(now);
            let rect = tile_rect(inner, x, y, sprite.scale(now));
            if rect.area() > 0 {
                frame.render_widget(self.render_tile(sprite, rect, now), rect);
            }
        }
    }

    fn render_tile(&self, sprite: &Sprite, area: Rect, now: Instant) -> Paragraph<'_> {
        let (bg, fg) = tile_colors(sprite.value);
        let mut style = Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD);
        if sprite.is_highlighted(now) {
            style = style.add_modifier(Modifier::REVERSED);
        }

        // Put the number on the middle row
        let mut lines: Vec<Line> = (0..area.height / 2).map(|_| Line::from("")).collect();
        lines.push(Line::from(sprite.value.to_string()));

        Paragraph::new(lines).style(style).alignment(Alignment::Center)
    }

    fn render_stats(&self, session: &Session<TileAnimator>, metrics: &GameMetrics) -> Paragraph<'_> {
        let engine = session.engine();
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                engine.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.best_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Moves: ", Style::default().fg(Color::Yellow)),
            Span::styled(engine.moves().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_elapsed(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, session: &Session<TileAnimator>) -> Paragraph<'_> {
        let engine = session.engine();
        let text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    engine.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled("Best Tile: ", Style::default().fg(Color::Yellow)),
                Span::styled(engine.best_tile().to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Click or press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(", "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(", "),
            Span::styled("hjkl", Style::default().fg(Color::Cyan)),
            Span::raw(" or drag to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Background and text colour for a tile value
pub fn tile_colors(value: u32) -> (Color, Color) {
    match value {
        2 => (Color::Rgb(238, 228, 218), DARK_TEXT),
        4 => (Color::Rgb(237, 224, 200), DARK_TEXT),
        8 => (Color::Rgb(242, 177, 121), LIGHT_TEXT),
        16 => (Color::Rgb(245, 149, 99), LIGHT_TEXT),
        32 => (Color::Rgb(246, 124, 95), LIGHT_TEXT),
        64 => (Color::Rgb(246, 94, 59), LIGHT_TEXT),
        128 => (Color::Rgb(237, 207, 114), LIGHT_TEXT),
        256 => (Color::Rgb(237, 204, 97), LIGHT_TEXT),
        512 => (Color::Rgb(237, 200, 80), LIGHT_TEXT),
        1024 => (Color::Rgb(237, 197, 63), LIGHT_TEXT),
        2048 => (Color::Rgb(237, 194, 46), LIGHT_TEXT),
        _ => (Color::Rgb(60, 58, 50), LIGHT_TEXT),
    }
}

/// Screen rect for a tile at a (possibly fractional) board coordinate,
/// shrunk around its centre by `scale` and clipped to `inner`
fn tile_rect(inner: Rect, col: f32, row: f32, scale: f32) -> Rect {
    let left = inner.x as f32 + GAP_X as f32 + col * (TILE_WIDTH + GAP_X) as f32;
    let top = inner.y as f32 + GAP_Y as f32 + row * (TILE_HEIGHT + GAP_Y) as f32;

    let width = (TILE_WIDTH as f32 * scale).round().max(2.0);
    let height = (TILE_HEIGHT as f32 * scale).round().max(1.0);
    let x = left + (TILE_WIDTH as f32 - width) / 2.0;
    let y = top + (TILE_HEIGHT as f32 - height) / 2.0;

    Rect::new(x.round() as u16, y.round() as u16, width as u16, height as u16).intersection(inner)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Animator, GameConfig, GameEngine};
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn session(rows: [[u32; 4]; 4]) -> Session<TileAnimator> {
        let config = GameConfig::instant();
        let animator = TileAnimator::new(&config);
        Session::from_engine(GameEngine::with_board(config, rows, animator).unwrap())
    }

    #[test]
    fn test_tile_rect_layout() {
        let inner = Rect::new(1, 1, BOARD_WIDTH - 2, BOARD_HEIGHT - 2);
        assert_eq!(tile_rect(inner, 0.0, 0.0, 1.0), Rect::new(3, 2, 8, 3));
        assert_eq!(tile_rect(inner, 1.0, 1.0, 1.0), Rect::new(13, 6, 8, 3));

        // Half way between columns 0 and 1
        assert_eq!(tile_rect(inner, 0.5, 0.0, 1.0).x, 8);

        // Popping tiles grow from the centre
        let small = tile_rect(inner, 0.0, 0.0, 0.5);
        assert_eq!(small.width, 4);
        assert_eq!(small.x, 5);
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered(area, 50, 50), area);
    }

    #[test]
    fn test_renders_board_and_stats() {
        let session = session([[2, 0, 0, 0], [0, 2048, 0, 0], [0; 4], [0; 4]]);
        let metrics = GameMetrics::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        terminal
            .draw(|frame| Renderer::new().render(frame, &session, &metrics, Instant::now()))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Score"));
        assert!(text.contains("2048"));
        assert!(!text.contains("GAME OVER"));
    }

    #[test]
    fn test_renders_game_over_banner() {
        let session = session([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(session.is_over());
        let metrics = GameMetrics::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        terminal
            .draw(|frame| Renderer::new().render(frame, &session, &metrics, Instant::now()))
            .unwrap();

        assert!(screen_text(&terminal).contains("GAME OVER"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut session = session([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        session.engine_mut().animator_mut().board_cleared();
        let metrics = GameMetrics::new();
        let mut terminal = Terminal::new(TestBackend::new(12, 6)).unwrap();

        terminal
            .draw(|frame| Renderer::new().render(frame, &session, &metrics, Instant::now()))
            .unwrap();
    }

    #[test]
    fn test_palette_darkens_past_2048() {
        assert_eq!(tile_colors(2).1, DARK_TEXT);
        assert_eq!(tile_colors(4096).0, Color::Rgb(60, 58, 50));
    }
}
