use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// Terminal cells are about twice as tall as they are wide
const CELL_ASPECT: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    /// Mouse press and release on the same cell
    Tap,
    Restart,
    Quit,
    None,
}

/// Maps terminal events to game actions.
///
/// Mouse drags act as swipes: the direction is decided on release from the
/// drag's dominant axis.
#[derive(Debug, Default)]
pub struct InputHandler {
    drag_start: Option<(u16, u16)>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self { drag_start: None }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Move(Direction::Up),
            KeyCode::Down => KeyAction::Move(Direction::Down),
            KeyCode::Left => KeyAction::Move(Direction::Left),
            KeyCode::Right => KeyAction::Move(Direction::Right),

            // Movement - WASD and vim keys
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('k') => {
                KeyAction::Move(Direction::Up)
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') => {
                KeyAction::Move(Direction::Down)
            }
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') => {
                KeyAction::Move(Direction::Left)
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') => {
                KeyAction::Move(Direction::Right)
            }

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> KeyAction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_start = Some((mouse.column, mouse.row));
                KeyAction::None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some((start_column, start_row)) = self.drag_start.take() else {
                    return KeyAction::None;
                };
                let dx = i32::from(mouse.column) - i32::from(start_column);
                let dy = i32::from(mouse.row) - i32::from(start_row);

                match Direction::from_swipe(dx, dy, CELL_ASPECT) {
                    Some(direction) => KeyAction::Move(direction),
                    None => KeyAction::Tap,
                }
            }
            _ => KeyAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(up), KeyAction::Move(Direction::Up));

        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(
            handler.handle_key_event(down),
            KeyAction::Move(Direction::Down)
        );

        let left = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(
            handler.handle_key_event(left),
            KeyAction::Move(Direction::Left)
        );

        let right = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(
            handler.handle_key_event(right),
            KeyAction::Move(Direction::Right)
        );
    }

    #[test]
    fn test_wasd_and_vim_keys() {
        let handler = InputHandler::new();

        for (key, direction) in [
            ('w', Direction::Up),
            ('a', Direction::Left),
            ('s', Direction::Down),
            ('d', Direction::Right),
            ('k', Direction::Up),
            ('h', Direction::Left),
            ('j', Direction::Down),
            ('l', Direction::Right),
        ] {
            let event = KeyEvent::new(KeyCode::Char(key), KeyModifiers::NONE);
            assert_eq!(handler.handle_key_event(event), KeyAction::Move(direction));
        }

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper),
            KeyAction::Move(Direction::Up)
        );
    }

    #[test]
    fn test_quit_and_restart_keys() {
        let handler = InputHandler::new();

        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(q), KeyAction::Quit);

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(esc), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);

        let r_upper = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(r_upper), KeyAction::Restart);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();

        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(x), KeyAction::None);
    }

    #[test]
    fn test_horizontal_swipe() {
        let mut handler = InputHandler::new();

        let down = mouse(MouseEventKind::Down(MouseButton::Left), 30, 10);
        assert_eq!(handler.handle_mouse_event(down), KeyAction::None);

        let up = mouse(MouseEventKind::Up(MouseButton::Left), 12, 11);
        assert_eq!(
            handler.handle_mouse_event(up),
            KeyAction::Move(Direction::Left)
        );
    }

    #[test]
    fn test_vertical_swipe_uses_aspect() {
        let mut handler = InputHandler::new();

        // Five columns across but four rows down: rows count double
        handler.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 2));
        let up = mouse(MouseEventKind::Up(MouseButton::Left), 15, 6);
        assert_eq!(
            handler.handle_mouse_event(up),
            KeyAction::Move(Direction::Down)
        );
    }

    #[test]
    fn test_tap_and_stray_release() {
        let mut handler = InputHandler::new();

        handler.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 4, 4));
        let release = mouse(MouseEventKind::Up(MouseButton::Left), 4, 4);
        assert_eq!(handler.handle_mouse_event(release), KeyAction::Tap);

        // Release without a press is ignored
        let stray = mouse(MouseEventKind::Up(MouseButton::Left), 9, 9);
        assert_eq!(handler.handle_mouse_event(stray), KeyAction::None);
    }
}
