//! Platform abstraction layer
//!
//! The core never polls devices. The host fills an `InputState` each frame:
//! - Held keys (paddle movement)
//! - Mouse position (button hover)
//! - Discrete events (key presses, clicks, quit)

use std::collections::HashSet;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable key, stored lowercase
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
}

impl Key {
    /// Printable key from any case
    pub fn char(c: char) -> Self {
        Key::Char(c.to_ascii_lowercase())
    }

    /// Same key with printable characters lowercased
    pub fn normalized(self) -> Self {
        match self {
            Key::Char(c) => Key::char(c),
            other => other,
        }
    }

    /// Label for key-binding displays
    pub fn name(&self) -> String {
        match self {
            Key::Char(c) => c.to_ascii_uppercase().to_string(),
            Key::Up => "UP".to_string(),
            Key::Down => "DOWN".to_string(),
            Key::Left => "LEFT".to_string(),
            Key::Right => "RIGHT".to_string(),
            Key::Space => "SPACE".to_string(),
            Key::Enter => "ENTER".to_string(),
            Key::Escape => "ESC".to_string(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Discrete input event for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    MouseDown { button: MouseButton, pos: Vec2 },
    MouseUp { button: MouseButton, pos: Vec2 },
    /// Window closed
    Quit,
}

/// Input snapshot handed to the core once per frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Key>,
    mouse: Vec2,
    events: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key goes down: held from now on, plus a press event this frame
    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
        self.events.push(InputEvent::KeyPressed(key));
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
        self.events.push(InputEvent::KeyReleased(key));
    }

    pub fn move_mouse(&mut self, pos: Vec2) {
        self.mouse = pos;
    }

    /// Full left click at `pos`
    pub fn click(&mut self, pos: Vec2) {
        self.mouse = pos;
        self.events.push(InputEvent::MouseDown {
            button: MouseButton::Left,
            pos,
        });
        self.events.push(InputEvent::MouseUp {
            button: MouseButton::Left,
            pos,
        });
    }

    pub fn push(&mut self, event: InputEvent) {
        if let InputEvent::MouseDown { pos, .. } | InputEvent::MouseUp { pos, .. } = event {
            self.mouse = pos;
        }
        self.events.push(event);
    }

    pub fn quit(&mut self) {
        self.events.push(InputEvent::Quit);
    }

    /// Drop this frame's events, keeping held keys and mouse position
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn mouse(&self) -> Vec2 {
        self.mouse
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Keys pressed this frame, in order
    pub fn key_presses(&self) -> impl Iterator<Item = Key> + '_ {
        self.events.iter().filter_map(|event| match event {
            InputEvent::KeyPressed(key) => Some(*key),
            _ => None,
        })
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.key_presses().any(|k| k == key)
    }

    /// Positions where the left button was released this frame
    pub fn left_releases(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.events.iter().filter_map(|event| match event {
            InputEvent::MouseUp {
                button: MouseButton::Left,
                pos,
            } => Some(*pos),
            _ => None,
        })
    }

    pub fn left_pressed(&self) -> bool {
        self.events.iter().any(|event| {
            matches!(
                event,
                InputEvent::MouseDown {
                    button: MouseButton::Left,
                    ..
                }
            )
        })
    }

    pub fn quit_requested(&self) -> bool {
        self.events.iter().any(|event| matches!(event, InputEvent::Quit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::new();
        input.press(Key::char('W'));
        assert!(input.is_pressed(Key::Char('w')));
        assert!(input.key_pressed(Key::Char('w')));

        input.clear_events();
        assert!(input.is_pressed(Key::Char('w')));
        assert!(!input.key_pressed(Key::Char('w')));

        input.release(Key::Char('w'));
        assert!(!input.is_pressed(Key::Char('w')));
    }

    #[test]
    fn test_click_moves_mouse() {
        let mut input = InputState::new();
        input.click(Vec2::new(10.0, 20.0));
        assert_eq!(input.mouse(), Vec2::new(10.0, 20.0));
        assert!(input.left_pressed());
        assert_eq!(input.left_releases().collect::<Vec<_>>(), vec![Vec2::new(10.0, 20.0)]);
        assert!(!input.quit_requested());
        input.quit();
        assert!(input.quit_requested());
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::char('s').name(), "S");
        assert_eq!(Key::Escape.to_string(), "ESC");
    }
}
