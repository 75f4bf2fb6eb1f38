// Input manager - turns raw keyboard events into game key events

use super::action::KeyEvent;
use super::config::InputConfig;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Translates window keyboard events through the active bindings
#[derive(Debug, Default)]
pub struct InputManager {
    config: InputConfig,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&self, event: &winit::event::KeyEvent) -> Option<KeyEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        self.translate(code, event.state == ElementState::Pressed, event.repeat)
    }

    /// Map a physical key transition to a game key event.
    ///
    /// OS auto-repeat is dropped: a held key produces one `Down`.
    pub fn translate(&self, code: KeyCode, pressed: bool, repeat: bool) -> Option<KeyEvent> {
        let key = self.config.get_key(code)?;
        match (pressed, repeat) {
            (true, false) => Some(KeyEvent::Down(key)),
            (true, true) => None,
            (false, _) => Some(KeyEvent::Up(key)),
        }
    }
}
