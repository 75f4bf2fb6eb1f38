// Game key definitions and default bindings

use winit::keyboard::KeyCode;

/// The fixed set of keys gameplay reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Space: jump / double jump
    Jump,
    MoveLeft,
    MoveRight,
    Shoot,
}

impl GameKey {
    /// Whether this key drives horizontal movement
    pub fn is_movement(self) -> bool {
        matches!(self, GameKey::MoveLeft | GameKey::MoveRight)
    }
}

/// Discrete key transition delivered to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(GameKey),
    Up(GameKey),
}

/// Default keyboard bindings
pub fn default_bindings() -> Vec<(KeyCode, GameKey)> {
    vec![
        (KeyCode::Space, GameKey::Jump),
        (KeyCode::KeyA, GameKey::MoveLeft),
        (KeyCode::ArrowLeft, GameKey::MoveLeft),
        (KeyCode::KeyD, GameKey::MoveRight),
        (KeyCode::ArrowRight, GameKey::MoveRight),
        (KeyCode::KeyJ, GameKey::Shoot),
        (KeyCode::KeyF, GameKey::Shoot),
    ]
}
