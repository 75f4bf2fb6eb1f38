// Input configuration and remapping

use super::action::{default_bindings, GameKey};
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Maps physical keys to game keys
#[derive(Debug, Clone)]
pub struct InputConfig {
    bindings: HashMap<KeyCode, GameKey>,
}

impl InputConfig {
    /// Empty configuration
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn from_bindings(bindings: Vec<(KeyCode, GameKey)>) -> Self {
        let mut config = Self::new();
        for (code, key) in bindings {
            config.bind(code, key);
        }
        config
    }

    /// Bind a physical key, replacing whatever it was bound to
    pub fn bind(&mut self, code: KeyCode, key: GameKey) {
        self.bindings.insert(code, key);
    }

    pub fn get_key(&self, code: KeyCode) -> Option<GameKey> {
        self.bindings.get(&code).copied()
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::from_bindings(default_bindings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InputConfig::default();
        assert_eq!(config.get_key(KeyCode::Space), Some(GameKey::Jump));
        assert_eq!(config.get_key(KeyCode::KeyA), Some(GameKey::MoveLeft));
        assert_eq!(config.get_key(KeyCode::KeyD), Some(GameKey::MoveRight));
        assert_eq!(config.get_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_rebind_source() {
        let mut config = InputConfig::new();
        config.bind(KeyCode::KeyA, GameKey::MoveLeft);
        config.bind(KeyCode::KeyA, GameKey::MoveRight);

        assert_eq!(config.get_key(KeyCode::KeyA), Some(GameKey::MoveRight));
        assert!(!config.bindings.values().any(|key| *key == GameKey::MoveLeft));
    }

    #[test]
    fn test_custom_bindings_replace_defaults() {
        let config = InputConfig::from_bindings(vec![(KeyCode::KeyW, GameKey::Jump)]);

        assert_eq!(config.get_key(KeyCode::KeyW), Some(GameKey::Jump));
        assert_eq!(config.get_key(KeyCode::Space), None);
    }
}
