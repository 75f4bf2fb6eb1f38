use thiserror::Error;

use crate::engine::EntityId;

/// Scene setup and addressing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("Player already spawned: {0}")]
    PlayerAlreadySpawned(EntityId),

    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_error_display() {
        assert_eq!(SceneError::UnknownEntity(4).to_string(), "Unknown entity: 4");
        assert_eq!(
            SceneError::PlayerAlreadySpawned(1).to_string(),
            "Player already spawned: 1"
        );
    }
}
