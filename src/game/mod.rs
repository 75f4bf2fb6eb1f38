// Gameplay: characters, projectiles and the scene that hosts them

pub mod characters;
pub mod error;
pub mod projectile;
pub mod scene;

pub use scene::{Scene, SceneConfig};
