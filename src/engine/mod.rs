// Engine modules: physics, input, events, timers, game loop

pub mod events;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod scheduler;

/// Identifier for any game entity (player, enemy, projectile, ground)
pub type EntityId = u64;
