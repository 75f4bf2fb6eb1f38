// Character system
//
// - Player locomotion and shooting
// - Enemy pursuit, melee and stun
// - Hit delivery between the two
// - Tuning stats, state snapshots and animation parameters

pub mod animation;
pub mod combat;
pub mod hit;
pub mod locomotion;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use combat::{CombatController, CombatUpdate};
pub use hit::{Hit, HitOutcome, HitReceiver};
pub use locomotion::LocomotionController;
pub use stats::{CombatStats, LocomotionStats, ProjectileStats};
