// Physics system using rapier2d

pub mod body;
mod collision;
mod world;

pub use body::{presets, ColliderHandle, PhysicsBody, RigidBodyHandle};
pub use collision::{Category, ContactEvent};
pub use world::{ColliderTag, PhysicsWorld};
