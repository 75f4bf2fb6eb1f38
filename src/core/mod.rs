// Core types shared by engine and game code

pub mod facing;
pub mod math;

pub use facing::{ArtDirection, Facing};
