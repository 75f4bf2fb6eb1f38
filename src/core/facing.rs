// Sprite facing and horizontal mirroring

use glam::Vec3;

/// Which way a sprite sheet was drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtDirection {
    /// Frames face right at positive x scale
    Right,
    /// Frames face left at positive x scale
    Left,
}

/// Facing state of an entity, mirrored through its x scale.
///
/// The scale captured at spawn is kept as the reference magnitude so that
/// flipping never accumulates error and never changes y/z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facing {
    facing_left: bool,
    original_scale: Vec3,
    art: ArtDirection,
}

impl Facing {
    /// Capture facing from the entity's spawn scale
    pub fn from_scale(original_scale: Vec3, art: ArtDirection) -> Self {
        let facing_left = match art {
            ArtDirection::Right => original_scale.x < 0.0,
            ArtDirection::Left => original_scale.x > 0.0,
        };

        Self {
            facing_left,
            original_scale,
            art,
        }
    }

    pub fn is_left(&self) -> bool {
        self.facing_left
    }

    /// -1 when facing left, 1 when facing right
    pub fn sign(&self) -> f32 {
        if self.facing_left {
            -1.0
        } else {
            1.0
        }
    }

    /// Toggle facing
    pub fn flip(&mut self) {
        self.facing_left = !self.facing_left;
    }

    /// Flip only if `direction` points the other way. Zero never flips.
    /// Returns true if a flip happened.
    pub fn face_towards(&mut self, direction: f32) -> bool {
        let disagrees = (direction < 0.0 && !self.facing_left)
            || (direction > 0.0 && self.facing_left);
        if disagrees {
            self.flip();
        }
        disagrees
    }

    /// Scale to apply to the sprite for the current facing
    pub fn scale(&self) -> Vec3 {
        let magnitude = self.original_scale.x.abs();
        let x = match (self.art, self.facing_left) {
            (ArtDirection::Right, true) | (ArtDirection::Left, false) => -magnitude,
            (ArtDirection::Right, false) | (ArtDirection::Left, true) => magnitude,
        };
        Vec3::new(x, self.original_scale.y, self.original_scale.z)
    }
}
