// Math utilities and helper functions

use glam::Vec2;
use rapier2d::prelude::{vector, Real, Vector};

/// Source art was authored at 32 pixels per world unit
pub const PIXELS_PER_UNIT: f32 = 32.0;

/// Convert a pixel-space length into world units
pub const fn px(pixels: f32) -> f32 {
    pixels / PIXELS_PER_UNIT
}

/// Sign of a horizontal offset: -1, 0 or 1
pub fn horizontal_sign(dx: f32) -> f32 {
    if dx > 0.0 {
        1.0
    } else if dx < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// rapier vector -> glam
pub fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// glam -> rapier vector
pub fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_conversion() {
        assert_eq!(px(32.0), 1.0);
        assert_eq!(px(800.0), 25.0);
    }

    #[test]
    fn test_horizontal_sign() {
        assert_eq!(horizontal_sign(3.5), 1.0);
        assert_eq!(horizontal_sign(-0.2), -1.0);
        assert_eq!(horizontal_sign(0.0), 0.0);
    }

    #[test]
    fn test_vector_conversion() {
        let v = Vec2::new(1.5, -2.0);
        assert_eq!(to_vec2(&to_vector(v)), v);
    }
}
