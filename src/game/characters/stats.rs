// Tuning values for player, enemies and projectiles
//
// Lengths are world units (32 source pixels each), times are seconds.

use glam::Vec2;

use crate::core::math::px;

/// Player movement, jumping and shooting
#[derive(Debug, Clone, PartialEq)]
pub struct LocomotionStats {
    /// Horizontal run speed (units/second)
    pub move_speed: f32,
    /// Vertical velocity set by a grounded jump
    pub jump_force: f32,
    /// Fraction of `jump_force` used by the double jump
    pub double_jump_factor: f32,
    /// Speed given to fired projectiles
    pub bullet_speed: f32,
    /// Spawn offset of a projectile when facing right; x is mirrored when facing left
    pub muzzle_offset: Vec2,
    /// How long the shoot animation parameter stays set
    pub shoot_pulse: f32,
    pub max_health: i32,
    /// How long `IsHit` stays set after the player is struck
    pub hit_flash: f32,
    /// Collider width
    pub width: f32,
    /// Collider height
    pub height: f32,
}

pub const PLAYER_STATS: LocomotionStats = LocomotionStats {
    move_speed: 5.0,
    jump_force: 8.0,
    double_jump_factor: 0.8,
    bullet_speed: px(800.0),
    muzzle_offset: Vec2::new(0.75, 0.25),
    shoot_pulse: 0.1,
    max_health: 100,
    hit_flash: 0.2,
    width: 1.0,
    height: 2.0,
};

impl Default for LocomotionStats {
    fn default() -> Self {
        PLAYER_STATS
    }
}

/// Enemy pursuit, melee and stun
#[derive(Debug, Clone, PartialEq)]
pub struct CombatStats {
    /// Pursuit speed (units/second)
    pub move_speed: f32,
    /// Distance at which the enemy stops and attacks
    pub attack_range: f32,
    /// Stun length after being hit
    pub hit_duration: f32,
    /// Length of one melee cycle
    pub melee_cycle: f32,
    /// Damage dealt by a landed melee hit
    pub melee_damage: i32,
    pub max_health: i32,
    pub width: f32,
    pub height: f32,
}

pub const ENEMY_STATS: CombatStats = CombatStats {
    move_speed: 2.0,
    attack_range: px(50.0),
    hit_duration: 1.0,
    melee_cycle: 1.0,
    melee_damage: 10,
    max_health: 30,
    width: 1.0,
    height: 2.0,
};

impl Default for CombatStats {
    fn default() -> Self {
        ENEMY_STATS
    }
}

/// Fired shots
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileStats {
    pub damage: i32,
    /// Time before an unimpacted shot despawns
    pub lifetime: f32,
    /// Collider radius
    pub radius: f32,
}

pub const BULLET_STATS: ProjectileStats = ProjectileStats {
    damage: 10,
    lifetime: 5.0,
    radius: 0.15,
};

impl Default for ProjectileStats {
    fn default() -> Self {
        BULLET_STATS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_defaults() {
        let stats = LocomotionStats::default();
        assert_eq!(stats.move_speed, 5.0);
        assert_eq!(stats.jump_force, 8.0);
        assert_eq!(stats.double_jump_factor, 0.8);
        assert_eq!(stats.bullet_speed, 25.0);
    }

    #[test]
    fn test_enemy_defaults() {
        let stats = CombatStats::default();
        assert_eq!(stats.move_speed, 2.0);
        assert_eq!(stats.attack_range, 50.0 / 32.0);
        assert_eq!(stats.hit_duration, 1.0);
        assert_eq!(stats.melee_cycle, 1.0);
    }

    #[test]
    fn test_projectile_defaults() {
        let stats = ProjectileStats::default();
        assert_eq!(stats.lifetime, 5.0);
        assert_eq!(stats.damage, 10);
    }

    #[test]
    fn test_field_override() {
        let stats = CombatStats {
            attack_range: 50.0,
            ..CombatStats::default()
        };
        assert_eq!(stats.attack_range, 50.0);
        assert_eq!(stats.move_speed, ENEMY_STATS.move_speed);
    }
}
