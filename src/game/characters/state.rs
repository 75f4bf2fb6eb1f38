// Character state snapshots
//
// Player locomotion is a set of concurrent flags rather than a single state,
// so `LocomotionState` is derived from those flags for logging and queries.
// Enemy combat states are mutually exclusive.

/// Dominant locomotion state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionState {
    /// On the ground, not moving
    Grounded,
    /// On the ground with horizontal input
    Moving,
    /// Rising from a grounded jump
    PrimaryJump,
    /// Rising from the air jump
    DoubleJump,
    /// Airborne and moving downward
    Falling,
}

impl LocomotionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Grounded => "grounded",
            Self::Moving => "moving",
            Self::PrimaryJump => "jump",
            Self::DoubleJump => "double_jump",
            Self::Falling => "fall",
        }
    }
}

/// Enemy behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CombatState {
    /// Closing distance to the target
    #[default]
    Pursuing,
    /// Standing in melee range
    Attacking,
    /// Hit reaction; preempts everything else
    Stunned,
}

impl CombatState {
    /// Whether the enemy may move or attack
    pub fn can_act(self) -> bool {
        !matches!(self, Self::Stunned)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pursuing => "pursue",
            Self::Attacking => "attack",
            Self::Stunned => "stunned",
        }
    }
}

/// Shoot animation variant, chosen from the player's state when firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShootVariant {
    Idle = 1,
    Moving = 2,
    Jumping = 3,
    Falling = 4,
}

impl ShootVariant {
    /// Precedence: jumping > falling > moving > idle
    pub fn select(jumping: bool, falling: bool, moving: bool) -> Self {
        if jumping {
            Self::Jumping
        } else if falling {
            Self::Falling
        } else if moving {
            Self::Moving
        } else {
            Self::Idle
        }
    }

    /// Value written to the `ShootState` parameter
    pub fn value(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stunned_cannot_act() {
        assert!(CombatState::Pursuing.can_act());
        assert!(CombatState::Attacking.can_act());
        assert!(!CombatState::Stunned.can_act());
    }

    #[test]
    fn test_shoot_variant_precedence() {
        assert_eq!(ShootVariant::select(false, false, false).value(), 1);
        assert_eq!(ShootVariant::select(false, false, true).value(), 2);
        assert_eq!(ShootVariant::select(true, false, false).value(), 3);
        assert_eq!(ShootVariant::select(false, true, false).value(), 4);

        // Jumping wins over moving, falling wins over moving
        assert_eq!(ShootVariant::select(true, false, true), ShootVariant::Jumping);
        assert_eq!(ShootVariant::select(false, true, true), ShootVariant::Falling);
        assert_eq!(ShootVariant::select(true, true, true), ShootVariant::Jumping);
    }

    #[test]
    fn test_labels() {
        assert_eq!(LocomotionState::DoubleJump.label(), "double_jump");
        assert_eq!(CombatState::Stunned.label(), "stunned");
    }
}
