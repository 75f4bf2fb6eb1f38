// Cross-entity hit interface
//
// The only way one entity affects another is by delivering a `Hit` through
// `HitReceiver::apply_hit`. Nobody reaches into another controller's state.

use crate::engine::physics::PhysicsBody;
use crate::engine::scheduler::Scheduler;

/// A single landed attack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub damage: i32,
}

impl Hit {
    pub fn new(damage: i32) -> Self {
        Self { damage }
    }
}

/// What a hit did to its receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Receiver was already defeated
    Ignored,
    /// Receiver took the hit and is still standing
    Struck { health: i32 },
    /// This hit brought the receiver to zero health
    Defeated,
}

impl HitOutcome {
    pub fn is_defeated(self) -> bool {
        matches!(self, HitOutcome::Defeated)
    }
}

/// Hit-reaction entry point
pub trait HitReceiver {
    /// React to `hit`. `body` is the receiver's own physics body, if it still has one.
    fn apply_hit(
        &mut self,
        hit: Hit,
        body: Option<&mut dyn PhysicsBody>,
        scheduler: &mut Scheduler,
    ) -> HitOutcome;
}

/// Subtract damage from `health`, saturating at zero
pub(crate) fn take_damage(health: &mut i32, damage: i32) -> HitOutcome {
    if *health <= 0 {
        return HitOutcome::Ignored;
    }
    *health = (*health - damage.max(0)).max(0);
    if *health == 0 {
        HitOutcome::Defeated
    } else {
        HitOutcome::Struck { health: *health }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_damage() {
        let mut health = 30;
        assert_eq!(take_damage(&mut health, 10), HitOutcome::Struck { health: 20 });
        assert_eq!(take_damage(&mut health, 25), HitOutcome::Defeated);
        assert_eq!(health, 0);
        assert_eq!(take_damage(&mut health, 10), HitOutcome::Ignored);
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        let mut health = 10;
        assert_eq!(take_damage(&mut health, -5), HitOutcome::Struck { health: 10 });
    }
}
