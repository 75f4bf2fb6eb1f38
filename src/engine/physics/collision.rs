use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision categories used to tag bodies and filter contacts.
///
/// Gameplay code identifies "what did I touch" by category, never by
/// reaching into the other entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Walkable level geometry
    Ground = 0b0000_0001,

    /// The player character
    Player = 0b0000_0010,

    /// Enemy characters
    Enemy = 0b0000_0100,

    /// Fired shots
    Projectile = 0b0000_1000,
}

impl Category {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // Ground supports both kinds of characters
            Category::Ground => {
                Group::from_bits_truncate(Category::Player as u32 | Category::Enemy as u32)
            }

            // Player and enemies pass through each other; melee is range based
            Category::Player => Group::from_bits_truncate(Category::Ground as u32),

            Category::Enemy => {
                Group::from_bits_truncate(Category::Ground as u32 | Category::Projectile as u32)
            }

            // Shots only ever report enemies
            Category::Projectile => Group::from_bits_truncate(Category::Enemy as u32),
        };

        InteractionGroups::new(memberships, filter)
    }

    /// Name used in logs
    pub fn label(self) -> &'static str {
        match self {
            Category::Ground => "ground",
            Category::Player => "player",
            Category::Enemy => "enemy",
            Category::Projectile => "projectile",
        }
    }
}

/// Contact event between two colliders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    /// Two colliders started touching
    Began {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },

    /// Two colliders stopped touching
    Ended {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },
}

impl ContactEvent {
    pub fn colliders(&self) -> (ColliderHandle, ColliderHandle) {
        match *self {
            ContactEvent::Began {
                collider1,
                collider2,
            }
            | ContactEvent::Ended {
                collider1,
                collider2,
            } => (collider1, collider2),
        }
    }

    pub fn is_begin(&self) -> bool {
        matches!(self, ContactEvent::Began { .. })
    }
}

/// Queue for storing contact events during a physics step.
///
/// rapier's `EventHandler` takes `&self` and must be `Send + Sync`, hence the mutex.
pub struct ContactEventQueue {
    events: Arc<Mutex<Vec<ContactEvent>>>,
}

impl ContactEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    /// Take every event recorded since the last drain
    pub fn drain(&self) -> Vec<ContactEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    fn push(&self, event: ContactEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for ContactEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for ContactEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            CollisionEvent::Started(h1, h2, _flags) => {
                self.push(ContactEvent::Began {
                    collider1: h1,
                    collider2: h2,
                });
            }
            CollisionEvent::Stopped(h1, h2, _flags) => {
                self.push(ContactEvent::Ended {
                    collider1: h1,
                    collider2: h2,
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interacts(a: Category, b: Category) -> bool {
        a.to_interaction_groups()
            .test(b.to_interaction_groups())
    }

    #[test]
    fn test_category_bits_unique() {
        let all = [
            Category::Ground,
            Category::Player,
            Category::Enemy,
            Category::Projectile,
        ];
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    assert_ne!(*a as u32, *b as u32, "Categories must have unique bits");
                }
            }
        }
    }

    #[test]
    fn test_characters_stand_on_ground() {
        assert!(interacts(Category::Player, Category::Ground));
        assert!(interacts(Category::Enemy, Category::Ground));
    }

    #[test]
    fn test_projectile_only_meets_enemies() {
        assert!(interacts(Category::Projectile, Category::Enemy));
        assert!(!interacts(Category::Projectile, Category::Player));
        assert!(!interacts(Category::Projectile, Category::Ground));
        assert!(!interacts(Category::Projectile, Category::Projectile));
    }

    #[test]
    fn test_player_passes_through_enemies() {
        assert!(!interacts(Category::Player, Category::Enemy));
    }

    #[test]
    fn test_drain_empties_queue() {
        let queue = ContactEventQueue::new();
        let a = ColliderHandle::from_raw_parts(0, 0);
        let b = ColliderHandle::from_raw_parts(1, 0);
        queue.push(ContactEvent::Began {
            collider1: a,
            collider2: b,
        });

        let events = queue.drain();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_begin());
        assert_eq!(events[0].colliders(), (a, b));
        assert!(queue.drain().is_empty());
    }
}
