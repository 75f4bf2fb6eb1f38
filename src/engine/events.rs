// Scoped event subscriptions
//
// Each `Subscription` is a guard tied to the subscribing entity's lifetime.
// Dropping it (or calling `cancel`) detaches the entity from the topic, so
// an entity that is torn down mid-tick stops receiving events immediately.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use rapier2d::prelude::ColliderHandle;

use super::EntityId;

/// Event streams an entity can listen to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Key-down / key-up events
    Keyboard,
    /// Contact begin / end events for one collider
    Contact(ColliderHandle),
}

type Listeners = Rc<RefCell<HashMap<(Topic, EntityId), usize>>>;

/// Registry of live subscriptions
#[derive(Debug, Default)]
pub struct EventRegistry {
    listeners: Listeners,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `entity` to `topic`. The returned guard must be kept alive
    /// for as long as the entity wants events.
    pub fn subscribe(&self, topic: Topic, entity: EntityId) -> Subscription {
        *self
            .listeners
            .borrow_mut()
            .entry((topic, entity))
            .or_insert(0) += 1;

        Subscription {
            topic,
            entity,
            listeners: Rc::downgrade(&self.listeners),
            active: true,
        }
    }

    /// Whether `entity` currently listens to `topic`
    pub fn is_subscribed(&self, topic: Topic, entity: EntityId) -> bool {
        self.listeners.borrow().contains_key(&(topic, entity))
    }
}

/// Guard for a single registration
#[derive(Debug)]
pub struct Subscription {
    topic: Topic,
    entity: EntityId,
    listeners: Weak<RefCell<HashMap<(Topic, EntityId), usize>>>,
    active: bool,
}

impl Subscription {
    /// Detach from the topic. Safe to call any number of times, and safe
    /// after the registry itself is gone.
    pub fn cancel(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        let mut listeners = listeners.borrow_mut();
        let key = (self.topic, self.entity);
        if let Some(count) = listeners.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                listeners.remove(&key);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
