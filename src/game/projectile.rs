// Fired shots
//
// A projectile travels in a straight line until it touches something its
// filter accepts or its lifetime runs out. Exactly one of those ends it.

use glam::{Vec2, Vec3};
use log::{debug, trace};

use crate::core::{ArtDirection, Facing};
use crate::engine::physics::Category;
use crate::engine::EntityId;
use crate::game::characters::{Hit, ProjectileStats};

/// Everything needed to spawn a shot, as computed by the firer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Mirror the sprite to match the firer
    pub facing_left: bool,
}

/// Which contacts count as an impact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetFilter {
    Category(Category),
    /// Match entities by name
    Names(Vec<String>),
}

impl TargetFilter {
    pub fn matches(&self, category: Category, name: Option<&str>) -> bool {
        match self {
            TargetFilter::Category(target) => *target == category,
            TargetFilter::Names(names) => {
                name.is_some_and(|name| names.iter().any(|candidate| candidate == name))
            }
        }
    }
}

impl Default for TargetFilter {
    fn default() -> Self {
        TargetFilter::Category(Category::Enemy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileState {
    InFlight,
    /// Lifetime ran out without a hit
    Expired,
    /// Struck a matching target
    Impacted,
}

impl ProjectileState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProjectileState::InFlight)
    }
}

#[derive(Debug)]
pub struct Projectile {
    id: EntityId,
    stats: ProjectileStats,
    velocity: Vec2,
    filter: TargetFilter,
    facing: Facing,
    state: ProjectileState,
    remaining_lifetime: f32,
}

impl Projectile {
    pub fn new(id: EntityId, spawn: &ProjectileSpawn, stats: ProjectileStats, filter: TargetFilter) -> Self {
        let mut facing = Facing::from_scale(Vec3::ONE, ArtDirection::Right);
        if spawn.facing_left {
            facing.flip();
        }

        Self {
            id,
            remaining_lifetime: stats.lifetime,
            stats,
            velocity: spawn.velocity,
            filter,
            facing,
            state: ProjectileState::InFlight,
        }
    }

    /// Count down the lifetime. Returns true on the tick it expires; a
    /// projectile that already ended never expires again.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        self.remaining_lifetime -= dt;
        if self.remaining_lifetime <= 0.0 {
            self.remaining_lifetime = 0.0;
            self.state = ProjectileState::Expired;
            trace!("Projectile {} expired", self.id);
            return true;
        }
        false
    }

    /// A contact began. Returns the hit to deliver if `category`/`name` pass
    /// the filter; at most one contact ever resolves.
    pub fn on_contact_begin(&mut self, category: Category, name: Option<&str>) -> Option<Hit> {
        if self.state.is_terminal() || !self.filter.matches(category, name) {
            return None;
        }

        self.state = ProjectileState::Impacted;
        debug!("Projectile {} impacted {}", self.id, category.label());
        Some(Hit::new(self.stats.damage))
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    pub fn remaining_lifetime(&self) -> f32 {
        self.remaining_lifetime
    }

    pub fn facing_left(&self) -> bool {
        self.facing.is_left()
    }

    pub fn scale(&self) -> Vec3 {
        self.facing.scale()
    }
}
