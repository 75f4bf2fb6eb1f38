use glam::Vec2;
use rapier2d::prelude::*;

use super::collision::Category;
use crate::core::math::{to_vec2, to_vector};

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// The slice of a rigid body gameplay code is allowed to touch.
///
/// Controllers only read and write linear velocity and lock rotation; the
/// physics engine owns integration, gravity and collision response.
pub trait PhysicsBody {
    /// Current linear velocity
    fn linear_velocity(&self) -> Vec2;

    /// Overwrite linear velocity
    fn set_linear_velocity(&mut self, velocity: Vec2);

    /// Lock or unlock rotation
    fn set_fixed_rotation(&mut self, fixed: bool);

    fn is_fixed_rotation(&self) -> bool;

    /// Position of the body's origin in world space
    fn world_position(&self) -> Vec2;
}

impl PhysicsBody for RigidBody {
    fn linear_velocity(&self) -> Vec2 {
        to_vec2(self.linvel())
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.set_linvel(to_vector(velocity), true);
    }

    fn set_fixed_rotation(&mut self, fixed: bool) {
        self.lock_rotations(fixed, true);
    }

    fn is_fixed_rotation(&self) -> bool {
        self.is_rotation_locked()
    }

    fn world_position(&self) -> Vec2 {
        to_vec2(self.translation())
    }
}

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    linvel: Vector<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    fn with_type(body_type: RigidBodyType, gravity_scale: Real, can_sleep: bool) -> Self {
        Self {
            body_type,
            position: Isometry::identity(),
            linvel: Vector::zeros(),
            gravity_scale,
            can_sleep,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Body affected by forces and collisions
    pub fn new_dynamic() -> Self {
        Self::with_type(RigidBodyType::Dynamic, 1.0, true)
    }

    /// Body moved only by its velocity
    pub fn new_kinematic_velocity_based() -> Self {
        Self::with_type(RigidBodyType::KinematicVelocityBased, 0.0, false)
    }

    /// Immovable body
    pub fn new_fixed() -> Self {
        Self::with_type(RigidBodyType::Fixed, 0.0, false)
    }

    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    pub fn linvel(mut self, x: Real, y: Real) -> Self {
        self.linvel = vector![x, y];
        self
    }

    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation (characters must stay upright)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .linvel(self.linvel)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    category: Category,
    is_sensor: bool,
    friction: Real,
    restitution: Real,
    density: Real,
}

impl ColliderBuilder2D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            category: Category::Ground,
            is_sensor: false,
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
        }
    }

    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self::with_shape(SharedShape::cuboid(half_width, half_height))
    }

    pub fn circle(radius: Real) -> Self {
        Self::with_shape(SharedShape::ball(radius))
    }

    /// Vertical capsule (good for characters)
    pub fn capsule(half_height: Real, radius: Real) -> Self {
        let a = point![0.0, -half_height];
        let b = point![0.0, half_height];
        Self::with_shape(SharedShape::capsule(a, b, radius))
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Sensors report contacts without any physical response
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    pub fn density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    pub fn build(self) -> Collider {
        rapier2d::prelude::ColliderBuilder::new(self.shape)
            .collision_groups(self.category.to_interaction_groups())
            .sensor(self.is_sensor)
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build()
    }
}

/// Common rigid body configurations for game objects
pub mod presets {
    use super::*;

    /// Character body: dynamic, upright, never sleeps
    pub fn character_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .lock_rotation()
            .can_sleep(false)
            .build()
    }

    /// Capsule collider sized to the character, tagged with its category
    pub fn character_collider(width: Real, height: Real, category: Category) -> Collider {
        let radius = width / 2.0;
        let half_height = ((height / 2.0) - radius).max(0.0);

        ColliderBuilder2D::capsule(half_height, radius)
            .category(category)
            .friction(0.0) // No friction for smooth movement
            .density(1.0)
            .build()
    }

    pub fn ground_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    pub fn ground_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .category(Category::Ground)
            .friction(0.3)
            .build()
    }

    /// Shots fly straight: velocity driven, no gravity
    pub fn projectile_body(x: Real, y: Real, vel_x: Real, vel_y: Real) -> RigidBody {
        BodyBuilder::new_kinematic_velocity_based()
            .position(x, y)
            .linvel(vel_x, vel_y)
            .build()
    }

    pub fn projectile_collider(radius: Real) -> Collider {
        ColliderBuilder2D::circle(radius)
            .category(Category::Projectile)
            .sensor(true)
            .density(0.1)
            .build()
    }
}
