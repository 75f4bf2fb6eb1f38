// Player locomotion: run, jump, double jump, facing and shooting

use glam::{Vec2, Vec3};
use log::{debug, trace};

use super::animation::{AnimParam, AnimationParameters};
use super::hit::{take_damage, Hit, HitOutcome, HitReceiver};
use super::state::{LocomotionState, ShootVariant};
use super::stats::LocomotionStats;
use crate::core::{ArtDirection, Facing};
use crate::engine::input::{GameKey, KeyEvent};
use crate::engine::physics::{Category, PhysicsBody};
use crate::engine::scheduler::{Scheduler, TimerAction, TimerHandle};
use crate::engine::EntityId;
use crate::game::projectile::ProjectileSpawn;

/// Player controller.
///
/// Input sets intent, `update` turns intent into velocity once per tick, and
/// ground contacts reset the jump state.
#[derive(Debug)]
pub struct LocomotionController {
    id: EntityId,
    stats: LocomotionStats,

    /// -1, 0 or 1
    horizontal_input: i8,
    is_grounded: bool,
    can_double_jump: bool,
    used_double_jump: bool,
    is_jumping: bool,
    is_falling: bool,
    is_moving: bool,
    facing: Facing,
    health: i32,

    animator: Option<AnimationParameters>,
    shoot_pulse: Option<TimerHandle>,
    hit_flash: Option<TimerHandle>,
}

impl LocomotionController {
    /// Create the controller for a player spawned with `original_scale`
    pub fn new(id: EntityId, stats: LocomotionStats, original_scale: Vec3) -> Self {
        Self {
            id,
            health: stats.max_health,
            stats,
            horizontal_input: 0,
            is_grounded: true,
            can_double_jump: true,
            used_double_jump: false,
            is_jumping: false,
            is_falling: false,
            is_moving: false,
            facing: Facing::from_scale(original_scale, ArtDirection::Right),
            animator: Some(AnimationParameters::new()),
            shoot_pulse: None,
            hit_flash: None,
        }
    }

    /// Lock rotation on the body the controller drives
    pub fn attach(&self, body: &mut dyn PhysicsBody) {
        body.set_fixed_rotation(true);
    }

    /// Dispatch a key event. Returns a projectile to spawn if the key fired one.
    pub fn on_key_event(
        &mut self,
        event: KeyEvent,
        body: &mut dyn PhysicsBody,
        scheduler: &mut Scheduler,
    ) -> Option<ProjectileSpawn> {
        match event {
            KeyEvent::Down(key) => self.on_key_down(key, body, scheduler),
            KeyEvent::Up(key) => {
                self.on_key_up(key);
                None
            }
        }
    }

    pub fn on_key_down(
        &mut self,
        key: GameKey,
        body: &mut dyn PhysicsBody,
        scheduler: &mut Scheduler,
    ) -> Option<ProjectileSpawn> {
        if self.is_defeated() {
            return None;
        }

        match key {
            GameKey::Jump => {
                self.jump(body);
                None
            }
            GameKey::MoveLeft => {
                self.horizontal_input = -1;
                if !self.facing.is_left() {
                    self.flip_direction();
                }
                None
            }
            GameKey::MoveRight => {
                self.horizontal_input = 1;
                if self.facing.is_left() {
                    self.flip_direction();
                }
                None
            }
            GameKey::Shoot => Some(self.shoot(body.world_position(), scheduler)),
        }
    }

    /// Releasing either movement key stops horizontal movement, even if the
    /// other direction is still held.
    pub fn on_key_up(&mut self, key: GameKey) {
        if key.is_movement() {
            self.horizontal_input = 0;
        }
    }

    /// Jump from the ground, or double jump once while airborne.
    /// Returns false when neither is available.
    pub fn jump(&mut self, body: &mut dyn PhysicsBody) -> bool {
        let velocity = body.linear_velocity();

        if self.is_grounded {
            body.set_linear_velocity(Vec2::new(velocity.x, self.stats.jump_force));
            self.is_grounded = false;
            self.can_double_jump = true;
            self.used_double_jump = false;
            debug!("Player {} jumped", self.id);
        } else if self.can_double_jump {
            body.set_linear_velocity(Vec2::new(
                velocity.x,
                self.stats.jump_force * self.stats.double_jump_factor,
            ));
            self.can_double_jump = false;
            self.used_double_jump = true;
            debug!("Player {} double jumped", self.id);
        } else {
            return false;
        }

        self.is_jumping = true;
        self.is_falling = false;
        self.set_bool(AnimParam::IsJumping, true);
        self.set_bool(AnimParam::IsFalling, false);
        true
    }

    /// Per-tick update: apply horizontal intent and refresh animation state.
    /// Vertical velocity is left to the physics engine.
    pub fn update(&mut self, _dt: f32, body: &mut dyn PhysicsBody) {
        let vertical = body.linear_velocity().y;
        body.set_linear_velocity(Vec2::new(
            f32::from(self.horizontal_input) * self.stats.move_speed,
            vertical,
        ));

        self.is_moving = f32::from(self.horizontal_input).abs() > 0.1;
        self.set_bool(AnimParam::IsMoving, self.is_moving);
        self.set_float(AnimParam::VerticalVelocity, vertical);

        if !self.is_grounded && vertical < 0.0 {
            if !self.is_falling {
                trace!("Player {} falling", self.id);
            }
            self.is_falling = true;
            self.is_jumping = false;
            self.set_bool(AnimParam::IsFalling, true);
            self.set_bool(AnimParam::IsJumping, false);
        } else {
            self.is_falling = false;
            self.set_bool(AnimParam::IsFalling, false);
        }
    }

    /// Contact began with something of category `other`
    pub fn on_contact_begin(&mut self, other: Category) {
        if other != Category::Ground {
            return;
        }

        self.is_grounded = true;
        self.can_double_jump = true;
        self.used_double_jump = false;
        self.is_jumping = false;
        self.is_falling = false;
        self.set_bool(AnimParam::IsJumping, false);
        self.set_bool(AnimParam::IsFalling, false);
        self.set_float(AnimParam::VerticalVelocity, 0.0);
        debug!("Player {} landed", self.id);
    }

    /// Contact ended with something of category `other`
    pub fn on_contact_end(&mut self, other: Category) {
        if other == Category::Ground {
            self.is_grounded = false;
            debug!("Player {} left the ground", self.id);
        }
    }

    /// Toggle facing; the sprite scale follows
    pub fn flip_direction(&mut self) {
        self.facing.flip();
    }

    /// Fire a shot from `position`.
    ///
    /// Pulses the `ShootState` parameter for `shoot_pulse` seconds; movement
    /// and jump state are untouched.
    pub fn shoot(&mut self, position: Vec2, scheduler: &mut Scheduler) -> ProjectileSpawn {
        let variant = ShootVariant::select(self.is_jumping, self.is_falling, self.is_moving);
        self.set_int(AnimParam::ShootState, variant.value());

        if let Some(previous) = self.shoot_pulse.take() {
            scheduler.cancel(previous);
        }
        self.shoot_pulse = Some(scheduler.schedule(
            self.id,
            self.stats.shoot_pulse,
            TimerAction::EndShootPulse,
        ));

        let sign = self.facing.sign();
        let offset = Vec2::new(self.stats.muzzle_offset.x * sign, self.stats.muzzle_offset.y);
        debug!("Player {} shot ({:?})", self.id, variant);

        ProjectileSpawn {
            position: position + offset,
            velocity: Vec2::new(sign * self.stats.bullet_speed, 0.0),
            facing_left: self.facing.is_left(),
        }
    }

    /// A timer this controller scheduled has fired
    pub fn on_timer(&mut self, handle: TimerHandle, action: TimerAction) {
        match action {
            TimerAction::EndShootPulse if self.shoot_pulse == Some(handle) => {
                self.shoot_pulse = None;
                self.set_int(AnimParam::ShootState, 0);
            }
            TimerAction::EndHitFlash if self.hit_flash == Some(handle) => {
                self.hit_flash = None;
                self.set_bool(AnimParam::IsHit, false);
            }
            _ => trace!("Player {} ignoring stale timer {:?}", self.id, action),
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub fn can_double_jump(&self) -> bool {
        self.can_double_jump
    }

    pub fn facing_left(&self) -> bool {
        self.facing.is_left()
    }

    /// Sprite scale for the current facing
    pub fn scale(&self) -> Vec3 {
        self.facing.scale()
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Shoot variant currently being pulsed, if any
    pub fn shoot_variant(&self) -> Option<i32> {
        self.shoot_pulse?;
        self.animator
            .as_ref()
            .and_then(|a| a.get_int(AnimParam::ShootState))
    }

    pub fn animator(&self) -> Option<&AnimationParameters> {
        self.animator.as_ref()
    }

    /// Dominant state, for logs and queries
    pub fn state(&self) -> LocomotionState {
        if self.is_grounded {
            if self.is_moving {
                LocomotionState::Moving
            } else {
                LocomotionState::Grounded
            }
        } else if self.is_jumping && self.used_double_jump {
            LocomotionState::DoubleJump
        } else if self.is_jumping {
            LocomotionState::PrimaryJump
        } else {
            LocomotionState::Falling
        }
    }

    fn set_bool(&mut self, param: AnimParam, value: bool) {
        if let Some(animator) = self.animator.as_mut() {
            animator.set_bool(param, value);
        }
    }

    fn set_float(&mut self, param: AnimParam, value: f32) {
        if let Some(animator) = self.animator.as_mut() {
            animator.set_float(param, value);
        }
    }

    fn set_int(&mut self, param: AnimParam, value: i32) {
        if let Some(animator) = self.animator.as_mut() {
            animator.set_int(param, value);
        }
    }
}

impl HitReceiver for LocomotionController {
    fn apply_hit(
        &mut self,
        hit: Hit,
        _body: Option<&mut dyn PhysicsBody>,
        scheduler: &mut Scheduler,
    ) -> HitOutcome {
        let outcome = take_damage(&mut self.health, hit.damage);
        if outcome == HitOutcome::Ignored {
            return outcome;
        }

        self.set_bool(AnimParam::IsHit, true);
        if let Some(previous) = self.hit_flash.take() {
            scheduler.cancel(previous);
        }
        self.hit_flash = Some(scheduler.schedule(
            self.id,
            self.stats.hit_flash,
            TimerAction::EndHitFlash,
        ));

        if outcome.is_defeated() {
            self.horizontal_input = 0;
            debug!("Player {} defeated", self.id);
        } else {
            debug!("Player {} hit for {}, health {}", self.id, hit.damage, self.health);
        }
        outcome
    }
}
