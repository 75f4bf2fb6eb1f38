// Enemy AI: pursue the target, melee in range, stagger when hit

use glam::{Vec2, Vec3};
use log::{debug, trace};

use super::animation::{AnimParam, AnimationParameters};
use super::hit::{take_damage, Hit, HitOutcome, HitReceiver};
use super::state::CombatState;
use super::stats::CombatStats;
use crate::core::math::horizontal_sign;
use crate::core::{ArtDirection, Facing};
use crate::engine::physics::PhysicsBody;
use crate::engine::scheduler::{Scheduler, TimerAction, TimerHandle};
use crate::engine::EntityId;

/// What an enemy did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatUpdate {
    /// Stunned; nothing happened
    Suppressed,
    /// No target to act on
    NoTarget,
    /// Moving toward the target
    Pursuing,
    /// Entered melee range and began a swing this tick
    AttackStarted,
    /// In melee range, swing already under way
    Attacking,
}

/// Enemy controller.
///
/// Each tick the enemy compares its distance to the target against
/// `attack_range` and either closes in or swings. A hit stuns it for
/// `hit_duration`, suppressing everything else.
#[derive(Debug)]
pub struct CombatController {
    id: EntityId,
    stats: CombatStats,
    /// Non-owning reference, resolved once at spawn
    target: Option<EntityId>,

    is_hit: bool,
    is_attacking: bool,
    facing: Facing,
    health: i32,

    animator: Option<AnimationParameters>,
    melee_cycle: Option<TimerHandle>,
    stun: Option<TimerHandle>,
    strike: Option<TimerHandle>,
}

impl CombatController {
    /// Enemy sprites are drawn facing left
    pub fn new(
        id: EntityId,
        stats: CombatStats,
        original_scale: Vec3,
        target: Option<EntityId>,
    ) -> Self {
        Self {
            id,
            health: stats.max_health,
            stats,
            target,
            is_hit: false,
            is_attacking: false,
            facing: Facing::from_scale(original_scale, ArtDirection::Left),
            animator: Some(AnimationParameters::new()),
            melee_cycle: None,
            stun: None,
            strike: None,
        }
    }

    /// Lock rotation on the body the controller drives
    pub fn attach(&self, body: &mut dyn PhysicsBody) {
        body.set_fixed_rotation(true);
    }

    /// Whether `target_position` is within striking distance of `position`
    pub fn in_range(&self, position: Vec2, target_position: Vec2) -> bool {
        position.distance(target_position) <= self.stats.attack_range
    }

    /// Per-tick AI step. `target_position` is `None` when the target is gone.
    pub fn update(
        &mut self,
        _dt: f32,
        body: &mut dyn PhysicsBody,
        target_position: Option<Vec2>,
        scheduler: &mut Scheduler,
    ) -> CombatUpdate {
        if !self.state().can_act() {
            return CombatUpdate::Suppressed;
        }
        let Some(target_position) = target_position else {
            return CombatUpdate::NoTarget;
        };

        let position = body.world_position();
        if self.in_range(position, target_position) {
            self.update_attack(body, scheduler)
        } else {
            let direction = horizontal_sign(target_position.x - position.x);
            self.update_pursuit(body, direction, scheduler);
            CombatUpdate::Pursuing
        }
    }

    fn update_pursuit(&mut self, body: &mut dyn PhysicsBody, direction: f32, scheduler: &mut Scheduler) {
        if self.is_attacking {
            self.is_attacking = false;
            self.set_bool(AnimParam::IsAttacking, false);
            if let Some(cycle) = self.melee_cycle.take() {
                scheduler.cancel(cycle);
            }
            trace!("Enemy {} target left range", self.id);
        }
        self.set_bool(AnimParam::IsMoving, true);

        let vertical = body.linear_velocity().y;
        body.set_linear_velocity(Vec2::new(direction * self.stats.move_speed, vertical));

        self.facing.face_towards(direction);
    }

    fn update_attack(&mut self, body: &mut dyn PhysicsBody, scheduler: &mut Scheduler) -> CombatUpdate {
        let vertical = body.linear_velocity().y;
        body.set_linear_velocity(Vec2::new(0.0, vertical));

        if self.is_attacking {
            return CombatUpdate::Attacking;
        }

        self.is_attacking = true;
        self.set_bool(AnimParam::IsAttacking, true);
        self.set_bool(AnimParam::IsMoving, false);
        self.melee_cycle = Some(scheduler.schedule(
            self.id,
            self.stats.melee_cycle,
            TimerAction::EndMeleeCycle,
        ));
        debug!("Enemy {} attacking", self.id);
        CombatUpdate::AttackStarted
    }

    /// Schedule the mid-swing strike for the current attack
    pub fn schedule_strike(&mut self, delay: f32, scheduler: &mut Scheduler) {
        if let Some(previous) = self.strike.take() {
            scheduler.cancel(previous);
        }
        self.strike = Some(scheduler.schedule(self.id, delay, TimerAction::MeleeStrike));
    }

    /// Consume a fired strike timer. False if it was superseded or cancelled.
    pub fn take_strike(&mut self, handle: TimerHandle) -> bool {
        if self.strike == Some(handle) {
            self.strike = None;
            true
        } else {
            false
        }
    }

    /// Hit-application hook, meant to be called by the attack animation
    /// mid-swing. Re-checks the range and lands the hit on `target` if it is
    /// still close enough. Returns `None` when nothing landed.
    pub fn start_attack_collider<R: HitReceiver + ?Sized>(
        &self,
        position: Vec2,
        target_position: Vec2,
        target: &mut R,
        target_body: Option<&mut dyn PhysicsBody>,
        scheduler: &mut Scheduler,
    ) -> Option<HitOutcome> {
        if self.is_hit || !self.in_range(position, target_position) {
            return None;
        }

        debug!("Enemy {} strike landed", self.id);
        Some(target.apply_hit(Hit::new(self.stats.melee_damage), target_body, scheduler))
    }

    /// Stagger for `hit_duration`: stop, drop any swing in progress and
    /// restart the stun timer. Damage is applied separately by `apply_hit`.
    pub fn get_hit(&mut self, body: Option<&mut dyn PhysicsBody>, scheduler: &mut Scheduler) {
        self.is_hit = true;
        self.is_attacking = false;
        self.set_bool(AnimParam::IsHit, true);
        self.set_bool(AnimParam::IsMoving, false);
        self.set_bool(AnimParam::IsAttacking, false);

        if let Some(body) = body {
            let vertical = body.linear_velocity().y;
            body.set_linear_velocity(Vec2::new(0.0, vertical));
        }

        for handle in [self.melee_cycle.take(), self.strike.take(), self.stun.take()]
            .into_iter()
            .flatten()
        {
            scheduler.cancel(handle);
        }
        self.stun = Some(scheduler.schedule(
            self.id,
            self.stats.hit_duration,
            TimerAction::EndStun,
        ));
    }

    /// A timer this controller scheduled has fired
    pub fn on_timer(&mut self, handle: TimerHandle, action: TimerAction) {
        match action {
            TimerAction::EndMeleeCycle if self.melee_cycle == Some(handle) => {
                self.melee_cycle = None;
                self.is_attacking = false;
                self.set_bool(AnimParam::IsAttacking, false);
            }
            TimerAction::EndStun if self.stun == Some(handle) => {
                self.stun = None;
                self.is_hit = false;
                self.set_bool(AnimParam::IsHit, false);
                debug!("Enemy {} recovered", self.id);
            }
            _ => trace!("Enemy {} ignoring stale timer {:?}", self.id, action),
        }
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
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

    /// Seconds of stun left, given the scheduler that owns the timer
    pub fn stun_remaining(&self, scheduler: &Scheduler) -> Option<f32> {
        self.stun.and_then(|handle| scheduler.remaining(handle))
    }

    pub fn animator(&self) -> Option<&AnimationParameters> {
        self.animator.as_ref()
    }

    pub fn state(&self) -> CombatState {
        if self.is_hit {
            CombatState::Stunned
        } else if self.is_attacking {
            CombatState::Attacking
        } else {
            CombatState::Pursuing
        }
    }

    fn set_bool(&mut self, param: AnimParam, value: bool) {
        if let Some(animator) = self.animator.as_mut() {
            animator.set_bool(param, value);
        }
    }
}

impl HitReceiver for CombatController {
    /// Take damage and stun. A hit during a stun restarts the timer.
    fn apply_hit(
        &mut self,
        hit: Hit,
        body: Option<&mut dyn PhysicsBody>,
        scheduler: &mut Scheduler,
    ) -> HitOutcome {
        let outcome = take_damage(&mut self.health, hit.damage);
        if outcome == HitOutcome::Ignored {
            return outcome;
        }

        self.get_hit(body, scheduler);
        debug!("Enemy {} hit for {}, health {}", self.id, hit.damage, self.health);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rapier2d::prelude::RigidBody;
    use crate::engine::physics::presets;
    use crate::game::characters::{LocomotionController, LocomotionStats};

    fn wide_range() -> CombatStats {
        CombatStats {
            attack_range: 50.0,
            ..CombatStats::default()
        }
    }

    fn setup(stats: CombatStats) -> (CombatController, RigidBody, Scheduler) {
        let enemy = CombatController::new(2, stats, Vec3::ONE, Some(1));
        (enemy, presets::character_body(0.0, 0.0), Scheduler::new())
    }

    /// Drain due timers into the enemy
    fn run_timers(enemy: &mut CombatController, scheduler: &mut Scheduler, dt: f32) {
        for fired in scheduler.advance(dt) {
            enemy.on_timer(fired.handle, fired.action);
        }
    }

    #[test]
    fn test_initial_state() {
        let (enemy, _, _) = setup(CombatStats::default());
        assert_eq!(enemy.state(), CombatState::Pursuing);
        assert!(enemy.facing_left());
        assert_eq!(enemy.target(), Some(1));
    }

    #[test]
    fn test_pursues_when_out_of_range() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        body.set_linear_velocity(Vec2::new(0.0, -1.0));

        let result = enemy.update(0.1, &mut body, Some(Vec2::new(-80.0, 0.0)), &mut scheduler);
        assert_eq!(result, CombatUpdate::Pursuing);
        assert_eq!(body.linear_velocity(), Vec2::new(-2.0, -1.0));
        assert!(enemy.animator().unwrap().get_bool(AnimParam::IsMoving));
        assert!(enemy.facing_left());
    }

    #[test]
    fn test_pursuit_flips_toward_target() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());

        enemy.update(0.1, &mut body, Some(Vec2::new(80.0, 0.0)), &mut scheduler);
        assert!(!enemy.facing_left());
        assert_eq!(enemy.scale().x, -1.0);
        assert_eq!(body.linear_velocity().x, 2.0);

        enemy.update(0.1, &mut body, Some(Vec2::new(-80.0, 0.0)), &mut scheduler);
        assert!(enemy.facing_left());
        assert_eq!(enemy.scale().x, 1.0);
    }

    #[test]
    fn test_attacks_in_range() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        body.set_linear_velocity(Vec2::new(2.0, 0.5));

        let result = enemy.update(0.1, &mut body, Some(Vec2::new(40.0, 0.0)), &mut scheduler);
        assert_eq!(result, CombatUpdate::AttackStarted);
        assert_eq!(enemy.state(), CombatState::Attacking);
        assert_eq!(body.linear_velocity(), Vec2::new(0.0, 0.5));

        let animator = enemy.animator().unwrap();
        assert!(animator.get_bool(AnimParam::IsAttacking));
        assert!(!animator.get_bool(AnimParam::IsMoving));

        let result = enemy.update(0.1, &mut body, Some(Vec2::new(40.0, 0.0)), &mut scheduler);
        assert_eq!(result, CombatUpdate::Attacking);
    }

    #[test]
    fn test_exact_range_attacks() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        let result = enemy.update(0.1, &mut body, Some(Vec2::new(50.0, 0.0)), &mut scheduler);
        assert_eq!(result, CombatUpdate::AttackStarted);
    }

    #[test]
    fn test_range_uses_straight_line_distance() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        // 30 across, 45 up: 54 away
        let result = enemy.update(0.1, &mut body, Some(Vec2::new(30.0, 45.0)), &mut scheduler);
        assert_eq!(result, CombatUpdate::Pursuing);
    }

    #[test]
    fn test_melee_cycle_ends_after_one_second() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        enemy.update(0.1, &mut body, Some(Vec2::new(10.0, 0.0)), &mut scheduler);

        run_timers(&mut enemy, &mut scheduler, 0.5);
        assert!(enemy.is_attacking);
        run_timers(&mut enemy, &mut scheduler, 0.5);
        assert!(!enemy.is_attacking);

        // Still in range: the next tick starts a new swing
        let result = enemy.update(0.1, &mut body, Some(Vec2::new(10.0, 0.0)), &mut scheduler);
        assert_eq!(result, CombatUpdate::AttackStarted);
    }

    #[test]
    fn test_leaving_range_clears_attack() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        enemy.update(0.1, &mut body, Some(Vec2::new(10.0, 0.0)), &mut scheduler);
        enemy.update(0.1, &mut body, Some(Vec2::new(100.0, 0.0)), &mut scheduler);

        assert!(!enemy.is_attacking);
        assert!(!enemy.animator().unwrap().get_bool(AnimParam::IsAttacking));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_no_target_is_noop() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        body.set_linear_velocity(Vec2::new(1.0, 1.0));

        let result = enemy.update(0.1, &mut body, None, &mut scheduler);
        assert_eq!(result, CombatUpdate::NoTarget);
        assert_eq!(body.linear_velocity(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_hit_stuns_and_zeroes_velocity() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        enemy.update(0.1, &mut body, Some(Vec2::new(80.0, 0.0)), &mut scheduler);
        body.set_linear_velocity(Vec2::new(2.0, -3.0));

        enemy.get_hit(Some(&mut body), &mut scheduler);
        assert_eq!(enemy.state(), CombatState::Stunned);
        assert_eq!(body.linear_velocity(), Vec2::new(0.0, -3.0));

        let animator = enemy.animator().unwrap();
        assert!(animator.get_bool(AnimParam::IsHit));
        assert!(!animator.get_bool(AnimParam::IsMoving));
        assert!(!animator.get_bool(AnimParam::IsAttacking));
    }

    #[test]
    fn test_hit_overrides_attack() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        enemy.update(0.1, &mut body, Some(Vec2::new(10.0, 0.0)), &mut scheduler);
        enemy.schedule_strike(0.5, &mut scheduler);

        enemy.get_hit(None, &mut scheduler);
        assert!(!enemy.is_attacking);
        // Melee cycle and strike cancelled, only the stun remains
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_stunned_update_is_suppressed() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        enemy.get_hit(Some(&mut body), &mut scheduler);

        let result = enemy.update(0.1, &mut body, Some(Vec2::new(80.0, 0.0)), &mut scheduler);
        assert_eq!(result, CombatUpdate::Suppressed);
        assert_eq!(body.linear_velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_stun_lasts_hit_duration() {
        let (mut enemy, _, mut scheduler) = setup(wide_range());
        enemy.get_hit(None, &mut scheduler);

        run_timers(&mut enemy, &mut scheduler, 0.75);
        assert!(enemy.is_hit);
        run_timers(&mut enemy, &mut scheduler, 0.25);
        assert!(!enemy.is_hit);
        assert!(!enemy.animator().unwrap().get_bool(AnimParam::IsHit));
    }

    #[test]
    fn test_rehit_restarts_stun() {
        let (mut enemy, _, mut scheduler) = setup(wide_range());
        enemy.get_hit(None, &mut scheduler);
        run_timers(&mut enemy, &mut scheduler, 0.5);

        enemy.get_hit(None, &mut scheduler);
        assert_relative_eq!(enemy.stun_remaining(&scheduler).unwrap(), 1.0);

        // The first stun would have ended here
        run_timers(&mut enemy, &mut scheduler, 0.5);
        assert!(enemy.is_hit);

        run_timers(&mut enemy, &mut scheduler, 0.5);
        assert!(!enemy.is_hit);
    }

    #[test]
    fn test_get_hit_staggers_without_damage() {
        let (mut enemy, _, mut scheduler) = setup(wide_range());
        enemy.get_hit(None, &mut scheduler);

        assert_eq!(enemy.state(), CombatState::Stunned);
        assert_eq!(enemy.health, 30);
        assert_relative_eq!(enemy.stun_remaining(&scheduler).unwrap(), 1.0);
    }

    #[test]
    fn test_stale_stun_timer_ignored() {
        let (mut enemy, _, mut scheduler) = setup(wide_range());
        let stale = scheduler.schedule(2, 0.0, TimerAction::EndStun);
        enemy.get_hit(None, &mut scheduler);

        enemy.on_timer(stale, TimerAction::EndStun);
        assert!(enemy.is_hit);
    }

    #[test]
    fn test_damage_and_defeat() {
        let (mut enemy, _, mut scheduler) = setup(CombatStats::default());
        assert_eq!(
            enemy.apply_hit(Hit::new(10), None, &mut scheduler),
            HitOutcome::Struck { health: 20 }
        );
        enemy.apply_hit(Hit::new(10), None, &mut scheduler);
        assert!(enemy
            .apply_hit(Hit::new(10), None, &mut scheduler)
            .is_defeated());
        assert_eq!(enemy.health, 0);
    }

    #[test]
    fn test_attack_collider_hits_target_in_range() {
        let (enemy, _, mut scheduler) = setup(wide_range());
        let mut player = LocomotionController::new(1, LocomotionStats::default(), Vec3::ONE);

        let outcome = enemy.start_attack_collider(
            Vec2::ZERO,
            Vec2::new(30.0, 0.0),
            &mut player,
            None,
            &mut scheduler,
        );
        assert_eq!(outcome, Some(HitOutcome::Struck { health: 90 }));
        assert_eq!(player.health(), 90);
    }

    #[test]
    fn test_attack_collider_misses_out_of_range() {
        let (enemy, _, mut scheduler) = setup(wide_range());
        let mut player = LocomotionController::new(1, LocomotionStats::default(), Vec3::ONE);

        let outcome = enemy.start_attack_collider(
            Vec2::ZERO,
            Vec2::new(60.0, 0.0),
            &mut player,
            None,
            &mut scheduler,
        );
        assert_eq!(outcome, None);
        assert_eq!(player.health(), 100);
    }

    #[test]
    fn test_stunned_enemy_cannot_strike() {
        let (mut enemy, _, mut scheduler) = setup(wide_range());
        let mut player = LocomotionController::new(1, LocomotionStats::default(), Vec3::ONE);
        enemy.get_hit(None, &mut scheduler);

        let outcome = enemy.start_attack_collider(
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            &mut player,
            None,
            &mut scheduler,
        );
        assert_eq!(outcome, None);
    }

    #[test]
    fn test_strike_token() {
        let (mut enemy, _, mut scheduler) = setup(wide_range());
        enemy.schedule_strike(0.5, &mut scheduler);
        enemy.schedule_strike(0.5, &mut scheduler);

        let fired = scheduler.advance(0.5);
        assert_eq!(fired.len(), 1);
        assert!(enemy.take_strike(fired[0].handle));
        assert!(!enemy.take_strike(fired[0].handle));
    }

    #[test]
    fn test_missing_animator_is_harmless() {
        let (mut enemy, mut body, mut scheduler) = setup(wide_range());
        enemy.animator = None;

        enemy.update(0.1, &mut body, Some(Vec2::new(10.0, 0.0)), &mut scheduler);
        enemy.get_hit(Some(&mut body), &mut scheduler);
        assert!(enemy.animator().is_none());
        assert_eq!(enemy.state(), CombatState::Stunned);
    }
}
