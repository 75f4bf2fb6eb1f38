// Scene host
//
// Owns the physics world, timers and event registry, and routes input,
// contacts and fired timers to the entities that are still alive to
// receive them. Entities never touch each other directly: the scene hands a
// `Hit` from one to the other through `HitReceiver`.

use std::collections::{BTreeMap, HashMap};

use glam::{Vec2, Vec3};
use log::{debug, info, trace};

use super::characters::{
    CombatController, CombatStats, CombatUpdate, Hit, HitOutcome, HitReceiver,
    LocomotionController, LocomotionStats, ProjectileStats,
};
use super::error::SceneError;
use super::projectile::{Projectile, ProjectileSpawn, TargetFilter};
use crate::core::math::to_vector;
use crate::engine::events::{EventRegistry, Subscription, Topic};
use crate::engine::input::KeyEvent;
use crate::engine::physics::{
    presets, Category, ColliderTag, ContactEvent, PhysicsBody, PhysicsWorld, RigidBodyHandle,
};
use crate::engine::scheduler::{FiredTimer, Scheduler, TimerAction};
use crate::engine::EntityId;

/// Host settings for a scene
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub gravity: Vec2,
    pub player_stats: LocomotionStats,
    pub enemy_stats: CombatStats,
    pub projectile_stats: ProjectileStats,
    /// What player shots can hit
    pub projectile_filter: TargetFilter,
    /// Delay from the start of a swing to its strike, standing in for the
    /// attack animation's mid-swing event. `None` leaves strikes to the host.
    pub melee_strike_delay: Option<f32>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            player_stats: LocomotionStats::default(),
            enemy_stats: CombatStats::default(),
            projectile_stats: ProjectileStats::default(),
            projectile_filter: TargetFilter::default(),
            melee_strike_delay: Some(0.5),
        }
    }
}

struct PlayerEntity {
    id: EntityId,
    controller: LocomotionController,
    body: RigidBodyHandle,
    subscriptions: Vec<Subscription>,
}

struct EnemyEntity {
    controller: CombatController,
    body: RigidBodyHandle,
}

struct ProjectileEntity {
    projectile: Projectile,
    body: RigidBodyHandle,
    subscription: Subscription,
}

pub struct Scene {
    config: SceneConfig,
    physics: PhysicsWorld,
    scheduler: Scheduler,
    registry: EventRegistry,
    next_id: EntityId,

    names: HashMap<EntityId, String>,
    ground: BTreeMap<EntityId, RigidBodyHandle>,
    player: Option<PlayerEntity>,
    enemies: BTreeMap<EntityId, EnemyEntity>,
    projectiles: BTreeMap<EntityId, ProjectileEntity>,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        let physics = PhysicsWorld::with_gravity(to_vector(config.gravity));

        Self {
            config,
            physics,
            scheduler: Scheduler::new(),
            registry: EventRegistry::new(),
            next_id: 1,
            names: HashMap::new(),
            ground: BTreeMap::new(),
            player: None,
            enemies: BTreeMap::new(),
            projectiles: BTreeMap::new(),
        }
    }

    fn allocate_id(&mut self, name: &str) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.names.insert(id, name.to_string());
        id
    }

    /// Add a static slab of walkable ground centered on (x, y)
    pub fn spawn_ground(&mut self, x: f32, y: f32, width: f32, height: f32) -> EntityId {
        let id = self.allocate_id("Ground");
        let body = self.physics.add_rigid_body(presets::ground_body(x, y));
        self.physics.add_collider(
            presets::ground_collider(width, height),
            body,
            ColliderTag {
                entity: id,
                category: Category::Ground,
            },
        );
        self.ground.insert(id, body);
        debug!("Spawned ground {} at ({}, {})", id, x, y);
        id
    }

    /// Spawn the player. Only one player may exist at a time.
    pub fn spawn_player(&mut self, x: f32, y: f32) -> Result<EntityId, SceneError> {
        if let Some(player) = &self.player {
            return Err(SceneError::PlayerAlreadySpawned(player.id));
        }

        let id = self.allocate_id("Player");
        let stats = self.config.player_stats.clone();
        let collider = presets::character_collider(stats.width, stats.height, Category::Player);

        let mut body = presets::character_body(x, y);
        let controller = LocomotionController::new(id, stats, Vec3::ONE);
        controller.attach(&mut body);

        let body = self.physics.add_rigid_body(body);
        let collider = self.physics.add_collider(
            collider,
            body,
            ColliderTag {
                entity: id,
                category: Category::Player,
            },
        );

        let subscriptions = vec![
            self.registry.subscribe(Topic::Keyboard, id),
            self.registry.subscribe(Topic::Contact(collider), id),
        ];

        self.player = Some(PlayerEntity {
            id,
            controller,
            body,
            subscriptions,
        });
        info!("Spawned player {} at ({}, {})", id, x, y);
        Ok(id)
    }

    /// Spawn an enemy targeting the current player, if any
    pub fn spawn_enemy(&mut self, x: f32, y: f32) -> EntityId {
        self.spawn_named_enemy("Enemy", x, y)
    }

    /// Spawn an enemy with a specific name, for name-filtered projectiles
    pub fn spawn_named_enemy(&mut self, name: &str, x: f32, y: f32) -> EntityId {
        let id = self.allocate_id(name);
        let stats = self.config.enemy_stats.clone();
        let collider = presets::character_collider(stats.width, stats.height, Category::Enemy);

        // Target is resolved once here and never re-resolved
        let target = self.player.as_ref().map(|player| player.id);
        let mut body = presets::character_body(x, y);
        let controller = CombatController::new(id, stats, Vec3::ONE, target);
        controller.attach(&mut body);

        let body = self.physics.add_rigid_body(body);
        self.physics.add_collider(
            collider,
            body,
            ColliderTag {
                entity: id,
                category: Category::Enemy,
            },
        );

        self.enemies.insert(id, EnemyEntity { controller, body });
        info!("Spawned {} {} at ({}, {})", name, id, x, y);
        id
    }

    /// Spawn a shot as described by its firer
    pub fn spawn_projectile(&mut self, spawn: ProjectileSpawn) -> EntityId {
        let id = self.allocate_id("Bullet");
        let stats = self.config.projectile_stats.clone();

        let body = self.physics.add_rigid_body(presets::projectile_body(
            spawn.position.x,
            spawn.position.y,
            spawn.velocity.x,
            spawn.velocity.y,
        ));
        let collider = self.physics.add_collider(
            presets::projectile_collider(stats.radius),
            body,
            ColliderTag {
                entity: id,
                category: Category::Projectile,
            },
        );

        let projectile = Projectile::new(id, &spawn, stats, self.config.projectile_filter.clone());
        let subscription = self.registry.subscribe(Topic::Contact(collider), id);
        self.projectiles.insert(
            id,
            ProjectileEntity {
                projectile,
                body,
                subscription,
            },
        );
        trace!("Spawned projectile {} at {:?}", id, spawn.position);
        id
    }

    /// Deliver a key event to the player, if it still listens
    pub fn handle_key(&mut self, event: KeyEvent) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if !self.registry.is_subscribed(Topic::Keyboard, player.id) {
            return;
        }
        let Some(body) = self.physics.get_rigid_body_mut(player.body) else {
            return;
        };

        if let Some(spawn) = player.controller.on_key_event(event, body, &mut self.scheduler) {
            debug!(
                "Player {} fired (shoot variant {:?})",
                player.id,
                player.controller.shoot_variant()
            );
            self.spawn_projectile(spawn);
        }
    }

    /// Advance the scene by one tick
    pub fn tick(&mut self, dt: f32) {
        self.update_player(dt);
        self.update_enemies(dt);
        self.update_projectiles(dt);

        self.physics.set_timestep(dt);
        for event in self.physics.step() {
            self.dispatch_contact(event);
        }

        for fired in self.scheduler.advance(dt) {
            self.dispatch_timer(fired);
        }
    }

    fn update_player(&mut self, dt: f32) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if let Some(body) = self.physics.get_rigid_body_mut(player.body) {
            player.controller.update(dt, body);
        }
    }

    fn update_enemies(&mut self, dt: f32) {
        let player = self.player.as_ref().and_then(|player| {
            let body = self.physics.get_rigid_body(player.body)?;
            Some((player.id, body.world_position()))
        });

        for enemy in self.enemies.values_mut() {
            let Some(body) = self.physics.get_rigid_body_mut(enemy.body) else {
                continue;
            };
            let target_position = match (enemy.controller.target(), player) {
                (Some(target), Some((player_id, position))) if target == player_id => Some(position),
                _ => None,
            };

            let result = enemy
                .controller
                .update(dt, body, target_position, &mut self.scheduler);
            if let (CombatUpdate::AttackStarted, Some(delay)) =
                (result, self.config.melee_strike_delay)
            {
                enemy.controller.schedule_strike(delay, &mut self.scheduler);
            }
        }
    }

    fn update_projectiles(&mut self, dt: f32) {
        let expired: Vec<EntityId> = self
            .projectiles
            .iter_mut()
            .filter_map(|(id, entity)| entity.projectile.advance(dt).then_some(*id))
            .collect();

        for id in expired {
            self.despawn(id);
        }
    }

    fn dispatch_contact(&mut self, event: ContactEvent) {
        let (collider1, collider2) = event.colliders();
        for (own, other) in [(collider1, collider2), (collider2, collider1)] {
            // Either side may have been destroyed earlier in this dispatch
            let Some(own_tag) = self.physics.collider_tag(own) else {
                continue;
            };
            let Some(other_tag) = self.physics.collider_tag(other) else {
                continue;
            };
            if !self.registry.is_subscribed(Topic::Contact(own), own_tag.entity) {
                continue;
            }

            match own_tag.category {
                Category::Player => self.player_contact(event.is_begin(), other_tag),
                Category::Projectile if event.is_begin() => {
                    self.projectile_contact(own_tag.entity, other_tag)
                }
                _ => {}
            }
        }
    }

    fn player_contact(&mut self, began: bool, other: ColliderTag) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if began {
            player.controller.on_contact_begin(other.category);
        } else {
            player.controller.on_contact_end(other.category);
        }
    }

    fn projectile_contact(&mut self, id: EntityId, other: ColliderTag) {
        let name = self.names.get(&other.entity).map(String::as_str);
        let Some(entity) = self.projectiles.get_mut(&id) else {
            return;
        };
        let Some(hit) = entity.projectile.on_contact_begin(other.category, name) else {
            return;
        };

        self.despawn(id);
        // Target may have been destroyed by an earlier contact this step
        if let Err(err) = self.apply_hit(other.entity, hit) {
            trace!("Projectile {} hit dropped: {}", id, err);
        }
    }

    fn dispatch_timer(&mut self, fired: FiredTimer) {
        if !self.is_alive(fired.owner) {
            trace!("Dropping {:?} for destroyed entity {}", fired.action, fired.owner);
            return;
        }

        if let Some(player) = self.player.as_mut().filter(|player| player.id == fired.owner) {
            player.controller.on_timer(fired.handle, fired.action);
            return;
        }

        let Some(enemy) = self.enemies.get_mut(&fired.owner) else {
            return;
        };
        if fired.action == TimerAction::MeleeStrike {
            if enemy.controller.take_strike(fired.handle) {
                match self.start_attack_collider(fired.owner) {
                    Ok(Some(outcome)) => trace!("Enemy {} strike: {:?}", fired.owner, outcome),
                    Ok(None) => trace!("Enemy {} swung at nothing", fired.owner),
                    Err(err) => trace!("Strike dropped: {}", err),
                }
            }
        } else {
            enemy.controller.on_timer(fired.handle, fired.action);
        }
    }

    /// Mid-swing hook for `enemy`: lands its melee hit on its target if the
    /// target is still in range. `Ok(None)` means the swing missed.
    pub fn start_attack_collider(
        &mut self,
        enemy: EntityId,
    ) -> Result<Option<HitOutcome>, SceneError> {
        let attacker = self
            .enemies
            .get(&enemy)
            .ok_or(SceneError::UnknownEntity(enemy))?;
        let Some(position) = self
            .physics
            .get_rigid_body(attacker.body)
            .map(|body| body.world_position())
        else {
            return Ok(None);
        };

        let Some(player) = self
            .player
            .as_mut()
            .filter(|player| Some(player.id) == attacker.controller.target())
        else {
            return Ok(None);
        };
        let Some(target_body) = self.physics.get_rigid_body_mut(player.body) else {
            return Ok(None);
        };
        let target_position = target_body.world_position();

        Ok(attacker.controller.start_attack_collider(
            position,
            target_position,
            &mut player.controller,
            Some(target_body as &mut dyn PhysicsBody),
            &mut self.scheduler,
        ))
    }

    /// Deliver `hit` to a character. Enemies brought to zero health are
    /// destroyed.
    pub fn apply_hit(&mut self, target: EntityId, hit: Hit) -> Result<HitOutcome, SceneError> {
        if let Some(player) = self.player.as_mut().filter(|player| player.id == target) {
            let body = self
                .physics
                .get_rigid_body_mut(player.body)
                .map(|body| body as &mut dyn PhysicsBody);
            return Ok(player.controller.apply_hit(hit, body, &mut self.scheduler));
        }

        let enemy = self
            .enemies
            .get_mut(&target)
            .ok_or(SceneError::UnknownEntity(target))?;
        let body = self
            .physics
            .get_rigid_body_mut(enemy.body)
            .map(|body| body as &mut dyn PhysicsBody);
        let outcome = enemy.controller.apply_hit(hit, body, &mut self.scheduler);

        if outcome.is_defeated() {
            info!("Enemy {} defeated", target);
            self.despawn(target);
        }
        Ok(outcome)
    }

    /// Destroy an entity: cancel its timers, release its subscriptions and
    /// remove its body. Returns false if it was already gone.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let body = if let Some(mut entity) = self.projectiles.remove(&id) {
            entity.subscription.cancel();
            Some(entity.body)
        } else if let Some(entity) = self.enemies.remove(&id) {
            Some(entity.body)
        } else if self.player.as_ref().is_some_and(|player| player.id == id) {
            self.player.take().map(|mut player| {
                for subscription in &mut player.subscriptions {
                    subscription.cancel();
                }
                player.body
            })
        } else {
            self.ground.remove(&id)
        };

        let Some(body) = body else {
            return false;
        };

        let cancelled = self.scheduler.cancel_owner(id);
        self.physics.remove_rigid_body(body);
        self.names.remove(&id);
        debug!("Despawned {} ({} timers cancelled)", id, cancelled);
        true
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.names.contains_key(&id)
    }

    pub fn player(&self) -> Option<&LocomotionController> {
        self.player.as_ref().map(|player| &player.controller)
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player.as_ref().map(|player| player.id)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&CombatController> {
        self.enemies.get(&id).map(|enemy| &enemy.controller)
    }

    pub fn enemy_ids(&self) -> Vec<EntityId> {
        self.enemies.keys().copied().collect()
    }

    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.get(&id).map(|entity| &entity.projectile)
    }

    pub fn projectile_ids(&self) -> Vec<EntityId> {
        self.projectiles.keys().copied().collect()
    }

    fn body_handle(&self, id: EntityId) -> Option<RigidBodyHandle> {
        if let Some(player) = self.player.as_ref().filter(|player| player.id == id) {
            return Some(player.body);
        }
        self.enemies
            .get(&id)
            .map(|enemy| enemy.body)
            .or_else(|| self.projectiles.get(&id).map(|entity| entity.body))
            .or_else(|| self.ground.get(&id).copied())
    }

    /// World position of any live entity
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        let handle = self.body_handle(id)?;
        self.physics
            .get_rigid_body(handle)
            .map(|body| body.world_position())
    }

    pub fn velocity(&self, id: EntityId) -> Option<Vec2> {
        let handle = self.body_handle(id)?;
        self.physics
            .get_rigid_body(handle)
            .map(|body| body.linear_velocity())
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}
