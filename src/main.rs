use anyhow::Result;
use log::{debug, info};
use winit::{
    event::{ElementState, Event, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use engine::game_loop::GameLoop;
use engine::input::{InputConfig, InputManager};
use game::{Scene, SceneConfig};

/// Ground slab, the player and two enemies, one on each side
fn build_demo_level() -> Result<Scene> {
    let mut scene = Scene::new(SceneConfig::default());
    scene.spawn_ground(0.0, -1.0, 100.0, 1.0);
    scene.spawn_player(0.0, 1.0)?;
    scene.spawn_enemy(6.0, 1.0);
    scene.spawn_enemy(-9.0, 1.0);
    Ok(scene)
}

fn log_status(scene: &Scene, game_loop: &GameLoop) {
    info!(
        "Tick {} (frame {}): {} bodies, {} timers pending",
        game_loop.tick_count(),
        game_loop.frame_count(),
        scene.physics().body_count(),
        scene.scheduler().pending_count()
    );

    if let (Some(id), Some(player)) = (scene.player_id(), scene.player()) {
        let position = scene.position(id).unwrap_or_default();
        let velocity = scene.velocity(id).unwrap_or_default();
        info!(
            "Player {} [{}] at ({:.2}, {:.2}) vel ({:.2}, {:.2}) health {} grounded {} air jump {} facing {}",
            id,
            player.state().label(),
            position.x,
            position.y,
            velocity.x,
            velocity.y,
            player.health(),
            player.is_grounded(),
            player.can_double_jump(),
            facing_label(player.facing_left())
        );
        if let Some(animator) = player.animator() {
            debug!(
                "Player {} scale {:?} params {:?}",
                id,
                player.scale(),
                animator.named_values()
            );
        }
    }

    for id in scene.enemy_ids() {
        let Some(enemy) = scene.enemy(id) else {
            continue;
        };
        let position = scene.position(id).unwrap_or_default();
        info!(
            "{} {} [{}] at ({:.2}, {:.2}) health {} target {:?} facing {}",
            scene.name(id).unwrap_or("Enemy"),
            id,
            enemy.state().label(),
            position.x,
            position.y,
            enemy.health(),
            enemy.target(),
            facing_label(enemy.facing_left())
        );
        if let Some(stun) = enemy.stun_remaining(scene.scheduler()) {
            debug!("Enemy {} stunned for {:.2}s more", id, stun);
        }
        if let Some(animator) = enemy.animator() {
            debug!(
                "Enemy {} scale {:?} params {:?}",
                id,
                enemy.scale(),
                animator.named_values()
            );
        }
    }

    for id in scene.projectile_ids() {
        let Some(projectile) = scene.projectile(id) else {
            continue;
        };
        let position = scene.position(id).unwrap_or_default();
        let velocity = projectile.velocity();
        debug!(
            "Projectile {} {:?} at ({:.2}, {:.2}) vel ({:.2}, {:.2}) facing {} scale {:?}, {:.2}s left",
            id,
            projectile.state(),
            position.x,
            position.y,
            velocity.x,
            velocity.y,
            facing_label(projectile.facing_left()),
            projectile.scale(),
            projectile.remaining_lifetime()
        );
    }
}

fn facing_label(left: bool) -> &'static str {
    if left {
        "left"
    } else {
        "right"
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting side-scroller...");

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Side Scroller")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    let input = InputManager::new(InputConfig::default());
    let mut scene = build_demo_level()?;
    let mut game_loop = GameLoop::new();
    let mut last_status: f32 = 0.0;

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    elwt.exit();
                } else if event.physical_key == PhysicalKey::Code(KeyCode::KeyP)
                    && event.state == ElementState::Pressed
                    && !event.repeat
                {
                    game_loop.toggle_pause();
                } else if let Some(key_event) = input.process_keyboard_event(&event) {
                    scene.handle_key(key_event);
                }
            }
            Event::AboutToWait => {
                let dt = game_loop.fixed_timestep();
                for _ in 0..game_loop.begin_frame() {
                    scene.tick(dt);
                }

                if !game_loop.is_paused() && game_loop.game_time() - last_status >= 1.0 {
                    last_status = game_loop.game_time();
                    log_status(&scene, &game_loop);
                }

                // Nothing is drawn; keep frames coming
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
