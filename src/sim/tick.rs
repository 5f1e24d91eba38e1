//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. Phase
//! order within a tick is fixed:
//! 1. prune off-screen entities
//! 2. input-driven movement and firing, then body integration
//! 3. spawn policies
//! 4. collision resolution
//! 5. progression (collision outcomes, deferred actions, thresholds)
//! 6. derived presentation state

use std::cmp::Ordering;

use super::collision;
use super::entity::EntityKind;
use super::progression;
use super::spawn;
use super::state::GameEvent;
use super::world::World;
use crate::consts::*;

/// Autopilot taps fire on this tick cadence
const AUTOPILOT_FIRE_INTERVAL: u64 = 8;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move-left key held
    pub move_left: bool,
    /// Move-right key held
    pub move_right: bool,
    /// Fire pressed since the last tick (edge)
    pub fire: bool,
    /// Restart pressed since the last tick (edge)
    pub restart: bool,
    /// Idle/demo mode - the simulation steers itself
    pub autopilot: bool,
}

/// Input events delivered by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeft(bool),
    MoveRight(bool),
    FireBullet,
    Restart,
}

impl TickInput {
    /// Fold an input event into the pending tick input
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveLeft(active) => self.move_left = active,
            InputEvent::MoveRight(active) => self.move_right = active,
            InputEvent::FireBullet => self.fire = true,
            InputEvent::Restart => self.restart = true,
        }
    }

    /// Clear one-shot inputs after they have been processed
    pub fn clear_edges(&mut self) {
        self.fire = false;
        self.restart = false;
    }
}

/// Advance the game by one fixed timestep and return the events it produced
pub fn tick(world: &mut World, input: &TickInput) -> Vec<GameEvent> {
    let input = if input.autopilot {
        steer(world, input)
    } else {
        input.clone()
    };
    let input = &input;

    // Only restart acts once the result is on screen
    if world.state.game_over {
        if input.restart {
            progression::restart(world);
            world.state.refresh_hud();
        }
        return world.drain_events();
    }

    world.state.time_ticks += 1;

    // 1. Prune
    world
        .store
        .prune_offscreen(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    world.flush_journal();

    // 2. Movement and firing
    move_player(world, input);
    if input.fire {
        spawn::fire_bullet(&mut world.store);
    }
    world.store.integrate(SIM_DT);
    progression::move_boss(world);
    world.flush_journal();

    // 3. Spawning
    spawn::run_spawn_policies(world);
    world.flush_journal();

    // 4. Collisions
    let report = collision::resolve(&mut world.state, &mut world.store, &world.tuning);
    world.flush_journal();

    // 5. Progression
    progression::apply_collisions(world, &report);
    progression::advance(world);
    world.flush_journal();

    // 6. Presentation state
    world.state.refresh_hud();

    world.drain_events()
}

/// Step the player horizontally, clamped to the playfield
fn move_player(world: &mut World, input: &TickInput) {
    let mut dx = 0.0;
    if input.move_left {
        dx -= PLAYER_STEP;
    }
    if input.move_right {
        dx += PLAYER_STEP;
    }
    if dx == 0.0 {
        return;
    }

    let Some(id) = world.store.player().map(|p| p.id) else {
        return;
    };
    if let Some(player) = world.store.get_mut(id) {
        let half = player.half_extents().x;
        player.pos.x = (player.pos.x + dx).clamp(half, PLAYFIELD_WIDTH - half);
    }
}

/// Idle/demo steering: chase the boss (or the lowest enemy), tap fire on a
/// fixed cadence and restart as soon as a result is on screen
fn steer(world: &World, input: &TickInput) -> TickInput {
    let mut steered = input.clone();
    if world.state.game_over {
        steered.restart = true;
        return steered;
    }

    let Some(player) = world.store.player() else {
        return steered;
    };

    let target_x = world
        .store
        .boss()
        .filter(|b| b.active)
        .map(|b| b.pos.x)
        .or_else(|| {
            world
                .store
                .iter_active(EntityKind::Enemy)
                .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal))
                .map(|e| e.pos.x)
        });

    steered.move_left = false;
    steered.move_right = false;
    if let Some(x) = target_x {
        let dx = x - player.pos.x;
        if dx < -PLAYER_STEP {
            steered.move_left = true;
        } else if dx > PLAYER_STEP {
            steered.move_right = true;
        }
    }
    steered.fire =
        target_x.is_some() && world.state.time_ticks % AUTOPILOT_FIRE_INTERVAL == 0;
    steered
}
