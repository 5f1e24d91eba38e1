//! Spawn policies: enemy waves, enemy fire, boss lasers and player bullets
//!
//! All randomness comes through the injected RNG so callers control
//! determinism.

use glam::Vec2;
use rand::Rng;

use super::entity::{EntityId, EntityKind, EntityStore, Visual};
use super::state::{GameEvent, GameState, Level, Phase};
use super::world::World;
use crate::aim_velocity;
use crate::consts::*;
use crate::tuning::Tuning;

/// Advance the spawn timer and create an enemy once it exceeds the interval.
/// Only levels 1 and 2 have enemy waves.
pub fn try_spawn_enemy(
    state: &mut GameState,
    store: &mut EntityStore,
    rng: &mut impl Rng,
    tuning: &Tuning,
) -> Option<EntityId> {
    if !state.level.spawns_enemies() {
        return None;
    }

    state.spawn_timer += 1;
    if state.spawn_timer <= tuning.spawn_interval_ticks {
        return None;
    }
    state.spawn_timer = 0;

    let visual = Visual::ALIENS[rng.random_range(0..Visual::ALIENS.len())];
    let x = rng.random_range(ENEMY_MIN_X..=ENEMY_MAX_X) as f32;
    let (y, vel) = match state.level {
        Level::One => (0.0, Vec2::new(0.0, ENEMY_FALL_SPEED)),
        _ => (
            rng.random_range(ENEMY_MIN_Y..=ENEMY_MAX_Y) as f32,
            Vec2::ZERO,
        ),
    };

    Some(store.spawn(
        EntityKind::Enemy,
        Vec2::new(x, y),
        vel,
        tuning.enemy_health,
        visual,
    ))
}

/// Roll once for a single enemy and, on success, fire a meteor at the player
pub fn try_spawn_enemy_projectile(
    store: &mut EntityStore,
    enemy: EntityId,
    rng: &mut impl Rng,
    tuning: &Tuning,
) -> Option<EntityId> {
    let origin = store.get(enemy).filter(|e| e.active)?.pos;
    if rng.random_range(0..=tuning.enemy_fire_denominator) >= 1 {
        return None;
    }

    let pos = origin + Vec2::new(0.0, ENEMY_PROJECTILE_OFFSET);
    let target = store.player().map_or(pos + Vec2::Y, |p| p.pos);
    Some(store.spawn(
        EntityKind::EnemyProjectile,
        pos,
        aim_velocity(pos, target, ENEMY_PROJECTILE_SPEED),
        EntityKind::EnemyProjectile.default_hp(),
        Visual::Meteor,
    ))
}

/// Roll for a boss laser aimed at the player; shakes the camera when it fires
pub fn try_spawn_boss_laser(
    state: &mut GameState,
    store: &mut EntityStore,
    rng: &mut impl Rng,
    tuning: &Tuning,
) -> Option<EntityId> {
    let origin = store.boss().filter(|b| b.active)?.pos;
    if rng.random_range(0..=100) >= tuning.boss_fire_percent {
        return None;
    }

    let (duration_ms, intensity) = LASER_SHAKE;
    state.emit(GameEvent::CameraShake {
        duration_ms,
        intensity,
    });

    let pos = origin + Vec2::new(0.0, BOSS_LASER_OFFSET);
    let target = store.player().map_or(pos + Vec2::Y, |p| p.pos);
    Some(store.spawn(
        EntityKind::BossProjectile,
        pos,
        aim_velocity(pos, target, BOSS_LASER_SPEED),
        EntityKind::BossProjectile.default_hp(),
        Visual::BossLaser,
    ))
}

/// Spawn one bullet above the player travelling straight up
pub fn fire_bullet(store: &mut EntityStore) -> Option<EntityId> {
    let player = store.player().filter(|p| p.active)?.pos;
    Some(store.spawn(
        EntityKind::PlayerBullet,
        player - Vec2::new(0.0, BULLET_SPAWN_OFFSET),
        Vec2::new(0.0, -BULLET_SPEED),
        EntityKind::PlayerBullet.default_hp(),
        Visual::Shot,
    ))
}

/// Run every periodic spawn policy for this tick
pub fn run_spawn_policies(world: &mut World) {
    let World {
        state,
        store,
        rng,
        tuning,
        ..
    } = world;

    try_spawn_enemy(state, store, &mut *rng, tuning);

    if state.phase == Phase::Level2 {
        store.for_each_active(EntityKind::Enemy, |store, enemy| {
            try_spawn_enemy_projectile(store, enemy, &mut *rng, tuning);
        });
    }

    if state.phase == Phase::Level3Boss {
        try_spawn_boss_laser(state, store, &mut *rng, tuning);
    }
}
