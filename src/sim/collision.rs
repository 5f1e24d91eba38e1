//! Overlap detection and outcome application
//!
//! Pairs are checked once per tick over the store's kind partitions. Every
//! outcome re-checks liveness first, so an entity consumed earlier in the
//! same pass can never be hit twice.

use glam::Vec2;

use super::entity::{Entity, EntityId, EntityKind, EntityStore};
use super::state::{EffectKind, GameEvent, GameState};
use crate::tuning::Tuning;

/// What the resolver did this tick, for the progression state machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub enemies_destroyed: u32,
    pub boss_hits: u32,
    /// Set on the hit that took the boss to zero
    pub boss_defeated: Option<EntityId>,
    /// Units of damage the player should take, in the order they landed
    pub player_hits: u32,
}

/// Strict axis-aligned box overlap; touching edges do not count
pub fn boxes_overlap(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> bool {
    let delta = (a_pos - b_pos).abs();
    let reach = a_half + b_half;
    delta.x < reach.x && delta.y < reach.y
}

pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    boxes_overlap(a.pos, a.half_extents(), b.pos, b.half_extents())
}

/// First active entity of `kind` overlapping `subject`
fn first_overlap(store: &EntityStore, subject: &Entity, kind: EntityKind) -> Option<Entity> {
    store
        .iter_active(kind)
        .find(|other| overlaps(subject, other))
        .copied()
}

/// Resolve all overlaps for this tick
pub fn resolve(state: &mut GameState, store: &mut EntityStore, tuning: &Tuning) -> CollisionReport {
    let mut report = CollisionReport::default();

    bullets_vs_enemies(state, store, tuning, &mut report);
    bullets_vs_boss(state, store, &mut report);
    player_vs(store, EntityKind::Enemy, &mut report);
    player_vs(store, EntityKind::EnemyProjectile, &mut report);
    player_vs(store, EntityKind::BossProjectile, &mut report);

    report
}

fn bullets_vs_enemies(
    state: &mut GameState,
    store: &mut EntityStore,
    tuning: &Tuning,
    report: &mut CollisionReport,
) {
    store.for_each_active(EntityKind::PlayerBullet, |store, bullet_id| {
        let Some(bullet) = store.get(bullet_id).copied() else {
            return;
        };
        let Some(enemy) = first_overlap(store, &bullet, EntityKind::Enemy) else {
            return;
        };

        store.destroy(bullet.id);
        if store.apply_damage(enemy.id, 1) {
            state.score += tuning.enemy_score;
            report.enemies_destroyed += 1;
            state.emit(GameEvent::VisualEffect {
                kind: EffectKind::Puff,
                pos: enemy.pos,
            });
        }
    });
}

fn bullets_vs_boss(state: &mut GameState, store: &mut EntityStore, report: &mut CollisionReport) {
    store.for_each_active(EntityKind::PlayerBullet, |store, bullet_id| {
        // Both flags are re-read per bullet: the boss goes inert on the
        // killing hit and later bullets in the same pass must pass through.
        let Some(boss) = store.boss().copied() else {
            return;
        };
        let Some(bullet) = store.get(bullet_id).copied() else {
            return;
        };
        if !boss.active || !bullet.active || !overlaps(&bullet, &boss) {
            return;
        }

        store.destroy(bullet.id);
        let died = store.apply_damage(boss.id, 1);
        state.boss_health = store.get(boss.id).map_or(0, |b| b.hp);
        report.boss_hits += 1;
        state.emit(GameEvent::VisualEffect {
            kind: EffectKind::Puff,
            pos: boss.pos,
        });

        if died {
            report.boss_defeated = Some(boss.id);
        }
    });
}

/// Player against a hostile partition: the hostile entity is consumed and the
/// player takes one hit
fn player_vs(store: &mut EntityStore, kind: EntityKind, report: &mut CollisionReport) {
    store.for_each_active(kind, |store, hostile_id| {
        let Some(player) = store.player().copied() else {
            return;
        };
        let Some(hostile) = store.get(hostile_id).copied() else {
            return;
        };
        if !player.active || !overlaps(&player, &hostile) {
            return;
        }

        store.destroy(hostile.id);
        report.player_hits += 1;
    });
}
