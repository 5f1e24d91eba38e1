//! Level progression, boss fight and win/loss state machine
//!
//! ```text
//! Level1 -> Level2 -> Level3Intro -> Level3Boss -> Won
//!   |         |            |             |
//!   +-reset---+            +--- GameOver-+   (restart -> Level1)
//! ```
//!
//! Invalid transitions are logged and ignored; nothing here can fail a tick.

use glam::Vec2;

use super::collision::CollisionReport;
use super::entity::{EntityId, EntityKind, Visual};
use super::schedule::{Deferred, DeferredAction};
use super::state::{AudioCue, BossRecord, GameEvent, Level, Phase};
use super::world::World;
use crate::consts::*;
use crate::ms_to_ticks;

/// Result of one unit of damage to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerDamage {
    /// Game already decided; nothing happened
    Ignored,
    /// Lost a life, still playing
    Hurt,
    /// Died in level 1 or 2: the whole game restarted
    Reset,
    /// Died in level 3: waiting for restart with score and level kept
    GameOver,
}

/// Apply one unit of damage to the player.
///
/// Dying before the boss stage restarts immediately; dying in level 3 keeps
/// the run's score and level on screen behind the restart prompt.
pub fn damage_player(world: &mut World) -> PlayerDamage {
    if world.state.game_over || world.state.phase == Phase::Won {
        return PlayerDamage::Ignored;
    }

    world.state.health = (world.state.health - 1).max(0);
    if let Some(player) = world.store.player().map(|p| p.id) {
        world.store.apply_damage(player, 1);
    }
    if world.state.health > 0 {
        return PlayerDamage::Hurt;
    }

    match world.state.level {
        Level::One | Level::Two => {
            log::info!(
                "Player died on level {} with score {}, restarting",
                world.state.level.number(),
                world.state.score
            );
            reset_game(world);
            PlayerDamage::Reset
        }
        Level::Three => {
            log::info!("Player died during the boss stage (score {})", world.state.score);
            world.state.phase = Phase::GameOver;
            world.state.game_over = true;
            world.state.emit(GameEvent::GameOverShown);
            PlayerDamage::GameOver
        }
    }
}

/// Return to the initial state: fresh player, empty sets, nothing pending
pub fn reset_game(world: &mut World) {
    if world.state.boss_loop_playing {
        world.state.emit(GameEvent::Audio(AudioCue::BossLoopStop));
    }
    world.scheduler.clear();
    world.store.clear();
    world.state.reset(&world.tuning);
    world.spawn_player();
    world.state.emit(GameEvent::GameReset);
}

/// Handle a restart request; only acts while the game is over
pub fn restart(world: &mut World) -> bool {
    if !world.state.game_over {
        log::debug!("Restart ignored: game still in progress");
        return false;
    }
    log::info!("Restarting from {:?}", world.state.phase);
    reset_game(world);
    true
}

/// Apply what the collision pass reported
pub fn apply_collisions(world: &mut World, report: &CollisionReport) {
    if let Some(boss) = report.boss_defeated {
        begin_boss_defeat(world, boss);
    }

    for _ in 0..report.player_hits {
        match damage_player(world) {
            PlayerDamage::Hurt => {}
            // Hits recorded against the old run are void
            PlayerDamage::Reset | PlayerDamage::GameOver | PlayerDamage::Ignored => break,
        }
    }
}

/// Run due deferred actions, then check score thresholds
pub fn advance(world: &mut World) {
    run_deferred(world);
    evaluate_transitions(world);
}

/// Score-driven level transitions
pub fn evaluate_transitions(world: &mut World) {
    if world.state.game_over {
        return;
    }

    if world.state.phase == Phase::Level1 && world.state.score >= world.tuning.level2_score {
        log::info!("Level 2 reached at score {}", world.state.score);
        world.state.level = Level::Two;
        world.state.phase = Phase::Level2;
    }

    if world.state.phase == Phase::Level2 && world.state.score >= world.tuning.level3_score {
        enter_level3_intro(world);
    }
}

fn enter_level3_intro(world: &mut World) {
    log::info!("Boss stage reached at score {}", world.state.score);
    world.state.level = Level::Three;
    world.state.phase = Phase::Level3Intro;
    world.store.clear_kind(EntityKind::Enemy);

    match world.tuning.upgrade_banner_ms {
        Some(duration_ms) => {
            world.state.emit(GameEvent::BannerShown {
                text: UPGRADE_BANNER_TEXT.to_string(),
                duration_ms,
            });
            world.scheduler.schedule(
                world.state.time_ticks,
                ms_to_ticks(duration_ms),
                world.store.generation(),
                DeferredAction::CompleteUpgrade,
            );
        }
        None => complete_upgrade(world),
    }
}

/// Swap in the upgraded player at the same position, then start the boss fight
fn complete_upgrade(world: &mut World) {
    if world.state.phase != Phase::Level3Intro {
        log::warn!("Upgrade ignored in phase {:?}", world.state.phase);
        return;
    }

    let (old, pos) = match world.store.player() {
        Some(p) => (Some(p.id), p.pos),
        None => (None, PLAYER_START),
    };
    if let Some(old) = old {
        world.store.destroy(old);
    }
    // Collision checks look the player up every tick, so the new entity is
    // targeted from the next pass on.
    let hp = world.state.health;
    world
        .store
        .spawn(EntityKind::Player, pos, Vec2::ZERO, hp, Visual::Ship);

    spawn_boss(world);
}

fn spawn_boss(world: &mut World) {
    if let Some(existing) = world.store.boss() {
        log::warn!("Boss spawn ignored: {:?} already present", existing.id);
        return;
    }

    let max = world.tuning.boss_max_health;
    let id = world.store.spawn(
        EntityKind::Boss,
        BOSS_START,
        Vec2::ZERO,
        max,
        Visual::BossShip,
    );
    world.state.boss = Some(BossRecord { id, direction: 1.0 });
    world.state.boss_health = max;
    world.state.max_boss_health = max;
    world.state.phase = Phase::Level3Boss;
    world.state.boss_loop_playing = true;
    world.state.emit(GameEvent::Audio(AudioCue::BossLoopStart));
    log::info!("Boss spawned with {} health", max);
}

/// Killing hit landed: shake, freeze the boss and queue the win screen
fn begin_boss_defeat(world: &mut World, boss: EntityId) {
    if world.state.phase != Phase::Level3Boss {
        log::debug!("Boss defeat ignored in phase {:?}", world.state.phase);
        return;
    }

    log::info!("Boss defeated");
    world.state.phase = Phase::Won;
    let (duration_ms, intensity) = DEFEAT_SHAKE;
    world.state.emit(GameEvent::CameraShake {
        duration_ms,
        intensity,
    });
    world.store.deactivate(boss);
    world.scheduler.schedule(
        world.state.time_ticks,
        ms_to_ticks(world.tuning.boss_defeat_delay_ms),
        world.store.generation(),
        DeferredAction::FinishBossDefeat { boss },
    );
}

fn finish_boss_defeat(world: &mut World, boss: EntityId) {
    if world.state.phase != Phase::Won {
        log::warn!("Boss defeat finish ignored in phase {:?}", world.state.phase);
        return;
    }
    if !world.store.contains(boss) {
        log::debug!("Stale defeat callback for {:?}", boss);
        return;
    }

    world.store.destroy(boss);
    world.state.boss = None;
    world.state.emit(GameEvent::Audio(AudioCue::BossDefeated));
    if world.state.boss_loop_playing {
        world.state.boss_loop_playing = false;
        world.state.emit(GameEvent::Audio(AudioCue::BossLoopStop));
    }
    world.state.game_over = true;
    world.state.emit(GameEvent::WonShown);
}

/// Execute deferred actions whose deadline has passed
pub fn run_deferred(world: &mut World) {
    let due = world.scheduler.take_due(world.state.time_ticks);
    for Deferred {
        generation, action, ..
    } in due
    {
        if generation != world.store.generation() {
            log::debug!("Dropping {:?} from an earlier run", action);
            continue;
        }
        match action {
            DeferredAction::CompleteUpgrade => complete_upgrade(world),
            DeferredAction::FinishBossDefeat { boss } => finish_boss_defeat(world, boss),
        }
    }
}

/// Horizontal patrol: step, clamp to the bounds, bounce at either edge
pub fn move_boss(world: &mut World) {
    if world.state.phase != Phase::Level3Boss {
        return;
    }
    let Some(mut record) = world.state.boss else {
        return;
    };
    let step = world.tuning.boss_step;
    let Some(boss) = world.store.get_mut(record.id) else {
        return;
    };
    if !boss.active {
        return;
    }

    boss.pos.x = (boss.pos.x + step * record.direction).clamp(BOSS_MIN_X, BOSS_MAX_X);
    if boss.pos.x <= BOSS_MIN_X {
        record.direction = 1.0;
    } else if boss.pos.x >= BOSS_MAX_X {
        record.direction = -1.0;
    }
    world.state.boss = Some(record);
}
