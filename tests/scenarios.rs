use galley_shooter::Tuning;
use galley_shooter::consts::*;
use galley_shooter::sim::progression;
use galley_shooter::sim::{
    AudioCue, EntityKind, GameEvent, Level, Phase, TickInput, Visual, World, tick,
};
use glam::Vec2;

fn idle() -> TickInput {
    TickInput::default()
}

fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

/// World already in the boss fight, with boss fire disabled
fn boss_fight(boss_hp: i32) -> World {
    let tuning = Tuning {
        upgrade_banner_ms: None,
        boss_fire_percent: 0,
        ..Tuning::default()
    };
    let mut world = World::new(3, tuning);
    world.state.score = 200;
    world.state.level = Level::Two;
    world.state.phase = Phase::Level2;
    progression::evaluate_transitions(&mut world);
    assert_eq!(world.state.phase, Phase::Level3Boss);

    let boss = world.store.boss().unwrap().id;
    world.store.get_mut(boss).unwrap().hp = boss_hp;
    world.state.boss_health = boss_hp;
    world.drain_events();
    world
}

fn shoot_boss(world: &mut World) {
    let pos = world.store.boss().unwrap().pos;
    world
        .store
        .spawn(EntityKind::PlayerBullet, pos, Vec2::ZERO, 1, Visual::Shot);
}

#[test]
fn level2_threshold_starts_boss_stage_once() {
    let mut world = World::new(11, Tuning::default());
    world.state.score = 190;
    world.state.level = Level::Two;
    world.state.phase = Phase::Level2;
    world.store.spawn(
        EntityKind::Enemy,
        Vec2::new(100.0, 200.0),
        Vec2::ZERO,
        1,
        Visual::AlienBlue,
    );
    world.store.spawn(
        EntityKind::PlayerBullet,
        Vec2::new(100.0, 205.0),
        Vec2::ZERO,
        1,
        Visual::Shot,
    );

    let mut events = tick(&mut world, &idle());
    assert_eq!(world.state.score, 200);
    assert_eq!(world.state.phase, Phase::Level3Intro);
    assert_eq!(world.state.level, Level::Three);

    for _ in 0..300 {
        events.extend(tick(&mut world, &idle()));
        if world.state.game_over {
            break;
        }
    }

    assert_eq!(
        count(&events, |e| matches!(e, GameEvent::BannerShown { .. })),
        1
    );
    assert_eq!(
        count(&events, |e| matches!(
            e,
            GameEvent::EntitySpawned {
                kind: EntityKind::Boss,
                ..
            }
        )),
        1
    );
    assert_eq!(
        count(&events, |e| *e == GameEvent::Audio(AudioCue::BossLoopStart)),
        1
    );
    // Upgraded ship replaced the whale
    assert_eq!(world.store.player().unwrap().visual, Visual::Ship);
}

#[test]
fn galley_preset_upgrades_without_banner() {
    let mut world = World::new(5, Tuning::from_preset(galley_shooter::TuningPreset::Galley));
    world.state.score = 200;
    world.state.level = Level::Two;
    world.state.phase = Phase::Level2;
    let events = tick(&mut world, &idle());
    assert_eq!(world.state.phase, Phase::Level3Boss);
    assert_eq!(
        count(&events, |e| matches!(e, GameEvent::BannerShown { .. })),
        0
    );
    assert!(world.store.boss().is_some());
    assert!(events.contains(&GameEvent::BossHealthBarUpdated(1.0)));
}

#[test]
fn boss_fight_win_and_restart() {
    let mut world = boss_fight(3);
    let mut events = Vec::new();

    for expected in [2, 1] {
        shoot_boss(&mut world);
        events.extend(tick(&mut world, &idle()));
        assert_eq!(world.state.boss_health, expected);
        assert_eq!(world.state.phase, Phase::Level3Boss);
    }

    shoot_boss(&mut world);
    events.extend(tick(&mut world, &idle()));
    assert_eq!(world.state.boss_health, 0);
    assert_eq!(world.state.phase, Phase::Won);
    assert!(!world.state.game_over);
    let boss = world.store.boss().unwrap();
    assert!(!boss.active);
    let boss_x = boss.pos.x;

    // Stale overlap against the inert boss
    world.store.spawn(
        EntityKind::PlayerBullet,
        world.store.boss().unwrap().pos,
        Vec2::ZERO,
        1,
        Visual::Shot,
    );
    events.extend(tick(&mut world, &idle()));
    assert_eq!(world.state.score, 200);
    assert_eq!(world.state.boss_health, 0);
    // Inert boss no longer patrols
    assert_eq!(world.store.boss().unwrap().pos.x, boss_x);

    for _ in 0..20 {
        events.extend(tick(&mut world, &idle()));
    }
    assert!(world.state.game_over);
    assert!(world.store.boss().is_none());
    assert_eq!(count(&events, |e| *e == GameEvent::WonShown), 1);
    assert_eq!(
        count(&events, |e| matches!(e, GameEvent::CameraShake { duration_ms: 250, .. })),
        1
    );
    assert_eq!(
        count(&events, |e| *e == GameEvent::Audio(AudioCue::BossDefeated)),
        1
    );

    let restart = TickInput {
        restart: true,
        ..Default::default()
    };
    let events = tick(&mut world, &restart);
    assert!(events.contains(&GameEvent::GameReset));
    assert!(events.contains(&GameEvent::ScoreChanged(0)));
    assert_eq!(world.state.health, 3);
    assert_eq!(world.state.score, 0);
    assert_eq!(world.state.level, Level::One);
    assert_eq!(world.state.phase, Phase::Level1);
    assert!(world.state.boss.is_none());
    assert_eq!(world.store.len(), 1);
    assert_eq!(world.store.player().unwrap().pos, PLAYER_START);
}

#[test]
fn boss_stage_death_keeps_score_until_restart() {
    let mut world = boss_fight(500);
    world.state.health = 1;
    let player = world.store.player().unwrap().pos;
    world.store.spawn(
        EntityKind::BossProjectile,
        player,
        Vec2::ZERO,
        1,
        Visual::BossLaser,
    );

    let events = tick(&mut world, &idle());
    assert!(events.contains(&GameEvent::GameOverShown));
    assert!(events.contains(&GameEvent::HealthChanged(0)));
    assert!(world.state.game_over);
    assert_eq!(world.state.phase, Phase::GameOver);
    assert_eq!(world.state.score, 200);
    assert_eq!(world.state.level, Level::Three);
    assert_eq!(world.state.health, 0);

    // Frozen until restart
    let boss_x = world.store.boss().unwrap().pos.x;
    for _ in 0..30 {
        assert!(tick(&mut world, &idle()).is_empty());
    }
    assert_eq!(world.store.boss().unwrap().pos.x, boss_x);

    let restart = TickInput {
        restart: true,
        ..Default::default()
    };
    let events = tick(&mut world, &restart);
    assert!(events.contains(&GameEvent::Audio(AudioCue::BossLoopStop)));
    assert_eq!(world.state.health, 3);
    assert_eq!(world.state.score, 0);
    assert_eq!(world.state.level, Level::One);
    assert!(world.store.boss().is_none());
    for kind in [
        EntityKind::Enemy,
        EntityKind::PlayerBullet,
        EntityKind::EnemyProjectile,
        EntityKind::BossProjectile,
        EntityKind::Boss,
    ] {
        assert_eq!(world.store.count(kind), 0);
    }
}

#[test]
fn level1_death_restarts_immediately() {
    let mut world = World::new(21, Tuning::default());
    world.state.score = 60;
    world.state.health = 1;
    world.store.spawn(
        EntityKind::Enemy,
        PLAYER_START,
        Vec2::ZERO,
        3,
        Visual::AlienPink,
    );

    let events = tick(&mut world, &idle());
    assert!(events.contains(&GameEvent::GameReset));
    assert!(!events.contains(&GameEvent::GameOverShown));
    assert!(!world.state.game_over);
    assert_eq!(world.state.health, 3);
    assert_eq!(world.state.score, 0);
    assert_eq!(world.state.level, Level::One);

    // Play continues without a restart input
    let ticks = world.state.time_ticks;
    tick(&mut world, &idle());
    assert_eq!(world.state.time_ticks, ticks + 1);
}

#[test]
fn multiple_hits_in_one_tick_stop_at_reset() {
    let mut world = World::new(8, Tuning::default());
    world.state.health = 1;
    for dx in [-4.0, 0.0, 4.0] {
        world.store.spawn(
            EntityKind::EnemyProjectile,
            PLAYER_START + Vec2::new(dx, 0.0),
            Vec2::ZERO,
            1,
            Visual::Meteor,
        );
    }
    tick(&mut world, &idle());
    // Hits after the fatal one belong to the discarded run
    assert_eq!(world.state.health, 3);
}

#[test]
fn falling_enemy_is_pruned_below_playfield() {
    let mut world = World::new(2, Tuning::default());
    let enemy = world.store.spawn(
        EntityKind::Enemy,
        Vec2::new(60.0, PLAYFIELD_HEIGHT),
        Vec2::new(0.0, ENEMY_FALL_SPEED),
        3,
        Visual::AlienBeige,
    );
    let mut destroyed = false;
    for _ in 0..120 {
        let events = tick(&mut world, &idle());
        destroyed |= events.contains(&GameEvent::EntityDestroyed { id: enemy });
    }
    assert!(destroyed);
    assert!(!world.store.contains(enemy));
    assert_eq!(world.state.health, 3);
}

#[test]
fn autopilot_session_makes_progress() {
    let mut world = World::new(2024, Tuning::default());
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut best = 0;
    for _ in 0..60 * 60 * 3 {
        tick(&mut world, &input);
        best = best.max(world.state.score);
        assert!(world.state.health >= 0);
    }
    assert!(best > 0, "autopilot never scored");
}
