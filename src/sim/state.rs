//! Game state and core simulation types
//!
//! Scalar bookkeeping (score, lives, level, boss health) and the events the
//! core emits for the presentation layer. Entities live in `EntityStore`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind, Visual};
use crate::tuning::Tuning;

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    One,
    Two,
    Three,
}

impl Level {
    pub fn number(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }

    /// Levels with regular enemy waves
    pub fn spawns_enemies(self) -> bool {
        matches!(self, Level::One | Level::Two)
    }
}

/// Progression phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Level1,
    Level2,
    /// Upgrade banner showing; waiting to swap the player and spawn the boss
    Level3Intro,
    Level3Boss,
    /// Boss defeated; the win screen follows after the defeat delay
    Won,
    /// Player died during level 3; waiting for restart
    GameOver,
}

/// Sound cues requested from the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    BossLoopStart,
    BossLoopStop,
    BossDefeated,
}

impl AudioCue {
    pub fn name(self) -> &'static str {
        match self {
            AudioCue::BossLoopStart => "bossLoop",
            AudioCue::BossLoopStop => "bossLoopStop",
            AudioCue::BossDefeated => "bossDefeated",
        }
    }
}

/// One-shot visual effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Puff,
}

/// Output events consumed by the rendering/audio collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EntitySpawned {
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
        visual: Visual,
        /// Display scale for the sprite
        scale: f32,
    },
    EntityDestroyed {
        id: EntityId,
    },
    VisualEffect {
        kind: EffectKind,
        pos: Vec2,
    },
    CameraShake {
        duration_ms: u32,
        intensity: f32,
    },
    Audio(AudioCue),
    ScoreChanged(u32),
    HealthChanged(i32),
    /// Remaining boss health as a fraction of max (0 once the bar is gone)
    BossHealthBarUpdated(f32),
    BannerShown {
        text: String,
        duration_ms: u32,
    },
    GameOverShown,
    WonShown,
    /// Full reset; prompts and banners should be hidden
    GameReset,
}

/// Boss phase record; exists only while the boss is in the store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossRecord {
    pub id: EntityId,
    /// +1 moving right, -1 moving left
    pub direction: f32,
}

/// Derived presentation state, recomputed at the end of every tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    pub health: i32,
    pub boss_bar: Option<f32>,
}

/// Scalar game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u32,
    /// Player lives remaining; never negative
    pub health: i32,
    pub level: Level,
    pub phase: Phase,
    /// Ticks since the last enemy spawn
    pub spawn_timer: u32,
    /// Set once a win or a boss-stage loss is on screen; only restart acts
    pub game_over: bool,
    pub boss: Option<BossRecord>,
    pub boss_health: i32,
    pub max_boss_health: i32,
    /// Whether the boss ambient loop is playing
    pub boss_loop_playing: bool,
    /// Simulation tick counter (monotonic across resets)
    pub time_ticks: u64,
    /// Last presentation state published
    pub hud: Hud,
    /// Events emitted this tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            health: tuning.player_lives,
            level: Level::One,
            phase: Phase::Level1,
            spawn_timer: 0,
            game_over: false,
            boss: None,
            boss_health: tuning.boss_max_health,
            max_boss_health: tuning.boss_max_health,
            boss_loop_playing: false,
            time_ticks: 0,
            hud: Hud {
                score: 0,
                health: tuning.player_lives,
                boss_bar: None,
            },
            events: Vec::new(),
        }
    }

    /// Return every reset-scoped field to its initial value in one step.
    /// The tick clock, published HUD and pending events survive.
    pub fn reset(&mut self, tuning: &Tuning) {
        let time_ticks = self.time_ticks;
        let hud = self.hud;
        let events = std::mem::take(&mut self.events);
        *self = Self {
            time_ticks,
            hud,
            events,
            ..Self::new(tuning)
        };
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Fraction of boss health remaining while a live boss is on screen
    pub fn boss_bar_fraction(&self) -> Option<f32> {
        self.boss.map(|_| {
            if self.max_boss_health > 0 {
                self.boss_health.max(0) as f32 / self.max_boss_health as f32
            } else {
                0.0
            }
        })
    }

    /// Recompute the derived presentation state and emit change events
    pub fn refresh_hud(&mut self) {
        let next = Hud {
            score: self.score,
            health: self.health,
            boss_bar: self.boss_bar_fraction(),
        };
        if next.score != self.hud.score {
            self.emit(GameEvent::ScoreChanged(next.score));
        }
        if next.health != self.hud.health {
            self.emit(GameEvent::HealthChanged(next.health));
        }
        if next.boss_bar != self.hud.boss_bar {
            self.emit(GameEvent::BossHealthBarUpdated(next.boss_bar.unwrap_or(0.0)));
        }
        self.hud = next;
    }
}
