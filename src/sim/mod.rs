//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order within each kind)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod progression;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{CollisionReport, boxes_overlap, overlaps};
pub use entity::{DeathPolicy, Entity, EntityId, EntityKind, EntityStore, Visual};
pub use progression::PlayerDamage;
pub use schedule::{DeferredAction, Scheduler};
pub use state::{AudioCue, BossRecord, EffectKind, GameEvent, GameState, Hud, Level, Phase};
pub use tick::{InputEvent, TickInput, tick};
pub use world::World;
