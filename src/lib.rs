//! Galley Shooter - deterministic simulation core for a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, progression)
//! - `tuning`: Data-driven game balance
//! - `present`: Output seam consumed by a rendering/audio front end

pub mod present;
pub mod sim;
pub mod tuning;

pub use present::{JsonLinesPresenter, LogPresenter, Presenter};
pub use tuning::{ConfigError, Tuning, TuningPreset};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (one rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions (10 tiles of 16 px, scaled 4x)
    pub const PLAYFIELD_WIDTH: f32 = 640.0;
    pub const PLAYFIELD_HEIGHT: f32 = 640.0;

    /// Player defaults
    pub const PLAYER_START: Vec2 = Vec2::new(320.0, 550.0);
    /// Horizontal distance per tick while a move key is held
    pub const PLAYER_STEP: f32 = 8.0;

    /// Player bullets
    pub const BULLET_SPEED: f32 = 360.0;
    pub const BULLET_SPAWN_OFFSET: f32 = 20.0;

    /// Enemies
    pub const ENEMY_FALL_SPEED: f32 = 100.0;
    pub const ENEMY_MIN_X: i32 = 50;
    pub const ENEMY_MAX_X: i32 = 590;
    /// Vertical band for stationary level-2 enemies
    pub const ENEMY_MIN_Y: i32 = 50;
    pub const ENEMY_MAX_Y: i32 = 200;

    /// Enemy projectiles (meteors)
    pub const ENEMY_PROJECTILE_SPEED: f32 = 150.0;
    pub const ENEMY_PROJECTILE_OFFSET: f32 = 20.0;

    /// Boss
    pub const BOSS_START: Vec2 = Vec2::new(320.0, 100.0);
    pub const BOSS_MIN_X: f32 = 50.0;
    pub const BOSS_MAX_X: f32 = 590.0;
    pub const BOSS_LASER_SPEED: f32 = 200.0;
    pub const BOSS_LASER_OFFSET: f32 = 40.0;

    /// Camera shake parameters (duration ms, intensity)
    pub const LASER_SHAKE: (u32, f32) = (50, 0.005);
    pub const DEFEAT_SHAKE: (u32, f32) = (250, 0.01);

    pub const UPGRADE_BANNER_TEXT: &str = "NEW ENEMY APPROACHES LETS UPGRADE";
}

/// Velocity that carries `from` toward `to` at `speed` px/s.
///
/// Falls back to straight down when the two points coincide.
#[inline]
pub fn aim_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        Vec2::Y * speed
    } else {
        dir * speed
    }
}

/// Convert a wall-clock delay to a whole number of simulation ticks
#[inline]
pub fn ms_to_ticks(ms: u32) -> u64 {
    (ms as f32 / 1000.0 / consts::SIM_DT).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_velocity_magnitude() {
        let v = aim_velocity(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0), 150.0);
        assert!((v.length() - 150.0).abs() < 0.001);
        assert!((v.x - 90.0).abs() < 0.001);
        assert!((v.y - 120.0).abs() < 0.001);
    }

    #[test]
    fn test_aim_velocity_degenerate() {
        let p = Vec2::new(100.0, 100.0);
        assert_eq!(aim_velocity(p, p, 200.0), Vec2::new(0.0, 200.0));
    }

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(2000), 120);
        assert_eq!(ms_to_ticks(300), 18);
        assert_eq!(ms_to_ticks(0), 0);
    }
}
