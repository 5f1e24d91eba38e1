//! Game balance tuning
//!
//! Every value that differed between the two shipped scene variants lives here
//! instead of being hard-coded into the simulation.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Named balance presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TuningPreset {
    /// Score 100/200 thresholds, frequent enemy fire, upgrade banner
    #[default]
    Classic,
    /// Classic thresholds, sparse enemy fire, instant upgrade
    Galley,
}

impl TuningPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TuningPreset::Classic => "Classic",
            TuningPreset::Galley => "Galley",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(TuningPreset::Classic),
            "galley" => Some(TuningPreset::Galley),
            _ => None,
        }
    }
}

/// Balance values read by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Progression ===
    /// Score at which level 1 advances to level 2
    pub level2_score: u32,
    /// Score at which level 2 advances to the boss stage
    pub level3_score: u32,
    /// Upgrade banner duration; `None` upgrades on the transition tick
    pub upgrade_banner_ms: Option<u32>,

    // === Enemies ===
    /// Ticks the spawn timer must exceed before an enemy appears
    pub spawn_interval_ticks: u32,
    pub enemy_health: i32,
    pub enemy_score: u32,
    /// Enemy fires when a draw from `0..=enemy_fire_denominator` is zero
    pub enemy_fire_denominator: u32,

    // === Boss ===
    pub boss_max_health: i32,
    /// Horizontal distance per tick
    pub boss_step: f32,
    /// Boss fires when a draw from `0..=100` is below this
    pub boss_fire_percent: u32,
    /// Delay between the killing hit and the boss being removed
    pub boss_defeat_delay_ms: u32,

    // === Player ===
    pub player_lives: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::from_preset(TuningPreset::Classic)
    }
}

impl Tuning {
    /// Build tuning from a named preset
    pub fn from_preset(preset: TuningPreset) -> Self {
        let classic = Self {
            level2_score: 100,
            level3_score: 200,
            upgrade_banner_ms: Some(2000),

            spawn_interval_ticks: 90,
            enemy_health: 3,
            enemy_score: 10,
            enemy_fire_denominator: 800,

            boss_max_health: 500,
            boss_step: 3.0,
            boss_fire_percent: 2,
            boss_defeat_delay_ms: 300,

            player_lives: 3,
        };

        match preset {
            TuningPreset::Classic => classic,
            TuningPreset::Galley => Self {
                upgrade_banner_ms: None,
                enemy_fire_denominator: 1500,
                ..classic
            },
        }
    }

    /// Parse tuning overrides; absent fields keep the classic values
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.level3_score < self.level2_score {
            return Err(ConfigError::Invalid(format!(
                "level3_score ({}) is below level2_score ({})",
                self.level3_score, self.level2_score
            )));
        }
        if self.enemy_health <= 0 || self.boss_max_health <= 0 || self.player_lives <= 0 {
            return Err(ConfigError::Invalid(
                "health values must be positive".to_string(),
            ));
        }
        if self.boss_step <= 0.0 {
            return Err(ConfigError::Invalid("boss_step must be positive".to_string()));
        }
        Ok(())
    }
}

/// Errors raised while reading configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
    UnknownPreset(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "could not read tuning file: {e}"),
            ConfigError::Parse(e) => write!(f, "malformed tuning JSON: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid tuning: {msg}"),
            ConfigError::UnknownPreset(name) => write!(f, "unknown preset '{name}'"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
