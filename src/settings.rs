//! Game configuration and balance
//!
//! Every tunable lives here so a JSON file can reshape the arcade without a
//! rebuild. Defaults give the standard 800x600 arcade balance.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::geometry::Bounds;
use crate::sim::powerup::{PowerUpCaps, PowerUpEffects};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live explosion particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Brick-breaker balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance from the paddle's top edge to the floor
    pub paddle_floor_gap: f32,
    /// Pixels per tick while a horizontal intent is held
    pub paddle_speed: f32,

    pub ball_radius: f32,
    /// Base speed used to recompute velocity on paddle bounce
    pub ball_speed: f32,
    pub ball_spawn_velocity: Vec2,
    /// Distance from the ball's spawn centre to the floor
    pub ball_spawn_floor_gap: f32,

    pub lives: u32,

    pub brick_rows: usize,
    pub brick_columns: usize,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_offset_top: f32,
    pub brick_offset_left: f32,

    pub power_up_caps: PowerUpCaps,
    pub power_up_effects: PowerUpEffects,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            paddle_width: 100.0,
            paddle_height: 10.0,
            paddle_floor_gap: 30.0,
            paddle_speed: 7.0,

            ball_radius: 10.0,
            ball_speed: 4.0,
            ball_spawn_velocity: Vec2::new(4.0, -4.0),
            ball_spawn_floor_gap: 40.0,

            lives: 3,

            brick_rows: 5,
            brick_columns: 9,
            brick_width: 70.0,
            brick_height: 20.0,
            brick_padding: 10.0,
            brick_offset_top: 30.0,
            brick_offset_left: 35.0,

            power_up_caps: PowerUpCaps::default(),
            power_up_effects: PowerUpEffects::default(),
        }
    }
}

impl BreakoutConfig {
    pub fn brick_count(&self) -> usize {
        self.brick_rows * self.brick_columns
    }
}

/// Shooter balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    pub player_size: f32,
    pub player_speed: f32,

    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,

    pub enemy_size: f32,
    pub enemy_speed: f32,
    /// Seconds between enemy spawns
    pub spawn_interval: f32,

    pub kill_score: u64,
    pub target_score: u64,

    /// Seconds of play before the grace countdown starts
    pub session_duration: f32,
    /// Seconds the player has to continue once time is up
    pub grace_duration: f32,

    pub explosion_particles: usize,
    /// Particle lifetime in ticks
    pub particle_life: u32,
    pub particle_min_size: f32,
    pub particle_size_range: f32,
    /// Each velocity component is drawn from `[-spread/2, spread/2)`
    pub particle_spread: f32,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            player_size: 20.0,
            player_speed: 5.0,

            bullet_width: 5.0,
            bullet_height: 10.0,
            bullet_speed: 7.0,

            enemy_size: 20.0,
            enemy_speed: 2.0,
            spawn_interval: 1.0,

            kill_score: 10,
            target_score: 900,

            session_duration: 3.0 * 60.0,
            grace_duration: 10.0,

            explosion_particles: 20,
            particle_life: 20,
            particle_min_size: 2.0,
            particle_size_range: 5.0,
            particle_spread: 2.0,
        }
    }
}

/// Typing game balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub vocabulary: Vec<String>,
    /// Pixels per tick at level 1
    pub word_speed: f32,
    /// Seconds between spawns at level 1
    pub word_interval: f32,
    /// Horizontal room reserved for a word's text when picking a spawn x
    pub spawn_margin: f32,
    pub level_up_every: u64,
    pub base_word_length: usize,
    pub max_word_length: usize,
    /// Points needed to allow one more letter per word
    pub word_length_step: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            vocabulary: ["cat", "dog", "bat", "rat", "hat", "mat", "sat", "pat", "fat", "vat"]
                .into_iter()
                .map(String::from)
                .collect(),
            word_speed: 1.0,
            word_interval: 2.0,
            spawn_margin: 50.0,
            level_up_every: 10,
            base_word_length: 3,
            max_word_length: 8,
            word_length_step: 10,
        }
    }
}

/// Top-level arcade configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub bounds: Bounds,
    pub quality: QualityPreset,
    /// Base seed; each session derives its own from this
    pub seed: u64,
    pub breakout: BreakoutConfig,
    pub shooter: ShooterConfig,
    pub typing: TypingConfig,
}

impl ArcadeConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace the quality preset by name. Unknown names leave it unchanged.
    pub fn override_quality(&mut self, name: &str) -> Option<QualityPreset> {
        let quality = QualityPreset::parse(name)?;
        self.quality = quality;
        Some(quality)
    }

    /// Effective particle cap for the shooter
    pub fn max_particles(&self) -> usize {
        self.quality.max_particles()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.bounds;
        positive("bounds.width", b.width)?;
        positive("bounds.height", b.height)?;

        let bo = &self.breakout;
        positive("breakout.paddle_width", bo.paddle_width)?;
        positive("breakout.ball_radius", bo.ball_radius)?;
        positive("breakout.ball_speed", bo.ball_speed)?;
        if bo.lives == 0 {
            return Err(ConfigError::invalid("breakout.lives", "must be at least 1"));
        }
        if bo.brick_count() == 0 {
            return Err(ConfigError::invalid(
                "breakout.brick_rows",
                "the brick grid must contain at least one brick",
            ));
        }
        let grid_right = bo.brick_offset_left
            + bo.brick_columns as f32 * (bo.brick_width + bo.brick_padding)
            - bo.brick_padding;
        if grid_right > b.width {
            return Err(ConfigError::invalid(
                "breakout.brick_columns",
                format!("grid extends to x={grid_right}, past the playfield width {}", b.width),
            ));
        }
        let grid_bottom = bo.brick_offset_top
            + bo.brick_rows as f32 * (bo.brick_height + bo.brick_padding)
            - bo.brick_padding;
        if grid_bottom > b.height - bo.paddle_floor_gap {
            return Err(ConfigError::invalid(
                "breakout.brick_rows",
                format!("grid extends to y={grid_bottom}, overlapping the paddle lane"),
            ));
        }
        if bo.power_up_effects.max_balls == 0 {
            return Err(ConfigError::invalid(
                "breakout.power_up_effects.max_balls",
                "must be at least 1",
            ));
        }

        let sh = &self.shooter;
        positive("shooter.spawn_interval", sh.spawn_interval)?;
        positive("shooter.session_duration", sh.session_duration)?;
        positive("shooter.grace_duration", sh.grace_duration)?;
        positive("shooter.bullet_speed", sh.bullet_speed)?;
        positive("shooter.enemy_speed", sh.enemy_speed)?;
        if sh.enemy_size > b.width {
            return Err(ConfigError::invalid(
                "shooter.enemy_size",
                "enemies must fit inside the playfield",
            ));
        }

        let ty = &self.typing;
        positive("typing.word_speed", ty.word_speed)?;
        positive("typing.word_interval", ty.word_interval)?;
        if ty.level_up_every == 0 || ty.word_length_step == 0 {
            return Err(ConfigError::invalid(
                "typing.level_up_every",
                "level and word-length steps must be at least 1",
            ));
        }
        let shortest = ty.vocabulary.iter().map(|w| w.chars().count()).min();
        match shortest {
            None => {
                return Err(ConfigError::invalid(
                    "typing.vocabulary",
                    "vocabulary is empty",
                ));
            }
            Some(0) => {
                return Err(ConfigError::invalid(
                    "typing.vocabulary",
                    "vocabulary contains an empty word",
                ));
            }
            Some(n) if n > ty.base_word_length => {
                return Err(ConfigError::invalid(
                    "typing.vocabulary",
                    format!(
                        "needs at least one word of length <= {}, shortest is {n}",
                        ty.base_word_length
                    ),
                ));
            }
            Some(_) => {}
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        ArcadeConfig::default().validate().unwrap();
        assert_eq!(ArcadeConfig::default().breakout.brick_count(), 45);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = ArcadeConfig::from_json(
            r#"{ "seed": 7, "quality": "High", "shooter": { "target_score": 100 } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_particles(), 2000);
        assert_eq!(config.shooter.target_score, 100);
        assert_eq!(config.shooter.kill_score, 10);
        assert_eq!(config.typing.vocabulary.len(), 10);
    }

    #[test]
    fn test_json_round_trip() {
        let json = ArcadeConfig::default().to_json().unwrap();
        let back = ArcadeConfig::from_json(&json).unwrap();
        assert_eq!(back.breakout.ball_spawn_velocity, Vec2::new(4.0, -4.0));
    }

    #[test]
    fn test_rejects_unsatisfiable_vocabulary() {
        let err = ArcadeConfig::from_json(r#"{ "typing": { "vocabulary": ["zebra", "horse"] } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "typing.vocabulary",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_grid_wider_than_playfield() {
        let err = ArcadeConfig::from_json(r#"{ "bounds": { "width": 400.0, "height": 600.0 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("breakout.brick_columns"));
    }

    #[test]
    fn test_parse_error_surfaces() {
        assert!(matches!(
            ArcadeConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
    }

    #[test]
    fn test_quality_override() {
        let mut config = ArcadeConfig::default();
        assert_eq!(config.override_quality("low"), Some(QualityPreset::Low));
        assert_eq!(config.max_particles(), 100);
        assert_eq!(config.override_quality("ultra"), None);
        assert_eq!(config.quality, QualityPreset::Low);
    }
}
