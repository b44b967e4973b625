//! # Simulation Configuration
//!
//! Loaded once at startup, immutable afterwards. Every field participates
//! in determinism: two runs agree only if their configs agree.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Tunables for one simulation instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Initial population. Unit `i` starts with `id = i`, `seed = i`.
    pub population: u32,
    /// Ticks between death and respawn eligibility.
    pub respawn_delay: i64,
    /// Straight-line distance an attack covers per tick of flight.
    pub projectile_speed: f32,
    /// Arena width in world units (spawn placement and framebuffer).
    pub arena_width: u32,
    /// Arena height in world units.
    pub arena_height: u32,
    /// Wander displacement per tick.
    pub wander_speed: f32,
    /// Ticks between wander direction re-draws.
    pub redirect_interval: i64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population: 1024,
            respawn_delay: 10,
            projectile_speed: 4.0,
            arena_width: 64,
            arena_height: 64,
            wander_speed: 1.0,
            redirect_interval: 8,
        }
    }
}

impl SimConfig {
    /// Loads and validates a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] / [`SimError::Parse`] on read/parse
    /// failure and [`SimError::InvalidConfig`] on unusable values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates field ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.population == 0 {
            return Err(SimError::InvalidConfig("population must be > 0".into()));
        }
        if self.projectile_speed <= 0.0 {
            return Err(SimError::InvalidConfig(
                "projectile_speed must be > 0".into(),
            ));
        }
        if self.arena_width == 0 || self.arena_height == 0 {
            return Err(SimError::InvalidConfig(
                "arena dimensions must be > 0".into(),
            ));
        }
        if self.respawn_delay < 0 {
            return Err(SimError::InvalidConfig("respawn_delay must be >= 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SimConfig = toml::from_str("population = 2\n").expect("parse");
        assert_eq!(config.population, 2);
        assert_eq!(config.respawn_delay, SimConfig::default().respawn_delay);
    }

    #[test]
    fn test_rejects_zero_population() {
        let config = SimConfig {
            population: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_nonpositive_projectile_speed() {
        let config = SimConfig {
            projectile_speed: 0.0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
