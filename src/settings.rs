//! Arena and economy settings
//!
//! Everything a run needs that is not part of the tower/enemy catalog.
//! Loadable from JSON; missing fields fall back to [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Arena width in world units (x grows right)
    pub arena_width: f32,
    /// Arena height in world units (y grows down)
    pub arena_height: f32,
    /// Margin along every arena edge where towers may not stand
    pub arena_padding: f32,

    // === Path ===
    /// Visual/physical width of the enemy path
    pub path_width: f32,
    /// Extra clearance between tower centers and the path edge
    pub path_clearance: f32,
    /// Extra clearance between tower footprints
    pub placement_buffer: f32,

    // === Economy ===
    pub starting_money: u32,
    pub starting_lives: u32,

    // === Combat ===
    /// Seconds before an airborne projectile expires
    pub projectile_lifetime: f32,

    // === Persistence ===
    /// Scope key the best wave is stored under
    pub best_wave_scope: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            arena_padding: ARENA_PADDING,

            path_width: PATH_WIDTH,
            path_clearance: PATH_CLEARANCE,
            placement_buffer: PLACEMENT_BUFFER,

            starting_money: STARTING_MONEY,
            starting_lives: STARTING_LIVES,

            projectile_lifetime: PROJECTILE_LIFETIME,

            best_wave_scope: "path_defense_best_wave".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values no run could sensibly use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "arena must have positive size, got {}x{}",
                self.arena_width, self.arena_height
            )));
        }
        if self.arena_padding < 0.0 || self.path_width < 0.0 {
            return Err(ConfigError::Invalid(
                "padding and path width must not be negative".to_string(),
            ));
        }
        if self.projectile_lifetime <= 0.0 {
            return Err(ConfigError::Invalid("projectile lifetime must be positive".to_string()));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting lives must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Minimum distance a tower center must keep from the path centerline
    #[inline]
    pub fn path_keep_out(&self) -> f32 {
        self.path_width / 2.0 + self.path_clearance
    }
}
