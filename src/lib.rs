//! Path Defense - a deterministic tower-defense combat core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (path geometry, combat, waves, phases)
//! - `persistence`: Key/value storage for the best-wave record
//! - `settings`: Data-driven arena and economy configuration
//! - `error`: Typed failures reported back to the caller

pub mod best_wave;
pub mod error;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, PathError, PlacementError, StartWaveError, StoreError};
pub use persistence::{KeyValueStore, MemoryStore};
pub use settings::Settings;
pub use sim::{Catalog, GameEvent, Phase, Simulation, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation should ever be fed (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Economy defaults
    pub const STARTING_MONEY: u32 = 650;
    pub const STARTING_LIVES: u32 = 20;

    /// Arena defaults (world units)
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 640.0;
    pub const ARENA_PADDING: f32 = 24.0;
    pub const PATH_WIDTH: f32 = 48.0;
    /// Extra gap between a tower center and the path edge
    pub const PATH_CLEARANCE: f32 = 6.0;
    /// Extra gap between two tower footprints
    pub const PLACEMENT_BUFFER: f32 = 4.0;

    /// Seconds a projectile may fly before it fizzles
    pub const PROJECTILE_LIFETIME: f32 = 2.5;
    /// Floor on the delay between two shots of the same tower
    pub const MIN_TOWER_COOLDOWN: f32 = 0.1;
    /// Fraction of a projectile's damage dealt to enemies caught in its splash
    pub const SPLASH_FACTOR: f32 = 0.6;

    /// Per-wave growth applied to enemy speed and reward.
    /// Balance knob; keep numerically stable for replay compatibility.
    pub const WAVE_SCALING: f32 = 0.12;

    /// Wave clear bonus: `round(base + wave * per_wave)`
    pub const CLEAR_BONUS_BASE: f32 = 140.0;
    pub const CLEAR_BONUS_PER_WAVE: f32 = 25.0;

    /// Wave schedule shape
    pub const MIN_WAVE_SIZE: u32 = 10;
    pub const BASE_WAVE_SIZE: u32 = 8;
    pub const WAVE_SIZE_GROWTH: u32 = 3;
    pub const SPAWN_SPACING_START: f32 = 1.15;
    pub const SPAWN_SPACING_DECAY: f32 = 0.05;
    pub const SPAWN_SPACING_MIN: f32 = 0.35;
    /// A new enemy tier unlocks every this many waves
    pub const WAVES_PER_TIER: u32 = 3;
    /// Smallest run of consecutive spawns sharing one tier
    pub const MIN_TIER_GROUP: u32 = 2;
}

/// Clamp a raw frame delta into the range the simulation integrates safely.
///
/// Negative or non-finite deltas (clock going backwards, NaN from a bad
/// timer) collapse to zero.
#[inline]
pub fn clamp_frame_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, consts::MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Round a non-negative money amount to whole coins
#[inline]
pub(crate) fn round_coins(amount: f32) -> u32 {
    amount.max(0.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_frame_dt() {
        assert_eq!(clamp_frame_dt(0.016), 0.016);
        assert_eq!(clamp_frame_dt(0.5), consts::MAX_FRAME_DT);
        assert_eq!(clamp_frame_dt(-1.0), 0.0);
        assert_eq!(clamp_frame_dt(f32::NAN), 0.0);
    }

    #[test]
    fn test_round_coins() {
        assert_eq!(round_coins(11.2), 11);
        assert_eq!(round_coins(11.5), 12);
        assert_eq!(round_coins(-3.0), 0);
    }
}
