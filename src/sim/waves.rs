//! Wave schedules and per-wave enemy scaling
//!
//! `create_schedule` is a pure function of the wave number and the enemy
//! roster: no RNG, no clock. Replaying a wave always spawns the same enemies
//! at the same offsets.

use serde::{Deserialize, Serialize};

use super::catalog::EnemyType;
use crate::consts::*;
use crate::round_coins;

/// One scheduled spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    /// Seconds after wave start
    pub spawn_at: f32,
    pub enemy_type_id: String,
}

/// Number of enemy tiers available on `wave`
pub fn unlocked_tiers(wave: u32, total_tiers: usize) -> usize {
    let unlocked = ((wave + 2) / WAVES_PER_TIER).max(1) as usize;
    unlocked.min(total_tiers)
}

/// Number of spawns on `wave`
pub fn wave_size(wave: u32) -> u32 {
    (BASE_WAVE_SIZE + wave * WAVE_SIZE_GROWTH).max(MIN_WAVE_SIZE)
}

/// Seconds between consecutive spawns on `wave`
pub fn spawn_spacing(wave: u32) -> f32 {
    (SPAWN_SPACING_START - wave as f32 * SPAWN_SPACING_DECAY).max(SPAWN_SPACING_MIN)
}

/// Build the ordered spawn list for `wave`.
///
/// Spawns are split into consecutive tier groups, weakest first. When more
/// than one tier is unlocked the final spawn is always the strongest one.
pub fn create_schedule(wave: u32, enemies: &[EnemyType]) -> Vec<SpawnEntry> {
    let tier_count = unlocked_tiers(wave, enemies.len());
    if tier_count == 0 {
        return Vec::new();
    }

    let total = wave_size(wave);
    let spacing = spawn_spacing(wave);
    let group_size = (total / tier_count as u32).max(MIN_TIER_GROUP);
    let strongest = tier_count - 1;

    (0..total)
        .map(|i| {
            let mut tier = ((i / group_size) as usize).min(strongest);
            if i == total - 1 && tier_count > 1 {
                tier = strongest;
            }
            SpawnEntry {
                spawn_at: i as f32 * spacing,
                enemy_type_id: enemies[tier].id.clone(),
            }
        })
        .collect()
}

/// Enemy stats after wave scaling, fixed at spawn time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledStats {
    pub health: f32,
    pub speed: f32,
    pub reward: u32,
}

/// Scale an enemy type for `wave` (1-based)
pub fn scale_for_wave(enemy: &EnemyType, wave: u32) -> ScaledStats {
    let waves_in = wave.saturating_sub(1) as f32;
    ScaledStats {
        health: enemy.base_health + enemy.health_growth * waves_in,
        speed: enemy.base_speed + enemy.speed_growth * waves_in * WAVE_SCALING,
        reward: round_coins(enemy.reward as f32 * (1.0 + waves_in * WAVE_SCALING)),
    }
}

/// Bonus credited when `wave` is cleared
pub fn clear_bonus(wave: u32) -> u32 {
    round_coins(CLEAR_BONUS_BASE + wave as f32 * CLEAR_BONUS_PER_WAVE)
}
