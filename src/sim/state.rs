//! Simulation state and entity types
//!
//! Everything a running game mutates lives in [`SimulationState`]. Entity
//! collections stay sorted by id (ids are handed out monotonically and
//! entities are only ever appended), so iteration order is deterministic.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{EnemyType, SlowEffect, TowerType};
use super::waves::{ScaledStats, SpawnEntry};
use crate::settings::Settings;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Between waves; towers may be placed
    Build,
    /// A wave is being fought
    Running,
    /// Lives ran out; only a reset leaves this phase
    GameOver,
}

/// A placed tower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub id: u32,
    pub type_id: String,
    pub pos: Vec2,
    /// Footprint radius, copied from the type at placement
    pub radius: f32,
    /// Seconds until the next shot is allowed
    pub cooldown: f32,
}

/// An enemy walking the path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub type_id: String,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Base walking speed, fixed at spawn
    pub speed: f32,
    /// Money paid out on death, fixed at spawn
    pub reward: u32,
    /// Lives lost if this enemy leaks
    pub life_cost: u32,
    pub radius: f32,
    pub segment_index: usize,
    pub distance_on_segment: f32,
    pub reached_end: bool,
    /// Seconds of slow remaining
    pub slow_timer: f32,
    /// Speed multiplier while slowed (1.0 when not slowed)
    pub slow_factor: f32,
}

impl Enemy {
    /// Spawn at the path start with pre-scaled stats
    pub fn spawn(id: u32, kind: &EnemyType, stats: ScaledStats, pos: Vec2) -> Self {
        Self {
            id,
            type_id: kind.id.clone(),
            pos,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            reward: stats.reward,
            life_cost: kind.life_cost,
            radius: kind.radius,
            segment_index: 0,
            distance_on_segment: 0.0,
            reached_end: false,
            slow_timer: 0.0,
            slow_factor: 1.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Alive and still on the path
    #[inline]
    pub fn is_targetable(&self) -> bool {
        self.is_alive() && !self.reached_end
    }

    /// Speed for this tick, consuming slow time.
    pub fn tick_speed(&mut self, dt: f32) -> f32 {
        if self.slow_timer <= 0.0 {
            return self.speed;
        }
        let speed = self.speed * self.slow_factor;
        self.slow_timer -= dt;
        if self.slow_timer <= 0.0 {
            self.slow_timer = 0.0;
            self.slow_factor = 1.0;
        }
        speed
    }

    /// Apply a slow; a longer remaining timer is never shortened
    pub fn apply_slow(&mut self, slow: SlowEffect) {
        self.slow_timer = self.slow_timer.max(slow.duration);
        self.slow_factor = slow.amount;
    }
}

/// A projectile homing on one enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub target_id: u32,
    pub pos: Vec2,
    pub speed: f32,
    pub damage: f32,
    /// 0 = no splash
    pub splash_radius: f32,
    /// Hits left before the projectile is consumed
    pub pierce: u32,
    /// Seconds left before it fizzles
    pub lifetime: f32,
    pub slow: Option<SlowEffect>,
    /// Firing tower's range; bounds the search for a follow-up target
    #[serde(default)]
    pub range: f32,
    /// Enemies already struck, passed over when picking a follow-up target
    #[serde(default)]
    pub hit_ids: Vec<u32>,
}

impl Projectile {
    /// Fire from `tower` at enemy `target_id`
    pub fn fire(id: u32, tower: &Tower, kind: &TowerType, target_id: u32, lifetime: f32) -> Self {
        Self {
            id,
            target_id,
            pos: tower.pos,
            speed: kind.projectile_speed,
            damage: kind.damage,
            splash_radius: kind.splash_radius,
            pierce: kind.pierce.max(1),
            lifetime,
            slow: kind.slow,
            range: kind.range,
            hit_ids: Vec::new(),
        }
    }
}

/// Things that happened, drained by the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveStarted { wave: u32, enemies: usize },
    WaveCleared { wave: u32, bonus: u32 },
    TowerPlaced { tower_id: u32, type_id: String, cost: u32 },
    PlacementRejected { reason: String },
    EnemyKilled { enemy_id: u32, reward: u32 },
    EnemyLeaked { enemy_id: u32, life_cost: u32 },
    GameOver { wave: u32 },
}

impl GameEvent {
    /// Status-line text for the events the player should see
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::WaveStarted { wave, .. } => Some(format!("Wave {} incoming!", wave)),
            GameEvent::WaveCleared { wave, bonus } => {
                Some(format!("Wave {} cleared! Bonus +{}", wave, bonus))
            }
            GameEvent::PlacementRejected { reason } => {
                Some(format!("Cannot place tower: {}", reason))
            }
            GameEvent::GameOver { wave } => Some(format!("Game over on wave {}", wave)),
            _ => None,
        }
    }
}

/// Read-only copy of the numbers a HUD binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub money: u32,
    pub lives: u32,
    pub phase: Phase,
    pub wave: u32,
    pub best_wave: u32,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub money: u32,
    pub lives: u32,
    /// Last wave started (0 before the first)
    pub wave: u32,
    pub phase: Phase,
    /// Highest wave ever cleared; survives reset
    pub best_wave: u32,
    /// Pending spawns for the running wave, front first
    pub spawn_queue: VecDeque<SpawnEntry>,
    /// Seconds since the running wave started
    pub wave_time: f32,
    pub towers: Vec<Tower>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Undrained events
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl SimulationState {
    /// Fresh state for a new run
    pub fn new(settings: &Settings, best_wave: u32) -> Self {
        Self {
            money: settings.starting_money,
            lives: settings.starting_lives,
            wave: 0,
            phase: Phase::Build,
            best_wave,
            spawn_queue: VecDeque::new(),
            wave_time: 0.0,
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            money: self.money,
            lives: self.lives,
            phase: self.phase,
            wave: self.wave,
            best_wave: self.best_wave,
        }
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }
}
