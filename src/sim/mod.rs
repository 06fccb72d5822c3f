//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `step(dt)`
//! - No RNG; wave schedules are pure functions of the wave number
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod controller;
pub mod path;
pub mod placement;
pub mod state;
pub mod tick;
pub mod waves;

pub use catalog::{Catalog, EnemyType, SlowEffect, TowerType};
pub use controller::Simulation;
pub use path::{PathModel, PathSegment, point_segment_distance};
pub use placement::{Obstruction, can_place, check_placement};
pub use state::{Enemy, GameEvent, Phase, Projectile, SimulationState, Snapshot, Tower};
pub use tick::{StepOutcome, World, step};
pub use waves::{ScaledStats, SpawnEntry, clear_bonus, create_schedule, scale_for_wave};
