//! Tower and enemy definitions
//!
//! Supplied by the caller and read-only to the simulation. Enemy order
//! matters: index 0 is the weakest tier, the last entry the strongest.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Slow applied to an enemy on hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    /// Speed multiplier while slowed (0.5 = half speed)
    pub amount: f32,
    /// Seconds the slow lasts
    pub duration: f32,
}

/// A buildable tower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerType {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub cost: u32,
    pub range: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub damage: f32,
    pub projectile_speed: f32,
    /// 0 disables splash
    #[serde(default)]
    pub splash_radius: f32,
    /// Enemies one projectile may hit
    #[serde(default = "default_pierce")]
    pub pierce: u32,
    #[serde(default)]
    pub slow: Option<SlowEffect>,
    /// Footprint radius used for placement overlap
    pub radius: f32,
}

fn default_pierce() -> u32 {
    1
}

/// An enemy tier and how it grows across waves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyType {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub base_health: f32,
    /// Extra health per wave after the first
    #[serde(default)]
    pub health_growth: f32,
    pub base_speed: f32,
    /// Extra speed per wave after the first (before the wave scaling factor)
    #[serde(default)]
    pub speed_growth: f32,
    pub reward: u32,
    pub life_cost: u32,
    pub radius: f32,
}

/// Full roster for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub towers: Vec<TowerType>,
    /// Weakest tier first
    pub enemies: Vec<EnemyType>,
}

impl Catalog {
    pub fn new(towers: Vec<TowerType>, enemies: Vec<EnemyType>) -> Self {
        Self { towers, enemies }
    }

    pub fn tower(&self, id: &str) -> Option<&TowerType> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyType> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Parse a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file on disk
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let catalog = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded catalog from {} ({} towers, {} enemies)",
            path.display(),
            catalog.towers.len(),
            catalog.enemies.len()
        );
        Ok(catalog)
    }

    /// Reject definitions the combat code cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tower in &self.towers {
            if tower.fire_rate <= 0.0 || tower.projectile_speed <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "tower `{}` needs positive fire rate and projectile speed",
                    tower.id
                )));
            }
            if tower.pierce == 0 {
                return Err(ConfigError::Invalid(format!(
                    "tower `{}` must pierce at least one enemy",
                    tower.id
                )));
            }
            if let Some(slow) = tower.slow {
                if !(0.0..=1.0).contains(&slow.amount) || slow.duration < 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "tower `{}` has an invalid slow effect",
                        tower.id
                    )));
                }
            }
        }
        for enemy in &self.enemies {
            if enemy.base_health <= 0.0 || enemy.base_speed <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "enemy `{}` needs positive health and speed",
                    enemy.id
                )));
            }
        }
        Ok(())
    }

    /// Built-in roster: four towers, four enemy tiers
    pub fn standard() -> Self {
        let towers = vec![
            TowerType {
                id: "bolt".into(),
                name: "Bolt Tower".into(),
                cost: 100,
                range: 170.0,
                fire_rate: 1.1,
                damage: 26.0,
                projectile_speed: 420.0,
                splash_radius: 0.0,
                pierce: 1,
                slow: None,
                radius: 18.0,
            },
            TowerType {
                id: "needle".into(),
                name: "Needle Tower".into(),
                cost: 160,
                range: 210.0,
                fire_rate: 0.8,
                damage: 34.0,
                projectile_speed: 560.0,
                splash_radius: 0.0,
                pierce: 3,
                slow: None,
                radius: 18.0,
            },
            TowerType {
                id: "mortar".into(),
                name: "Mortar".into(),
                cost: 220,
                range: 150.0,
                fire_rate: 0.55,
                damage: 48.0,
                projectile_speed: 260.0,
                splash_radius: 70.0,
                pierce: 1,
                slow: None,
                radius: 22.0,
            },
            TowerType {
                id: "frost".into(),
                name: "Frost Spire".into(),
                cost: 140,
                range: 140.0,
                fire_rate: 1.4,
                damage: 8.0,
                projectile_speed: 380.0,
                splash_radius: 0.0,
                pierce: 1,
                slow: Some(SlowEffect {
                    amount: 0.55,
                    duration: 1.6,
                }),
                radius: 18.0,
            },
        ];

        let enemies = vec![
            EnemyType {
                id: "scout".into(),
                name: "Scout".into(),
                base_health: 40.0,
                health_growth: 9.0,
                base_speed: 70.0,
                speed_growth: 6.0,
                reward: 9,
                life_cost: 1,
                radius: 10.0,
            },
            EnemyType {
                id: "raider".into(),
                name: "Raider".into(),
                base_health: 85.0,
                health_growth: 16.0,
                base_speed: 58.0,
                speed_growth: 5.0,
                reward: 15,
                life_cost: 2,
                radius: 12.0,
            },
            EnemyType {
                id: "brute".into(),
                name: "Brute".into(),
                base_health: 190.0,
                health_growth: 30.0,
                base_speed: 42.0,
                speed_growth: 4.0,
                reward: 28,
                life_cost: 3,
                radius: 15.0,
            },
            EnemyType {
                id: "warlord".into(),
                name: "Warlord".into(),
                base_health: 420.0,
                health_growth: 60.0,
                base_speed: 34.0,
                speed_growth: 3.0,
                reward: 60,
                life_cost: 5,
                radius: 18.0,
            },
        ];

        Self { towers, enemies }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
