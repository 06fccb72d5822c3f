//! Phase controller
//!
//! [`Simulation`] owns the state and is the only way to change it:
//! Build → Running → {Build, GameOver}, with `reset` as the sole exit from
//! GameOver. The UI layer reads [`Snapshot`] copies and drains
//! [`GameEvent`]s; it never holds references into live state across calls.

use glam::Vec2;

use super::catalog::Catalog;
use super::path::PathModel;
use super::placement::check_placement;
use super::state::{GameEvent, Phase, SimulationState, Snapshot, Tower};
use super::tick::{self, StepOutcome, World};
use super::waves::create_schedule;
use crate::best_wave;
use crate::error::{PlacementError, StartWaveError};
use crate::persistence::KeyValueStore;
use crate::settings::Settings;

/// A tower-defense game in progress
pub struct Simulation {
    settings: Settings,
    catalog: Catalog,
    path: PathModel,
    state: SimulationState,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("settings", &self.settings)
            .field("path", &self.path)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Start a new game; the best wave is read from `store` once, here
    pub fn new(
        settings: Settings,
        catalog: Catalog,
        path: PathModel,
        store: impl KeyValueStore + 'static,
    ) -> Self {
        let store: Box<dyn KeyValueStore> = Box::new(store);
        let best = best_wave::load(store.as_ref(), &settings.best_wave_scope);
        let state = SimulationState::new(&settings, best);
        Self {
            settings,
            catalog,
            path,
            state,
            store,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn path(&self) -> &PathModel {
        &self.path
    }

    /// Live state, for rendering between steps
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Owned copy of the HUD numbers
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Placement preview: would `place_tower` accept this right now?
    pub fn can_place(&self, type_id: &str, point: Vec2) -> bool {
        self.validate_placement(type_id, point).is_ok()
    }

    /// Buy and place a tower, returning its id
    pub fn place_tower(&mut self, type_id: &str, point: Vec2) -> Result<u32, PlacementError> {
        let cost = match self.validate_placement(type_id, point) {
            Ok(cost) => cost,
            Err(e) => {
                log::debug!("Rejected `{}` at {:?}: {}", type_id, point, e);
                // Unknown ids are a caller bug, not something to show the player
                if !matches!(e, PlacementError::UnknownTowerType(_)) {
                    self.state.events.push(GameEvent::PlacementRejected {
                        reason: e.to_string(),
                    });
                }
                return Err(e);
            }
        };

        let radius = self
            .catalog
            .tower(type_id)
            .map(|kind| kind.radius)
            .unwrap_or_default();
        self.state.money -= cost;
        let id = self.state.next_entity_id();
        self.state.towers.push(Tower {
            id,
            type_id: type_id.to_string(),
            pos: point,
            radius,
            cooldown: 0.0,
        });
        self.state.events.push(GameEvent::TowerPlaced {
            tower_id: id,
            type_id: type_id.to_string(),
            cost,
        });
        log::debug!("Placed `{}` #{} at {:?}", type_id, id, point);
        Ok(id)
    }

    /// Returns the tower's cost when placement would succeed
    fn validate_placement(&self, type_id: &str, point: Vec2) -> Result<u32, PlacementError> {
        if self.state.phase != Phase::Build {
            return Err(PlacementError::WrongPhase);
        }
        let kind = self
            .catalog
            .tower(type_id)
            .ok_or_else(|| PlacementError::UnknownTowerType(type_id.to_string()))?;
        if self.state.money < kind.cost {
            return Err(PlacementError::InsufficientFunds {
                cost: kind.cost,
                money: self.state.money,
            });
        }
        check_placement(&self.settings, &self.path, kind, point, &self.state.towers)
            .map_err(|_| PlacementError::InvalidLocation)?;
        Ok(kind.cost)
    }

    /// Leave Build and start the next wave, returning its number
    pub fn start_wave(&mut self) -> Result<u32, StartWaveError> {
        match self.state.phase {
            Phase::Running => return Err(StartWaveError::AlreadyRunning),
            Phase::GameOver => return Err(StartWaveError::GameOver),
            Phase::Build => {}
        }
        if self.state.towers.is_empty() {
            return Err(StartWaveError::NoTowers);
        }

        let wave = self.state.wave + 1;
        let schedule = create_schedule(wave, &self.catalog.enemies);
        let enemies = schedule.len();

        self.state.wave = wave;
        self.state.wave_time = 0.0;
        self.state.spawn_queue = schedule.into();
        self.state.phase = Phase::Running;
        self.state.events.push(GameEvent::WaveStarted { wave, enemies });
        log::info!("Wave {} started ({} enemies)", wave, enemies);
        Ok(wave)
    }

    /// Advance by one pre-clamped frame delta. Does nothing outside Running.
    pub fn step(&mut self, dt: f32) -> StepOutcome {
        let world = World {
            path: &self.path,
            catalog: &self.catalog,
            settings: &self.settings,
        };
        let outcome = tick::step(&mut self.state, &world, dt);

        if let StepOutcome::WaveCleared { .. } = outcome {
            best_wave::save(
                self.store.as_mut(),
                &self.settings.best_wave_scope,
                self.state.best_wave,
            );
        }
        outcome
    }

    /// Throw the current run away. Only the best wave survives.
    pub fn reset(&mut self) {
        let events = std::mem::take(&mut self.state.events);
        self.state = SimulationState::new(&self.settings, self.state.best_wave);
        self.state.events = events;
        log::info!("Simulation reset (best wave {})", self.state.best_wave);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn simulation() -> Simulation {
        let path = PathModel::from_points(&[[0.0, 300.0], [960.0, 300.0]]).unwrap();
        Simulation::new(
            Settings::default(),
            Catalog::standard(),
            path,
            MemoryStore::new(),
        )
    }

    #[test]
    fn test_place_tower_deducts_cost() {
        let mut sim = simulation();
        let money = sim.snapshot().money;
        let id = sim.place_tower("bolt", Vec2::new(200.0, 150.0)).unwrap();

        assert_eq!(sim.snapshot().money, money - 100);
        assert_eq!(sim.state().towers.len(), 1);
        assert_eq!(sim.state().towers[0].id, id);
        assert_eq!(sim.state().towers[0].cooldown, 0.0);
    }

    #[test]
    fn test_unknown_tower_type_is_a_no_op() {
        let mut sim = simulation();
        let before = sim.snapshot();
        assert_eq!(
            sim.place_tower("laser", Vec2::new(200.0, 150.0)),
            Err(PlacementError::UnknownTowerType("laser".into()))
        );
        assert_eq!(sim.snapshot(), before);
        assert!(sim.state().towers.is_empty());
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_rejection_emits_status_message() {
        let mut sim = simulation();
        assert_eq!(
            sim.place_tower("bolt", Vec2::new(200.0, 300.0)),
            Err(PlacementError::InvalidLocation)
        );
        let messages: Vec<String> = sim
            .drain_events()
            .iter()
            .filter_map(GameEvent::message)
            .collect();
        assert_eq!(messages, vec!["Cannot place tower: invalid location".to_string()]);
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_no_placement_while_running() {
        let mut sim = simulation();
        sim.place_tower("bolt", Vec2::new(200.0, 150.0)).unwrap();
        assert_eq!(sim.start_wave(), Ok(1));
        assert_eq!(
            sim.place_tower("bolt", Vec2::new(400.0, 150.0)),
            Err(PlacementError::WrongPhase)
        );
        assert_eq!(sim.start_wave(), Err(StartWaveError::AlreadyRunning));
    }

    #[test]
    fn test_start_wave_builds_queue() {
        let mut sim = simulation();
        sim.place_tower("bolt", Vec2::new(200.0, 150.0)).unwrap();
        sim.start_wave().unwrap();

        let state = sim.state();
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.wave, 1);
        assert_eq!(state.spawn_queue.len(), 11);
        assert_eq!(state.wave_time, 0.0);
    }

    #[test]
    fn test_step_is_idle_in_build() {
        let mut sim = simulation();
        assert_eq!(sim.step(0.1), StepOutcome::Idle);
        assert_eq!(sim.state().wave_time, 0.0);
    }
}
