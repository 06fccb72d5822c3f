use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec2;

use path_defense::persistence::{KeyValueStore, MemoryStore};
use path_defense::sim::{
    Catalog, EnemyType, GameEvent, PathModel, Phase, SimulationState, SpawnEntry, StepOutcome,
    Tower, TowerType, World, step,
};
use path_defense::{PlacementError, Settings, Simulation, StartWaveError, StoreError};

const DT: f32 = 1.0 / 60.0;

/// Store whose contents the test can still read after handing it over
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<BTreeMap<String, String>>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.0.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn bolt(range: f32) -> TowerType {
    TowerType {
        id: "bolt".into(),
        name: "Bolt".into(),
        cost: 100,
        range,
        fire_rate: 1.1,
        damage: 26.0,
        projectile_speed: 300.0,
        splash_radius: 0.0,
        pierce: 1,
        slow: None,
        radius: 18.0,
    }
}

fn grunt(base_health: f32, life_cost: u32) -> EnemyType {
    EnemyType {
        id: "grunt".into(),
        name: "Grunt".into(),
        base_health,
        health_growth: 12.0,
        base_speed: 30.0,
        speed_growth: 4.0,
        reward: 9,
        life_cost,
        radius: 10.0,
    }
}

/// Short path fully inside a 170-range tower standing at (250, 200)
fn short_path() -> PathModel {
    PathModel::from_points(&[[150.0, 300.0], [350.0, 300.0]]).unwrap()
}

const TOWER_SPOT: Vec2 = Vec2::new(250.0, 200.0);

fn run_wave(sim: &mut Simulation, max_seconds: f32) -> StepOutcome {
    let mut elapsed = 0.0;
    while elapsed < max_seconds {
        let outcome = sim.step(DT);
        if outcome != StepOutcome::Continue {
            return outcome;
        }
        elapsed += DT;
    }
    StepOutcome::Continue
}

#[test]
fn wave_one_enemy_dies_to_two_hits_and_pays_reward() {
    let settings = Settings::default();
    let path = short_path();
    let catalog = Catalog::new(vec![bolt(170.0)], vec![grunt(40.0, 1)]);
    let world = World {
        path: &path,
        catalog: &catalog,
        settings: &settings,
    };

    let mut state = SimulationState::new(&settings, 0);
    let tower_id = state.next_entity_id();
    state.towers.push(Tower {
        id: tower_id,
        type_id: "bolt".into(),
        pos: TOWER_SPOT,
        radius: 18.0,
        cooldown: 0.0,
    });
    state.phase = Phase::Running;
    state.wave = 1;
    state.spawn_queue.push_back(SpawnEntry {
        spawn_at: 0.0,
        enemy_type_id: "grunt".into(),
    });
    let money_before = state.money;

    let mut health_seen = Vec::new();
    let mut outcome = StepOutcome::Continue;
    for _ in 0..(20.0 / DT) as usize {
        outcome = step(&mut state, &world, DT);
        if let Some(enemy) = state.enemies.first() {
            if health_seen.last() != Some(&enemy.health) {
                health_seen.push(enemy.health);
            }
        }
        if outcome != StepOutcome::Continue {
            break;
        }
    }

    // Spawned at full health, one surviving hit, then removed by the second
    assert_eq!(health_seen, vec![40.0, 14.0]);
    assert!(state.events.contains(&GameEvent::EnemyKilled {
        enemy_id: 2,
        reward: 9
    }));
    assert_eq!(outcome, StepOutcome::WaveCleared { wave: 1, bonus: 165 });
    assert_eq!(state.money, money_before + 9 + 165);
    assert_eq!(state.lives, settings.starting_lives);
}

#[test]
fn start_wave_without_towers_stays_in_build() {
    let mut sim = Simulation::new(
        Settings::default(),
        Catalog::standard(),
        short_path(),
        MemoryStore::new(),
    );
    assert_eq!(sim.start_wave(), Err(StartWaveError::NoTowers));
    assert_eq!(sim.phase(), Phase::Build);
    assert_eq!(sim.snapshot().wave, 0);
}

#[test]
fn placement_checks_funds_then_location() {
    let settings = Settings {
        starting_money: 150,
        ..Settings::default()
    };
    let mut sim = Simulation::new(
        settings.clone(),
        Catalog::new(vec![bolt(170.0)], vec![grunt(40.0, 1)]),
        short_path(),
        MemoryStore::new(),
    );

    // Just inside the path keep-out band
    assert_eq!(
        sim.place_tower("bolt", Vec2::new(250.0, 300.0 - settings.path_keep_out() + 1.0)),
        Err(PlacementError::InvalidLocation)
    );
    assert_eq!(sim.snapshot().money, 150);

    sim.place_tower("bolt", TOWER_SPOT).unwrap();
    assert_eq!(sim.snapshot().money, 50);

    let towers_before = sim.state().towers.len();
    assert_eq!(
        sim.place_tower("bolt", Vec2::new(500.0, 500.0)),
        Err(PlacementError::InsufficientFunds {
            cost: 100,
            money: 50
        })
    );
    assert_eq!(sim.snapshot().money, 50);
    assert_eq!(sim.state().towers.len(), towers_before);
}

#[test]
fn reset_mid_wave_restores_defaults_but_keeps_best_wave() {
    let mut store = MemoryStore::new();
    store.set("path_defense_best_wave", r#"{"wave":5}"#).unwrap();
    let settings = Settings::default();
    let mut sim = Simulation::new(settings.clone(), Catalog::standard(), short_path(), store);
    assert_eq!(sim.snapshot().best_wave, 5);

    sim.place_tower("bolt", TOWER_SPOT).unwrap();
    sim.start_wave().unwrap();
    for _ in 0..80 {
        sim.step(DT);
    }
    assert!(!sim.state().enemies.is_empty());

    sim.reset();

    let snap = sim.snapshot();
    assert_eq!(snap.money, settings.starting_money);
    assert_eq!(snap.lives, settings.starting_lives);
    assert_eq!(snap.wave, 0);
    assert_eq!(snap.phase, Phase::Build);
    assert_eq!(snap.best_wave, 5);
    let state = sim.state();
    assert!(state.towers.is_empty());
    assert!(state.enemies.is_empty());
    assert!(state.projectiles.is_empty());
    assert!(state.spawn_queue.is_empty());
}

#[test]
fn clearing_a_wave_persists_best_wave_once() {
    let store = SharedStore::default();
    let mut sim = Simulation::new(
        Settings::default(),
        Catalog::new(vec![bolt(170.0)], vec![grunt(1.0, 1)]),
        short_path(),
        store.clone(),
    );
    sim.place_tower("bolt", TOWER_SPOT).unwrap();
    let money_before = sim.snapshot().money;
    sim.start_wave().unwrap();

    let outcome = run_wave(&mut sim, 120.0);
    assert_eq!(outcome, StepOutcome::WaveCleared { wave: 1, bonus: 165 });

    let snap = sim.snapshot();
    assert_eq!(snap.phase, Phase::Build);
    assert_eq!(snap.best_wave, 1);
    assert_eq!(snap.lives, Settings::default().starting_lives);
    // Eleven kills at 9 each plus the clear bonus
    assert_eq!(snap.money, money_before + 11 * 9 + 165);
    assert_eq!(
        store.0.borrow().get("path_defense_best_wave").map(String::as_str),
        Some(r#"{"wave":1}"#)
    );

    let messages: Vec<String> = sim
        .drain_events()
        .iter()
        .filter_map(GameEvent::message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Wave 1 incoming!".to_string(),
            "Wave 1 cleared! Bonus +165".to_string()
        ]
    );
}

#[test]
fn leaking_past_zero_lives_is_game_over_until_reset() {
    let mut sim = Simulation::new(
        Settings::default(),
        // Tower that can never reach the path; enemies cost more than all lives
        Catalog::new(vec![bolt(1.0)], vec![grunt(40.0, 25)]),
        short_path(),
        MemoryStore::new(),
    );
    sim.place_tower("bolt", TOWER_SPOT).unwrap();
    sim.start_wave().unwrap();

    assert_eq!(run_wave(&mut sim, 60.0), StepOutcome::GameOver);

    let snap = sim.snapshot();
    assert_eq!(snap.phase, Phase::GameOver);
    assert_eq!(snap.lives, 0);
    assert_eq!(snap.best_wave, 0);
    assert!(sim.state().spawn_queue.is_empty());
    assert!(sim.state().projectiles.is_empty());

    assert_eq!(sim.start_wave(), Err(StartWaveError::GameOver));
    assert_eq!(
        sim.place_tower("bolt", Vec2::new(500.0, 500.0)),
        Err(PlacementError::WrongPhase)
    );
    assert_eq!(sim.step(DT), StepOutcome::Idle);

    sim.reset();
    assert_eq!(sim.phase(), Phase::Build);
    assert_eq!(sim.snapshot().lives, Settings::default().starting_lives);
}
