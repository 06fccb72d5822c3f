//! Per-tick combat resolution
//!
//! One call advances a running wave by `dt` seconds. The sub-steps run in a
//! fixed order (move enemies, move/resolve projectiles, fire towers, settle
//! leaks and kills, spawn, check wave clear); reordering them changes
//! outcomes.

use glam::Vec2;

use super::catalog::Catalog;
use super::path::PathModel;
use super::state::{Enemy, GameEvent, Phase, Projectile, SimulationState};
use super::waves::{clear_bonus, scale_for_wave};
use crate::consts::*;
use crate::settings::Settings;

/// Read-only inputs to a tick
#[derive(Debug, Clone, Copy)]
pub struct World<'a> {
    pub path: &'a PathModel,
    pub catalog: &'a Catalog,
    pub settings: &'a Settings,
}

/// What a tick did to the phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not running; nothing was simulated
    Idle,
    /// Wave still in progress
    Continue,
    /// Last enemy gone and queue empty; back to Build
    WaveCleared { wave: u32, bonus: u32 },
    /// Lives ran out
    GameOver,
}

/// Advance a running wave by `dt` seconds (caller clamps `dt`)
pub fn step(state: &mut SimulationState, world: &World<'_>, dt: f32) -> StepOutcome {
    if state.phase != Phase::Running {
        return StepOutcome::Idle;
    }

    move_enemies(state, world.path, dt);
    update_projectiles(state, dt);
    fire_towers(state, world, dt);

    if resolve_outcomes(state) {
        return StepOutcome::GameOver;
    }

    spawn_due(state, world, dt);
    check_wave_complete(state)
}

/// 1. Walk every live enemy along the path
fn move_enemies(state: &mut SimulationState, path: &PathModel, dt: f32) {
    for enemy in state.enemies.iter_mut() {
        if enemy.reached_end || !enemy.is_alive() {
            continue;
        }
        let speed = enemy.tick_speed(dt);
        enemy.reached_end = path.advance(
            &mut enemy.segment_index,
            &mut enemy.distance_on_segment,
            speed * dt,
        );
        enemy.pos = path.point_on_segment(enemy.segment_index, enemy.distance_on_segment);
    }
}

/// 2. Fly projectiles, resolving hits
fn update_projectiles(state: &mut SimulationState, dt: f32) {
    let enemies = &mut state.enemies;
    state
        .projectiles
        .retain_mut(|projectile| advance_projectile(projectile, enemies, dt));
}

/// Returns false once the projectile is spent
fn advance_projectile(projectile: &mut Projectile, enemies: &mut [Enemy], dt: f32) -> bool {
    projectile.lifetime -= dt;
    if projectile.lifetime <= 0.0 {
        return false;
    }

    // Target gone or dead: drop, never re-aim
    let Some(target_index) = enemies
        .iter()
        .position(|e| e.id == projectile.target_id && e.is_alive())
    else {
        return false;
    };

    let target_pos = enemies[target_index].pos;
    let distance = projectile.pos.distance(target_pos);
    let travel = projectile.speed * dt;

    if travel + enemies[target_index].radius < distance {
        projectile.pos += (target_pos - projectile.pos).normalize_or_zero() * travel;
        return true;
    }

    projectile.pos = target_pos;
    strike(projectile, enemies, target_index);

    projectile.pierce = projectile.pierce.saturating_sub(1);
    if projectile.pierce == 0 {
        return false;
    }

    // Piercing shots move on to the nearest fresh enemy in range, otherwise
    // they stay on the current target
    let follow_up = nearest_target(
        enemies,
        projectile.pos,
        projectile.range,
        &projectile.hit_ids,
    );
    if let Some(next) = follow_up {
        projectile.target_id = next;
    }
    true
}

/// Apply a hit on `enemies[target_index]`, including slow and splash
fn strike(projectile: &mut Projectile, enemies: &mut [Enemy], target_index: usize) {
    let impact = enemies[target_index].pos;
    {
        let target = &mut enemies[target_index];
        target.health -= projectile.damage;
        if let Some(slow) = projectile.slow {
            target.apply_slow(slow);
        }
        projectile.hit_ids.push(target.id);
    }

    if projectile.splash_radius > 0.0 {
        let splash = projectile.damage * SPLASH_FACTOR;
        for (index, enemy) in enemies.iter_mut().enumerate() {
            if index != target_index
                && enemy.is_alive()
                && enemy.pos.distance(impact) <= projectile.splash_radius
            {
                enemy.health -= splash;
            }
        }
    }
}

/// Nearest targetable enemy within `range` of `from`; ties go to the first
fn nearest_target(enemies: &[Enemy], from: Vec2, range: f32, exclude: &[u32]) -> Option<u32> {
    let mut best: Option<(u32, f32)> = None;
    for enemy in enemies {
        if !enemy.is_targetable() || exclude.contains(&enemy.id) {
            continue;
        }
        let distance = enemy.pos.distance(from);
        if distance > range {
            continue;
        }
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((enemy.id, distance));
        }
    }
    best.map(|(id, _)| id)
}

/// 3. Ready towers pick the nearest enemy and fire; others cool down
fn fire_towers(state: &mut SimulationState, world: &World<'_>, dt: f32) {
    let mut shots: Vec<(usize, u32)> = Vec::new();

    for (index, tower) in state.towers.iter_mut().enumerate() {
        if tower.cooldown > 0.0 {
            tower.cooldown -= dt;
            continue;
        }
        let Some(kind) = world.catalog.tower(&tower.type_id) else {
            continue;
        };
        if let Some(target_id) = nearest_target(&state.enemies, tower.pos, kind.range, &[]) {
            tower.cooldown = (1.0 / kind.fire_rate).max(MIN_TOWER_COOLDOWN);
            shots.push((index, target_id));
        }
    }

    for (index, target_id) in shots {
        let id = state.next_entity_id();
        let tower = &state.towers[index];
        if let Some(kind) = world.catalog.tower(&tower.type_id) {
            let projectile =
                Projectile::fire(id, tower, kind, target_id, world.settings.projectile_lifetime);
            state.projectiles.push(projectile);
        }
    }
}

/// 4. Charge leaks against lives, pay out kills. Returns true on game over.
fn resolve_outcomes(state: &mut SimulationState) -> bool {
    let events = &mut state.events;

    let mut lives_lost = 0u32;
    state.enemies.retain(|enemy| {
        if enemy.reached_end {
            lives_lost = lives_lost.saturating_add(enemy.life_cost);
            events.push(GameEvent::EnemyLeaked {
                enemy_id: enemy.id,
                life_cost: enemy.life_cost,
            });
            false
        } else {
            true
        }
    });
    state.lives = state.lives.saturating_sub(lives_lost);

    let mut earned = 0u32;
    state.enemies.retain(|enemy| {
        if enemy.is_alive() {
            true
        } else {
            earned = earned.saturating_add(enemy.reward);
            events.push(GameEvent::EnemyKilled {
                enemy_id: enemy.id,
                reward: enemy.reward,
            });
            false
        }
    });
    state.money = state.money.saturating_add(earned);

    if state.lives == 0 {
        state.phase = Phase::GameOver;
        state.spawn_queue.clear();
        state.projectiles.clear();
        state.events.push(GameEvent::GameOver { wave: state.wave });
        log::info!("Game over on wave {}", state.wave);
        return true;
    }
    false
}

/// 5. Spawn every queued enemy whose time has come
fn spawn_due(state: &mut SimulationState, world: &World<'_>, dt: f32) {
    state.wave_time += dt;

    while state
        .spawn_queue
        .front()
        .is_some_and(|entry| entry.spawn_at <= state.wave_time)
    {
        let Some(entry) = state.spawn_queue.pop_front() else {
            break;
        };
        let Some(kind) = world.catalog.enemy(&entry.enemy_type_id) else {
            log::warn!("Dropping spawn of unknown enemy `{}`", entry.enemy_type_id);
            continue;
        };
        let stats = scale_for_wave(kind, state.wave);
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::spawn(id, kind, stats, world.path.start()));
    }
}

/// 6. Return to Build once the queue is drained and the field is empty
fn check_wave_complete(state: &mut SimulationState) -> StepOutcome {
    if state.phase != Phase::Running || !state.spawn_queue.is_empty() || !state.enemies.is_empty()
    {
        return StepOutcome::Continue;
    }

    let wave = state.wave;
    let bonus = clear_bonus(wave);
    state.phase = Phase::Build;
    state.money = state.money.saturating_add(bonus);
    state.best_wave = state.best_wave.max(wave);
    state.projectiles.clear();
    state.events.push(GameEvent::WaveCleared { wave, bonus });
    log::info!("Wave {} cleared, bonus {}", wave, bonus);

    StepOutcome::WaveCleared { wave, bonus }
}
