//! Tower placement validation

use glam::Vec2;

use super::catalog::TowerType;
use super::path::PathModel;
use super::state::Tower;
use crate::settings::Settings;

/// Why a point is not buildable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obstruction {
    /// Outside the arena (minus padding)
    OutOfBounds,
    /// Too close to the enemy path
    Path,
    /// Overlaps the tower with this id
    Tower(u32),
}

/// Check a point against arena bounds, path clearance and existing towers
pub fn check_placement(
    settings: &Settings,
    path: &PathModel,
    kind: &TowerType,
    point: Vec2,
    towers: &[Tower],
) -> Result<(), Obstruction> {
    let pad = settings.arena_padding;
    let inside = point.is_finite()
        && point.x >= pad
        && point.y >= pad
        && point.x <= settings.arena_width - pad
        && point.y <= settings.arena_height - pad;
    if !inside {
        return Err(Obstruction::OutOfBounds);
    }

    if path.distance_to_point(point) < settings.path_keep_out() {
        return Err(Obstruction::Path);
    }

    if let Some(tower) = towers.iter().find(|tower| {
        point.distance(tower.pos) < tower.radius + kind.radius + settings.placement_buffer
    }) {
        return Err(Obstruction::Tower(tower.id));
    }

    Ok(())
}

/// True when a tower of `kind` may stand at `point`
pub fn can_place(
    settings: &Settings,
    path: &PathModel,
    kind: &TowerType,
    point: Vec2,
    towers: &[Tower],
) -> bool {
    check_placement(settings, path, kind, point, towers).is_ok()
}
