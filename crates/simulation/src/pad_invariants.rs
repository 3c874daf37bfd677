//! Runtime invariant guards for launch pad formations.
//!
//! A sweep runs every slow-tick cycle (~100 ticks) and validates the
//! structural rules every assembled pad must satisfy: each center cell owns
//! a coherent 3x3 window of correctly-roled members plus exactly one anchor
//! entity, each directional member points back at a real center, and no
//! anchor is stored anywhere else. Violations are logged and counted, never
//! repaired; the placement and removal paths are responsible for keeping
//! the grid consistent.

use bevy::prelude::*;

use crate::grid::{CellType, PadRole, WorldGrid};
use crate::launch_pad::LaunchPad;
use crate::SimulationSet;
use crate::SlowTickTimer;

/// Tracks the number of formation invariant violations detected during the
/// last validation pass. Used by integration tests.
#[derive(Resource, Default, Debug)]
pub struct PadInvariantViolations {
    pub window_coherence: u32,
    pub missing_anchor: u32,
    pub orphan_member: u32,
    pub orphan_anchor: u32,
}

impl PadInvariantViolations {
    pub fn total(&self) -> u32 {
        self.window_coherence + self.missing_anchor + self.orphan_member + self.orphan_anchor
    }
}

/// The 3x3 window around `(cx, cy)` consists entirely of pad cells whose
/// roles match their offsets from the center.
pub fn window_is_coherent(grid: &WorldGrid, cx: usize, cy: usize) -> bool {
    for dy in -1..=1 {
        for dx in -1..=1 {
            let (px, py) = (cx as i32 + dx, cy as i32 + dy);
            if px < 0 || py < 0 || !grid.in_bounds(px as usize, py as usize) {
                return false;
            }
            let cell = grid.get(px as usize, py as usize);
            if cell.cell_type != CellType::Pad || cell.pad_role != PadRole::for_offset(dx, dy) {
                return false;
            }
        }
    }
    true
}

/// Validate every assembled formation and anchor entity against the grid.
pub fn validate_pad_formations(
    slow_tick: Res<SlowTickTimer>,
    grid: Res<WorldGrid>,
    pads: Query<(Entity, &LaunchPad)>,
    mut violations: ResMut<PadInvariantViolations>,
) {
    if !slow_tick.should_run() {
        return;
    }
    violations.window_coherence = 0;
    violations.missing_anchor = 0;
    violations.orphan_member = 0;
    violations.orphan_anchor = 0;

    for y in 0..grid.height {
        for x in 0..grid.width {
            let cell = grid.get(x, y);

            if cell.pad_entity.is_some() && cell.pad_role != PadRole::Center {
                warn!(
                    "Invariant violation: anchor stored at ({x}, {y}) with role {:?}.",
                    cell.pad_role
                );
                violations.orphan_anchor += 1;
            }

            match cell.pad_role {
                PadRole::None => {}
                PadRole::Center => {
                    if !window_is_coherent(&grid, x, y) {
                        warn!("Invariant violation: incoherent window around center ({x}, {y}).");
                        violations.window_coherence += 1;
                    }
                    if cell.pad_entity.is_none() {
                        warn!("Invariant violation: center ({x}, {y}) holds no anchor.");
                        violations.missing_anchor += 1;
                    }
                }
                role => {
                    let (dx, dy) = role.offset();
                    let (cx, cy) = (x as i32 - dx, y as i32 - dy);
                    let has_center = cx >= 0
                        && cy >= 0
                        && grid.in_bounds(cx as usize, cy as usize)
                        && grid.get(cx as usize, cy as usize).pad_role == PadRole::Center;
                    if !has_center {
                        warn!(
                            "Invariant violation: member ({x}, {y}) with role {role:?} \
                             has no center at ({cx}, {cy})."
                        );
                        violations.orphan_member += 1;
                    }
                }
            }
        }
    }

    for (entity, pad) in &pads {
        let anchored = grid.in_bounds(pad.grid_x, pad.grid_y)
            && grid.get(pad.grid_x, pad.grid_y).pad_entity == Some(entity);
        if !anchored {
            warn!(
                "Invariant violation: pad entity {entity:?} is not anchored at ({}, {}).",
                pad.grid_x, pad.grid_y
            );
            violations.orphan_anchor += 1;
        }
    }
}

pub struct PadInvariantsPlugin;

impl Plugin for PadInvariantsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PadInvariantViolations>().add_systems(
            FixedUpdate,
            validate_pad_formations.in_set(SimulationSet::PostSim),
        );
    }
}
