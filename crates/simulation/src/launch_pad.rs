//! Launch pad multiblock: nine pad cells in a 3x3 footprint.
//!
//! Pad cells are placed and removed one at a time, in any order. Each
//! placement triggers an incremental scan that decides whether a complete
//! 3x3 formation now exists; if so, every member cell is stamped with a
//! directional role and a single anchor entity is spawned for the center
//! cell. Removing any member tears the whole formation down: the center is
//! recomputed from the removed cell's role, all nine roles reset, and the
//! anchor entity despawns.
//!
//! The scan works backwards from the triggering cell: count its free
//! cardinal neighbors, then probe candidate centers in decreasing order of
//! confidence (the cell itself, then cells one step away, then diagonal
//! steps). A candidate commits only when its full 3x3 window validates, so
//! two formations can never share a cell.

use bevy::prelude::*;

use crate::grid::{CellType, PadRole, WorldGrid};
use crate::SimulationSet;

// =============================================================================
// Directions
// =============================================================================

/// Cardinal grid directions. `CARDINAL` fixes the enumeration order the
/// candidate search depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

pub const CARDINAL: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

impl Direction {
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// The two directions on the other axis, in `CARDINAL` order.
    pub fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::North | Direction::South => [Direction::East, Direction::West],
            Direction::East | Direction::West => [Direction::North, Direction::South],
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// Fired once per newly placed pad cell; drives the formation scan.
#[derive(Event)]
pub struct PadCellPlaced {
    pub x: usize,
    pub y: usize,
}

/// Fired once per removed pad cell. Carries the role the cell held before
/// removal and any anchor entity that was stored on it.
#[derive(Event)]
pub struct PadCellRemoved {
    pub x: usize,
    pub y: usize,
    pub prior_role: PadRole,
    pub prior_anchor: Option<Entity>,
}

/// A complete 3x3 formation was detected and stamped.
#[derive(Event)]
pub struct PadAssembled {
    pub center_x: usize,
    pub center_y: usize,
    pub pad: Entity,
}

/// An assembled formation was torn down and its anchor destroyed.
#[derive(Event)]
pub struct PadBroken {
    pub center_x: usize,
    pub center_y: usize,
}

/// Feedback request for one cell cleared during teardown. Consumed by
/// whatever presentation layer sits on top of the simulation.
#[derive(Event)]
pub struct PadBreakEffect {
    pub x: usize,
    pub y: usize,
}

// =============================================================================
// Anchor component
// =============================================================================

/// Anchor entity for an assembled launch pad, owned by the center cell.
#[derive(Component, Debug)]
pub struct LaunchPad {
    pub grid_x: usize,
    pub grid_y: usize,
}

impl LaunchPad {
    /// World-space position of the pad's center cell.
    pub fn world_pos(&self) -> Vec2 {
        let (wx, wy) = WorldGrid::grid_to_world(self.grid_x, self.grid_y);
        Vec2::new(wx, wy)
    }
}

// =============================================================================
// Cell placement / removal
// =============================================================================

/// A pad cell can only go on flat regolith.
pub fn can_place_pad(grid: &WorldGrid, x: usize, y: usize) -> bool {
    grid.in_bounds(x, y) && grid.get(x, y).cell_type.is_buildable()
}

/// Place a single pad cell. Returns `false` if the target cell cannot accept
/// one (out of bounds, crater, or already a pad). The caller is expected to
/// send `PadCellPlaced` on success.
pub fn place_pad_cell(grid: &mut WorldGrid, x: usize, y: usize) -> bool {
    if !can_place_pad(grid, x, y) {
        return false;
    }
    let cell = grid.get_mut(x, y);
    cell.cell_type = CellType::Pad;
    cell.pad_role = PadRole::None;
    true
}

/// Remove a pad cell, reverting it to regolith. Returns the role the cell
/// held and any anchor entity stored on it, or `None` if the cell was not a
/// pad. The caller is expected to send `PadCellRemoved` on success.
pub fn remove_pad_cell(
    grid: &mut WorldGrid,
    x: usize,
    y: usize,
) -> Option<(PadRole, Option<Entity>)> {
    if !grid.in_bounds(x, y) {
        return None;
    }
    let cell = grid.get_mut(x, y);
    if cell.cell_type != CellType::Pad {
        return None;
    }
    let prior_role = cell.pad_role;
    let prior_anchor = cell.pad_entity.take();
    cell.cell_type = CellType::Regolith;
    cell.pad_role = PadRole::None;
    Some((prior_role, prior_anchor))
}

// =============================================================================
// Formation detection
// =============================================================================

/// A cell that can still join a formation: pad-kind, unassigned, anchor-less.
/// Out-of-bounds positions are never free.
pub fn cell_is_free(grid: &WorldGrid, x: i32, y: i32) -> bool {
    if x < 0 || y < 0 || !grid.in_bounds(x as usize, y as usize) {
        return false;
    }
    let cell = grid.get(x as usize, y as usize);
    cell.cell_type == CellType::Pad && cell.pad_role == PadRole::None && cell.pad_entity.is_none()
}

/// Count of free cardinal neighbors (0-4). An estimate of how much of a
/// formation might be completable around this cell; the full window check
/// still decides.
pub fn pad_connectivity(grid: &WorldGrid, x: usize, y: usize) -> u8 {
    let mut connections = 0;
    for dir in CARDINAL {
        let (dx, dy) = dir.offset();
        if cell_is_free(grid, x as i32 + dx, y as i32 + dy) {
            connections += 1;
        }
    }
    connections
}

/// All nine cells of the 3x3 window centered on `(cx, cy)` are free.
pub fn pad_window_is_free(grid: &WorldGrid, cx: i32, cy: i32) -> bool {
    for dy in -1..=1 {
        for dx in -1..=1 {
            if !cell_is_free(grid, cx + dx, cy + dy) {
                return false;
            }
        }
    }
    true
}

/// Locate the center of a completable formation around the newly placed cell
/// at `(x, y)`, if one exists.
///
/// Candidates are probed most-restrictive first. With all four cardinal
/// neighbors free the cell itself is the natural center; failing that (or
/// with fewer neighbors) the search reaches one step sideways, then one
/// diagonal step, degrading the connectivity requirement at each stage. The
/// first candidate whose full window validates wins.
pub fn find_pad_center(grid: &WorldGrid, x: usize, y: usize) -> Option<(usize, usize)> {
    let (sx, sy) = (x as i32, y as i32);
    let mut connections = pad_connectivity(grid, x, y);

    if connections == 4 {
        if pad_window_is_free(grid, sx, sy) {
            return Some((x, y));
        }
        // Cardinals free but a diagonal is not; the center may still be an
        // adjacent cell.
        connections = 3;
    }

    if connections == 3 {
        for d in CARDINAL {
            let (fx, fy) = d.offset();
            let (bx, by) = d.opposite().offset();
            if !cell_is_free(grid, sx + fx, sy + fy) || !cell_is_free(grid, sx + bx, sy + by) {
                continue;
            }
            // A free opposite pair means this cell sits on the middle row or
            // column; the center is one perpendicular step away.
            for dir in d.perpendicular() {
                let (px, py) = dir.offset();
                if pad_window_is_free(grid, sx + px, sy + py) {
                    return Some(((sx + px) as usize, (sy + py) as usize));
                }
            }
        }
        connections = 2;
    }

    if connections == 2 {
        // Corner member: the center is one perpendicular step plus one step
        // along a free direction, i.e. diagonally adjacent.
        for direction in CARDINAL {
            let (fx, fy) = direction.offset();
            if !cell_is_free(grid, sx + fx, sy + fy) {
                continue;
            }
            for dir in direction.perpendicular() {
                let (px, py) = dir.offset();
                if cell_is_free(grid, sx + px, sy + py)
                    && cell_is_free(grid, sx + px + fx, sy + py + fy)
                    && pad_window_is_free(grid, sx + px + fx, sy + py + fy)
                {
                    return Some(((sx + px + fx) as usize, (sy + py + fy) as usize));
                }
            }
        }
    }

    None
}

// =============================================================================
// Assembly / teardown
// =============================================================================

/// Stamp roles across the validated window centered on `(cx, cy)` and store
/// the anchor entity on the center cell. The window must have passed
/// `pad_window_is_free`; this function only commits, it does not re-check.
pub fn form_pad(grid: &mut WorldGrid, cx: usize, cy: usize, pad: Entity) {
    debug_assert!(pad_window_is_free(grid, cx as i32, cy as i32));
    for dy in -1..=1 {
        for dx in -1..=1 {
            let px = (cx as i32 + dx) as usize;
            let py = (cy as i32 + dy) as usize;
            grid.get_mut(px, py).pad_role = PadRole::for_offset(dx, dy);
        }
    }
    grid.get_mut(cx, cy).pad_entity = Some(pad);
}

/// Result of a formation teardown.
pub struct PadTeardown {
    /// Computed center position. Signed because a corrupted role can place
    /// it outside the grid; such cells are simply skipped.
    pub center: (i32, i32),
    /// Member cells whose roles were reset, in window order.
    pub cleared: Vec<(usize, usize)>,
    /// Anchor entity taken from the center cell, if it still held one.
    pub anchor: Option<Entity>,
}

/// Tear down the formation containing the cell at `(x, y)`, whose role
/// before removal was `prior_role`.
///
/// The center is recomputed from the role's encoded offset (`Center` and
/// `None` resolve to the cell's own position). Every pad cell in the window
/// with an assigned role is reset; cells already missing or reset are
/// skipped, so a second invocation is a no-op and a partially corrupted
/// window degrades to a partial clear rather than an error.
pub fn clear_pad_formation(
    grid: &mut WorldGrid,
    x: usize,
    y: usize,
    prior_role: PadRole,
) -> PadTeardown {
    let (dx, dy) = prior_role.offset();
    let cx = x as i32 - dx;
    let cy = y as i32 - dy;

    let mut cleared = Vec::new();
    for wy in -1..=1 {
        for wx in -1..=1 {
            let (px, py) = (cx + wx, cy + wy);
            if px < 0 || py < 0 || !grid.in_bounds(px as usize, py as usize) {
                continue;
            }
            let cell = grid.get_mut(px as usize, py as usize);
            if cell.cell_type == CellType::Pad && cell.pad_role.is_assigned() {
                cell.pad_role = PadRole::None;
                cleared.push((px as usize, py as usize));
            }
        }
    }

    let mut anchor = None;
    if cx >= 0 && cy >= 0 && grid.in_bounds(cx as usize, cy as usize) {
        anchor = grid.get_mut(cx as usize, cy as usize).pad_entity.take();
    }

    PadTeardown {
        center: (cx, cy),
        cleared,
        anchor,
    }
}

// =============================================================================
// Systems
// =============================================================================

/// Runs the formation scan for each placed cell and commits assembly when a
/// candidate center validates.
fn handle_pad_cell_placed(
    mut commands: Commands,
    mut grid: ResMut<WorldGrid>,
    mut events: EventReader<PadCellPlaced>,
    mut assembled: EventWriter<PadAssembled>,
) {
    for ev in events.read() {
        if !grid.in_bounds(ev.x, ev.y) {
            warn!("PadCellPlaced out of bounds at ({}, {})", ev.x, ev.y);
            continue;
        }
        // An earlier event this tick may have already pulled this cell into
        // a formation, or the cell may have been removed again.
        if !cell_is_free(&grid, ev.x as i32, ev.y as i32) {
            continue;
        }
        let Some((cx, cy)) = find_pad_center(&grid, ev.x, ev.y) else {
            continue;
        };
        let pad = commands
            .spawn(LaunchPad {
                grid_x: cx,
                grid_y: cy,
            })
            .id();
        form_pad(&mut grid, cx, cy, pad);
        info!(
            "launch pad assembled: center ({}, {}), triggered by ({}, {})",
            cx, cy, ev.x, ev.y
        );
        assembled.send(PadAssembled {
            center_x: cx,
            center_y: cy,
            pad,
        });
    }
}

/// Tears down the formation a removed cell belonged to and despawns its
/// anchor. Cells that never joined a formation need no teardown.
fn handle_pad_cell_removed(
    mut commands: Commands,
    mut grid: ResMut<WorldGrid>,
    mut events: EventReader<PadCellRemoved>,
    mut broken: EventWriter<PadBroken>,
    mut effects: EventWriter<PadBreakEffect>,
) {
    for ev in events.read() {
        if let Some(pad) = ev.prior_anchor {
            commands.entity(pad).despawn();
        }
        if !ev.prior_role.is_assigned() {
            continue;
        }

        let teardown = clear_pad_formation(&mut grid, ev.x, ev.y, ev.prior_role);
        if let Some(pad) = teardown.anchor {
            commands.entity(pad).despawn();
        }
        for &(x, y) in &teardown.cleared {
            effects.send(PadBreakEffect { x, y });
        }

        let (cx, cy) = teardown.center;
        let anchor_destroyed = ev.prior_anchor.is_some() || teardown.anchor.is_some();
        if anchor_destroyed && cx >= 0 && cy >= 0 && grid.in_bounds(cx as usize, cy as usize) {
            info!(
                "launch pad broken: center ({}, {}), {} member roles cleared",
                cx,
                cy,
                teardown.cleared.len()
            );
            broken.send(PadBroken {
                center_x: cx as usize,
                center_y: cy as usize,
            });
        } else if !teardown.cleared.is_empty() {
            warn!(
                "cleared {} pad roles around ({}, {}) but found no anchor",
                teardown.cleared.len(),
                cx,
                cy
            );
        }
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct LaunchPadPlugin;

impl Plugin for LaunchPadPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PadCellPlaced>()
            .add_event::<PadCellRemoved>()
            .add_event::<PadAssembled>()
            .add_event::<PadBroken>()
            .add_event::<PadBreakEffect>()
            .add_systems(
                FixedUpdate,
                (handle_pad_cell_placed, handle_pad_cell_removed)
                    .chain()
                    .in_set(SimulationSet::Simulation),
            );
    }
}

// =============================================================================
// Tests
// =============================================================================
