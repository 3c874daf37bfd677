//! Compact, typed, serializable snapshot of the colony state.
//!
//! `ColonyObservation` captures the grid and every assembled launch pad
//! into a single struct, for logging and for external tooling that wants a
//! machine-readable view of the simulation.

use serde::{Deserialize, Serialize};

use crate::grid::{CellType, PadRole, WorldGrid};

// ---------------------------------------------------------------------------
// Top-level observation
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of the colony.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ColonyObservation {
    pub tick: u64,
    pub grid: GridSnapshot,
    pub pads: Vec<PadSnapshot>,
    pub invariant_violations: u32,
}

// ---------------------------------------------------------------------------
// Sub-snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub crater_cells: u32,
    pub pad_cells: u32,
    pub unassigned_pad_cells: u32,
}

/// One assembled formation, identified by its center cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PadSnapshot {
    pub center_x: usize,
    pub center_y: usize,
    pub has_anchor: bool,
}

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

/// Build an observation from the live grid.
pub fn observe_colony(grid: &WorldGrid, tick: u64, invariant_violations: u32) -> ColonyObservation {
    let mut snapshot = GridSnapshot {
        width: grid.width,
        height: grid.height,
        ..GridSnapshot::default()
    };
    let mut pads = Vec::new();

    for y in 0..grid.height {
        for x in 0..grid.width {
            let cell = grid.get(x, y);
            match cell.cell_type {
                CellType::Crater => snapshot.crater_cells += 1,
                CellType::Pad => {
                    snapshot.pad_cells += 1;
                    if cell.pad_role == PadRole::None {
                        snapshot.unassigned_pad_cells += 1;
                    } else if cell.pad_role == PadRole::Center {
                        pads.push(PadSnapshot {
                            center_x: x,
                            center_y: y,
                            has_anchor: cell.pad_entity.is_some(),
                        });
                    }
                }
                CellType::Regolith => {}
            }
        }
    }

    ColonyObservation {
        tick,
        grid: snapshot,
        pads,
        invariant_violations,
    }
}
