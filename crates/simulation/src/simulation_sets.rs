//! Deterministic simulation ordering via `SystemSet` phases.
//!
//! These sets establish a contract for system execution order within the
//! `FixedUpdate` schedule.  Plugins place their systems into the appropriate
//! set so that inter-plugin ordering is explicit and testable rather than
//! relying on implicit timing assumptions.
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Tick counters and other per-tick state the core simulation
//!   reads.
//! * **Simulation** – The game logic proper: pad cell placement and removal,
//!   formation assembly and teardown.
//! * **PostSim** – Aggregation and reporting: invariant sweeps, counters.
//!   These only *read* simulation state, so downstream consumers can safely
//!   use their output on the next tick.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain: `PreSim` → `Simulation` → `PostSim`.
/// Individual plugins use `.in_set(SimulationSet::X)` when registering their
/// systems, which gives them automatic ordering relative to other phases
/// while retaining the ability to add fine-grained `.after()` / `.before()`
/// constraints within the same phase.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Pre-simulation setup: tick counters, slow-tick timer.
    PreSim,
    /// Core simulation: pad placement/removal events, assembly, teardown.
    Simulation,
    /// Post-simulation aggregation: invariant sweeps, reporting.
    PostSim,
}
