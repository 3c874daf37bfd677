//! # TestColony: headless integration test harness for Moonport
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `SimulationPlugin`
//! for running integration tests without a window or renderer.

use bevy::app::App;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::grid::{Cell, CellType, PadRole, WorldGrid};
use crate::launch_pad::{
    place_pad_cell, remove_pad_cell, LaunchPad, PadCellPlaced, PadCellRemoved,
};
use crate::pad_invariants::PadInvariantViolations;
use crate::world_init::SkipWorldInit;
use crate::SimulationPlugin;
use crate::SlowTickTimer;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Use builder methods to set up colony state, then call `tick()` to advance
/// the simulation and query/assert on the resulting ECS state.
pub struct TestColony {
    app: App,
}

impl TestColony {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new **empty** colony: a 128x128 regolith grid with all
    /// resources at their defaults. No terrain is generated.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(
            std::time::Duration::from_millis(100),
        ));

        // Insert the marker BEFORE SimulationPlugin so init_world skips.
        app.insert_resource(SkipWorldInit);
        app.add_plugins(SimulationPlugin);

        // Insert a blank grid BEFORE the first update, so that systems which
        // depend on Res<WorldGrid> don't panic.
        app.insert_resource(WorldGrid::new(GRID_WIDTH, GRID_HEIGHT));

        // Run one update so Startup systems execute (init_world will no-op).
        app.update();

        Self { app }
    }

    /// Create a colony with the full randomly-seeded moon surface.
    pub fn with_generated_terrain() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(
            std::time::Duration::from_millis(100),
        ));
        app.add_plugins(SimulationPlugin);
        // Run one update so Startup systems execute (init_world runs fully).
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // World setup (builder pattern, consumes and returns Self)
    // -----------------------------------------------------------------------

    /// Place a single pad cell and queue its placement notification.
    /// The detection pass runs on the next `tick()`.
    pub fn with_pad_cell(mut self, x: usize, y: usize) -> Self {
        self.place(x, y);
        self
    }

    /// Place a full 3x3 block of pad cells centered on `(cx, cy)`.
    /// The detection pass runs on the next `tick()`.
    pub fn with_pad_footprint(mut self, cx: usize, cy: usize) -> Self {
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                self.place((cx as i32 + dx) as usize, (cy as i32 + dy) as usize);
            }
        }
        self
    }

    /// Turn a single cell into a crater.
    pub fn with_crater(mut self, x: usize, y: usize) -> Self {
        if let Some(mut grid) = self.app.world_mut().get_resource_mut::<WorldGrid>() {
            if grid.in_bounds(x, y) {
                grid.get_mut(x, y).cell_type = CellType::Crater;
            }
        }
        self
    }

    // -----------------------------------------------------------------------
    // Mid-test mutations
    // -----------------------------------------------------------------------

    /// Place a pad cell and queue the placement notification, exactly as the
    /// build action layer would. Returns false if the ground refuses it.
    pub fn place(&mut self, x: usize, y: usize) -> bool {
        let world = self.app.world_mut();
        let placed = {
            let mut grid = world.resource_mut::<WorldGrid>();
            place_pad_cell(&mut grid, x, y)
        };
        if placed {
            world.send_event(PadCellPlaced { x, y });
        }
        placed
    }

    /// Remove a pad cell and queue the removal notification carrying the role
    /// and anchor the cell held. Returns false if the cell held no pad.
    pub fn remove(&mut self, x: usize, y: usize) -> bool {
        let world = self.app.world_mut();
        let removed = {
            let mut grid = world.resource_mut::<WorldGrid>();
            remove_pad_cell(&mut grid, x, y)
        };
        match removed {
            Some((prior_role, prior_anchor)) => {
                world.send_event(PadCellRemoved {
                    x,
                    y,
                    prior_role,
                    prior_anchor,
                });
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks.
    ///
    /// The simulation runs at 10 Hz (100ms per tick). Each call advances
    /// virtual time by 100ms and calls `app.update()`, which triggers the
    /// `FixedUpdate` schedule.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Run until the SlowTickTimer fires at least once (~100 ticks).
    pub fn tick_slow_cycle(&mut self) {
        self.tick(SlowTickTimer::INTERVAL);
    }

    // -----------------------------------------------------------------------
    // Queries (note: Bevy's World::query() requires &mut World)
    // -----------------------------------------------------------------------

    /// Access the ECS world mutably (needed for queries in Bevy).
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Get a reference to the world grid.
    pub fn grid(&self) -> &WorldGrid {
        self.app.world().resource::<WorldGrid>()
    }

    /// Get a reference to a specific cell.
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        self.grid().get(x, y)
    }

    /// Get a reference to any resource.
    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    /// Get the slow tick timer.
    pub fn slow_tick_timer(&self) -> &SlowTickTimer {
        self.app.world().resource::<SlowTickTimer>()
    }

    /// Count all launch pad anchor entities.
    pub fn pad_count(&mut self) -> usize {
        let world = self.app.world_mut();
        world
            .query_filtered::<Entity, With<LaunchPad>>()
            .iter(world)
            .count()
    }

    /// Count pad cells in the grid, assigned or not.
    pub fn pad_cell_count(&self) -> usize {
        let grid = self.grid();
        grid.cells
            .iter()
            .filter(|c| c.cell_type == CellType::Pad)
            .count()
    }

    /// Count cells holding an assigned formation role.
    pub fn assigned_cell_count(&self) -> usize {
        let grid = self.grid();
        grid.cells
            .iter()
            .filter(|c| c.pad_role.is_assigned())
            .count()
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Assert that a cell holds the expected formation role.
    pub fn assert_role(&self, x: usize, y: usize, expected: PadRole) {
        let actual = self.cell(x, y).pad_role;
        assert_eq!(
            actual, expected,
            "Expected role {expected:?} at ({x}, {y}), found {actual:?}"
        );
    }

    /// Assert the 3x3 window around `(cx, cy)` carries a full set of
    /// formation roles matching each cell's offset from the center.
    pub fn assert_window_roles(&self, cx: usize, cy: usize) {
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let (x, y) = ((cx as i32 + dx) as usize, (cy as i32 + dy) as usize);
                self.assert_role(x, y, PadRole::for_offset(dx, dy));
            }
        }
    }

    /// Assert no cell in the 3x3 window around `(cx, cy)` holds a role.
    pub fn assert_window_unassigned(&self, cx: usize, cy: usize) {
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let (x, y) = ((cx as i32 + dx) as usize, (cy as i32 + dy) as usize);
                self.assert_role(x, y, PadRole::None);
            }
        }
    }

    /// Assert that `(cx, cy)` is an assembled center: center role, an anchor
    /// entity in the cell, and a `LaunchPad` component pointing back at it.
    pub fn assert_anchored(&self, cx: usize, cy: usize) {
        let cell = self.cell(cx, cy);
        assert_eq!(
            cell.pad_role,
            PadRole::Center,
            "Expected center role at ({cx}, {cy}), found {:?}",
            cell.pad_role
        );
        let anchor = cell.pad_entity.unwrap_or(Entity::PLACEHOLDER);
        assert_ne!(
            anchor,
            Entity::PLACEHOLDER,
            "Expected an anchor entity at ({cx}, {cy}), found none"
        );
        match self.app.world().get::<LaunchPad>(anchor) {
            Some(pad) => assert_eq!(
                (pad.grid_x, pad.grid_y),
                (cx, cy),
                "Anchor at ({cx}, {cy}) holds a pad entity registered for ({}, {})",
                pad.grid_x,
                pad.grid_y
            ),
            None => panic!("Anchor entity {anchor:?} at ({cx}, {cy}) has no LaunchPad component"),
        }
    }

    /// Assert the number of launch pad anchor entities in the world.
    pub fn assert_pad_count(&mut self, expected: usize) {
        let count = self.pad_count();
        assert_eq!(
            count, expected,
            "Expected {expected} launch pad entities, found {count}"
        );
    }

    /// Assert the last invariant sweep found nothing wrong.
    /// Only meaningful after `tick_slow_cycle()`.
    pub fn assert_clean_invariants(&self) {
        let violations = self.resource::<PadInvariantViolations>();
        assert_eq!(
            violations.total(),
            0,
            "Expected a clean invariant sweep, found {violations:?}"
        );
    }

    /// Assert the slow tick timer has reached at least the given count.
    pub fn assert_ticks_at_least(&self, min: u32) {
        let counter = self.slow_tick_timer().counter;
        assert!(
            counter >= min,
            "Expected at least {min} ticks, got {counter}"
        );
    }

    /// Assert a resource has been initialized (exists in the world).
    pub fn assert_resource_exists<T: Resource>(&self) {
        assert!(
            self.app.world().get_resource::<T>().is_some(),
            "Expected resource {} to exist",
            std::any::type_name::<T>()
        );
    }
}
