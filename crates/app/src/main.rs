//! Headless Moonport demo.
//!
//! Generates a moon surface, builds a 3x3 launch pad on a flat site, prints
//! ASCII maps and a JSON observation at each step, then removes one member
//! cell to show the formation tearing down.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use rand::Rng;

use simulation::ascii_map::{build_detail_map, build_overview_map};
use simulation::colony_observation::observe_colony;
use simulation::grid::WorldGrid;
use simulation::launch_pad::{
    can_place_pad, place_pad_cell, remove_pad_cell, LaunchPad, PadCellPlaced, PadCellRemoved,
};
use simulation::pad_invariants::PadInvariantViolations;
use simulation::{SimulationPlugin, SlowTickTimer, TickCounter};

fn main() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin::default())
        .add_plugins(SimulationPlugin);

    // First update runs Startup, which generates the moon surface.
    app.update();

    println!("=== Moon surface ===");
    println!("{}", build_overview_map(app.world().resource::<WorldGrid>()));

    let sites = find_pad_sites(app.world().resource::<WorldGrid>());
    if sites.is_empty() {
        eprintln!("no flat 3x3 site on this surface");
        return;
    }
    let (cx, cy) = sites[rand::thread_rng().gen_range(0..sites.len())];
    println!("\nbuilding a 3x3 pad around ({cx}, {cy})");

    // Drop the nine cells one at a time; the formation assembles on the last.
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            place_cell(
                &mut app,
                (cx as i32 + dx) as usize,
                (cy as i32 + dy) as usize,
            );
            tick(&mut app, 1);
        }
    }

    report_pads(&mut app);
    println!("\n=== Assembled formation ===");
    println!("{}", build_detail_map(app.world().resource::<WorldGrid>(), 2));
    print_observation(&app);

    // Knock out the northwest corner; the whole formation must come down.
    println!("\nremoving the corner cell at ({}, {})", cx - 1, cy - 1);
    remove_cell(&mut app, cx - 1, cy - 1);
    tick(&mut app, 1);

    println!("\n=== After teardown ===");
    println!("{}", build_detail_map(app.world().resource::<WorldGrid>(), 2));

    // Run a full slow cycle so the invariant sweep checks the final grid.
    tick(&mut app, SlowTickTimer::INTERVAL);
    print_observation(&app);
}

// ---------------------------------------------------------------------------
// World access helpers
// ---------------------------------------------------------------------------

/// Advance the simulation by `n` fixed ticks (100ms of virtual time each).
fn tick(app: &mut App, n: u32) {
    let dt = std::time::Duration::from_millis(100);
    for _ in 0..n {
        app.world_mut()
            .resource_mut::<Time<Virtual>>()
            .advance_by(dt);
        app.update();
    }
}

/// Every grid position whose full 3x3 window is flat regolith.
fn find_pad_sites(grid: &WorldGrid) -> Vec<(usize, usize)> {
    let mut sites = Vec::new();
    for cy in 1..grid.height - 1 {
        for cx in 1..grid.width - 1 {
            let clear = (-1i32..=1).all(|dy| {
                (-1i32..=1).all(|dx| {
                    can_place_pad(grid, (cx as i32 + dx) as usize, (cy as i32 + dy) as usize)
                })
            });
            if clear {
                sites.push((cx, cy));
            }
        }
    }
    sites
}

/// Place a pad cell and queue the placement notification, exactly as a build
/// action layer would.
fn place_cell(app: &mut App, x: usize, y: usize) {
    let world = app.world_mut();
    let placed = {
        let mut grid = world.resource_mut::<WorldGrid>();
        place_pad_cell(&mut grid, x, y)
    };
    if placed {
        world.send_event(PadCellPlaced { x, y });
    }
}

/// Remove a pad cell and queue the removal notification carrying the role and
/// anchor the cell held.
fn remove_cell(app: &mut App, x: usize, y: usize) {
    let world = app.world_mut();
    let removed = {
        let mut grid = world.resource_mut::<WorldGrid>();
        remove_pad_cell(&mut grid, x, y)
    };
    if let Some((prior_role, prior_anchor)) = removed {
        world.send_event(PadCellRemoved {
            x,
            y,
            prior_role,
            prior_anchor,
        });
    }
}

/// Print every live pad anchor with its grid and world position.
fn report_pads(app: &mut App) {
    let world = app.world_mut();
    let mut pads = world.query::<&LaunchPad>();
    for pad in pads.iter(world) {
        let pos = pad.world_pos();
        println!(
            "pad anchored at grid ({}, {}), world ({:.1}, {:.1})",
            pad.grid_x, pad.grid_y, pos.x, pos.y
        );
    }
}

/// Serialize the current colony observation to JSON and print it.
fn print_observation(app: &App) {
    let tick = app.world().resource::<TickCounter>().0;
    let violations = app.world().resource::<PadInvariantViolations>().total();
    let obs = observe_colony(app.world().resource::<WorldGrid>(), tick, violations);
    match serde_json::to_string_pretty(&obs) {
        Ok(json) => println!("\nobservation: {json}"),
        Err(e) => eprintln!("observation serialization failed: {e}"),
    }
}
