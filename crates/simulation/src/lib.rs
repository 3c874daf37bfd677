use bevy::prelude::*;

pub mod ascii_map;
pub mod colony_observation;
pub mod config;
pub mod grid;
pub mod launch_pad;
pub mod pad_invariants;
pub mod simulation_sets;
pub mod terrain;
pub mod world_init;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use simulation_sets::SimulationSet;

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Global tick counter incremented each FixedUpdate, used for throttling
/// simulation systems and stamping observations.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

/// Shared throttle timer for grid-wide maintenance systems that don't need to
/// run every tick. The formation invariant sweep only runs every N ticks.
#[derive(Resource, Default)]
pub struct SlowTickTimer {
    pub counter: u32,
}

impl SlowTickTimer {
    pub const INTERVAL: u32 = 100; // run slow systems every 100 ticks (~10 seconds at 10Hz)

    pub fn tick(&mut self) {
        self.counter += 1;
    }

    pub fn should_run(&self) -> bool {
        self.counter.is_multiple_of(Self::INTERVAL)
    }
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::PreSim,
                SimulationSet::Simulation,
                SimulationSet::PostSim,
            )
                .chain(),
        );

        // 10 Hz fixed timestep; one simulation tick every 100ms.
        app.insert_resource(Time::<Fixed>::from_hz(10.0));

        // Core resources and systems that don't belong to any feature
        app.init_resource::<TickCounter>()
            .init_resource::<SlowTickTimer>()
            .add_systems(Startup, world_init::init_world)
            .add_systems(FixedUpdate, tick_slow_timer.in_set(SimulationSet::PreSim));

        app.add_plugins((
            launch_pad::LaunchPadPlugin,
            pad_invariants::PadInvariantsPlugin,
            ascii_map::AsciiMapPlugin,
        ));
    }
}

pub fn tick_slow_timer(mut timer: ResMut<SlowTickTimer>, mut tick: ResMut<TickCounter>) {
    timer.tick();
    tick.0 = tick.0.wrapping_add(1);
}
