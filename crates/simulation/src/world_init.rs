use bevy::prelude::*;
use rand::Rng;

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::grid::WorldGrid;
use crate::terrain::generate_terrain;

/// Marker resource that, when present, causes `init_world` to skip the moon
/// surface generation. Used by the test harness to start with a blank grid.
#[derive(Resource)]
pub struct SkipWorldInit;

pub fn init_world(mut commands: Commands, skip: Option<Res<SkipWorldInit>>) {
    if skip.is_some() {
        return;
    }
    let seed = rand::thread_rng().gen();
    let mut grid = WorldGrid::new(GRID_WIDTH, GRID_HEIGHT);
    generate_terrain(&mut grid, seed);
    info!(
        "generated {}x{} moon surface, seed {seed}",
        grid.width, grid.height
    );
    commands.insert_resource(grid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellType;

    #[test]
    fn test_init_world_populates_grid() {
        let mut app = App::new();
        app.add_systems(Startup, init_world);
        app.update();
        let grid = app.world().resource::<WorldGrid>();
        assert_eq!(grid.width, GRID_WIDTH);
        assert_eq!(grid.height, GRID_HEIGHT);
        assert!(
            grid.cells.iter().any(|c| c.cell_type == CellType::Crater),
            "generated surface should contain craters"
        );
    }

    #[test]
    fn test_skip_marker_leaves_world_untouched() {
        let mut app = App::new();
        app.insert_resource(SkipWorldInit);
        app.add_systems(Startup, init_world);
        app.update();
        assert!(app.world().get_resource::<WorldGrid>().is_none());
    }
}
