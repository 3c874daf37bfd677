use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::config::{CRATER_THRESHOLD, TERRAIN_BASE_FREQUENCY};
use crate::grid::{CellType, WorldGrid};

pub fn generate_terrain(grid: &mut WorldGrid, seed: i32) {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(TERRAIN_BASE_FREQUENCY));

    for y in 0..grid.height {
        for x in 0..grid.width {
            let raw = noise.get_noise_2d(x as f32, y as f32);
            let elevation = (raw + 1.0) * 0.5; // normalize to 0..1
            let cell = grid.get_mut(x, y);
            cell.elevation = elevation;
            if elevation < CRATER_THRESHOLD {
                cell.cell_type = CellType::Crater;
            }
        }
    }
}
