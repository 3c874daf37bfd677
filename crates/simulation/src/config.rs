pub const GRID_WIDTH: usize = 128;
pub const GRID_HEIGHT: usize = 128;
pub const CELL_SIZE: f32 = 16.0;
pub const CRATER_THRESHOLD: f32 = 0.3;
pub const TERRAIN_BASE_FREQUENCY: f32 = 0.012;
