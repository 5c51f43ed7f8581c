use serde::{Deserialize, Serialize};

/// Side value for hits on a vertical grid line (x boundary crossed)
pub const SIDE_X: u8 = 0;
/// Side value for hits on a horizontal grid line (y boundary crossed)
pub const SIDE_Y: u8 = 1;

/// Camera pose supplied once per frame to the raycaster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub x: f32,
    pub y: f32,
    /// Heading in radians
    pub heading: f32,
}

impl CameraPose {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        CameraPose { x, y, heading }
    }
}

/// One screen column of the per-frame ray buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayRecord {
    /// Fisheye-corrected distance to the wall (never negative)
    pub distance: f32,
    pub hit: bool,
    /// Cell code of the wall that was hit, 0 when nothing was hit
    pub wall_variant: i32,
    /// `SIDE_X` or `SIDE_Y`
    pub side: u8,
    pub wall_top: f32,
    pub wall_bottom: f32,
    /// Position along the wall face in [0, 1). Carried for a textured renderer; nothing samples it yet.
    pub texture_x: f32,
    pub column: usize,
    /// Unnormalized ray angle (heading - fov/2 + column offset)
    pub ray_angle: f32,
}

impl RayRecord {
    pub fn wall_height(&self) -> f32 {
        self.wall_bottom - self.wall_top
    }
}

/// Raw result of a DDA grid traversal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DdaHit {
    /// Euclidean distance along the ray (not fisheye corrected)
    pub raw_distance: f32,
    pub hit: bool,
    pub map_x: i32,
    pub map_y: i32,
    pub side: u8,
}

/// Result of the fixed-step march used by hitscan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotTrace {
    pub hit_wall: bool,
    pub distance: f32,
    pub x: f32,
    pub y: f32,
}
