use crate::config::Config;
use crate::grid::GridMap;
use crate::ray::{CameraPose, DdaHit, RayRecord, ShotTrace, SIDE_X, SIDE_Y};
use std::f32::consts::PI;

/// Rays give up after this many world units
pub const MAX_RAY_DISTANCE: f32 = 20.0;

/// Default horizontal field of view (60 degrees)
pub const DEFAULT_FOV: f32 = PI / 3.0;

/// Step length of the hitscan wall march
pub const SHOT_STEP: f32 = 0.05;

/// Floor for the projection denominator
const MIN_PROJECTION_DISTANCE: f32 = 1e-4;

/// Screen-column raycaster
///
/// Produces one `RayRecord` per screen column each frame. The buffer is
/// frame-scoped: callers either take the fresh `Vec` from `cast_rays` or keep
/// one buffer alive and refill it with `cast_rays_into`.
#[derive(Debug, Clone)]
pub struct Raycaster {
    /// Number of screen columns (rays per frame)
    pub columns: usize,
    /// Height of the projection viewport in screen units
    pub viewport_height: f32,
    pub fov: f32,
    pub max_distance: f32,
}

impl Raycaster {
    pub fn new(columns: usize, viewport_height: f32) -> Self {
        Raycaster {
            columns,
            viewport_height,
            fov: DEFAULT_FOV,
            max_distance: MAX_RAY_DISTANCE,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Raycaster {
            columns: config.screen.columns,
            viewport_height: config.screen.viewport_height,
            fov: config.camera.fov,
            max_distance: config.raycaster.max_distance,
        }
    }

    /// Ray angle for a screen column: heading - fov/2 + (column / columns) * fov
    pub fn column_angle(&self, heading: f32, column: usize) -> f32 {
        heading - self.fov * 0.5 + (column as f32 / self.columns as f32) * self.fov
    }

    /// Cast one ray per screen column
    pub fn cast_rays(&self, map: &GridMap, camera: &CameraPose) -> Vec<RayRecord> {
        let mut buffer = Vec::with_capacity(self.columns);
        self.cast_rays_into(map, camera, &mut buffer);
        buffer
    }

    /// Refill `buffer` with this frame's rays, reusing its allocation
    pub fn cast_rays_into(&self, map: &GridMap, camera: &CameraPose, buffer: &mut Vec<RayRecord>) {
        buffer.clear();
        buffer.extend((0..self.columns).map(|column| {
            let ray_angle = self.column_angle(camera.heading, column);
            self.cast_single_ray(map, camera.x, camera.y, ray_angle, camera.heading, column)
        }));
    }

    /// DDA cast of a single ray with fisheye correction and wall projection
    pub fn cast_single_ray(
        &self,
        map: &GridMap,
        origin_x: f32,
        origin_y: f32,
        ray_angle: f32,
        heading: f32,
        column: usize,
    ) -> RayRecord {
        let dir_x = ray_angle.cos();
        let dir_y = ray_angle.sin();
        let trace = dda_trace(map, origin_x, origin_y, dir_x, dir_y, self.max_distance);

        let distance = if trace.hit {
            // Fisheye correction: project onto the camera forward axis
            (trace.raw_distance * (ray_angle - heading).cos()).max(0.0)
        } else {
            self.max_distance
        };

        let wall_height = self.viewport_height / distance.max(MIN_PROJECTION_DISTANCE);
        let wall_top = (self.viewport_height - wall_height) / 2.0;
        let wall_bottom = wall_top + wall_height;

        let (wall_variant, texture_x) = if trace.hit {
            (
                map.wall_variant(trace.map_x, trace.map_y),
                texture_coordinate(origin_x, origin_y, dir_x, dir_y, trace.raw_distance, trace.side),
            )
        } else {
            (0, 0.0)
        };

        RayRecord {
            distance,
            hit: trace.hit,
            wall_variant,
            side: trace.side,
            wall_top,
            wall_bottom,
            texture_x,
            column,
            ray_angle,
        }
    }
}

/// Walk the grid from (origin_x, origin_y) along (dir_x, dir_y) one cell boundary at a time.
///
/// The direction does not need to be normalized for the traversal itself, but
/// `raw_distance` is only a Euclidean distance when it is. A zero component
/// gets an infinite step distance so that axis is never stepped.
pub fn dda_trace(
    map: &GridMap,
    origin_x: f32,
    origin_y: f32,
    dir_x: f32,
    dir_y: f32,
    max_distance: f32,
) -> DdaHit {
    let (mut map_x, mut map_y) = map.world_to_grid(origin_x, origin_y);

    let delta_x = if dir_x == 0.0 { f32::INFINITY } else { (1.0 / dir_x).abs() };
    let delta_y = if dir_y == 0.0 { f32::INFINITY } else { (1.0 / dir_y).abs() };

    let step_x = if dir_x < 0.0 { -1 } else { 1 };
    let step_y = if dir_y < 0.0 { -1 } else { 1 };

    let mut side_dist_x = initial_side_distance(origin_x, dir_x, delta_x);
    let mut side_dist_y = initial_side_distance(origin_y, dir_y, delta_y);

    loop {
        // Distance at the boundary being crossed, i.e. the side distance before its increment
        let (raw_distance, side) = if side_dist_x < side_dist_y {
            let crossed = side_dist_x;
            side_dist_x += delta_x;
            map_x += step_x;
            (crossed, SIDE_X)
        } else {
            let crossed = side_dist_y;
            side_dist_y += delta_y;
            map_y += step_y;
            (crossed, SIDE_Y)
        };

        if raw_distance > max_distance || raw_distance.is_nan() {
            return DdaHit {
                raw_distance: max_distance,
                hit: false,
                map_x,
                map_y,
                side,
            };
        }

        if map.is_wall(map_x, map_y) {
            return DdaHit {
                raw_distance,
                hit: true,
                map_x,
                map_y,
                side,
            };
        }
    }
}

fn initial_side_distance(origin: f32, dir: f32, delta: f32) -> f32 {
    if delta.is_infinite() {
        return f32::INFINITY;
    }
    let cell_origin = origin.floor();
    if dir < 0.0 {
        (origin - cell_origin) * delta
    } else {
        (cell_origin + 1.0 - origin) * delta
    }
}

/// Position along the hit wall face in [0, 1).
/// Mirrored on faces seen from the "back" so a texture reads the same way on both sides.
pub fn texture_coordinate(
    origin_x: f32,
    origin_y: f32,
    dir_x: f32,
    dir_y: f32,
    raw_distance: f32,
    side: u8,
) -> f32 {
    let wall_x = if side == SIDE_X {
        origin_y + raw_distance * dir_y
    } else {
        origin_x + raw_distance * dir_x
    };
    let frac = wall_x - wall_x.floor();

    let mirrored = (side == SIDE_X && dir_x > 0.0) || (side == SIDE_Y && dir_y < 0.0);
    let coord = if mirrored { 1.0 - frac } else { frac };
    if coord >= 1.0 {
        0.0
    } else {
        coord
    }
}

/// Fixed-step march to the first solid cell, used for hitscan wall impacts
pub fn cast_ray_for_shooting(
    map: &GridMap,
    origin_x: f32,
    origin_y: f32,
    angle: f32,
    max_distance: f32,
) -> ShotTrace {
    let dir_x = angle.cos();
    let dir_y = angle.sin();
    let mut distance = 0.0;

    while distance < max_distance {
        let x = origin_x + dir_x * distance;
        let y = origin_y + dir_y * distance;
        if map.check_collision(x, y) {
            return ShotTrace {
                hit_wall: true,
                distance,
                x,
                y,
            };
        }
        distance += SHOT_STEP;
    }

    ShotTrace {
        hit_wall: false,
        distance: max_distance,
        x: origin_x + dir_x * max_distance,
        y: origin_y + dir_y * max_distance,
    }
}
