use crate::actor::angle_difference;
use crate::ray::{CameraPose, RayRecord};
use crate::raycast::Raycaster;

/// Billboards nearer than this to the camera plane are not drawn
pub const MIN_BILLBOARD_DEPTH: f32 = 0.1;

/// Screen-space placement of a camera-facing sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillboardProjection {
    /// Horizontal center in column units (may lie outside [0, columns))
    pub screen_x: f32,
    /// Distance along the camera forward axis, comparable with `RayRecord::distance`
    pub depth: f32,
    /// Projected height in viewport units of a sprite one world unit tall
    pub height: f32,
    /// Projected width in column units
    pub width: f32,
    pub top: f32,
    pub bottom: f32,
}

impl BillboardProjection {
    /// Column under the sprite center, if it is on screen
    pub fn center_column(&self, columns: usize) -> Option<usize> {
        if self.screen_x < 0.0 {
            return None;
        }
        let column = self.screen_x.floor() as usize;
        (column < columns).then_some(column)
    }

    /// Half-open column range covered by the sprite, clipped to the screen
    pub fn column_span(&self, columns: usize) -> (usize, usize) {
        let left = (self.screen_x - self.width / 2.0).floor().max(0.0) as usize;
        let right = (self.screen_x + self.width / 2.0).ceil().max(0.0) as usize;
        (left.min(columns), right.min(columns))
    }
}

/// Project an entity at (x, y) of world width `size` into screen space.
///
/// Columns use the same linear angle mapping as `Raycaster::column_angle`, so
/// a projection lines up with the ray buffer column by column. Returns `None`
/// for entities behind the camera, too close, or entirely off screen.
pub fn project_billboard(
    raycaster: &Raycaster,
    camera: &CameraPose,
    x: f32,
    y: f32,
    size: f32,
) -> Option<BillboardProjection> {
    let dx = x - camera.x;
    let dy = y - camera.y;
    let distance = (dx * dx + dy * dy).sqrt();
    let relative = angle_difference(dy.atan2(dx), camera.heading);
    let depth = distance * relative.cos();
    if depth < MIN_BILLBOARD_DEPTH {
        return None;
    }

    let columns = raycaster.columns as f32;
    let screen_x = (relative + raycaster.fov * 0.5) / raycaster.fov * columns;
    let angular_width = 2.0 * (size * 0.5).atan2(distance);
    let width = angular_width / raycaster.fov * columns;
    if screen_x + width / 2.0 < 0.0 || screen_x - width / 2.0 >= columns {
        return None;
    }

    let height = raycaster.viewport_height / depth;
    let top = (raycaster.viewport_height - height) / 2.0;
    Some(BillboardProjection {
        screen_x,
        depth,
        height,
        width,
        top,
        bottom: top + height,
    })
}

/// True when the wall at the sprite's center column is nearer than the sprite
pub fn is_occluded(rays: &[RayRecord], projection: &BillboardProjection) -> bool {
    match projection.center_column(rays.len()).and_then(|column| rays.get(column)) {
        Some(ray) => ray.hit && ray.distance < projection.depth,
        None => false,
    }
}

/// Columns of the sprite not hidden behind a nearer wall
pub fn visible_columns(rays: &[RayRecord], projection: &BillboardProjection) -> Vec<usize> {
    let (left, right) = projection.column_span(rays.len());
    (left..right)
        .filter(|&column| {
            let ray = &rays[column];
            !ray.hit || ray.distance >= projection.depth
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::open_arena;

    #[test]
    fn test_centered_projection() {
        let raycaster = Raycaster::new(100, 100.0);
        let camera = CameraPose::new(2.5, 5.5, 0.0);
        let projection = project_billboard(&raycaster, &camera, 6.5, 5.5, 0.6).unwrap();
        assert!((projection.screen_x - 50.0).abs() < 1e-3);
        assert!((projection.depth - 4.0).abs() < 1e-5);
        assert!((projection.height - 25.0).abs() < 1e-3);
        assert_eq!(projection.center_column(100), Some(50));
    }

    #[test]
    fn test_behind_camera_is_culled() {
        let raycaster = Raycaster::new(100, 100.0);
        let camera = CameraPose::new(5.5, 5.5, 0.0);
        assert!(project_billboard(&raycaster, &camera, 2.5, 5.5, 0.6).is_none());
    }

    #[test]
    fn test_wall_occludes_sprite() {
        let mut map = open_arena(16, 16);
        let raycaster = Raycaster::new(100, 100.0);
        let camera = CameraPose::new(2.5, 5.5, 0.0);

        let rays = raycaster.cast_rays(&map, &camera);
        let projection = project_billboard(&raycaster, &camera, 8.5, 5.5, 0.6).unwrap();
        assert!(!is_occluded(&rays, &projection));
        assert!(!visible_columns(&rays, &projection).is_empty());

        // Wall cell (6, 6) sits between camera and sprite
        map.set_cell(6, 6, 2);
        let rays = raycaster.cast_rays(&map, &camera);
        assert!(is_occluded(&rays, &projection));
        assert!(visible_columns(&rays, &projection).is_empty());
    }
}
