use crate::GridMap;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Position and heading of an entity in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    /// Heading in radians, kept in [0, 2π)
    pub angle: f32,
}

/// Velocity in world units per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

/// Which axes were blocked during one motion step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionOutcome {
    pub blocked_x: bool,
    pub blocked_y: bool,
}

impl Pose {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Pose {
            x,
            y,
            angle: normalize_angle(angle),
        }
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = x - self.x;
        let dy = y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Add `delta` radians to the heading, wrapping into [0, 2π)
    pub fn rotate(&mut self, delta: f32) {
        self.angle = normalize_angle(self.angle + delta);
    }
}

impl Velocity {
    pub fn new(vx: f32, vy: f32) -> Self {
        Velocity { vx, vy }
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    pub fn scale(&mut self, factor: f32) {
        self.vx *= factor;
        self.vy *= factor;
    }
}

/// Wrap an angle into [0, 2π)
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle difference into [-π, π]
pub fn angle_difference(a: f32, b: f32) -> f32 {
    let diff = normalize_angle(a - b);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}

/// Integrate one step of motion against the map, resolving X before Y.
///
/// Each axis is tried on its own with the square body of half-size `radius`.
/// A blocked axis has its velocity component zeroed and its position left
/// unchanged: there is no sliding along the wall and no bounce. Because X is
/// committed first, Y is tested from the already-updated X.
pub fn integrate_motion(
    map: &GridMap,
    pose: &mut Pose,
    velocity: &mut Velocity,
    radius: f32,
    dt: f32,
) -> MotionOutcome {
    let mut outcome = MotionOutcome::default();

    let candidate_x = pose.x + velocity.vx * dt;
    if !map.check_rect_collision(candidate_x, pose.y, radius) {
        pose.x = candidate_x;
    } else {
        velocity.vx = 0.0;
        outcome.blocked_x = true;
    }

    let candidate_y = pose.y + velocity.vy * dt;
    if !map.check_rect_collision(pose.x, candidate_y, radius) {
        pose.y = candidate_y;
    } else {
        velocity.vy = 0.0;
        outcome.blocked_y = true;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::open_arena;

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-4);
        let tiny = normalize_angle(-1e-9);
        assert!(tiny >= 0.0 && tiny < TAU);
    }

    #[test]
    fn test_angle_difference_wraps() {
        assert!((angle_difference(0.1, TAU - 0.1) - 0.2).abs() < 1e-5);
        assert!((angle_difference(TAU - 0.1, 0.1) + 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_free_motion() {
        let map = open_arena(12, 12);
        let mut pose = Pose::new(5.5, 5.5, 0.0);
        let mut velocity = Velocity::new(1.0, -0.5);
        let outcome = integrate_motion(&map, &mut pose, &mut velocity, 0.25, 1.0);
        assert_eq!(outcome, MotionOutcome::default());
        assert_eq!((pose.x, pose.y), (6.5, 5.0));
        assert_eq!(velocity, Velocity::new(1.0, -0.5));
    }

    #[test]
    fn test_blocked_axis_stops_without_slide() {
        let map = open_arena(12, 12);
        // Moving into the east border diagonally: X blocked, Y still moves
        let mut pose = Pose::new(10.6, 5.5, 0.0);
        let mut velocity = Velocity::new(2.0, 1.0);
        let outcome = integrate_motion(&map, &mut pose, &mut velocity, 0.25, 0.5);
        assert!(outcome.blocked_x);
        assert!(!outcome.blocked_y);
        assert_eq!(pose.x, 10.6);
        assert_eq!(pose.y, 6.0);
        assert_eq!(velocity.vx, 0.0);
        assert_eq!(velocity.vy, 1.0);
    }

    #[test]
    fn test_x_resolved_before_y() {
        let mut map = open_arena(12, 12);
        // Wall cell (7, 7) spans world [6,7) x [6,7)
        map.set_cell(7, 7, 2);
        // Diagonal step toward the wall's top-left corner
        let mut pose = Pose::new(5.5, 5.5, 0.0);
        let mut velocity = Velocity::new(0.6, 0.6);
        integrate_motion(&map, &mut pose, &mut velocity, 0.25, 1.0);
        // X alone (6.1, 5.5) is clear and committed; Y from there (6.1, 6.1) hits the wall
        assert!((pose.x - 6.1).abs() < 1e-5);
        assert_eq!(pose.y, 5.5);
        assert_eq!(velocity.vy, 0.0);
    }
}
