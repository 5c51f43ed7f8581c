use crate::actor::{integrate_motion, MotionOutcome, Pose, Velocity};
use crate::config::PlayerConfig;
use crate::game::ControlInput;
use crate::ray::CameraPose;
use crate::GridMap;

/// Camera height bounds
pub const MIN_HEIGHT: f32 = 0.5;
pub const MAX_HEIGHT: f32 = 2.5;

/// The player: camera pose, collision body, height channel and health
#[derive(Debug, Clone)]
pub struct Player {
    pub pose: Pose,
    pub velocity: Velocity,
    pub radius: f32,
    /// Current camera height (bob/crouch/jump)
    pub height: f32,
    /// Mouse-driven height the camera rests at when grounded; also the landing floor
    pub look_height: f32,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub health: f32,
    pub max_health: f32,
    settings: PlayerConfig,
}

impl Player {
    pub fn new(settings: &PlayerConfig) -> Self {
        let height = settings.default_height.clamp(MIN_HEIGHT, MAX_HEIGHT);
        Player {
            pose: Pose::new(settings.start_x, settings.start_y, settings.start_heading),
            velocity: Velocity::default(),
            radius: settings.radius,
            height,
            look_height: height,
            vertical_velocity: 0.0,
            grounded: true,
            health: settings.max_health,
            max_health: settings.max_health,
            settings: settings.clone(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn camera(&self) -> CameraPose {
        CameraPose::new(self.pose.x, self.pose.y, self.pose.angle)
    }

    /// Apply one frame of input: look, planar motion against the map, then the height channel
    pub fn update(&mut self, input: &ControlInput, map: &GridMap, dt: f32) -> MotionOutcome {
        self.look(input.look_dx, input.look_dy);
        self.velocity = self.desired_velocity(input);
        let outcome = integrate_motion(map, &mut self.pose, &mut self.velocity, self.radius, dt);
        self.update_height(input.jump, dt);
        outcome
    }

    /// Turn by a horizontal look delta and move the resting height by a vertical one
    pub fn look(&mut self, look_dx: f32, look_dy: f32) {
        self.pose.rotate(look_dx * self.settings.mouse_sensitivity);
        self.look_height = (self.look_height - look_dy * self.settings.height_sensitivity)
            .clamp(MIN_HEIGHT, MAX_HEIGHT);
    }

    /// World-space velocity for the movement input (forward/strafe relative to the heading)
    pub fn desired_velocity(&self, input: &ControlInput) -> Velocity {
        let mut forward = input.forward;
        let mut strafe = input.strafe;
        let length = (forward * forward + strafe * strafe).sqrt();
        if length == 0.0 {
            return Velocity::default();
        }
        forward /= length;
        strafe /= length;

        let speed = if input.run {
            self.settings.walk_speed * self.settings.run_multiplier
        } else {
            self.settings.walk_speed
        };

        let (sin, cos) = self.pose.angle.sin_cos();
        Velocity::new(
            (forward * cos - strafe * sin) * speed,
            (forward * sin + strafe * cos) * speed,
        )
    }

    /// Ballistic jump while airborne, direct tracking of `look_height` while grounded
    pub fn update_height(&mut self, jump: bool, dt: f32) {
        if self.grounded && jump {
            self.grounded = false;
            self.vertical_velocity = self.settings.jump_speed;
        }

        if self.grounded {
            self.height = self.look_height;
            return;
        }

        self.vertical_velocity -= self.settings.gravity * dt;
        self.height += self.vertical_velocity * dt;

        if self.height >= MAX_HEIGHT {
            self.height = MAX_HEIGHT;
            self.vertical_velocity = self.vertical_velocity.min(0.0);
        }
        if self.height <= self.look_height && self.vertical_velocity <= 0.0 {
            self.height = self.look_height;
            self.vertical_velocity = 0.0;
            self.grounded = true;
        }
    }

    /// Returns true when this damage killed the player
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        !self.is_alive()
    }
}
