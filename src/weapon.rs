use crate::actor::{angle_difference, Pose};
use crate::config::WeaponConfig;
use crate::enemy::Enemy;
use crate::ray::ShotTrace;
use crate::raycast::cast_ray_for_shooting;
use crate::GridMap;
use serde::{Deserialize, Serialize};

/// Why a fire attempt did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireRejection {
    NoAmmo,
    CoolingDown,
    Reloading,
}

/// Enemy selected by hit resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyHit {
    /// Index into the slice passed to `resolve_shot`
    pub index: usize,
    pub enemy_id: usize,
    pub distance: f32,
}

/// Where a shot ended up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotResolution {
    Enemy(EnemyHit),
    /// No enemy hit; the trace says whether a wall was reached within range
    Wall(ShotTrace),
}

/// Outcome of a shot that was actually fired
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotReport {
    pub resolution: ShotResolution,
    pub damage: f32,
    pub killed: bool,
    pub ammo_left: u32,
}

/// Hitscan weapon with ammo, fire cooldown and reload timer
#[derive(Debug, Clone)]
pub struct Weapon {
    pub ammo: u32,
    pub max_ammo: u32,
    /// Seconds until the next shot is allowed
    pub cooldown: f32,
    pub reloading: bool,
    /// Seconds spent in the current reload
    pub reload_progress: f32,
    /// Presentation timers, seconds remaining
    pub recoil: f32,
    pub muzzle_flash: f32,
    settings: WeaponConfig,
}

/// Pick the enemy a shot from (origin_x, origin_y) along `angle` hits.
///
/// Candidates are live enemies within `max_range` whose bearing is within
/// `cone_half_width` of the aim and whose straight path is unobstructed. The
/// nearest candidate wins. Without a candidate a separate march finds the wall
/// impact.
pub fn resolve_shot(
    map: &GridMap,
    origin_x: f32,
    origin_y: f32,
    angle: f32,
    enemies: &[Enemy],
    max_range: f32,
    cone_half_width: f32,
) -> ShotResolution {
    let mut best: Option<EnemyHit> = None;

    for (index, enemy) in enemies.iter().enumerate() {
        if !enemy.is_alive() {
            continue;
        }
        let dx = enemy.pose.x - origin_x;
        let dy = enemy.pose.y - origin_y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > max_range {
            continue;
        }

        let bearing = dy.atan2(dx);
        if angle_difference(bearing, angle).abs() > cone_half_width {
            continue;
        }
        if best.is_some_and(|hit| hit.distance <= distance) {
            continue;
        }
        if !map.has_line_of_sight(origin_x, origin_y, enemy.pose.x, enemy.pose.y) {
            continue;
        }

        best = Some(EnemyHit {
            index,
            enemy_id: enemy.id,
            distance,
        });
    }

    match best {
        Some(hit) => ShotResolution::Enemy(hit),
        None => ShotResolution::Wall(cast_ray_for_shooting(map, origin_x, origin_y, angle, max_range)),
    }
}

impl Weapon {
    pub fn new(settings: &WeaponConfig) -> Self {
        Weapon {
            ammo: settings.max_ammo,
            max_ammo: settings.max_ammo,
            cooldown: 0.0,
            reloading: false,
            reload_progress: 0.0,
            recoil: 0.0,
            muzzle_flash: 0.0,
            settings: settings.clone(),
        }
    }

    /// Fire gate: ammo left, cooldown elapsed, not reloading
    pub fn check_fire(&self) -> Result<(), FireRejection> {
        if self.reloading {
            Err(FireRejection::Reloading)
        } else if self.ammo == 0 {
            Err(FireRejection::NoAmmo)
        } else if self.cooldown > 0.0 {
            Err(FireRejection::CoolingDown)
        } else {
            Ok(())
        }
    }

    pub fn can_fire(&self) -> bool {
        self.check_fire().is_ok()
    }

    /// Advance timers. Returns true on the frame a reload completes.
    pub fn update(&mut self, dt: f32) -> bool {
        self.cooldown = (self.cooldown - dt).max(0.0);
        self.recoil = (self.recoil - dt).max(0.0);
        self.muzzle_flash = (self.muzzle_flash - dt).max(0.0);

        if !self.reloading {
            return false;
        }
        self.reload_progress += dt;
        if self.reload_progress >= self.settings.reload_time {
            self.ammo = self.max_ammo;
            self.reloading = false;
            self.reload_progress = 0.0;
            return true;
        }
        false
    }

    /// Begin a reload. Refused while already reloading or with a full magazine.
    pub fn start_reload(&mut self) -> bool {
        if self.reloading || self.ammo >= self.max_ammo {
            return false;
        }
        self.reloading = true;
        self.reload_progress = 0.0;
        true
    }

    /// Reload completion in [0, 1]
    pub fn reload_fraction(&self) -> f32 {
        if !self.reloading || self.settings.reload_time <= 0.0 {
            return 0.0;
        }
        (self.reload_progress / self.settings.reload_time).min(1.0)
    }

    /// Fire from `origin` along its heading, damaging the nearest enemy in the hit cone.
    /// A rejected attempt changes nothing.
    pub fn fire(
        &mut self,
        map: &GridMap,
        origin: &Pose,
        enemies: &mut [Enemy],
    ) -> Result<ShotReport, FireRejection> {
        self.check_fire()?;

        self.ammo -= 1;
        self.cooldown = self.settings.fire_cooldown;
        self.recoil = self.settings.recoil_time;
        self.muzzle_flash = self.settings.flash_time;

        let resolution = resolve_shot(
            map,
            origin.x,
            origin.y,
            origin.angle,
            enemies,
            self.settings.max_range,
            self.settings.cone_half_width,
        );

        let (damage, killed) = match resolution {
            ShotResolution::Enemy(hit) => {
                let killed = enemies[hit.index].take_damage(self.settings.damage);
                (self.settings.damage, killed)
            }
            ShotResolution::Wall(_) => (0.0, false),
        };

        Ok(ShotReport {
            resolution,
            damage,
            killed,
            ammo_left: self.ammo,
        })
    }
}
