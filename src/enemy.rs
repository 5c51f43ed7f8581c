use crate::actor::{integrate_motion, Pose, Velocity};
use crate::config::EnemyConfig;
use crate::GridMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Enemy AI state. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    Idle,
    Chase,
    Attack,
    Dead,
}

/// A single enemy unit
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: usize,
    pub pose: Pose,
    pub velocity: Velocity,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub state: EnemyState,
    /// Seconds until the next attack may land
    pub attack_timer: f32,
    /// Seconds since death, drives pruning
    pub time_dead: f32,
}

/// What one enemy did during a tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnemyTick {
    /// Damage dealt to the player this tick
    pub damage: Option<f32>,
    /// State change as (from, to)
    pub transition: Option<(EnemyState, EnemyState)>,
}

/// State guard, first match wins:
/// 1. within attack range -> Attack (line of sight is not consulted)
/// 2. within detection range with clear line of sight -> Chase
/// 3. otherwise Idle
///
/// `line_of_sight` is only called when rule 2 needs it.
pub fn select_state<F>(distance: f32, line_of_sight: F, config: &EnemyConfig) -> EnemyState
where
    F: FnOnce() -> bool,
{
    if distance <= config.attack_range {
        EnemyState::Attack
    } else if distance <= config.detection_range && line_of_sight() {
        EnemyState::Chase
    } else {
        EnemyState::Idle
    }
}

impl Enemy {
    pub fn new(id: usize, x: f32, y: f32, config: &EnemyConfig) -> Self {
        Enemy {
            id,
            pose: Pose::new(x, y, 0.0),
            velocity: Velocity::default(),
            radius: config.radius,
            health: config.health,
            max_health: config.health,
            state: EnemyState::Idle,
            attack_timer: 0.0,
            time_dead: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state != EnemyState::Dead
    }

    /// Apply damage. Returns true when this hit killed the enemy.
    /// Damage to an already dead enemy is ignored.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.state = EnemyState::Dead;
            self.velocity = Velocity::default();
            self.time_dead = 0.0;
            return true;
        }
        false
    }

    /// Re-evaluate the state guard against the player position.
    /// Returns the transition if the state changed. Dead enemies never change.
    pub fn update_state(
        &mut self,
        map: &GridMap,
        player_x: f32,
        player_y: f32,
        config: &EnemyConfig,
    ) -> Option<(EnemyState, EnemyState)> {
        if !self.is_alive() {
            return None;
        }

        let distance = self.pose.distance_to(player_x, player_y);
        let (x, y) = (self.pose.x, self.pose.y);
        let next = select_state(
            distance,
            || map.has_line_of_sight(x, y, player_x, player_y),
            config,
        );

        if next == self.state {
            return None;
        }
        let previous = self.state;
        self.state = next;
        Some((previous, next))
    }

    /// One AI tick: state guard, per-state steering, then collision-resolved motion
    pub fn update<R: Rng>(
        &mut self,
        map: &GridMap,
        player_x: f32,
        player_y: f32,
        dt: f32,
        config: &EnemyConfig,
        rng: &mut R,
    ) -> EnemyTick {
        if !self.is_alive() {
            self.time_dead += dt;
            return EnemyTick::default();
        }

        let mut tick = EnemyTick {
            transition: self.update_state(map, player_x, player_y, config),
            ..EnemyTick::default()
        };

        self.attack_timer = (self.attack_timer - dt).max(0.0);

        match self.state {
            EnemyState::Idle => {
                self.velocity.scale(config.idle_damping);
                if rng.gen::<f32>() < config.wander_chance {
                    let angle = rng.gen_range(0.0..TAU);
                    let speed = rng.gen_range(0.0..=config.wander_speed);
                    self.velocity = Velocity::new(angle.cos() * speed, angle.sin() * speed);
                }
            }
            EnemyState::Chase => {
                let dx = player_x - self.pose.x;
                let dy = player_y - self.pose.y;
                let length = (dx * dx + dy * dy).sqrt();
                if length > 0.0 {
                    self.velocity = Velocity::new(
                        dx / length * config.chase_speed,
                        dy / length * config.chase_speed,
                    );
                }
            }
            EnemyState::Attack => {
                self.velocity.scale(config.attack_damping);
                if self.attack_timer <= 0.0 {
                    tick.damage = Some(config.attack_damage);
                    self.attack_timer = config.attack_cooldown;
                }
            }
            EnemyState::Dead => {}
        }

        match self.state {
            EnemyState::Chase | EnemyState::Attack => {
                let angle = (player_y - self.pose.y).atan2(player_x - self.pose.x);
                self.pose = Pose::new(self.pose.x, self.pose.y, angle);
            }
            _ => {
                if self.velocity.speed() > 0.05 {
                    let angle = self.velocity.vy.atan2(self.velocity.vx);
                    self.pose = Pose::new(self.pose.x, self.pose.y, angle);
                }
            }
        }

        integrate_motion(map, &mut self.pose, &mut self.velocity, self.radius, dt);
        tick
    }
}

/// Damage and transitions produced by one roster update
#[derive(Debug, Clone, Default)]
pub struct RosterTick {
    /// (enemy id, damage) for every attack that landed
    pub attacks: Vec<(usize, f32)>,
    /// (enemy id, from, to)
    pub transitions: Vec<(usize, EnemyState, EnemyState)>,
}

/// Owning collection of enemies
///
/// Dead enemies stay in storage (for corpses and hit bookkeeping) until
/// `prune_dead` removes them.
#[derive(Debug, Clone, Default)]
pub struct EnemyRoster {
    pub enemies: Vec<Enemy>,
    next_id: usize,
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enemy at (x, y), returning its id
    pub fn spawn(&mut self, x: f32, y: f32, config: &EnemyConfig) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.enemies.push(Enemy::new(id, x, y, config));
        id
    }

    /// Spawn `count` enemies at random free positions, preferring ones at least
    /// `config.min_spawn_distance` away from the player. Returns the spawned ids.
    pub fn spawn_random<R: Rng>(
        &mut self,
        map: &GridMap,
        count: usize,
        player_x: f32,
        player_y: f32,
        config: &EnemyConfig,
        rng: &mut R,
    ) -> Vec<usize> {
        const DISTANCE_RETRIES: u32 = 20;

        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let mut spot = map.find_random_spawn(config.radius, config.spawn_attempts, rng);
            for _ in 0..DISTANCE_RETRIES {
                let dx = spot.0 - player_x;
                let dy = spot.1 - player_y;
                if (dx * dx + dy * dy).sqrt() >= config.min_spawn_distance {
                    break;
                }
                spot = map.find_random_spawn(config.radius, config.spawn_attempts, rng);
            }
            let id = self.spawn(spot.0, spot.1, config);
            log::debug!("spawned enemy {} at ({:.2}, {:.2})", id, spot.0, spot.1);
            ids.push(id);
        }
        ids
    }

    /// Tick every enemy in storage order
    pub fn update<R: Rng>(
        &mut self,
        map: &GridMap,
        player_x: f32,
        player_y: f32,
        dt: f32,
        config: &EnemyConfig,
        rng: &mut R,
    ) -> RosterTick {
        let mut result = RosterTick::default();
        for enemy in &mut self.enemies {
            let tick = enemy.update(map, player_x, player_y, dt, config, rng);
            if let Some(damage) = tick.damage {
                result.attacks.push((enemy.id, damage));
            }
            if let Some((from, to)) = tick.transition {
                result.transitions.push((enemy.id, from, to));
            }
        }
        result
    }

    /// Remove enemies that have been dead for at least `corpse_time` seconds.
    /// Returns the removed ids.
    pub fn prune_dead(&mut self, corpse_time: f32) -> Vec<usize> {
        let mut removed = Vec::new();
        self.enemies.retain(|enemy| {
            let expired = !enemy.is_alive() && enemy.time_dead >= corpse_time;
            if expired {
                removed.push(enemy.id);
            }
            !expired
        });
        removed
    }

    pub fn get(&self, id: usize) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    pub fn live(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|enemy| enemy.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }
}
