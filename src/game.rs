use crate::config::Config;
use crate::enemy::EnemyRoster;
use crate::events::{EventLog, GameEvent};
use crate::player::Player;
use crate::ray::{CameraPose, RayRecord};
use crate::raycast::Raycaster;
use crate::snapshot::{EnemyView, GameSnapshot, PlayerView, WeaponView};
use crate::weapon::{ShotResolution, Weapon};
use crate::GridMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Per-frame control input, already collapsed from device state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Forward/backward component of the movement vector
    pub forward: f32,
    /// Right/left component of the movement vector
    pub strafe: f32,
    pub run: bool,
    pub jump: bool,
    pub fire: bool,
    pub reload: bool,
    /// Horizontal look delta (turns the heading)
    pub look_dx: f32,
    /// Vertical look delta (moves the camera height)
    pub look_dy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    PlayerDead,
}

/// Frame driver: owns the world and runs the fixed update order
///
/// Update phase: player motion, weapon timers and fire, enemy update and
/// prune, then status checks. Render phase: `cast_rays`. The map is never
/// mutated after construction.
pub struct Game {
    pub map: GridMap,
    pub raycaster: Raycaster,
    pub player: Player,
    pub weapon: Weapon,
    pub enemies: EnemyRoster,
    pub events: EventLog,
    pub status: GameStatus,
    /// Game time in seconds
    pub clock: f32,
    config: Config,
    rng: StdRng,
}

impl Game {
    /// Build a game on `map`, seeding the RNG from the config
    pub fn new(config: Config, map: GridMap) -> Self {
        let rng = StdRng::seed_from_u64(config.level.seed);
        Self::with_rng(config, map, rng)
    }

    pub fn with_rng(config: Config, map: GridMap, rng: StdRng) -> Self {
        let mut game = Game {
            raycaster: Raycaster::from_config(&config),
            player: Player::new(&config.player),
            weapon: Weapon::new(&config.weapon),
            enemies: EnemyRoster::new(),
            events: EventLog::new(),
            status: GameStatus::Playing,
            clock: 0.0,
            map,
            config,
            rng,
        };
        game.spawn_enemies();
        game
    }

    fn spawn_enemies(&mut self) {
        let ids = self.enemies.spawn_random(
            &self.map,
            self.config.enemies.count,
            self.player.pose.x,
            self.player.pose.y,
            &self.config.enemies,
            &mut self.rng,
        );
        log::info!(
            "level ready: {}x{} map, {} enemies",
            self.map.width,
            self.map.height,
            ids.len()
        );
    }

    /// Reset player, weapon and enemies on the same map. The RNG keeps its state.
    pub fn restart(&mut self) {
        self.player = Player::new(&self.config.player);
        self.weapon = Weapon::new(&self.config.weapon);
        self.enemies.clear();
        self.events.clear();
        self.status = GameStatus::Playing;
        self.clock = 0.0;
        self.spawn_enemies();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn camera(&self) -> CameraPose {
        self.player.camera()
    }

    /// Run one update phase
    pub fn update(&mut self, input: &ControlInput, dt: f32) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.clock += dt;

        self.player.update(input, &self.map, dt);
        self.update_weapon(input, dt);
        self.update_enemies(dt);
        self.check_status();
    }

    fn update_weapon(&mut self, input: &ControlInput, dt: f32) {
        if self.weapon.update(dt) {
            self.events.log(self.clock, GameEvent::ReloadFinished);
        }
        if input.reload && self.weapon.start_reload() {
            self.events.log(self.clock, GameEvent::ReloadStarted);
        }
        if !input.fire {
            return;
        }

        let report = match self.weapon.fire(&self.map, &self.player.pose, &mut self.enemies.enemies) {
            Ok(report) => report,
            Err(rejection) => {
                log::trace!("fire rejected: {:?}", rejection);
                return;
            }
        };

        self.events.log(
            self.clock,
            GameEvent::ShotFired {
                ammo_left: report.ammo_left,
            },
        );
        match report.resolution {
            ShotResolution::Enemy(hit) => {
                let health_left = self.enemies.enemies[hit.index].health;
                self.events.log(
                    self.clock,
                    GameEvent::EnemyHit {
                        enemy_id: hit.enemy_id,
                        damage: report.damage,
                        health_left,
                    },
                );
                if report.killed {
                    log::info!("enemy {} killed at distance {:.2}", hit.enemy_id, hit.distance);
                    self.events.log(self.clock, GameEvent::EnemyKilled { enemy_id: hit.enemy_id });
                }
            }
            ShotResolution::Wall(trace) => {
                self.events.log(
                    self.clock,
                    GameEvent::WallHit {
                        hit: trace.hit_wall,
                        distance: trace.distance,
                        x: trace.x,
                        y: trace.y,
                    },
                );
            }
        }
    }

    fn update_enemies(&mut self, dt: f32) {
        let tick = self.enemies.update(
            &self.map,
            self.player.pose.x,
            self.player.pose.y,
            dt,
            &self.config.enemies,
            &mut self.rng,
        );

        for (enemy_id, from, to) in tick.transitions {
            if self.config.logging.trace_ai {
                log::debug!("enemy {}: {:?} -> {:?}", enemy_id, from, to);
            }
            self.events
                .log(self.clock, GameEvent::EnemyStateChanged { enemy_id, from, to });
        }

        for (enemy_id, amount) in tick.attacks {
            if !self.player.is_alive() {
                break;
            }
            self.player.take_damage(amount);
            self.events.log(
                self.clock,
                GameEvent::PlayerDamaged {
                    enemy_id,
                    amount,
                    health_left: self.player.health,
                },
            );
        }

        let pruned = self.enemies.prune_dead(self.config.enemies.corpse_time);
        if !pruned.is_empty() {
            self.events.log(self.clock, GameEvent::EnemiesPruned { ids: pruned });
        }
    }

    fn check_status(&mut self) {
        if !self.player.is_alive() {
            log::info!("player died at {:.2}s", self.clock);
            self.status = GameStatus::PlayerDead;
            self.events.log(self.clock, GameEvent::PlayerDied);
        }
    }

    /// Render phase: one ray per screen column from the current camera
    pub fn cast_rays(&self) -> Vec<RayRecord> {
        self.raycaster.cast_rays(&self.map, &self.camera())
    }

    pub fn cast_rays_into(&self, buffer: &mut Vec<RayRecord>) {
        self.raycaster.cast_rays_into(&self.map, &self.camera(), buffer);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            time: self.clock,
            status: self.status,
            player: PlayerView::from(&self.player),
            enemies: self.enemies.enemies.iter().map(EnemyView::from).collect(),
            weapon: WeaponView::from(&self.weapon),
        }
    }

    /// Map as text with the player (`P`) and live enemies (`E`) marked
    pub fn map_ascii(&self) -> String {
        let mut markers = vec![(self.player.pose.x, self.player.pose.y, 'P')];
        markers.extend(self.enemies.live().map(|enemy| (enemy.pose.x, enemy.pose.y, 'E')));
        self.map.to_ascii(&markers)
    }
}
