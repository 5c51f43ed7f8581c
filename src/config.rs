use serde::Deserialize;
use std::f32::consts::PI;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub raycaster: RaycasterConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub enemies: EnemyConfig,
    #[serde(default)]
    pub weapon: WeaponConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub level: LevelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenConfig {
    /// Rays cast per frame
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    #[serde(default = "default_window_title")]
    pub window_title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    /// Horizontal field of view in radians
    #[serde(default = "default_fov")]
    pub fov: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaycasterConfig {
    #[serde(default = "default_max_ray_distance")]
    pub max_distance: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_x")]
    pub start_x: f32,
    #[serde(default = "default_player_y")]
    pub start_y: f32,
    #[serde(default)]
    pub start_heading: f32,
    #[serde(default = "default_player_radius")]
    pub radius: f32,
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    #[serde(default = "default_run_multiplier")]
    pub run_multiplier: f32,
    /// Radians of turn per unit of horizontal look delta
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,
    /// Height change per unit of vertical look delta
    #[serde(default = "default_height_sensitivity")]
    pub height_sensitivity: f32,
    #[serde(default = "default_player_height")]
    pub default_height: f32,
    #[serde(default = "default_jump_speed")]
    pub jump_speed: f32,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_player_health")]
    pub max_health: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnemyConfig {
    #[serde(default = "default_enemy_count")]
    pub count: usize,
    #[serde(default = "default_enemy_health")]
    pub health: f32,
    #[serde(default = "default_enemy_radius")]
    pub radius: f32,
    #[serde(default = "default_detection_range")]
    pub detection_range: f32,
    #[serde(default = "default_attack_range")]
    pub attack_range: f32,
    #[serde(default = "default_chase_speed")]
    pub chase_speed: f32,
    #[serde(default = "default_wander_speed")]
    pub wander_speed: f32,
    /// Velocity multiplier per tick while idle
    #[serde(default = "default_idle_damping")]
    pub idle_damping: f32,
    /// Velocity multiplier per tick while attacking
    #[serde(default = "default_attack_damping")]
    pub attack_damping: f32,
    /// Chance per tick to pick a new wander direction while idle
    #[serde(default = "default_wander_chance")]
    pub wander_chance: f32,
    #[serde(default = "default_attack_cooldown")]
    pub attack_cooldown: f32,
    #[serde(default = "default_attack_damage")]
    pub attack_damage: f32,
    /// Seconds a dead enemy stays in the roster before it is pruned
    #[serde(default = "default_corpse_time")]
    pub corpse_time: f32,
    #[serde(default = "default_min_spawn_distance")]
    pub min_spawn_distance: f32,
    #[serde(default = "default_spawn_attempts")]
    pub spawn_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeaponConfig {
    #[serde(default = "default_max_ammo")]
    pub max_ammo: u32,
    /// Seconds between shots
    #[serde(default = "default_fire_cooldown")]
    pub fire_cooldown: f32,
    #[serde(default = "default_weapon_damage")]
    pub damage: f32,
    #[serde(default = "default_reload_time")]
    pub reload_time: f32,
    #[serde(default = "default_max_range")]
    pub max_range: f32,
    /// Half-width in radians of the hit cone around the aim direction
    #[serde(default = "default_cone_half_width")]
    pub cone_half_width: f32,
    #[serde(default = "default_recoil_time")]
    pub recoil_time: f32,
    #[serde(default = "default_flash_time")]
    pub flash_time: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `env_logger` filter, `RUST_LOG` overrides it
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit a debug line for every enemy state transition
    #[serde(default)]
    pub trace_ai: bool,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOrigin {
    File(String),
    Missing(String),
    Invalid { path: String, error: String },
}

// Default values
fn default_columns() -> usize { 320 }
fn default_viewport_height() -> f32 { 240.0 }
fn default_window_title() -> String { "Gridcaster".to_string() }
fn default_fov() -> f32 { PI / 3.0 }
fn default_max_ray_distance() -> f32 { 20.0 }
fn default_player_x() -> f32 { 1.5 }
fn default_player_y() -> f32 { 1.5 }
fn default_player_radius() -> f32 { 0.25 }
fn default_walk_speed() -> f32 { 3.0 }
fn default_run_multiplier() -> f32 { 1.8 }
fn default_mouse_sensitivity() -> f32 { 0.003 }
fn default_height_sensitivity() -> f32 { 0.002 }
fn default_player_height() -> f32 { 1.0 }
fn default_jump_speed() -> f32 { 4.0 }
fn default_gravity() -> f32 { 12.0 }
fn default_player_health() -> f32 { 100.0 }
fn default_enemy_count() -> usize { 6 }
fn default_enemy_health() -> f32 { 10.0 }
fn default_enemy_radius() -> f32 { 0.3 }
fn default_detection_range() -> f32 { 8.0 }
fn default_attack_range() -> f32 { 1.5 }
fn default_chase_speed() -> f32 { 1.6 }
fn default_wander_speed() -> f32 { 0.8 }
fn default_idle_damping() -> f32 { 0.9 }
fn default_attack_damping() -> f32 { 0.8 }
fn default_wander_chance() -> f32 { 0.01 }
fn default_attack_cooldown() -> f32 { 1.0 }
fn default_attack_damage() -> f32 { 10.0 }
fn default_corpse_time() -> f32 { 3.0 }
fn default_min_spawn_distance() -> f32 { 4.0 }
fn default_spawn_attempts() -> u32 { 100 }
fn default_max_ammo() -> u32 { 12 }
fn default_fire_cooldown() -> f32 { 0.25 }
fn default_weapon_damage() -> f32 { 5.0 }
fn default_reload_time() -> f32 { 1.5 }
fn default_max_range() -> f32 { 20.0 }
fn default_cone_half_width() -> f32 { 0.05 }
fn default_recoil_time() -> f32 { 0.15 }
fn default_flash_time() -> f32 { 0.08 }
fn default_log_level() -> String { "info".to_string() }
fn default_event_log_path() -> String { "event_log.json".to_string() }
fn default_seed() -> u64 { 42 }

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            viewport_height: default_viewport_height(),
            window_title: default_window_title(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { fov: default_fov() }
    }
}

impl Default for RaycasterConfig {
    fn default() -> Self {
        Self {
            max_distance: default_max_ray_distance(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_x: default_player_x(),
            start_y: default_player_y(),
            start_heading: 0.0,
            radius: default_player_radius(),
            walk_speed: default_walk_speed(),
            run_multiplier: default_run_multiplier(),
            mouse_sensitivity: default_mouse_sensitivity(),
            height_sensitivity: default_height_sensitivity(),
            default_height: default_player_height(),
            jump_speed: default_jump_speed(),
            gravity: default_gravity(),
            max_health: default_player_health(),
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            count: default_enemy_count(),
            health: default_enemy_health(),
            radius: default_enemy_radius(),
            detection_range: default_detection_range(),
            attack_range: default_attack_range(),
            chase_speed: default_chase_speed(),
            wander_speed: default_wander_speed(),
            idle_damping: default_idle_damping(),
            attack_damping: default_attack_damping(),
            wander_chance: default_wander_chance(),
            attack_cooldown: default_attack_cooldown(),
            attack_damage: default_attack_damage(),
            corpse_time: default_corpse_time(),
            min_spawn_distance: default_min_spawn_distance(),
            spawn_attempts: default_spawn_attempts(),
        }
    }
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            max_ammo: default_max_ammo(),
            fire_cooldown: default_fire_cooldown(),
            damage: default_weapon_damage(),
            reload_time: default_reload_time(),
            max_range: default_max_range(),
            cone_half_width: default_cone_half_width(),
            recoil_time: default_recoil_time(),
            flash_time: default_flash_time(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            trace_ai: false,
            event_log_path: default_event_log_path(),
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self { seed: default_seed() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            camera: CameraConfig::default(),
            raycaster: RaycasterConfig::default(),
            player: PlayerConfig::default(),
            enemies: EnemyConfig::default(),
            weapon: WeaponConfig::default(),
            logging: LoggingConfig::default(),
            level: LevelConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Load configuration from `path`, or use defaults if it is missing or invalid.
    ///
    /// Nothing is logged here: the logger is configured from the result, so the
    /// caller reports the returned origin once logging is up.
    pub fn load(path: &str) -> (Self, ConfigOrigin) {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(config) => (config, ConfigOrigin::File(path.to_string())),
                Err(error) => (
                    Config::default(),
                    ConfigOrigin::Invalid {
                        path: path.to_string(),
                        error,
                    },
                ),
            },
            Err(_) => (Config::default(), ConfigOrigin::Missing(path.to_string())),
        }
    }
}

impl ConfigOrigin {
    /// Report the origin through the `log` facade
    pub fn report(&self) {
        match self {
            ConfigOrigin::File(path) => log::info!("Loaded configuration from {}", path),
            ConfigOrigin::Missing(path) => log::info!("No {} found, using default configuration", path),
            ConfigOrigin::Invalid { path, error } => {
                log::warn!("Failed to parse {}: {}", path, error);
                log::warn!("Using default configuration");
            }
        }
    }
}
