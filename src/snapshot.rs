use crate::actor::Pose;
use crate::enemy::{Enemy, EnemyState};
use crate::game::GameStatus;
use crate::player::Player;
use crate::weapon::Weapon;
use serde::{Deserialize, Serialize};
use std::fs;

/// Read-only view of the player for HUD and rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pose: Pose,
    pub height: f32,
    pub grounded: bool,
    pub health: f32,
    pub max_health: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: usize,
    pub pose: Pose,
    pub health: f32,
    pub max_health: f32,
    pub state: EnemyState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponView {
    pub ammo: u32,
    pub max_ammo: u32,
    pub reloading: bool,
    pub reload_fraction: f32,
    pub cooldown: f32,
    pub recoil: f32,
    pub muzzle_flash: f32,
}

/// Snapshot of all entity state at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Game clock in seconds
    pub time: f32,
    pub status: GameStatus,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub weapon: WeaponView,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        PlayerView {
            pose: player.pose,
            height: player.height,
            grounded: player.grounded,
            health: player.health,
            max_health: player.max_health,
        }
    }
}

impl From<&Enemy> for EnemyView {
    fn from(enemy: &Enemy) -> Self {
        EnemyView {
            id: enemy.id,
            pose: enemy.pose,
            health: enemy.health,
            max_health: enemy.max_health,
            state: enemy.state,
        }
    }
}

impl From<&Weapon> for WeaponView {
    fn from(weapon: &Weapon) -> Self {
        WeaponView {
            ammo: weapon.ammo,
            max_ammo: weapon.max_ammo,
            reloading: weapon.reloading,
            reload_fraction: weapon.reload_fraction(),
            cooldown: weapon.cooldown,
            recoil: weapon.recoil,
            muzzle_flash: weapon.muzzle_flash,
        }
    }
}

impl GameSnapshot {
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize snapshot: {}", e))
    }

    /// Save to file
    pub fn save_to_file(&self, path: &str) -> Result<(), String> {
        let json = self.to_json()?;

        fs::write(path, json)
            .map_err(|e| format!("Failed to write snapshot file: {}", e))?;

        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: &str) -> Result<Self, String> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read snapshot file: {}", e))?;

        serde_json::from_str(&json)
            .map_err(|e| format!("Failed to parse snapshot file: {}", e))
    }

    /// Enemies still alive in this snapshot
    pub fn live_enemies(&self) -> impl Iterator<Item = &EnemyView> {
        self.enemies.iter().filter(|enemy| enemy.state != EnemyState::Dead)
    }
}
