use crate::enemy::EnemyState;
use serde::{Deserialize, Serialize};

/// Things that happened in the core during a frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { ammo_left: u32 },
    EnemyHit { enemy_id: usize, damage: f32, health_left: f32 },
    EnemyKilled { enemy_id: usize },
    /// Shot missed every enemy; `hit` is false when no wall was within range
    WallHit { hit: bool, distance: f32, x: f32, y: f32 },
    PlayerDamaged { enemy_id: usize, amount: f32, health_left: f32 },
    PlayerDied,
    ReloadStarted,
    ReloadFinished,
    EnemyStateChanged { enemy_id: usize, from: EnemyState, to: EnemyState },
    EnemiesPruned { ids: Vec<usize> },
}

/// Event stamped with the game clock
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Seconds of game time
    pub time: f32,
    pub event: GameEvent,
}

/// Event log kept for the whole session.
/// Presentation reads new entries with `take_recent`; the full history stays for `save_to_file`.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
    read_cursor: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, time: f32, event: GameEvent) {
        log::trace!("[{:8.3}s] {:?}", time, event);
        self.events.push(LoggedEvent { time, event });
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Events logged since the previous call
    pub fn take_recent(&mut self) -> &[LoggedEvent] {
        let start = self.read_cursor;
        self.read_cursor = self.events.len();
        &self.events[start..]
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.read_cursor = 0;
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut shots = 0;
        let mut enemy_hits = 0;
        let mut kills = 0;
        let mut wall_hits = 0;
        let mut damage_taken = 0.0;
        let mut reloads = 0;
        let mut transitions = 0;

        for logged in &self.events {
            match &logged.event {
                GameEvent::ShotFired { .. } => shots += 1,
                GameEvent::EnemyHit { .. } => enemy_hits += 1,
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::WallHit { hit: true, .. } => wall_hits += 1,
                GameEvent::PlayerDamaged { amount, .. } => damage_taken += amount,
                GameEvent::ReloadFinished => reloads += 1,
                GameEvent::EnemyStateChanged { .. } => transitions += 1,
                _ => {}
            }
        }

        let duration = self.events.last().map(|logged| logged.time).unwrap_or(0.0);

        format!(
            "Session Duration: {:.2}s\n\
             Total Events: {}\n\
             Shots: {} fired, {} enemy hits, {} kills, {} wall hits\n\
             Player: {:.1} damage taken, {} reloads\n\
             AI: {} state transitions",
            duration,
            self.events.len(),
            shots,
            enemy_hits,
            kills,
            wall_hits,
            damage_taken,
            reloads,
            transitions
        )
    }
}
