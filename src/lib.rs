pub mod actor;
pub mod config;
pub mod enemy;
pub mod events;
pub mod game;
pub mod grid;
pub mod levels;
pub mod player;
pub mod ray;
pub mod raycast;
pub mod snapshot;
pub mod sprite;
pub mod weapon;

pub use actor::{Pose, Velocity};
pub use config::Config;
pub use enemy::{Enemy, EnemyRoster, EnemyState};
pub use game::{ControlInput, Game, GameStatus};
pub use grid::GridMap;
pub use ray::{CameraPose, RayRecord};
pub use raycast::Raycaster;
pub use weapon::Weapon;
