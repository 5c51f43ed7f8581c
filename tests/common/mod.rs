#![allow(dead_code)]

use gridcaster::config::Config;
use gridcaster::levels::open_arena;
use gridcaster::{Game, GridMap};

/// Arena with a border of wall variant 1
pub fn arena(width: i32, height: i32) -> GridMap {
    open_arena(width, height)
}

/// Parse a test map
/// Format:
/// - `#`: wall variant 1
/// - `1`..`9`: wall of that variant
/// - `.`: free cell
pub fn parse_map(text: &str) -> GridMap {
    GridMap::from_ascii(text)
}

/// Mirror a map left-right
pub fn flip_horizontal(map: &GridMap) -> GridMap {
    let mut flipped = GridMap::new(map.width, map.height);
    for gy in 1..=map.height {
        for gx in 1..=map.width {
            flipped.set_cell(map.width + 1 - gx, gy, map.get_cell(gx, gy));
        }
    }
    flipped
}

/// Mirror a map top-bottom
pub fn flip_vertical(map: &GridMap) -> GridMap {
    let mut flipped = GridMap::new(map.width, map.height);
    for gy in 1..=map.height {
        for gx in 1..=map.width {
            flipped.set_cell(gx, map.height + 1 - gy, map.get_cell(gx, gy));
        }
    }
    flipped
}

/// Default configuration with no enemies spawned
pub fn quiet_config() -> Config {
    let mut config = Config::default();
    config.enemies.count = 0;
    config
}

/// Game on `map` with no enemies, player at (x, y) facing `heading`
pub fn game_with_player(map: GridMap, x: f32, y: f32, heading: f32) -> Game {
    let mut config = quiet_config();
    config.player.start_x = x;
    config.player.start_y = y;
    config.player.start_heading = heading;
    Game::new(config, map)
}

pub fn approx(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}
