use arboard::Clipboard;
use gridcaster::config::{Config, ConfigOrigin};
use gridcaster::enemy::EnemyState;
use gridcaster::events::GameEvent;
use gridcaster::levels::default_level;
use gridcaster::ray::SIDE_Y;
use gridcaster::sprite::{project_billboard, visible_columns};
use gridcaster::{ControlInput, Game, GameStatus, RayRecord};
use log::{error, info, warn};
use macroquad::prelude::*;

const CONFIG_PATH: &str = "config.toml";
const SNAPSHOT_PATH: &str = "snapshot.json";
/// Keyboard turning, in look-delta units per second
const KEY_TURN_RATE: f32 = 600.0;
const MINIMAP_CELL: f32 = 8.0;
const ENEMY_SPRITE_SIZE: f32 = 0.6;
/// How long a HUD message stays up, seconds
const MESSAGE_TIME: f32 = 2.0;

/// Presentation state around the core game
struct ViewState {
    game: Game,
    rays: Vec<RayRecord>,
    last_mouse: Option<(f32, f32)>,
    message: Option<(String, f32)>,
    show_minimap: bool,
}

impl ViewState {
    fn new(config: Config) -> Self {
        ViewState {
            game: Game::new(config, default_level()),
            rays: Vec::new(),
            last_mouse: None,
            message: None,
            show_minimap: true,
        }
    }

    /// Collapse keyboard and mouse state into a control input
    fn poll_input(&mut self, dt: f32) -> ControlInput {
        let mut forward = 0.0;
        let mut strafe = 0.0;
        if is_key_down(KeyCode::W) {
            forward += 1.0;
        }
        if is_key_down(KeyCode::S) {
            forward -= 1.0;
        }
        if is_key_down(KeyCode::D) {
            strafe += 1.0;
        }
        if is_key_down(KeyCode::A) {
            strafe -= 1.0;
        }

        let mouse = mouse_position();
        let (mut look_dx, look_dy) = match self.last_mouse {
            Some((x, y)) => (mouse.0 - x, mouse.1 - y),
            None => (0.0, 0.0),
        };
        self.last_mouse = Some(mouse);

        if is_key_down(KeyCode::Right) {
            look_dx += KEY_TURN_RATE * dt;
        }
        if is_key_down(KeyCode::Left) {
            look_dx -= KEY_TURN_RATE * dt;
        }

        ControlInput {
            forward,
            strafe,
            run: is_key_down(KeyCode::LeftShift),
            jump: is_key_pressed(KeyCode::Space),
            fire: is_mouse_button_down(MouseButton::Left) || is_key_down(KeyCode::LeftControl),
            reload: is_key_pressed(KeyCode::R),
            look_dx,
            look_dy,
        }
    }

    fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), MESSAGE_TIME));
    }

    fn update(&mut self, dt: f32) {
        let input = self.poll_input(dt);
        self.game.update(&input, dt);

        let mut kills = 0;
        for logged in self.game.events.take_recent() {
            if let GameEvent::EnemyKilled { .. } = logged.event {
                kills += 1;
            }
        }
        if kills > 0 {
            let left = self.game.enemies.live_count();
            self.set_message(format!("Enemy down! {} left", left));
        }

        if let Some((_, remaining)) = &mut self.message {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.message = None;
            }
        }

        self.game.cast_rays_into(&mut self.rays);
    }

    fn copy_to_clipboard(&mut self) {
        let snapshot = match self.game.snapshot().to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };
        let text = format!("{}\n{}", self.game.map_ascii(), snapshot);

        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&text) {
                    warn!("Failed to copy to clipboard: {}", e);
                } else {
                    info!("Snapshot copied to clipboard");
                    self.set_message("Snapshot copied to clipboard");
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn save_snapshot(&mut self) {
        match self.game.snapshot().save_to_file(SNAPSHOT_PATH) {
            Ok(()) => {
                info!("Snapshot saved to {}", SNAPSHOT_PATH);
                self.set_message(format!("Saved {}", SNAPSHOT_PATH));
            }
            Err(e) => error!("{}", e),
        }
    }

    fn save_event_log(&self) {
        let path = &self.game.config().logging.event_log_path;
        if path.is_empty() {
            return;
        }
        match self.game.events.save_to_file(path) {
            Ok(()) => info!("Event log saved to {}", path),
            Err(e) => error!("Failed to save event log: {}", e),
        }
    }

    /// Vertical screen offset from the player's height channel
    fn horizon_shift(&self) -> f32 {
        let rest = self.game.config().player.default_height;
        (self.game.player.height - rest) * screen_height() * 0.25
    }

    fn draw(&self) {
        let sw = screen_width();
        let sh = screen_height();
        let shift = self.horizon_shift();
        let horizon = sh / 2.0 + shift;

        clear_background(Color::from_rgba(30, 30, 30, 255));
        draw_rectangle(0.0, 0.0, sw, horizon, Color::from_rgba(45, 50, 70, 255));
        draw_rectangle(0.0, horizon, sw, sh - horizon, Color::from_rgba(60, 55, 50, 255));

        self.draw_walls(shift);
        self.draw_enemies(shift);
        self.draw_crosshair();
        self.draw_hud();
        if self.show_minimap {
            self.draw_minimap();
        }
    }

    fn draw_walls(&self, shift: f32) {
        let raycaster = &self.game.raycaster;
        let column_width = screen_width() / raycaster.columns as f32;
        let scale_y = screen_height() / raycaster.viewport_height;
        let max_distance = raycaster.max_distance;

        for ray in &self.rays {
            if !ray.hit {
                continue;
            }
            let mut color = wall_color(ray.wall_variant);
            let mut shade = 1.0 - (ray.distance / max_distance).min(1.0) * 0.8;
            if ray.side == SIDE_Y {
                shade *= 0.7;
            }
            color.r *= shade;
            color.g *= shade;
            color.b *= shade;

            let top = ray.wall_top * scale_y + shift;
            let height = ray.wall_height() * scale_y;
            draw_rectangle(
                ray.column as f32 * column_width,
                top,
                column_width + 1.0,
                height,
                color,
            );
        }
    }

    fn draw_enemies(&self, shift: f32) {
        let raycaster = &self.game.raycaster;
        let camera = self.game.camera();
        let column_width = screen_width() / raycaster.columns as f32;
        let scale_y = screen_height() / raycaster.viewport_height;

        let mut sprites: Vec<_> = self
            .game
            .enemies
            .enemies
            .iter()
            .filter_map(|enemy| {
                project_billboard(raycaster, &camera, enemy.pose.x, enemy.pose.y, ENEMY_SPRITE_SIZE)
                    .map(|projection| (enemy, projection))
            })
            .collect();
        // Painter's order: far to near
        sprites.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

        for (enemy, projection) in sprites {
            let color = match enemy.state {
                EnemyState::Idle => Color::from_rgba(120, 160, 120, 255),
                EnemyState::Chase => Color::from_rgba(220, 170, 60, 255),
                EnemyState::Attack => Color::from_rgba(230, 60, 60, 255),
                EnemyState::Dead => Color::from_rgba(90, 40, 40, 255),
            };

            // Sprite occupies the lower part of the wall-height band
            let full = projection.height * scale_y;
            let sprite_height = if enemy.is_alive() { full * 0.7 } else { full * 0.15 };
            let bottom = projection.bottom * scale_y + shift;
            let top = bottom - sprite_height;

            for column in visible_columns(&self.rays, &projection) {
                draw_rectangle(
                    column as f32 * column_width,
                    top,
                    column_width + 1.0,
                    sprite_height,
                    color,
                );
            }

            if enemy.is_alive() && enemy.health < enemy.max_health {
                if let Some(column) = projection.center_column(self.rays.len()) {
                    if visible_columns(&self.rays, &projection).contains(&column) {
                        let bar_width = projection.width * column_width;
                        let x = projection.screen_x * column_width - bar_width / 2.0;
                        let fraction = enemy.health / enemy.max_health;
                        draw_rectangle(x, top - 8.0, bar_width, 4.0, DARKGRAY);
                        draw_rectangle(x, top - 8.0, bar_width * fraction, 4.0, RED);
                    }
                }
            }
        }
    }

    fn draw_crosshair(&self) {
        let cx = screen_width() / 2.0;
        let cy = screen_height() / 2.0;
        let recoil = self.game.weapon.recoil * 40.0;
        draw_line(cx - 8.0, cy - recoil, cx + 8.0, cy - recoil, 2.0, WHITE);
        draw_line(cx, cy - 8.0 - recoil, cx, cy + 8.0 - recoil, 2.0, WHITE);

        if self.game.weapon.muzzle_flash > 0.0 {
            draw_circle(cx, screen_height() - 60.0, 30.0, Color::from_rgba(255, 220, 120, 200));
        }
    }

    fn draw_hud(&self) {
        let player = &self.game.player;
        let weapon = &self.game.weapon;
        let sh = screen_height();

        let ammo = if weapon.reloading {
            format!("Reloading {:3.0}%", weapon.reload_fraction() * 100.0)
        } else {
            format!("Ammo {}/{}", weapon.ammo, weapon.max_ammo)
        };
        let info = format!(
            "Health {:.0}/{:.0}   {}   Enemies {}",
            player.health.max(0.0),
            player.max_health,
            ammo,
            self.game.enemies.live_count()
        );
        draw_text(&info, 10.0, sh - 16.0, 24.0, WHITE);
        draw_text(
            "WASD move  Shift run  Space jump  LMB fire  R reload  M map  C copy  F5 save  Esc quit",
            10.0,
            20.0,
            18.0,
            LIGHTGRAY,
        );

        if let Some((text, _)) = &self.message {
            draw_text(text, 10.0, 44.0, 22.0, YELLOW);
        }

        if self.game.status == GameStatus::PlayerDead {
            let cx = screen_width() / 2.0;
            draw_rectangle(0.0, 0.0, screen_width(), sh, Color::from_rgba(80, 0, 0, 140));
            draw_text("YOU DIED", cx - 90.0, sh / 2.0, 48.0, WHITE);
            draw_text("Press Enter to restart", cx - 110.0, sh / 2.0 + 36.0, 24.0, WHITE);
        }
    }

    fn draw_minimap(&self) {
        let map = &self.game.map;
        let origin_x = screen_width() - map.width as f32 * MINIMAP_CELL - 10.0;
        let origin_y = 10.0;

        for gy in 1..=map.height {
            for gx in 1..=map.width {
                let color = if map.is_wall(gx, gy) {
                    wall_color(map.wall_variant(gx, gy))
                } else {
                    Color::from_rgba(20, 20, 20, 200)
                };
                draw_rectangle(
                    origin_x + (gx - 1) as f32 * MINIMAP_CELL,
                    origin_y + (gy - 1) as f32 * MINIMAP_CELL,
                    MINIMAP_CELL - 1.0,
                    MINIMAP_CELL - 1.0,
                    color,
                );
            }
        }

        let to_screen = |x: f32, y: f32| (origin_x + x * MINIMAP_CELL, origin_y + y * MINIMAP_CELL);

        for enemy in self.game.enemies.live() {
            let (ex, ey) = to_screen(enemy.pose.x, enemy.pose.y);
            draw_circle(ex, ey, 2.5, RED);
        }

        let pose = self.game.player.pose;
        let (px, py) = to_screen(pose.x, pose.y);
        draw_circle(px, py, 3.0, BLUE);
        draw_line(
            px,
            py,
            px + pose.angle.cos() * MINIMAP_CELL,
            py + pose.angle.sin() * MINIMAP_CELL,
            1.5,
            SKYBLUE,
        );
    }
}

fn wall_color(variant: i32) -> Color {
    match variant {
        1 => Color::from_rgba(150, 150, 160, 255),
        2 => Color::from_rgba(170, 80, 70, 255),
        3 => Color::from_rgba(70, 130, 170, 255),
        4 => Color::from_rgba(90, 160, 90, 255),
        _ => Color::from_rgba(180, 160, 90, 255),
    }
}

fn window_conf() -> Conf {
    let (config, _) = Config::load(CONFIG_PATH);
    Conf {
        window_title: config.screen.window_title,
        window_width: 960,
        window_height: 640,
        ..Default::default()
    }
}

fn init_logging(config: &Config, origin: &ConfigOrigin) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
    origin.report();
}

#[macroquad::main(window_conf)]
async fn main() {
    let (config, origin) = Config::load(CONFIG_PATH);
    init_logging(&config, &origin);

    let mut state = ViewState::new(config);

    loop {
        let dt = get_frame_time();
        state.update(dt);

        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }

        if is_key_pressed(KeyCode::F5) {
            state.save_snapshot();
        }

        if is_key_pressed(KeyCode::M) {
            state.show_minimap = !state.show_minimap;
        }

        if state.game.status == GameStatus::PlayerDead && is_key_pressed(KeyCode::Enter) {
            state.game.restart();
            state.set_message("Restarted");
        }

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            state.save_event_log();
            break;
        }

        state.draw();

        next_frame().await
    }

    info!("{}", state.game.events.summary().replace('\n', " | "));
}
