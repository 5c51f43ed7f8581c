/// Headless scripted run of the game core on the default level
///
/// Drives a simple pilot (turn toward the nearest visible enemy, fire when
/// lined up, reload when empty, otherwise wander forward) for a fixed number
/// of frames and prints the event summary.
use gridcaster::actor::angle_difference;
use gridcaster::config::Config;
use gridcaster::levels::default_level;
use gridcaster::{ControlInput, Game, GameStatus};
use std::env;

const FRAME_DT: f32 = 1.0 / 60.0;
const FRAMES: usize = 60 * 60;
/// Largest heading change the pilot makes per frame, radians
const MAX_TURN: f32 = 0.08;
const AIM_TOLERANCE: f32 = 0.03;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        eprintln!("Usage: {} [event_log.json]", args[0]);
        eprintln!("Runs a scripted headless session and prints the event summary");
        std::process::exit(1);
    }

    let (config, origin) = Config::load("config.toml");
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
    origin.report();

    let sensitivity = config.player.mouse_sensitivity;
    let mut game = Game::new(config, default_level());
    let mut frames_run = 0;

    for frame in 0..FRAMES {
        let input = pilot(&game, sensitivity, frame);
        game.update(&input, FRAME_DT);
        // Render phase
        let rays = game.cast_rays();
        debug_assert_eq!(rays.len(), game.raycaster.columns);
        frames_run = frame + 1;

        if game.status == GameStatus::PlayerDead {
            log::info!("player died on frame {}", frame);
            break;
        }
        if game.enemies.live_count() == 0 {
            log::info!("all enemies down on frame {}", frame);
            break;
        }
    }

    println!("=== Simulation: {} frames ({:.2}s) ===", frames_run, game.clock);
    println!("{}", game.events.summary());
    println!(
        "\nFinal: status {:?}, health {:.0}, ammo {}, enemies alive {}",
        game.status,
        game.player.health,
        game.weapon.ammo,
        game.enemies.live_count()
    );
    println!("\n{}", game.map_ascii());

    if let Some(path) = args.get(1) {
        match game.events.save_to_file(path) {
            Ok(()) => println!("Event log written to {}", path),
            Err(e) => {
                eprintln!("Failed to write event log {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }
}

/// Scripted control input for one frame
fn pilot(game: &Game, sensitivity: f32, frame: usize) -> ControlInput {
    let pose = game.player.pose;
    let mut input = ControlInput::default();

    if game.weapon.ammo == 0 && !game.weapon.reloading {
        input.reload = true;
    }

    let target = game
        .enemies
        .live()
        .filter(|enemy| game.map.has_line_of_sight(pose.x, pose.y, enemy.pose.x, enemy.pose.y))
        .min_by(|a, b| {
            pose.distance_to(a.pose.x, a.pose.y)
                .total_cmp(&pose.distance_to(b.pose.x, b.pose.y))
        });

    let turn = match target {
        Some(enemy) => {
            let bearing = (enemy.pose.y - pose.y).atan2(enemy.pose.x - pose.x);
            let error = angle_difference(bearing, pose.angle);
            input.fire = error.abs() < AIM_TOLERANCE;
            error.clamp(-MAX_TURN, MAX_TURN)
        }
        None => {
            input.forward = 1.0;
            // Sweep slowly, with a harder turn every few seconds
            if frame % 180 < 20 { MAX_TURN } else { 0.01 }
        }
    };

    if sensitivity > 0.0 {
        input.look_dx = turn / sensitivity;
    }
    input
}
